//! Compensation manager: undoes partial writes after a failed attempt. There
//! is no multi-document transaction around course + quiz writes; these
//! best-effort deletions are the correctness mechanism that substitutes for
//! one. A failed undo is logged and never masks the original error.

use uuid::Uuid;

use super::store::{CourseStore, QuizStore};

/// Delete quiz records created during a failed or superseded attempt.
pub async fn release_quizzes(quizzes: &dyn QuizStore, quiz_ids: &[Uuid]) {
    for quiz_id in quiz_ids {
        if let Err(err) = quizzes.delete_quiz(*quiz_id).await {
            tracing::error!(
                target: "courses.compensate",
                quiz_id = %quiz_id,
                error = %err,
                "failed to delete quiz record during compensation"
            );
        }
    }
}

/// Undo a failed first-time creation: remove the quizzes created in this
/// attempt, then the course shell itself, leaving no trace of the request.
pub async fn abandon_created_course(
    courses: &dyn CourseStore,
    quizzes: &dyn QuizStore,
    course_id: Uuid,
    quiz_ids: &[Uuid],
) {
    release_quizzes(quizzes, quiz_ids).await;

    if let Err(err) = courses.delete_course(course_id).await {
        tracing::error!(
            target: "courses.compensate",
            course_id = %course_id,
            error = %err,
            "failed to delete course record during compensation"
        );
    }

    tracing::info!(
        target: "courses.compensate",
        course_id = %course_id,
        quizzes_released = quiz_ids.len(),
        "abandoned failed course creation"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::courses::testing::MemoryStore;

    #[tokio::test]
    async fn abandon_removes_quizzes_and_course() {
        let store = MemoryStore::new();
        let course = store.seed_course(Uuid::new_v4());
        let quiz_a = store.seed_quiz(course.id);
        let quiz_b = store.seed_quiz(course.id);

        abandon_created_course(&store, &store, course.id, &[quiz_a, quiz_b]).await;

        assert!(store.course(course.id).is_none());
        assert_eq!(store.quiz_count(), 0);
    }

    #[tokio::test]
    async fn release_tolerates_store_failures() {
        let store = MemoryStore::new();
        let course = store.seed_course(Uuid::new_v4());
        let quiz_id = store.seed_quiz(course.id);
        store.fail_quiz_deletes(true);

        // must not panic or propagate
        release_quizzes(&store, &[quiz_id]).await;
        assert_eq!(store.quiz_count(), 1);
    }
}
