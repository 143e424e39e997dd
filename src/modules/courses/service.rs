//! Course authoring operations. Each request runs the same forward pipeline:
//! normalize -> prepare -> materialize -> persist, with compensation undoing
//! this attempt's writes on any failure. Validation runs entirely before the
//! first write, so a validation failure never needs compensation.

use uuid::Uuid;

use crate::db::models::{Course, CourseContentUpdate, CourseStatus, NewCourse};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;

use super::compensate;
use super::draft::CourseDraft;
use super::materialize::{self, Materialized};
use super::normalize;
use super::prepare::{self, PreparedCourse};
use super::reconstruct;
use super::store::{CourseStore, QuizStore};

#[derive(Debug, Clone, Copy)]
pub struct CourseReceipt {
    pub id: Uuid,
    pub status: CourseStatus,
}

#[derive(Debug, Clone)]
pub struct CourseForEdit {
    pub course: Course,
    pub draft: CourseDraft,
}

/// Create a new course from a draft. The course enters `Pending` directly;
/// submission is implicit in creation. A failed attempt leaves no trace.
pub async fn create_course(
    courses: &dyn CourseStore,
    quizzes: &dyn QuizStore,
    instructor_id: Uuid,
    draft: &CourseDraft,
) -> AppResult<CourseReceipt> {
    let prepared = validate(draft)?;

    let course = courses.insert_course(&new_course(&prepared, instructor_id)).await?;

    let materialized =
        match materialize::materialize_sections(quizzes, course.id, instructor_id, &prepared.sections)
            .await
        {
            Ok(materialized) => materialized,
            Err(err) => {
                compensate::abandon_created_course(courses, quizzes, course.id, &err.created_quiz_ids)
                    .await;
                return Err(err.source.into());
            }
        };

    if let Err(err) = courses
        .update_course_content(course.id, &content_update(&prepared, &materialized))
        .await
    {
        compensate::abandon_created_course(
            courses,
            quizzes,
            course.id,
            &materialized.created_quiz_ids,
        )
        .await;
        return Err(err.into());
    }

    tracing::info!(
        target: "courses.service",
        course_id = %course.id,
        instructor_id = %instructor_id,
        lectures = materialized.total_lectures,
        quizzes = materialized.created_quiz_ids.len(),
        "course created and submitted for review"
    );

    Ok(CourseReceipt {
        id: course.id,
        status: CourseStatus::Pending,
    })
}

/// Replace a course's content with a new draft and move it back to `Pending`.
/// On failure the previously persisted course and its quizzes are untouched;
/// only this attempt's quiz records are rolled back.
pub async fn resubmit_course(
    courses: &dyn CourseStore,
    quizzes: &dyn QuizStore,
    instructor_id: Uuid,
    course_id: Uuid,
    draft: &CourseDraft,
) -> AppResult<CourseReceipt> {
    let course = owned_course(courses, instructor_id, course_id).await?;
    if !course.status.can_edit() {
        return Err(super::status::StatusError::EditNotAllowed.into());
    }

    let prepared = validate(draft)?;
    let stale_quiz_ids = course.referenced_quiz_ids();

    let materialized =
        match materialize::materialize_sections(quizzes, course.id, instructor_id, &prepared.sections)
            .await
        {
            Ok(materialized) => materialized,
            Err(err) => {
                // The pre-existing course keeps its prior valid state.
                compensate::release_quizzes(quizzes, &err.created_quiz_ids).await;
                return Err(err.source.into());
            }
        };

    if let Err(err) = courses
        .update_course_content(course.id, &content_update(&prepared, &materialized))
        .await
    {
        compensate::release_quizzes(quizzes, &materialized.created_quiz_ids).await;
        return Err(err.into());
    }

    // Only after the new content is durably in place do the replaced quiz
    // records become garbage.
    compensate::release_quizzes(quizzes, &stale_quiz_ids).await;

    tracing::info!(
        target: "courses.service",
        course_id = %course.id,
        instructor_id = %instructor_id,
        lectures = materialized.total_lectures,
        quizzes_created = materialized.created_quiz_ids.len(),
        quizzes_released = stale_quiz_ids.len(),
        "course resubmitted for review"
    );

    Ok(CourseReceipt {
        id: course.id,
        status: CourseStatus::Pending,
    })
}

/// Load a course and rebuild its editable draft. Quiz records are fetched in
/// one bulk query.
pub async fn course_for_edit(
    courses: &dyn CourseStore,
    quizzes: &dyn QuizStore,
    instructor_id: Uuid,
    course_id: Uuid,
) -> AppResult<CourseForEdit> {
    let course = owned_course(courses, instructor_id, course_id).await?;
    let quiz_records = quizzes.quizzes_by_ids(&course.referenced_quiz_ids()).await?;
    let draft = reconstruct::draft_from_course(&course, &quiz_records);
    Ok(CourseForEdit { course, draft })
}

/// Delete a course and, first, every quiz it owns. Allowed for the owning
/// instructor or an admin.
pub async fn delete_course(
    courses: &dyn CourseStore,
    quizzes: &dyn QuizStore,
    caller: &AuthUser,
    course_id: Uuid,
) -> AppResult<()> {
    let course = match courses.find_course(course_id).await? {
        Some(course) if course.instructor_id == caller.id || caller.is_admin() => course,
        _ => return Err(AppError::NotFound("course not found".to_string())),
    };

    let removed = quizzes.delete_quizzes_for_course(course.id).await?;
    courses.delete_course(course.id).await?;

    tracing::info!(
        target: "courses.service",
        course_id = %course.id,
        quizzes_removed = removed,
        "course deleted"
    );
    Ok(())
}

fn validate(draft: &CourseDraft) -> AppResult<PreparedCourse> {
    let sections = normalize::normalize_sections(draft)?;
    Ok(prepare::prepare_course(draft, sections)?)
}

async fn owned_course(
    courses: &dyn CourseStore,
    instructor_id: Uuid,
    course_id: Uuid,
) -> AppResult<Course> {
    match courses.find_course(course_id).await? {
        Some(course) if course.instructor_id == instructor_id => Ok(course),
        // Not distinguishing "absent" from "someone else's" keeps ownership
        // unguessable.
        _ => Err(AppError::NotFound("course not found".to_string())),
    }
}

fn new_course(prepared: &PreparedCourse, instructor_id: Uuid) -> NewCourse {
    NewCourse {
        instructor_id,
        title: prepared.title.clone(),
        subtitle: prepared.subtitle.clone(),
        description: prepared.description.clone(),
        category: prepared.category.clone(),
        subject: prepared.subject.clone(),
        level: prepared.level.clone(),
        language: prepared.language.clone(),
        price_type: prepared.price_type,
        price_amount: prepared.price_amount,
        thumbnail_url: prepared.thumbnail_url.clone(),
        outcomes: prepared.outcomes.clone(),
        requirements: prepared.requirements.clone(),
        tags: prepared.tags.clone(),
    }
}

fn content_update(prepared: &PreparedCourse, materialized: &Materialized) -> CourseContentUpdate {
    CourseContentUpdate {
        title: prepared.title.clone(),
        subtitle: prepared.subtitle.clone(),
        description: prepared.description.clone(),
        category: prepared.category.clone(),
        subject: prepared.subject.clone(),
        level: prepared.level.clone(),
        language: prepared.language.clone(),
        price_type: prepared.price_type,
        price_amount: prepared.price_amount,
        thumbnail_url: prepared.thumbnail_url.clone(),
        outcomes: prepared.outcomes.clone(),
        requirements: prepared.requirements.clone(),
        tags: prepared.tags.clone(),
        sections: materialized.sections.clone(),
        total_lectures: materialized.total_lectures,
        total_video_seconds: materialized.total_video_seconds,
    }
}
