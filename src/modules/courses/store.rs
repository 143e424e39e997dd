//! Storage port traits for the course authoring pipeline.
//! Implemented by the sqlx repositories in `db::repositories` — the pipeline
//! logic depends only on these traits.

use async_trait::async_trait;
use uuid::Uuid;

use crate::db::models::{Course, CourseContentUpdate, NewCourse, NewQuiz, Quiz};
use crate::db::DatabaseError;

pub type Result<T> = std::result::Result<T, DatabaseError>;

/// Storage operations on the course aggregate.
#[async_trait]
pub trait CourseStore: Send + Sync {
    /// Create a new course in `Pending` status with an empty curriculum.
    /// Returns the created course with its assigned id.
    async fn insert_course(&self, new_course: &NewCourse) -> Result<Course>;

    /// Load a course by id.
    async fn find_course(&self, course_id: Uuid) -> Result<Option<Course>>;

    /// Replace a course's editable content, moving it back to `Pending` and
    /// clearing any rejection reason. Fails with `NotFound` if the course
    /// no longer exists.
    async fn update_course_content(
        &self,
        course_id: Uuid,
        update: &CourseContentUpdate,
    ) -> Result<()>;

    /// Delete a course row. Deleting an already-absent course is not an error.
    async fn delete_course(&self, course_id: Uuid) -> Result<()>;
}

/// Storage operations on quiz records.
#[async_trait]
pub trait QuizStore: Send + Sync {
    /// Create a quiz record scoped to a course. Returns the record with its
    /// assigned id.
    async fn insert_quiz(&self, new_quiz: &NewQuiz) -> Result<Quiz>;

    /// Bulk-load quizzes by id set. One round trip regardless of count.
    async fn quizzes_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Quiz>>;

    /// Delete a single quiz record. Deleting an absent quiz is not an error.
    async fn delete_quiz(&self, quiz_id: Uuid) -> Result<()>;

    /// Delete every quiz owned by a course. Returns the number removed.
    async fn delete_quizzes_for_course(&self, course_id: Uuid) -> Result<u64>;
}
