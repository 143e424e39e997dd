use serde::{Deserialize, Serialize};
use sqlx::types::Uuid;
use time::OffsetDateTime;

/// Quiz record owned by exactly one course. Created only by the course
/// materializer, deleted only by compensation or resubmission cleanup.
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct Quiz {
    pub id: Uuid,
    pub course_id: Uuid,
    pub instructor_id: Uuid,
    pub title: String,
    pub pass_percent: i32,
    #[sqlx(json)]
    pub questions: Vec<QuizQuestion>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub prompt: String,
    pub explanation: Option<String>,
    pub options: Vec<QuizOption>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizOption {
    pub text: String,
    pub is_correct: bool,
}

#[derive(Debug, Clone)]
pub struct NewQuiz {
    pub course_id: Uuid,
    pub instructor_id: Uuid,
    pub title: String,
    pub pass_percent: i32,
    pub questions: Vec<QuizQuestion>,
}
