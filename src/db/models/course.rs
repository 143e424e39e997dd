use serde::{Deserialize, Serialize};
use sqlx::types::Uuid;
use time::OffsetDateTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type, Serialize, Deserialize)]
#[sqlx(type_name = "course_status", rename_all = "snake_case")]
pub enum CourseStatus {
    Draft,
    Pending,
    Published,
    Rejected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type, Serialize, Deserialize)]
#[sqlx(type_name = "price_type", rename_all = "snake_case")]
#[serde(rename_all = "lowercase")]
pub enum PriceType {
    Free,
    Paid,
}

/// Course aggregate. Sections and their lectures are embedded as one JSONB
/// document; quizzes live in their own table and are referenced by id.
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct Course {
    pub id: Uuid,
    pub instructor_id: Uuid,
    pub title: String,
    pub subtitle: Option<String>,
    pub description: String,
    pub category: String,
    pub subject: String,
    pub level: String,
    pub language: String,
    pub price_type: PriceType,
    pub price_amount: f64,
    pub thumbnail_url: Option<String>,
    pub outcomes: Vec<String>,
    pub requirements: Vec<String>,
    pub tags: Vec<String>,
    pub status: CourseStatus,
    pub rejection_reason: Option<String>,
    #[sqlx(json)]
    pub sections: Vec<Section>,
    pub total_lectures: i32,
    pub total_video_seconds: i64,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub title: String,
    pub order: i32,
    pub lectures: Vec<Lecture>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lecture {
    pub title: String,
    pub order: i32,
    pub preview: bool,
    #[serde(flatten)]
    pub content: LectureContent,
}

/// Persisted lecture payload. A quiz lecture carries only the id of its
/// quiz record, never the quiz itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LectureContent {
    Video {
        video_url: String,
        duration_seconds: i64,
    },
    File {
        resources: Vec<FileResource>,
    },
    Quiz {
        quiz_id: Uuid,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileResource {
    pub name: String,
    pub url: String,
    pub size: i64,
}

impl Course {
    /// Ids of all quiz records referenced by this course's lectures, in
    /// lecture order.
    pub fn referenced_quiz_ids(&self) -> Vec<Uuid> {
        self.sections
            .iter()
            .flat_map(|section| section.lectures.iter())
            .filter_map(|lecture| match lecture.content {
                LectureContent::Quiz { quiz_id } => Some(quiz_id),
                _ => None,
            })
            .collect()
    }
}

#[derive(Debug, Clone)]
pub struct NewCourse {
    pub instructor_id: Uuid,
    pub title: String,
    pub subtitle: Option<String>,
    pub description: String,
    pub category: String,
    pub subject: String,
    pub level: String,
    pub language: String,
    pub price_type: PriceType,
    pub price_amount: f64,
    pub thumbnail_url: Option<String>,
    pub outcomes: Vec<String>,
    pub requirements: Vec<String>,
    pub tags: Vec<String>,
}

/// Full replacement of a course's editable content. Applying it always moves
/// the course back to `Pending` and clears any rejection reason.
#[derive(Debug, Clone)]
pub struct CourseContentUpdate {
    pub title: String,
    pub subtitle: Option<String>,
    pub description: String,
    pub category: String,
    pub subject: String,
    pub level: String,
    pub language: String,
    pub price_type: PriceType,
    pub price_amount: f64,
    pub thumbnail_url: Option<String>,
    pub outcomes: Vec<String>,
    pub requirements: Vec<String>,
    pub tags: Vec<String>,
    pub sections: Vec<Section>,
    pub total_lectures: i32,
    pub total_video_seconds: i64,
}
