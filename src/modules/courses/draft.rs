//! Client-supplied draft shapes. Deliberately loose: optional fields, legacy
//! aliases, free-form type discriminator. Nothing downstream of the preparer
//! ever touches these directly.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::AppError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DraftError {
    #[error("{0}")]
    Invalid(String),

    #[error("course must contain at least one section with at least one lesson")]
    EmptyCurriculum,

    #[error("unsupported lesson type \"{0}\"")]
    UnsupportedLessonType(String),
}

impl From<DraftError> for AppError {
    fn from(err: DraftError) -> Self {
        AppError::Validation(err.to_string())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CourseDraft {
    pub title: String,
    pub subtitle: Option<String>,
    pub description: String,
    pub category: Option<String>,
    pub subject: Option<String>,
    pub level: Option<String>,
    pub language: Option<String>,
    pub price_type: Option<String>,
    pub price_amount: Option<f64>,
    pub thumbnail_url: Option<String>,
    pub outcomes: Vec<String>,
    pub requirements: Vec<String>,
    pub tags: Vec<String>,
    pub sections: Option<Vec<SectionDraft>>,
    /// Legacy flat lesson list; wrapped into a single section when no
    /// `sections` field is supplied.
    pub lessons: Option<Vec<LessonDraft>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SectionDraft {
    pub title: Option<String>,
    pub lessons: Vec<LessonDraft>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LessonDraft {
    pub title: String,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub preview: bool,
    pub video_url: Option<String>,
    #[serde(alias = "durationMin")]
    pub duration_minutes: Option<f64>,
    pub quiz: Option<QuizDraft>,
    /// Legacy single-file field; superseded by `resources`.
    pub file_url: Option<String>,
    pub resources: Option<Vec<ResourceDraft>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QuizDraft {
    pub title: Option<String>,
    pub pass_percent: Option<f64>,
    pub questions: Vec<QuestionDraft>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QuestionDraft {
    pub prompt: String,
    pub options: Vec<String>,
    pub answer_index: Option<f64>,
    pub explanation: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResourceDraft {
    pub name: Option<String>,
    pub url: Option<String>,
    pub size: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lesson_accepts_legacy_duration_alias() {
        let lesson: LessonDraft = serde_json::from_str(
            r#"{ "title": "Intro", "type": "video", "videoUrl": "https://cdn/v.mp4", "durationMin": 2.4 }"#,
        )
        .unwrap();
        assert_eq!(lesson.duration_minutes, Some(2.4));
        assert_eq!(lesson.kind.as_deref(), Some("video"));
    }

    #[test]
    fn draft_tolerates_missing_optional_fields() {
        let draft: CourseDraft =
            serde_json::from_str(r#"{ "title": "Rust 101", "description": "d" }"#).unwrap();
        assert!(draft.sections.is_none());
        assert!(draft.lessons.is_none());
        assert!(draft.outcomes.is_empty());
    }
}
