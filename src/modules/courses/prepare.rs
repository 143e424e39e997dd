//! Draft validator/preparer. Single pass that validates the draft and builds
//! the closed `PreparedLesson` union — no lesson reaches the output unless it
//! is fully valid, so the materializer never re-validates. Pure: no I/O.

use crate::db::models::{FileResource, PriceType};

use super::catalog;
use super::draft::{CourseDraft, DraftError, LessonDraft, SectionDraft};

const MIN_TITLE_CHARS: usize = 6;
const MIN_DESCRIPTION_CHARS: usize = 30;
const MIN_LESSON_TITLE_CHARS: usize = 3;
const MIN_PROMPT_CHARS: usize = 3;
const DEFAULT_PASS_PERCENT: i32 = 60;

/// Fully validated course content, ready for materialization.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedCourse {
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
    pub sections: Vec<PreparedSection>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PreparedSection {
    pub title: String,
    pub lessons: Vec<PreparedLesson>,
}

/// Validated lesson. Each variant carries only the fields valid for it: a
/// video always has a URL and a non-negative duration, a quiz always has at
/// least one question with an in-range answer, a file always has at least
/// one resource with a URL.
#[derive(Debug, Clone, PartialEq)]
pub enum PreparedLesson {
    Video {
        title: String,
        preview: bool,
        video_url: String,
        duration_seconds: i64,
    },
    Quiz {
        title: String,
        preview: bool,
        quiz: PreparedQuiz,
    },
    File {
        title: String,
        preview: bool,
        resources: Vec<FileResource>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct PreparedQuiz {
    pub title: String,
    pub pass_percent: i32,
    pub questions: Vec<PreparedQuestion>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PreparedQuestion {
    pub prompt: String,
    pub options: Vec<String>,
    pub answer_index: usize,
    pub explanation: Option<String>,
}

/// Validate a normalized draft and build its prepared form. `sections` is the
/// normalizer's output for the same draft.
pub fn prepare_course(
    draft: &CourseDraft,
    sections: Vec<SectionDraft>,
) -> Result<PreparedCourse, DraftError> {
    let title = draft.title.trim();
    if title.chars().count() < MIN_TITLE_CHARS {
        return Err(DraftError::Invalid(format!(
            "course title must be at least {MIN_TITLE_CHARS} characters"
        )));
    }

    let description = draft.description.trim();
    if description.chars().count() < MIN_DESCRIPTION_CHARS {
        return Err(DraftError::Invalid(format!(
            "course description must be at least {MIN_DESCRIPTION_CHARS} characters"
        )));
    }

    let mut prepared_sections = Vec::with_capacity(sections.len());
    for (section_index, section) in sections.iter().enumerate() {
        let section_no = section_index + 1;
        let mut lessons = Vec::with_capacity(section.lessons.len());
        for (lesson_index, lesson) in section.lessons.iter().enumerate() {
            if is_placeholder(lesson) {
                continue;
            }
            lessons.push(prepare_lesson(lesson, section_no, lesson_index + 1)?);
        }
        // A section whose rows were all placeholders contributes nothing.
        if lessons.is_empty() {
            continue;
        }
        prepared_sections.push(PreparedSection {
            title: section.title.clone().unwrap_or_default(),
            lessons,
        });
    }

    if prepared_sections.is_empty() {
        return Err(DraftError::EmptyCurriculum);
    }

    let category = catalog::resolve_category(draft.category.as_deref());
    let subject = catalog::resolve_subject(&category, draft.subject.as_deref());

    let price_type = match draft.price_type.as_deref().map(str::trim) {
        Some(p) if p.eq_ignore_ascii_case("paid") => PriceType::Paid,
        _ => PriceType::Free,
    };
    let price_amount = match price_type {
        PriceType::Paid => draft.price_amount.unwrap_or(0.0).max(0.0),
        PriceType::Free => 0.0,
    };

    Ok(PreparedCourse {
        title: title.to_string(),
        subtitle: non_blank(draft.subtitle.as_deref()),
        description: description.to_string(),
        category,
        subject,
        level: non_blank(draft.level.as_deref()).unwrap_or_else(|| "All Levels".to_string()),
        language: non_blank(draft.language.as_deref()).unwrap_or_else(|| "English".to_string()),
        price_type,
        price_amount,
        thumbnail_url: non_blank(draft.thumbnail_url.as_deref()),
        outcomes: trimmed_list(&draft.outcomes),
        requirements: trimmed_list(&draft.requirements),
        tags: trimmed_list(&draft.tags),
        sections: prepared_sections,
    })
}

/// An entirely blank row: no title and no payload of any kind. These are
/// editor placeholders and are dropped rather than rejected.
fn is_placeholder(lesson: &LessonDraft) -> bool {
    lesson.title.trim().is_empty()
        && lesson.video_url.as_deref().map_or(true, |u| u.trim().is_empty())
        && lesson.quiz.is_none()
        && lesson.file_url.as_deref().map_or(true, |u| u.trim().is_empty())
        && lesson.resources.as_ref().map_or(true, |r| r.is_empty())
}

fn prepare_lesson(
    lesson: &LessonDraft,
    section_no: usize,
    lesson_no: usize,
) -> Result<PreparedLesson, DraftError> {
    let title = lesson.title.trim();
    if title.chars().count() < MIN_LESSON_TITLE_CHARS {
        return Err(DraftError::Invalid(format!(
            "Section {section_no}, lesson {lesson_no}: lesson title must be at least {MIN_LESSON_TITLE_CHARS} characters"
        )));
    }

    let kind = lesson.kind.as_deref().map(str::trim).unwrap_or("");
    match kind.to_ascii_lowercase().as_str() {
        "video" => prepare_video(lesson, title, section_no, lesson_no),
        "quiz" => prepare_quiz(lesson, title, section_no, lesson_no),
        "file" => prepare_file(lesson, title, section_no, lesson_no),
        _ => Err(DraftError::UnsupportedLessonType(kind.to_string())),
    }
}

fn prepare_video(
    lesson: &LessonDraft,
    title: &str,
    section_no: usize,
    lesson_no: usize,
) -> Result<PreparedLesson, DraftError> {
    let video_url = lesson
        .video_url
        .as_deref()
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .ok_or_else(|| {
            DraftError::Invalid(format!(
                "Section {section_no}, lesson {lesson_no} (\"{title}\"): video lesson requires a video URL"
            ))
        })?;

    // Missing or negative minutes coerce to zero, never to an error.
    let minutes = lesson.duration_minutes.unwrap_or(0.0).max(0.0);
    let duration_seconds = (minutes * 60.0).round() as i64;

    Ok(PreparedLesson::Video {
        title: title.to_string(),
        preview: lesson.preview,
        video_url: video_url.to_string(),
        duration_seconds,
    })
}

fn prepare_quiz(
    lesson: &LessonDraft,
    title: &str,
    section_no: usize,
    lesson_no: usize,
) -> Result<PreparedLesson, DraftError> {
    let quiz = lesson.quiz.as_ref().filter(|q| !q.questions.is_empty()).ok_or_else(|| {
        DraftError::Invalid(format!(
            "Section {section_no}, lesson {lesson_no} (\"{title}\"): quiz must contain at least one question"
        ))
    })?;

    let mut questions = Vec::with_capacity(quiz.questions.len());
    for (question_index, question) in quiz.questions.iter().enumerate() {
        let question_no = question_index + 1;
        let at = format!("Quiz question {question_no} in section {section_no}, lesson {lesson_no}");

        let prompt = question.prompt.trim();
        if prompt.chars().count() < MIN_PROMPT_CHARS {
            return Err(DraftError::Invalid(format!(
                "{at}: prompt must be at least {MIN_PROMPT_CHARS} characters"
            )));
        }

        let options: Vec<String> = question
            .options
            .iter()
            .map(|option| option.trim().to_string())
            .collect();
        if options.len() < 2 {
            return Err(DraftError::Invalid(format!(
                "{at}: at least two answer options are required"
            )));
        }
        if options.iter().any(|option| option.is_empty()) {
            return Err(DraftError::Invalid(format!(
                "{at}: answer options must not be blank"
            )));
        }

        let raw_index = question
            .answer_index
            .ok_or_else(|| DraftError::Invalid(format!("{at}: correct answer index is missing")))?;
        if raw_index.fract() != 0.0 {
            return Err(DraftError::Invalid(format!(
                "{at}: correct answer index must be a whole number"
            )));
        }
        if raw_index < 0.0 || raw_index >= options.len() as f64 {
            return Err(DraftError::Invalid(format!(
                "{at}: correct answer index {raw_index} is out of range"
            )));
        }

        questions.push(PreparedQuestion {
            prompt: prompt.to_string(),
            options,
            answer_index: raw_index as usize,
            explanation: non_blank(question.explanation.as_deref()),
        });
    }

    let quiz_title = non_blank(quiz.title.as_deref())
        .or_else(|| non_blank(Some(title)))
        .unwrap_or_else(|| "Quiz".to_string());
    let pass_percent = quiz
        .pass_percent
        .map(|p| p.round().clamp(0.0, 100.0) as i32)
        .unwrap_or(DEFAULT_PASS_PERCENT);

    Ok(PreparedLesson::Quiz {
        title: title.to_string(),
        preview: lesson.preview,
        quiz: PreparedQuiz {
            title: quiz_title,
            pass_percent,
            questions,
        },
    })
}

fn prepare_file(
    lesson: &LessonDraft,
    title: &str,
    section_no: usize,
    lesson_no: usize,
) -> Result<PreparedLesson, DraftError> {
    let mut resources: Vec<FileResource> = Vec::new();

    if let Some(drafts) = lesson.resources.as_ref().filter(|r| !r.is_empty()) {
        for draft in drafts {
            let url = draft.url.as_deref().map(str::trim).unwrap_or("");
            if url.is_empty() {
                continue;
            }
            resources.push(FileResource {
                name: non_blank(draft.name.as_deref())
                    .or_else(|| non_blank(Some(title)))
                    .unwrap_or_else(|| "Resource".to_string()),
                url: url.to_string(),
                size: draft.size.map(|s| s.max(0.0) as i64).unwrap_or(0),
            });
        }
    } else if let Some(url) = lesson.file_url.as_deref().map(str::trim).filter(|u| !u.is_empty()) {
        // Legacy single-file payload.
        resources.push(FileResource {
            name: title.to_string(),
            url: url.to_string(),
            size: 0,
        });
    }

    if resources.is_empty() {
        return Err(DraftError::Invalid(format!(
            "Section {section_no}, lesson {lesson_no} (\"{title}\"): file lesson requires at least one resource URL"
        )));
    }

    Ok(PreparedLesson::File {
        title: title.to_string(),
        preview: lesson.preview,
        resources,
    })
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn trimmed_list(values: &[String]) -> Vec<String> {
    values
        .iter()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::courses::draft::{QuestionDraft, QuizDraft, ResourceDraft};
    use crate::modules::courses::normalize::normalize_sections;

    fn base_draft(lessons: Vec<LessonDraft>) -> CourseDraft {
        CourseDraft {
            title: "Rust for Backend Engineers".to_string(),
            description: "A thorough course about building backend services in Rust.".to_string(),
            sections: Some(vec![SectionDraft {
                title: Some("Getting Started".to_string()),
                lessons,
            }]),
            ..Default::default()
        }
    }

    fn video_lesson(title: &str, minutes: f64) -> LessonDraft {
        LessonDraft {
            title: title.to_string(),
            kind: Some("video".to_string()),
            video_url: Some("https://cdn.example.com/v.mp4".to_string()),
            duration_minutes: Some(minutes),
            ..Default::default()
        }
    }

    fn quiz_lesson(answer_index: f64, option_count: usize) -> LessonDraft {
        LessonDraft {
            title: "Checkpoint".to_string(),
            kind: Some("quiz".to_string()),
            quiz: Some(QuizDraft {
                questions: vec![QuestionDraft {
                    prompt: "What does ownership mean?".to_string(),
                    options: (0..option_count).map(|i| format!("Option {i}")).collect(),
                    answer_index: Some(answer_index),
                    ..Default::default()
                }],
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    fn prepare(draft: &CourseDraft) -> Result<PreparedCourse, DraftError> {
        let sections = normalize_sections(draft)?;
        prepare_course(draft, sections)
    }

    #[test]
    fn six_character_title_passes_five_fails() {
        let mut draft = base_draft(vec![video_lesson("Intro", 1.0)]);
        draft.title = "Rust 6".to_string();
        assert!(prepare(&draft).is_ok());

        draft.title = "Rust5".to_string();
        let err = prepare(&draft).unwrap_err();
        match err {
            DraftError::Invalid(msg) => assert!(msg.contains("title"), "got: {msg}"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn short_description_is_rejected() {
        let mut draft = base_draft(vec![video_lesson("Intro", 1.0)]);
        draft.description = "too short".to_string();
        let err = prepare(&draft).unwrap_err();
        match err {
            DraftError::Invalid(msg) => assert!(msg.contains("description"), "got: {msg}"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn video_duration_minutes_convert_to_rounded_seconds() {
        let draft = base_draft(vec![video_lesson("Intro", 2.4)]);
        let prepared = prepare(&draft).unwrap();
        match &prepared.sections[0].lessons[0] {
            PreparedLesson::Video { duration_seconds, .. } => assert_eq!(*duration_seconds, 144),
            other => panic!("unexpected lesson: {other:?}"),
        }
    }

    #[test]
    fn negative_or_missing_duration_coerces_to_zero() {
        let mut lesson = video_lesson("Intro", -3.0);
        let draft = base_draft(vec![lesson.clone()]);
        let prepared = prepare(&draft).unwrap();
        match &prepared.sections[0].lessons[0] {
            PreparedLesson::Video { duration_seconds, .. } => assert_eq!(*duration_seconds, 0),
            other => panic!("unexpected lesson: {other:?}"),
        }

        lesson.duration_minutes = None;
        let prepared = prepare(&base_draft(vec![lesson])).unwrap();
        match &prepared.sections[0].lessons[0] {
            PreparedLesson::Video { duration_seconds, .. } => assert_eq!(*duration_seconds, 0),
            other => panic!("unexpected lesson: {other:?}"),
        }
    }

    #[test]
    fn video_without_url_is_rejected() {
        let mut lesson = video_lesson("Intro", 1.0);
        lesson.video_url = Some("   ".to_string());
        let err = prepare(&base_draft(vec![lesson])).unwrap_err();
        match err {
            DraftError::Invalid(msg) => assert!(msg.contains("video URL"), "got: {msg}"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn short_lesson_title_names_its_position() {
        let lesson = video_lesson("ab", 1.0);
        let err = prepare(&base_draft(vec![video_lesson("Intro", 1.0), lesson])).unwrap_err();
        match err {
            DraftError::Invalid(msg) => {
                assert!(msg.contains("Section 1, lesson 2"), "got: {msg}");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn answer_index_boundaries() {
        // index == options.len() fails and names the question and position
        let err = prepare(&base_draft(vec![quiz_lesson(4.0, 4)])).unwrap_err();
        match err {
            DraftError::Invalid(msg) => {
                assert!(msg.contains("Quiz question 1"), "got: {msg}");
                assert!(msg.contains("section 1, lesson 1"), "got: {msg}");
                assert!(msg.contains("out of range"), "got: {msg}");
            }
            other => panic!("unexpected error: {other:?}"),
        }

        // index == options.len() - 1 passes
        let prepared = prepare(&base_draft(vec![quiz_lesson(3.0, 4)])).unwrap();
        match &prepared.sections[0].lessons[0] {
            PreparedLesson::Quiz { quiz, .. } => assert_eq!(quiz.questions[0].answer_index, 3),
            other => panic!("unexpected lesson: {other:?}"),
        }
    }

    #[test]
    fn fractional_answer_index_is_rejected() {
        let err = prepare(&base_draft(vec![quiz_lesson(1.5, 4)])).unwrap_err();
        match err {
            DraftError::Invalid(msg) => assert!(msg.contains("whole number"), "got: {msg}"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn quiz_requires_two_nonblank_options() {
        let err = prepare(&base_draft(vec![quiz_lesson(0.0, 1)])).unwrap_err();
        match err {
            DraftError::Invalid(msg) => assert!(msg.contains("two answer options"), "got: {msg}"),
            other => panic!("unexpected error: {other:?}"),
        }

        let mut lesson = quiz_lesson(0.0, 2);
        lesson.quiz.as_mut().unwrap().questions[0].options[1] = "   ".to_string();
        let err = prepare(&base_draft(vec![lesson])).unwrap_err();
        match err {
            DraftError::Invalid(msg) => assert!(msg.contains("must not be blank"), "got: {msg}"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn quiz_defaults_title_and_pass_percent() {
        let draft = base_draft(vec![quiz_lesson(0.0, 3)]);
        let prepared = prepare(&draft).unwrap();
        match &prepared.sections[0].lessons[0] {
            PreparedLesson::Quiz { quiz, .. } => {
                assert_eq!(quiz.title, "Checkpoint");
                assert_eq!(quiz.pass_percent, 60);
            }
            other => panic!("unexpected lesson: {other:?}"),
        }
    }

    #[test]
    fn quiz_without_questions_is_rejected() {
        let lesson = LessonDraft {
            title: "Checkpoint".to_string(),
            kind: Some("quiz".to_string()),
            quiz: Some(QuizDraft::default()),
            ..Default::default()
        };
        let err = prepare(&base_draft(vec![lesson])).unwrap_err();
        match err {
            DraftError::Invalid(msg) => assert!(msg.contains("at least one question"), "got: {msg}"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn file_lesson_accepts_legacy_file_url() {
        let lesson = LessonDraft {
            title: "Slides".to_string(),
            kind: Some("file".to_string()),
            file_url: Some("https://cdn.example.com/slides.pdf".to_string()),
            ..Default::default()
        };
        let prepared = prepare(&base_draft(vec![lesson])).unwrap();
        match &prepared.sections[0].lessons[0] {
            PreparedLesson::File { resources, .. } => {
                assert_eq!(resources.len(), 1);
                assert_eq!(resources[0].name, "Slides");
                assert_eq!(resources[0].url, "https://cdn.example.com/slides.pdf");
            }
            other => panic!("unexpected lesson: {other:?}"),
        }
    }

    #[test]
    fn file_lesson_normalizes_resource_list() {
        let lesson = LessonDraft {
            title: "Handouts".to_string(),
            kind: Some("file".to_string()),
            resources: Some(vec![
                ResourceDraft {
                    name: Some("  Worksheet  ".to_string()),
                    url: Some(" https://cdn.example.com/w.pdf ".to_string()),
                    size: Some(1024.0),
                },
                ResourceDraft {
                    name: None,
                    url: Some("https://cdn.example.com/x.pdf".to_string()),
                    size: None,
                },
                // blank URL rows are dropped
                ResourceDraft::default(),
            ]),
            ..Default::default()
        };
        let prepared = prepare(&base_draft(vec![lesson])).unwrap();
        match &prepared.sections[0].lessons[0] {
            PreparedLesson::File { resources, .. } => {
                assert_eq!(resources.len(), 2);
                assert_eq!(resources[0].name, "Worksheet");
                assert_eq!(resources[0].size, 1024);
                assert_eq!(resources[1].name, "Handouts");
                assert_eq!(resources[1].size, 0);
            }
            other => panic!("unexpected lesson: {other:?}"),
        }
    }

    #[test]
    fn file_lesson_without_any_url_is_rejected() {
        let lesson = LessonDraft {
            title: "Handouts".to_string(),
            kind: Some("file".to_string()),
            resources: Some(vec![ResourceDraft {
                name: Some("broken".to_string()),
                url: Some("   ".to_string()),
                size: None,
            }]),
            ..Default::default()
        };
        let err = prepare(&base_draft(vec![lesson])).unwrap_err();
        match err {
            DraftError::Invalid(msg) => assert!(msg.contains("resource URL"), "got: {msg}"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn unknown_lesson_type_is_rejected() {
        let lesson = LessonDraft {
            title: "Mystery".to_string(),
            kind: Some("hologram".to_string()),
            ..Default::default()
        };
        assert_eq!(
            prepare(&base_draft(vec![lesson])),
            Err(DraftError::UnsupportedLessonType("hologram".to_string()))
        );
    }

    #[test]
    fn placeholder_rows_are_dropped_not_rejected() {
        let draft = base_draft(vec![LessonDraft::default(), video_lesson("Intro", 1.0)]);
        let prepared = prepare(&draft).unwrap();
        assert_eq!(prepared.sections[0].lessons.len(), 1);
    }

    #[test]
    fn all_placeholder_curriculum_is_empty() {
        let draft = base_draft(vec![LessonDraft::default()]);
        assert_eq!(prepare(&draft), Err(DraftError::EmptyCurriculum));
    }

    #[test]
    fn course_fields_are_resolved_and_defaulted() {
        let mut draft = base_draft(vec![video_lesson("Intro", 1.0)]);
        draft.category = Some("academics".to_string());
        draft.subject = Some("physics".to_string());
        draft.price_type = Some("paid".to_string());
        draft.price_amount = Some(-10.0);
        draft.outcomes = vec!["  learn things  ".to_string(), "   ".to_string()];

        let prepared = prepare(&draft).unwrap();
        assert_eq!(prepared.category, "Academics");
        assert_eq!(prepared.subject, "Physics");
        assert_eq!(prepared.price_type, PriceType::Paid);
        assert_eq!(prepared.price_amount, 0.0);
        assert_eq!(prepared.level, "All Levels");
        assert_eq!(prepared.language, "English");
        assert_eq!(prepared.outcomes, vec!["learn things".to_string()]);
    }
}
