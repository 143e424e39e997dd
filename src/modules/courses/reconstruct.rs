//! Draft reconstructor: inverse of the normalize/prepare/materialize path.
//! Rebuilds an editable draft from a persisted course plus its referenced
//! quiz records (bulk-fetched by the caller in one round trip).

use std::collections::HashMap;

use uuid::Uuid;

use crate::db::models::{Course, LectureContent, PriceType, Quiz};

use super::catalog;
use super::draft::{CourseDraft, LessonDraft, QuestionDraft, QuizDraft, ResourceDraft, SectionDraft};

pub fn draft_from_course(course: &Course, quizzes: &[Quiz]) -> CourseDraft {
    let quiz_index: HashMap<Uuid, &Quiz> = quizzes.iter().map(|quiz| (quiz.id, quiz)).collect();

    let sections = course
        .sections
        .iter()
        .map(|section| SectionDraft {
            title: Some(section.title.clone()),
            lessons: section
                .lectures
                .iter()
                .filter_map(|lecture| {
                    let mut lesson = LessonDraft {
                        title: lecture.title.clone(),
                        preview: lecture.preview,
                        ..Default::default()
                    };
                    match &lecture.content {
                        LectureContent::Video {
                            video_url,
                            duration_seconds,
                        } => {
                            lesson.kind = Some("video".to_string());
                            lesson.video_url = Some(video_url.clone());
                            lesson.duration_minutes =
                                Some((*duration_seconds as f64 / 60.0).round());
                        }
                        LectureContent::File { resources } => {
                            lesson.kind = Some("file".to_string());
                            // first resource mirrored into the legacy field
                            lesson.file_url = resources.first().map(|r| r.url.clone());
                            lesson.resources = Some(
                                resources
                                    .iter()
                                    .map(|resource| ResourceDraft {
                                        name: Some(resource.name.clone()),
                                        url: Some(resource.url.clone()),
                                        size: Some(resource.size as f64),
                                    })
                                    .collect(),
                            );
                        }
                        LectureContent::Quiz { quiz_id } => {
                            let Some(quiz) = quiz_index.get(quiz_id) else {
                                tracing::warn!(
                                    target: "courses.reconstruct",
                                    course_id = %course.id,
                                    quiz_id = %quiz_id,
                                    "lecture references a missing quiz record; dropping it from the draft"
                                );
                                return None;
                            };
                            lesson.kind = Some("quiz".to_string());
                            lesson.quiz = Some(rebuild_quiz(quiz));
                        }
                    }
                    Some(lesson)
                })
                .collect(),
        })
        .collect();

    let category = catalog::resolve_category(Some(&course.category));
    let subject = catalog::resolve_subject(&category, Some(&course.subject));

    CourseDraft {
        title: course.title.clone(),
        subtitle: course.subtitle.clone(),
        description: course.description.clone(),
        category: Some(category),
        subject: Some(subject),
        level: Some(course.level.clone()),
        language: Some(course.language.clone()),
        price_type: Some(
            match course.price_type {
                PriceType::Free => "free",
                PriceType::Paid => "paid",
            }
            .to_string(),
        ),
        price_amount: Some(course.price_amount),
        thumbnail_url: course.thumbnail_url.clone(),
        outcomes: editable_list(&course.outcomes),
        requirements: editable_list(&course.requirements),
        tags: course.tags.clone(),
        sections: Some(sections),
        lessons: None,
    }
}

fn rebuild_quiz(quiz: &Quiz) -> QuizDraft {
    QuizDraft {
        title: Some(quiz.title.clone()),
        pass_percent: Some(quiz.pass_percent as f64),
        questions: quiz
            .questions
            .iter()
            .map(|question| QuestionDraft {
                prompt: question.prompt.clone(),
                options: question.options.iter().map(|o| o.text.clone()).collect(),
                // Defensive default, not a guarantee: a record with no flagged
                // option falls back to the first answer.
                answer_index: Some(
                    question
                        .options
                        .iter()
                        .position(|option| option.is_correct)
                        .unwrap_or(0) as f64,
                ),
                explanation: question.explanation.clone(),
            })
            .collect(),
    }
}

/// The editing UI always shows at least one input row.
fn editable_list(values: &[String]) -> Vec<String> {
    if values.is_empty() {
        vec![String::new()]
    } else {
        values.to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::{
        CourseStatus, FileResource, Lecture, QuizOption, QuizQuestion, Section,
    };
    use time::OffsetDateTime;

    fn fixture_course(sections: Vec<Section>) -> Course {
        let now = OffsetDateTime::now_utc();
        Course {
            id: Uuid::new_v4(),
            instructor_id: Uuid::new_v4(),
            title: "Persisted course".to_string(),
            subtitle: None,
            description: "A persisted course used to exercise reconstruction.".to_string(),
            category: "Design".to_string(),
            subject: "Other".to_string(),
            level: "All Levels".to_string(),
            language: "English".to_string(),
            price_type: PriceType::Free,
            price_amount: 0.0,
            thumbnail_url: None,
            outcomes: vec![],
            requirements: vec!["A laptop".to_string()],
            tags: vec![],
            status: CourseStatus::Published,
            rejection_reason: None,
            sections,
            total_lectures: 0,
            total_video_seconds: 0,
            created_at: now,
            updated_at: now,
        }
    }

    fn fixture_quiz(id: Uuid, course_id: Uuid, correct: Option<usize>) -> Quiz {
        let now = OffsetDateTime::now_utc();
        Quiz {
            id,
            course_id,
            instructor_id: Uuid::new_v4(),
            title: "Checkpoint".to_string(),
            pass_percent: 70,
            questions: vec![QuizQuestion {
                prompt: "Pick one".to_string(),
                explanation: Some("because".to_string()),
                options: vec!["a", "b", "c"]
                    .into_iter()
                    .enumerate()
                    .map(|(index, text)| QuizOption {
                        text: text.to_string(),
                        is_correct: correct == Some(index),
                    })
                    .collect(),
            }],
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn rebuilds_all_three_lesson_kinds() {
        let quiz_id = Uuid::new_v4();
        let course = fixture_course(vec![Section {
            title: "One".to_string(),
            order: 1,
            lectures: vec![
                Lecture {
                    title: "Watch".to_string(),
                    order: 1,
                    preview: true,
                    content: LectureContent::Video {
                        video_url: "https://cdn.example.com/v.mp4".to_string(),
                        duration_seconds: 144,
                    },
                },
                Lecture {
                    title: "Read".to_string(),
                    order: 2,
                    preview: false,
                    content: LectureContent::File {
                        resources: vec![FileResource {
                            name: "Slides".to_string(),
                            url: "https://cdn.example.com/s.pdf".to_string(),
                            size: 2048,
                        }],
                    },
                },
                Lecture {
                    title: "Answer".to_string(),
                    order: 3,
                    preview: false,
                    content: LectureContent::Quiz { quiz_id },
                },
            ],
        }]);
        let quiz = fixture_quiz(quiz_id, course.id, Some(2));

        let draft = draft_from_course(&course, &[quiz]);
        let lessons = &draft.sections.as_ref().unwrap()[0].lessons;
        assert_eq!(lessons.len(), 3);

        assert_eq!(lessons[0].kind.as_deref(), Some("video"));
        assert_eq!(lessons[0].duration_minutes, Some(2.0));
        assert!(lessons[0].preview);

        assert_eq!(lessons[1].kind.as_deref(), Some("file"));
        assert_eq!(
            lessons[1].file_url.as_deref(),
            Some("https://cdn.example.com/s.pdf")
        );
        assert_eq!(lessons[1].resources.as_ref().unwrap().len(), 1);

        let rebuilt = lessons[2].quiz.as_ref().unwrap();
        assert_eq!(rebuilt.title.as_deref(), Some("Checkpoint"));
        assert_eq!(rebuilt.pass_percent, Some(70.0));
        assert_eq!(rebuilt.questions[0].answer_index, Some(2.0));
        assert_eq!(rebuilt.questions[0].options.len(), 3);
    }

    #[test]
    fn quiz_without_flagged_option_defaults_to_first() {
        let quiz_id = Uuid::new_v4();
        let course = fixture_course(vec![Section {
            title: "One".to_string(),
            order: 1,
            lectures: vec![Lecture {
                title: "Answer".to_string(),
                order: 1,
                preview: false,
                content: LectureContent::Quiz { quiz_id },
            }],
        }]);
        let quiz = fixture_quiz(quiz_id, course.id, None);

        let draft = draft_from_course(&course, &[quiz]);
        let lessons = &draft.sections.as_ref().unwrap()[0].lessons;
        assert_eq!(lessons[0].quiz.as_ref().unwrap().questions[0].answer_index, Some(0.0));
    }

    #[test]
    fn missing_quiz_record_drops_the_lecture() {
        let course = fixture_course(vec![Section {
            title: "One".to_string(),
            order: 1,
            lectures: vec![Lecture {
                title: "Answer".to_string(),
                order: 1,
                preview: false,
                content: LectureContent::Quiz {
                    quiz_id: Uuid::new_v4(),
                },
            }],
        }]);

        let draft = draft_from_course(&course, &[]);
        assert!(draft.sections.as_ref().unwrap()[0].lessons.is_empty());
    }

    #[test]
    fn unknown_category_falls_back_and_blank_lists_get_one_row() {
        let mut course = fixture_course(vec![]);
        course.category = "No Longer Offered".to_string();

        let draft = draft_from_course(&course, &[]);
        assert_eq!(draft.category.as_deref(), Some(catalog::DEFAULT_CATEGORY));
        assert_eq!(draft.subject.as_deref(), Some(catalog::FALLBACK_SUBJECT));
        assert_eq!(draft.outcomes, vec![String::new()]);
        assert_eq!(draft.requirements, vec!["A laptop".to_string()]);
    }
}
