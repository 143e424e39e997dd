//! Course materializer: turns prepared sections into the persisted
//! section/lecture form, creating one quiz record per quiz lesson and
//! accumulating the aggregate totals. Reports exactly which quiz records it
//! created so a failed run can be compensated; never retries.

use uuid::Uuid;

use crate::db::models::{
    Lecture, LectureContent, NewQuiz, QuizOption, QuizQuestion, Section,
};
use crate::db::DatabaseError;

use super::prepare::{PreparedLesson, PreparedQuiz, PreparedSection};
use super::store::QuizStore;

/// Output of a successful materialization run.
#[derive(Debug, Clone)]
pub struct Materialized {
    pub sections: Vec<Section>,
    pub total_lectures: i32,
    pub total_video_seconds: i64,
    /// Quiz records created during this run, in creation order.
    pub created_quiz_ids: Vec<Uuid>,
}

/// A failed run still reports every quiz record it managed to create, so the
/// caller can undo them.
#[derive(Debug)]
pub struct MaterializeError {
    pub created_quiz_ids: Vec<Uuid>,
    pub source: DatabaseError,
}

pub async fn materialize_sections(
    quizzes: &dyn QuizStore,
    course_id: Uuid,
    instructor_id: Uuid,
    prepared: &[PreparedSection],
) -> Result<Materialized, MaterializeError> {
    let mut sections = Vec::with_capacity(prepared.len());
    let mut total_lectures: i32 = 0;
    let mut total_video_seconds: i64 = 0;
    let mut created_quiz_ids: Vec<Uuid> = Vec::new();

    for (section_index, section) in prepared.iter().enumerate() {
        let mut lectures = Vec::with_capacity(section.lessons.len());

        for (lesson_index, lesson) in section.lessons.iter().enumerate() {
            let order = lesson_index as i32 + 1;
            let lecture = match lesson {
                PreparedLesson::Video {
                    title,
                    preview,
                    video_url,
                    duration_seconds,
                } => {
                    total_video_seconds += duration_seconds;
                    Lecture {
                        title: title.clone(),
                        order,
                        preview: *preview,
                        content: LectureContent::Video {
                            video_url: video_url.clone(),
                            duration_seconds: *duration_seconds,
                        },
                    }
                }
                PreparedLesson::File {
                    title,
                    preview,
                    resources,
                } => Lecture {
                    title: title.clone(),
                    order,
                    preview: *preview,
                    content: LectureContent::File {
                        resources: resources.clone(),
                    },
                },
                PreparedLesson::Quiz {
                    title,
                    preview,
                    quiz,
                } => {
                    let new_quiz = build_quiz(quiz, course_id, instructor_id);
                    let record = match quizzes.insert_quiz(&new_quiz).await {
                        Ok(record) => record,
                        Err(source) => {
                            return Err(MaterializeError {
                                created_quiz_ids,
                                source,
                            });
                        }
                    };
                    created_quiz_ids.push(record.id);
                    Lecture {
                        title: title.clone(),
                        order,
                        preview: *preview,
                        content: LectureContent::Quiz { quiz_id: record.id },
                    }
                }
            };
            lectures.push(lecture);
            total_lectures += 1;
        }

        sections.push(Section {
            title: section.title.clone(),
            order: section_index as i32 + 1,
            lectures,
        });
    }

    Ok(Materialized {
        sections,
        total_lectures,
        total_video_seconds,
        created_quiz_ids,
    })
}

fn build_quiz(quiz: &PreparedQuiz, course_id: Uuid, instructor_id: Uuid) -> NewQuiz {
    let questions = quiz
        .questions
        .iter()
        .map(|question| QuizQuestion {
            prompt: question.prompt.clone(),
            explanation: question.explanation.clone(),
            options: question
                .options
                .iter()
                .enumerate()
                .map(|(index, text)| QuizOption {
                    text: text.clone(),
                    is_correct: index == question.answer_index,
                })
                .collect(),
        })
        .collect();

    NewQuiz {
        course_id,
        instructor_id,
        title: quiz.title.clone(),
        pass_percent: quiz.pass_percent,
        questions,
    }
}
