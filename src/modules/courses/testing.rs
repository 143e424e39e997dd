//! In-memory implementation of the store ports, with fault injection. Test
//! double for the sqlx repositories; no cascade semantics, so tests prove the
//! application-level guarantees.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::db::models::{
    Course, CourseContentUpdate, CourseStatus, NewCourse, NewQuiz, PriceType, Quiz,
};
use crate::db::DatabaseError;

use super::store::{CourseStore, QuizStore};

#[derive(Default)]
pub struct MemoryStore {
    courses: Mutex<HashMap<Uuid, Course>>,
    quizzes: Mutex<HashMap<Uuid, Quiz>>,
    // None = unlimited; Some(n) = n more inserts succeed, then fail
    quiz_insert_quota: Mutex<Option<usize>>,
    fail_quiz_deletes: AtomicBool,
    fail_course_updates: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_quiz_inserts_after(&self, successes: usize) {
        *self.quiz_insert_quota.lock().unwrap() = Some(successes);
    }

    pub fn fail_quiz_deletes(&self, fail: bool) {
        self.fail_quiz_deletes.store(fail, Ordering::SeqCst);
    }

    pub fn fail_course_updates(&self, fail: bool) {
        self.fail_course_updates.store(fail, Ordering::SeqCst);
    }

    pub fn course(&self, course_id: Uuid) -> Option<Course> {
        self.courses.lock().unwrap().get(&course_id).cloned()
    }

    pub fn course_count(&self) -> usize {
        self.courses.lock().unwrap().len()
    }

    pub fn quiz(&self, quiz_id: Uuid) -> Option<Quiz> {
        self.quizzes.lock().unwrap().get(&quiz_id).cloned()
    }

    pub fn quiz_count(&self) -> usize {
        self.quizzes.lock().unwrap().len()
    }

    pub fn quiz_count_for(&self, course_id: Uuid) -> usize {
        self.quizzes
            .lock()
            .unwrap()
            .values()
            .filter(|quiz| quiz.course_id == course_id)
            .count()
    }

    pub fn put_course(&self, course: Course) {
        self.courses.lock().unwrap().insert(course.id, course);
    }

    pub fn seed_course(&self, instructor_id: Uuid) -> Course {
        let now = OffsetDateTime::now_utc();
        let course = Course {
            id: Uuid::new_v4(),
            instructor_id,
            title: "Seeded course".to_string(),
            subtitle: None,
            description: "A seeded course used as a fixture in store tests.".to_string(),
            category: "Development".to_string(),
            subject: "Other".to_string(),
            level: "All Levels".to_string(),
            language: "English".to_string(),
            price_type: PriceType::Free,
            price_amount: 0.0,
            thumbnail_url: None,
            outcomes: vec![],
            requirements: vec![],
            tags: vec![],
            status: CourseStatus::Pending,
            rejection_reason: None,
            sections: vec![],
            total_lectures: 0,
            total_video_seconds: 0,
            created_at: now,
            updated_at: now,
        };
        self.put_course(course.clone());
        course
    }

    pub fn seed_quiz(&self, course_id: Uuid) -> Uuid {
        let now = OffsetDateTime::now_utc();
        let quiz = Quiz {
            id: Uuid::new_v4(),
            course_id,
            instructor_id: Uuid::new_v4(),
            title: "Seeded quiz".to_string(),
            pass_percent: 60,
            questions: vec![],
            created_at: now,
            updated_at: now,
        };
        let id = quiz.id;
        self.quizzes.lock().unwrap().insert(id, quiz);
        id
    }
}

#[async_trait]
impl CourseStore for MemoryStore {
    async fn insert_course(&self, new_course: &NewCourse) -> Result<Course, DatabaseError> {
        let now = OffsetDateTime::now_utc();
        let course = Course {
            id: Uuid::new_v4(),
            instructor_id: new_course.instructor_id,
            title: new_course.title.clone(),
            subtitle: new_course.subtitle.clone(),
            description: new_course.description.clone(),
            category: new_course.category.clone(),
            subject: new_course.subject.clone(),
            level: new_course.level.clone(),
            language: new_course.language.clone(),
            price_type: new_course.price_type,
            price_amount: new_course.price_amount,
            thumbnail_url: new_course.thumbnail_url.clone(),
            outcomes: new_course.outcomes.clone(),
            requirements: new_course.requirements.clone(),
            tags: new_course.tags.clone(),
            status: CourseStatus::Pending,
            rejection_reason: None,
            sections: vec![],
            total_lectures: 0,
            total_video_seconds: 0,
            created_at: now,
            updated_at: now,
        };
        self.put_course(course.clone());
        Ok(course)
    }

    async fn find_course(&self, course_id: Uuid) -> Result<Option<Course>, DatabaseError> {
        Ok(self.course(course_id))
    }

    async fn update_course_content(
        &self,
        course_id: Uuid,
        update: &CourseContentUpdate,
    ) -> Result<(), DatabaseError> {
        if self.fail_course_updates.load(Ordering::SeqCst) {
            return Err(DatabaseError::Unknown("injected update failure".to_string()));
        }
        let mut courses = self.courses.lock().unwrap();
        let course = courses.get_mut(&course_id).ok_or(DatabaseError::NotFound)?;
        course.title = update.title.clone();
        course.subtitle = update.subtitle.clone();
        course.description = update.description.clone();
        course.category = update.category.clone();
        course.subject = update.subject.clone();
        course.level = update.level.clone();
        course.language = update.language.clone();
        course.price_type = update.price_type;
        course.price_amount = update.price_amount;
        course.thumbnail_url = update.thumbnail_url.clone();
        course.outcomes = update.outcomes.clone();
        course.requirements = update.requirements.clone();
        course.tags = update.tags.clone();
        course.sections = update.sections.clone();
        course.total_lectures = update.total_lectures;
        course.total_video_seconds = update.total_video_seconds;
        course.status = CourseStatus::Pending;
        course.rejection_reason = None;
        course.updated_at = OffsetDateTime::now_utc();
        Ok(())
    }

    async fn delete_course(&self, course_id: Uuid) -> Result<(), DatabaseError> {
        self.courses.lock().unwrap().remove(&course_id);
        Ok(())
    }
}

#[async_trait]
impl QuizStore for MemoryStore {
    async fn insert_quiz(&self, new_quiz: &NewQuiz) -> Result<Quiz, DatabaseError> {
        {
            let mut quota = self.quiz_insert_quota.lock().unwrap();
            if let Some(remaining) = quota.as_mut() {
                if *remaining == 0 {
                    return Err(DatabaseError::Unknown("injected insert failure".to_string()));
                }
                *remaining -= 1;
            }
        }
        let now = OffsetDateTime::now_utc();
        let quiz = Quiz {
            id: Uuid::new_v4(),
            course_id: new_quiz.course_id,
            instructor_id: new_quiz.instructor_id,
            title: new_quiz.title.clone(),
            pass_percent: new_quiz.pass_percent,
            questions: new_quiz.questions.clone(),
            created_at: now,
            updated_at: now,
        };
        self.quizzes.lock().unwrap().insert(quiz.id, quiz.clone());
        Ok(quiz)
    }

    async fn quizzes_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Quiz>, DatabaseError> {
        let quizzes = self.quizzes.lock().unwrap();
        Ok(ids.iter().filter_map(|id| quizzes.get(id).cloned()).collect())
    }

    async fn delete_quiz(&self, quiz_id: Uuid) -> Result<(), DatabaseError> {
        if self.fail_quiz_deletes.load(Ordering::SeqCst) {
            return Err(DatabaseError::Unknown("injected delete failure".to_string()));
        }
        self.quizzes.lock().unwrap().remove(&quiz_id);
        Ok(())
    }

    async fn delete_quizzes_for_course(&self, course_id: Uuid) -> Result<u64, DatabaseError> {
        let mut quizzes = self.quizzes.lock().unwrap();
        let before = quizzes.len();
        quizzes.retain(|_, quiz| quiz.course_id != course_id);
        Ok((before - quizzes.len()) as u64)
    }
}
