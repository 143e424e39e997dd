use std::sync::Arc;

use sqlx::PgPool;

use crate::config;
use crate::db::repositories::{CourseRepository, QuizRepository};
use crate::modules::courses::store::{CourseStore, QuizStore};

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub env: config::Config,
    pub course_store: Arc<dyn CourseStore>,
    pub quiz_store: Arc<dyn QuizStore>,
}

impl AppState {
    pub fn new(db: PgPool, env: config::Config) -> Self {
        let course_store = Arc::new(CourseRepository::new(db.clone()));
        let quiz_store = Arc::new(QuizRepository::new(db.clone()));
        Self::with_stores(db, env, course_store, quiz_store)
    }

    pub fn with_stores(
        db: PgPool,
        env: config::Config,
        course_store: Arc<dyn CourseStore>,
        quiz_store: Arc<dyn QuizStore>,
    ) -> Self {
        Self {
            db,
            env,
            course_store,
            quiz_store,
        }
    }
}
