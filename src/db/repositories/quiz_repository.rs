use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::models::{NewQuiz, Quiz, QuizQuestion};
use crate::db::DatabaseError;
use crate::modules::courses::store::QuizStore;

#[derive(Clone)]
pub struct QuizRepository {
    pool: PgPool,
}

impl QuizRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl QuizStore for QuizRepository {
    async fn insert_quiz(&self, new_quiz: &NewQuiz) -> Result<Quiz, DatabaseError> {
        let quiz = sqlx::query_as::<_, Quiz>(
            r#"
            INSERT INTO quizzes (id, course_id, instructor_id, title, pass_percent, questions)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, course_id, instructor_id, title, pass_percent, questions,
                      created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(new_quiz.course_id)
        .bind(new_quiz.instructor_id)
        .bind(&new_quiz.title)
        .bind(new_quiz.pass_percent)
        .bind(Json::<&Vec<QuizQuestion>>(&new_quiz.questions))
        .fetch_one(&self.pool)
        .await?;

        Ok(quiz)
    }

    async fn quizzes_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Quiz>, DatabaseError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let quizzes = sqlx::query_as::<_, Quiz>(
            r#"
            SELECT id, course_id, instructor_id, title, pass_percent, questions,
                   created_at, updated_at
            FROM quizzes
            WHERE id = ANY($1)
            "#,
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(quizzes)
    }

    async fn delete_quiz(&self, quiz_id: Uuid) -> Result<(), DatabaseError> {
        sqlx::query("DELETE FROM quizzes WHERE id = $1")
            .bind(quiz_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn delete_quizzes_for_course(&self, course_id: Uuid) -> Result<u64, DatabaseError> {
        let result = sqlx::query("DELETE FROM quizzes WHERE course_id = $1")
            .bind(course_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
