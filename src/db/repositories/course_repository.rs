use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::models::{Course, CourseContentUpdate, NewCourse, Section};
use crate::db::DatabaseError;
use crate::modules::courses::store::CourseStore;

const COURSE_COLUMNS: &str = "id, instructor_id, title, subtitle, description, category, subject, \
     level, language, price_type, price_amount, thumbnail_url, outcomes, requirements, tags, \
     status, rejection_reason, sections, total_lectures, total_video_seconds, created_at, updated_at";

#[derive(Clone)]
pub struct CourseRepository {
    pool: PgPool,
}

impl CourseRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CourseStore for CourseRepository {
    async fn insert_course(&self, new_course: &NewCourse) -> Result<Course, DatabaseError> {
        let course = sqlx::query_as::<_, Course>(&format!(
            r#"
            INSERT INTO courses (
                id, instructor_id, title, subtitle, description, category, subject,
                level, language, price_type, price_amount, thumbnail_url,
                outcomes, requirements, tags, status, sections,
                total_lectures, total_video_seconds
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15,
                    'pending', '[]'::jsonb, 0, 0)
            RETURNING {COURSE_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(new_course.instructor_id)
        .bind(&new_course.title)
        .bind(&new_course.subtitle)
        .bind(&new_course.description)
        .bind(&new_course.category)
        .bind(&new_course.subject)
        .bind(&new_course.level)
        .bind(&new_course.language)
        .bind(new_course.price_type)
        .bind(new_course.price_amount)
        .bind(&new_course.thumbnail_url)
        .bind(&new_course.outcomes)
        .bind(&new_course.requirements)
        .bind(&new_course.tags)
        .fetch_one(&self.pool)
        .await?;

        Ok(course)
    }

    async fn find_course(&self, course_id: Uuid) -> Result<Option<Course>, DatabaseError> {
        let course = sqlx::query_as::<_, Course>(&format!(
            "SELECT {COURSE_COLUMNS} FROM courses WHERE id = $1"
        ))
        .bind(course_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(course)
    }

    async fn update_course_content(
        &self,
        course_id: Uuid,
        update: &CourseContentUpdate,
    ) -> Result<(), DatabaseError> {
        let result = sqlx::query(
            r#"
            UPDATE courses
            SET
                title = $1,
                subtitle = $2,
                description = $3,
                category = $4,
                subject = $5,
                level = $6,
                language = $7,
                price_type = $8,
                price_amount = $9,
                thumbnail_url = $10,
                outcomes = $11,
                requirements = $12,
                tags = $13,
                sections = $14,
                total_lectures = $15,
                total_video_seconds = $16,
                status = 'pending',
                rejection_reason = NULL,
                updated_at = NOW()
            WHERE id = $17
            "#,
        )
        .bind(&update.title)
        .bind(&update.subtitle)
        .bind(&update.description)
        .bind(&update.category)
        .bind(&update.subject)
        .bind(&update.level)
        .bind(&update.language)
        .bind(update.price_type)
        .bind(update.price_amount)
        .bind(&update.thumbnail_url)
        .bind(&update.outcomes)
        .bind(&update.requirements)
        .bind(&update.tags)
        .bind(Json::<&Vec<Section>>(&update.sections))
        .bind(update.total_lectures)
        .bind(update.total_video_seconds)
        .bind(course_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound);
        }
        Ok(())
    }

    async fn delete_course(&self, course_id: Uuid) -> Result<(), DatabaseError> {
        sqlx::query("DELETE FROM courses WHERE id = $1")
            .bind(course_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
