use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::app_state::AppState;
use crate::db::models::CourseStatus;
use crate::error::AppResult;
use crate::middleware::auth::AuthUser;

use super::draft::CourseDraft;
use super::service::{self, CourseForEdit, CourseReceipt};

#[derive(Debug, Deserialize)]
pub struct DraftPayload {
    pub draft: CourseDraft,
}

#[derive(Debug, Serialize)]
pub struct ItemResponse<T> {
    pub item: T,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptView {
    pub id: Uuid,
    pub status: CourseStatus,
}

impl From<CourseReceipt> for ReceiptView {
    fn from(receipt: CourseReceipt) -> Self {
        Self {
            id: receipt.id,
            status: receipt.status,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseEditView {
    pub id: Uuid,
    pub title: String,
    pub status: CourseStatus,
    pub rejection_reason: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub draft: CourseDraft,
}

impl From<CourseForEdit> for CourseEditView {
    fn from(view: CourseForEdit) -> Self {
        Self {
            id: view.course.id,
            title: view.course.title.clone(),
            status: view.course.status,
            rejection_reason: view.course.rejection_reason.clone(),
            created_at: view.course.created_at,
            draft: view.draft,
        }
    }
}

/// Create a course from a draft and submit it for review.
pub async fn create_course(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<DraftPayload>,
) -> AppResult<(StatusCode, Json<ItemResponse<ReceiptView>>)> {
    user.require_instructor()?;
    let receipt = service::create_course(
        state.course_store.as_ref(),
        state.quiz_store.as_ref(),
        user.id,
        &payload.draft,
    )
    .await?;
    Ok((
        StatusCode::CREATED,
        Json(ItemResponse {
            item: receipt.into(),
        }),
    ))
}

/// Replace the content of an existing course and resubmit it for review.
pub async fn resubmit_course(
    State(state): State<AppState>,
    user: AuthUser,
    Path(course_id): Path<Uuid>,
    Json(payload): Json<DraftPayload>,
) -> AppResult<Json<ItemResponse<ReceiptView>>> {
    user.require_instructor()?;
    let receipt = service::resubmit_course(
        state.course_store.as_ref(),
        state.quiz_store.as_ref(),
        user.id,
        course_id,
        &payload.draft,
    )
    .await?;
    Ok(Json(ItemResponse {
        item: receipt.into(),
    }))
}

/// Return a course in its editable draft form.
pub async fn course_for_edit(
    State(state): State<AppState>,
    user: AuthUser,
    Path(course_id): Path<Uuid>,
) -> AppResult<Json<ItemResponse<CourseEditView>>> {
    user.require_instructor()?;
    let view = service::course_for_edit(
        state.course_store.as_ref(),
        state.quiz_store.as_ref(),
        user.id,
        course_id,
    )
    .await?;
    Ok(Json(ItemResponse { item: view.into() }))
}

/// Delete a course together with its quiz records.
pub async fn delete_course(
    State(state): State<AppState>,
    user: AuthUser,
    Path(course_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    service::delete_course(
        state.course_store.as_ref(),
        state.quiz_store.as_ref(),
        &user,
        course_id,
    )
    .await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;

    use crate::app;
    use crate::app_state::AppState;
    use crate::config::{AppConfig, Config, DatabaseConfig, Environment, ServerConfig};
    use crate::modules::courses::testing::MemoryStore;

    use super::*;

    fn test_state() -> (AppState, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        // never connected; handlers under test don't touch the pool
        let db = PgPoolOptions::new()
            .connect_lazy("postgres://localhost/coursecraft_test")
            .unwrap();
        let env = Config {
            server: ServerConfig {
                host: "127.0.0.1".parse().unwrap(),
                port: 0,
                workers: None,
            },
            database: DatabaseConfig {
                url: String::new(),
                max_connections: None,
                min_connections: None,
            },
            app: AppConfig {
                name: "test".to_string(),
                environment: Environment::Development,
            },
        };
        let state = AppState::with_stores(db, env, store.clone(), store.clone());
        (state, store)
    }

    fn valid_draft_body() -> Value {
        json!({
            "draft": {
                "title": "Practical Rust Services",
                "description": "Build and operate production-grade backend services in Rust.",
                "sections": [{
                    "title": "Week 1",
                    "lessons": [{
                        "title": "Intro",
                        "type": "video",
                        "videoUrl": "https://cdn.example.com/v.mp4",
                        "durationMinutes": 2.4
                    }]
                }]
            }
        })
    }

    fn post(uri: &str, instructor: &str, body: &Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("x-user-id", instructor)
            .header("x-user-role", "instructor")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(body).unwrap()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn create_returns_201_with_pending_receipt() {
        let (state, store) = test_state();
        let router = app::create_router(state);
        let instructor = Uuid::new_v4().to_string();

        let response = router
            .oneshot(post("/api/courses", &instructor, &valid_draft_body()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let body = body_json(response).await;
        assert_eq!(body["item"]["status"], "Pending");
        let id: Uuid = body["item"]["id"].as_str().unwrap().parse().unwrap();
        assert_eq!(store.course(id).unwrap().total_video_seconds, 144);
    }

    #[tokio::test]
    async fn invalid_draft_returns_400_with_message() {
        let (state, store) = test_state();
        let router = app::create_router(state);
        let mut body = valid_draft_body();
        body["draft"]["title"] = json!("Rust5");

        let response = router
            .oneshot(post("/api/courses", &Uuid::new_v4().to_string(), &body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert!(body["message"].as_str().unwrap().contains("title"));
        assert_eq!(store.course_count(), 0);
    }

    #[tokio::test]
    async fn missing_identity_headers_return_401() {
        let (state, _) = test_state();
        let router = app::create_router(state);

        let request = Request::builder()
            .method("POST")
            .uri("/api/courses")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(
                serde_json::to_vec(&valid_draft_body()).unwrap(),
            ))
            .unwrap();
        let response = router.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn students_cannot_author_courses() {
        let (state, _) = test_state();
        let router = app::create_router(state);

        let request = Request::builder()
            .method("POST")
            .uri("/api/courses")
            .header("x-user-id", Uuid::new_v4().to_string())
            .header("x-user-role", "student")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(
                serde_json::to_vec(&valid_draft_body()).unwrap(),
            ))
            .unwrap();
        let response = router.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn edit_view_of_unknown_course_is_404() {
        let (state, _) = test_state();
        let router = app::create_router(state);

        let request = Request::builder()
            .method("GET")
            .uri(format!("/api/courses/{}/edit", Uuid::new_v4()))
            .header("x-user-id", Uuid::new_v4().to_string())
            .header("x-user-role", "instructor")
            .body(Body::empty())
            .unwrap();
        let response = router.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = body_json(response).await;
        assert_eq!(body["message"], "course not found");
    }
}
