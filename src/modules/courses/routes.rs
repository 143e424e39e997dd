use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::app_state::AppState;

use super::handlers::{course_for_edit, create_course, delete_course, resubmit_course};

pub fn course_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_course))
        .route("/:course_id", delete(delete_course))
        .route("/:course_id/edit", get(course_for_edit))
        .route("/:course_id/resubmit", post(resubmit_course))
}
