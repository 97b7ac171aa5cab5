pub mod dashboard;
pub mod health;
pub mod sessions;
pub mod topics;

use axum::{
    routing::{get, post},
    Router,
};

use crate::AppState;

pub fn api_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/api/topics", get(topics::list_topics))
        .route(
            "/api/students/:student_id/topics/:topic_id/sessions",
            post(sessions::complete_session),
        )
        .route(
            "/api/students/:student_id/topics/:topic_id/stats",
            get(topics::get_topic_stat),
        )
        .route(
            "/api/students/:student_id/sessions",
            get(sessions::list_sessions),
        )
        .route(
            "/api/students/:student_id/dashboard",
            get(dashboard::get_dashboard),
        )
        .route(
            "/api/students/:student_id/feedback",
            get(dashboard::get_feedback),
        )
        .with_state(state)
}
