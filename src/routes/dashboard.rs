use axum::{
    extract::{Path, State},
    response::{IntoResponse, Json},
};
use uuid::Uuid;

use crate::{dto::dashboard_dto::FeedbackResponse, error::Result, AppState};

#[axum::debug_handler]
pub async fn get_dashboard(
    State(state): State<AppState>,
    Path(student_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let dashboard = state.dashboard_service.dashboard(student_id).await?;
    Ok(Json(dashboard))
}

#[axum::debug_handler]
pub async fn get_feedback(
    State(state): State<AppState>,
    Path(student_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let summary = state.dashboard_service.summary(student_id).await?;
    let feedback = state.feedback_service.get_feedback(&summary).await;
    Ok(Json(FeedbackResponse {
        student_id,
        feedback,
    }))
}
