use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    response::{IntoResponse, Json},
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::session_dto::{CompleteSessionPayload, SessionListQuery, SessionListResponse},
    error::{Error, Result},
    AppState,
};

#[axum::debug_handler]
pub async fn complete_session(
    State(state): State<AppState>,
    Path((student_id, topic_id)): Path<(Uuid, String)>,
    payload: std::result::Result<Json<CompleteSessionPayload>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let Json(payload) = payload.map_err(|rejection| Error::BadRequest(rejection.body_text()))?;
    payload.validate()?;
    let outcome = state
        .session_service
        .complete_session(student_id, &topic_id, &payload)
        .await?;
    Ok(Json(outcome))
}

#[axum::debug_handler]
pub async fn list_sessions(
    State(state): State<AppState>,
    Path(student_id): Path<Uuid>,
    Query(query): Query<SessionListQuery>,
) -> Result<impl IntoResponse> {
    let limit = query.limit.unwrap_or(10).clamp(1, 100);
    let items = state.stats_store.recent_sessions(student_id, limit).await?;
    Ok(Json(SessionListResponse { items }))
}
