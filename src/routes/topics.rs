use axum::{
    extract::{Path, State},
    response::{IntoResponse, Json},
};
use uuid::Uuid;

use crate::{dto::dashboard_dto::TopicListResponse, error::Error, error::Result, AppState};

#[axum::debug_handler]
pub async fn list_topics(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let items = state.stats_store.list_topics().await?;
    Ok(Json(TopicListResponse { items }))
}

#[axum::debug_handler]
pub async fn get_topic_stat(
    State(state): State<AppState>,
    Path((student_id, topic_id)): Path<(Uuid, String)>,
) -> Result<impl IntoResponse> {
    let stat = state
        .stats_store
        .get_topic_stat(student_id, &topic_id)
        .await?
        .ok_or_else(|| Error::NotFound(format!("No progress for topic {}", topic_id)))?;
    Ok(Json(stat))
}
