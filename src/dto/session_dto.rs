use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::difficulty::Difficulty;
use crate::models::session::SessionRecord;
use crate::services::session_aggregator::{QuestionOutcome, SessionAggregate};

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CompleteSessionPayload {
    #[validate(length(min = 1, max = 200), nested)]
    pub outcomes: Vec<QuestionOutcome>,
    /// Level the quiz was played at; defaults to the stored level.
    pub difficulty: Option<Difficulty>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionOutcomeResponse {
    pub session_id: Uuid,
    pub topic_id: String,
    pub difficulty_level: Difficulty,
    pub next_difficulty: Difficulty,
    pub aggregate: SessionAggregate,
    pub best_streak: i32,
    pub persisted: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SessionListQuery {
    pub limit: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionListResponse {
    pub items: Vec<SessionRecord>,
}
