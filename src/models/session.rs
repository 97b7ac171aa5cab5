use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::difficulty::Difficulty;

/// One row of `session_history`, written once when a session completes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub id: Uuid,
    pub student_id: Uuid,
    pub topic_id: String,
    pub questions_attempted: i32,
    pub correct_answers: i32,
    pub accuracy_percentage: f64,
    pub score: i32,
    pub difficulty_level: Difficulty,
    pub next_difficulty: Difficulty,
    pub time_spent_ms: i64,
    pub best_streak: i32,
    pub completed_at: DateTime<Utc>,
}
