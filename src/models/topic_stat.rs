use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::difficulty::Difficulty;
use super::game_type::GameType;

/// Rolling per-student, per-topic record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicStat {
    pub student_id: Uuid,
    pub topic_id: String,
    pub game_type: GameType,
    pub total_attempts: i32,
    pub correct_answers: i32,
    pub total_questions: i32,
    pub current_difficulty: Difficulty,
    pub last_accuracy: f64,
    pub best_streak: i32,
    pub total_time_ms: i64,
    pub last_attempted: DateTime<Utc>,
}

impl TopicStat {
    /// Number of completed sessions, with negative counts read as zero.
    pub fn sessions(&self) -> i64 {
        i64::from(self.total_attempts.max(0))
    }

    /// Lifetime accuracy in percent. Zero questions reads as zero accuracy.
    pub fn accuracy(&self) -> f64 {
        if self.total_questions <= 0 {
            return 0.0;
        }
        let correct = self.correct_answers.clamp(0, self.total_questions);
        100.0 * f64::from(correct) / f64::from(self.total_questions)
    }
}

/// Full replacement values written by `StatsStore::upsert_topic_stat`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicStatPatch {
    pub total_attempts: i32,
    pub correct_answers: i32,
    pub total_questions: i32,
    pub current_difficulty: Difficulty,
    pub last_accuracy: f64,
    pub best_streak: i32,
    pub total_time_ms: i64,
    pub last_attempted: DateTime<Utc>,
}
