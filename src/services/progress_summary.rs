use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::game_type::GameType;
use crate::models::topic_stat::TopicStat;

/// Dashboard totals for one student, recomputed on every load.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OverallSummary {
    pub total_sessions: i64,
    pub total_time_minutes: i64,
    pub average_accuracy: f64,
    pub best_streak: i32,
    pub activities: BTreeMap<GameType, i64>,
    pub strongest_activity: Option<GameType>,
}

pub struct ProgressSummaryBuilder;

impl ProgressSummaryBuilder {
    /// Session-weighted accuracy across topics: a topic played ten times
    /// counts ten times as much as a topic played once.
    pub fn summarize(topic_stats: &[TopicStat]) -> OverallSummary {
        let mut total_sessions: i64 = 0;
        let mut total_time_ms: i64 = 0;
        let mut weighted_accuracy: f64 = 0.0;
        let mut best_streak: i32 = 0;
        let mut activities: BTreeMap<GameType, i64> = BTreeMap::new();
        let mut per_activity: BTreeMap<GameType, (f64, i64)> = BTreeMap::new();

        for stat in topic_stats {
            let sessions = stat.sessions();
            let accuracy = stat.accuracy();

            total_sessions += sessions;
            total_time_ms = total_time_ms.saturating_add(stat.total_time_ms.max(0));
            weighted_accuracy += accuracy * sessions as f64;
            best_streak = best_streak.max(stat.best_streak);

            if sessions > 0 {
                *activities.entry(stat.game_type).or_insert(0) += sessions;
                let entry = per_activity.entry(stat.game_type).or_insert((0.0, 0));
                entry.0 += accuracy * sessions as f64;
                entry.1 += sessions;
            }
        }

        let average_accuracy = weighted_accuracy / total_sessions.max(1) as f64;
        let total_time_minutes = (total_time_ms as f64 / 60_000.0).round() as i64;

        let strongest_activity = per_activity
            .iter()
            .map(|(game_type, (sum, weight))| (*game_type, sum / (*weight).max(1) as f64))
            .fold(None::<(GameType, f64)>, |best, (game_type, accuracy)| match best {
                Some((_, best_accuracy)) if best_accuracy >= accuracy => best,
                _ => Some((game_type, accuracy)),
            })
            .map(|(game_type, _)| game_type);

        OverallSummary {
            total_sessions,
            total_time_minutes,
            average_accuracy,
            best_streak: best_streak.max(0),
            activities,
            strongest_activity,
        }
    }
}
