use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::difficulty::Difficulty;
use crate::services::difficulty_policy::next_difficulty;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
pub struct QuestionOutcome {
    pub correct: bool,
    #[serde(default)]
    #[validate(range(min = 0))]
    pub time_ms: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SessionAggregate {
    pub questions_attempted: i32,
    pub correct_answers: i32,
    pub score: i32,
    pub accuracy: f64,
    pub time_spent_ms: i64,
    pub best_streak: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SessionOutcome {
    pub difficulty_level: Difficulty,
    pub next_difficulty: Difficulty,
    pub aggregate: SessionAggregate,
}

pub struct SessionAggregator;

impl SessionAggregator {
    pub fn aggregate(outcomes: &[QuestionOutcome], points_per_correct: i32) -> SessionAggregate {
        let mut correct: i32 = 0;
        let mut time_spent_ms: i64 = 0;
        let mut streak: i32 = 0;
        let mut best_streak: i32 = 0;

        for outcome in outcomes {
            time_spent_ms = time_spent_ms.saturating_add(outcome.time_ms.max(0));
            if outcome.correct {
                correct += 1;
                streak += 1;
                best_streak = best_streak.max(streak);
            } else {
                streak = 0;
            }
        }

        let total = i32::try_from(outcomes.len()).unwrap_or(i32::MAX);
        let accuracy = 100.0 * f64::from(correct) / f64::from(total.max(1));

        SessionAggregate {
            questions_attempted: total,
            correct_answers: correct,
            score: correct.saturating_mul(points_per_correct.max(0)),
            accuracy,
            time_spent_ms,
            best_streak,
        }
    }
}

/// Aggregates a finished session and picks the difficulty for the next one.
pub fn compute_session_outcome(
    outcomes: &[QuestionOutcome],
    current_difficulty: Difficulty,
    points_per_correct: i32,
) -> SessionOutcome {
    let aggregate = SessionAggregator::aggregate(outcomes, points_per_correct);
    SessionOutcome {
        difficulty_level: current_difficulty,
        next_difficulty: next_difficulty(current_difficulty, aggregate.accuracy),
        aggregate,
    }
}
