use crate::models::difficulty::Difficulty;

/// Adaptive difficulty thresholds shared by every quiz type.
///
/// Accuracy at or above `promote_at` moves one level up, accuracy below
/// `demote_below` moves one level down, anything in between keeps the
/// current level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DifficultyPolicy {
    promote_at: f64,
    demote_below: f64,
}

impl DifficultyPolicy {
    pub const CANONICAL: DifficultyPolicy = DifficultyPolicy {
        promote_at: 80.0,
        demote_below: 60.0,
    };

    pub fn next(&self, current: Difficulty, accuracy_percent: f64) -> Difficulty {
        if accuracy_percent >= self.promote_at {
            current.harder()
        } else if accuracy_percent < self.demote_below {
            current.easier()
        } else {
            current
        }
    }
}

pub fn next_difficulty(current: Difficulty, accuracy_percent: f64) -> Difficulty {
    DifficultyPolicy::CANONICAL.next(current, accuracy_percent)
}
