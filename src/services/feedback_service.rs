use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use crate::services::ai_service::TextGenerator;
use crate::services::progress_summary::OverallSummary;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackSource {
    Generated,
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feedback {
    pub text: String,
    pub source: FeedbackSource,
}

const SYSTEM_PROMPT: &str = "You are a warm, patient first-grade teacher. \
    Write two or three short sentences of encouragement for a six-year-old \
    based on their math practice results. Use simple words, be specific about \
    what they did well, and suggest one small next step. Do not use emoji.";

const HIGH_BAND: &[&str] = &[
    "Wow! You got {accuracy}% right in {topic}. You are a math star!",
    "Amazing work! {count} games played and a best streak of {streak} in a row. Keep shining!",
    "You are doing great at {topic}! Ready for a bigger challenge?",
];

const MIDDLE_BAND: &[&str] = &[
    "Good job! You got {accuracy}% right. A little more practice with {topic} and you will be a pro!",
    "Nice work on {count} games! Your best streak is {streak}. Let's keep going!",
    "You are getting better every day at {topic}. Keep practicing!",
];

const LOW_BAND: &[&str] = &[
    "Every try makes your brain stronger! Let's practice {topic} together.",
    "You played {count} games. That is great effort! Take your time and try again.",
    "Learning takes practice. You got {streak} right in a row, so you can do it!",
];

/// Encouragement text for a dashboard summary.
///
/// Makes a single generator call bounded by `timeout`; any failure,
/// timeout, blank reply, or missing generator yields a template instead.
#[derive(Clone)]
pub struct FeedbackService {
    generator: Option<Arc<dyn TextGenerator>>,
    timeout: Duration,
}

impl FeedbackService {
    pub fn new(generator: Option<Arc<dyn TextGenerator>>, timeout: Duration) -> Self {
        Self { generator, timeout }
    }

    pub async fn get_feedback(&self, summary: &OverallSummary) -> Feedback {
        let Some(generator) = self.generator.as_ref() else {
            tracing::debug!("no text generator configured, using fallback feedback");
            return Self::fallback(summary);
        };

        tracing::debug!(state = "requesting", "requesting generated feedback");
        let prompt = build_prompt(summary);
        match tokio::time::timeout(self.timeout, generator.generate(SYSTEM_PROMPT, &prompt)).await {
            Ok(Ok(text)) if !text.trim().is_empty() => {
                tracing::info!(state = "succeeded", "generated feedback");
                Feedback {
                    text: text.trim().to_string(),
                    source: FeedbackSource::Generated,
                }
            }
            Ok(Ok(_)) => {
                tracing::warn!(state = "failed_fallback", "generator returned empty feedback");
                Self::fallback(summary)
            }
            Ok(Err(e)) => {
                tracing::warn!(state = "failed_fallback", error = %e, "feedback generation failed");
                Self::fallback(summary)
            }
            Err(_) => {
                tracing::warn!(
                    state = "failed_fallback",
                    timeout_ms = self.timeout.as_millis() as u64,
                    "feedback generation timed out"
                );
                Self::fallback(summary)
            }
        }
    }

    /// Deterministic template feedback; never empty.
    pub fn fallback(summary: &OverallSummary) -> Feedback {
        let templates = match summary.average_accuracy {
            acc if acc >= 80.0 => HIGH_BAND,
            acc if acc >= 60.0 => MIDDLE_BAND,
            _ => LOW_BAND,
        };
        let index = summary.total_sessions.unsigned_abs() as usize % templates.len();
        let topic = summary
            .strongest_activity
            .map(|g| g.label())
            .unwrap_or("math");

        let text = templates[index]
            .replace("{topic}", topic)
            .replace("{streak}", &summary.best_streak.max(0).to_string())
            .replace("{count}", &summary.total_sessions.max(0).to_string())
            .replace("{accuracy}", &format!("{:.0}", summary.average_accuracy.floor()));

        Feedback {
            text,
            source: FeedbackSource::Fallback,
        }
    }
}

fn build_prompt(summary: &OverallSummary) -> String {
    let activities = if summary.activities.is_empty() {
        "none yet".to_string()
    } else {
        summary
            .activities
            .iter()
            .map(|(game_type, count)| format!("{} ({} games)", game_type.label(), count))
            .collect::<Vec<_>>()
            .join(", ")
    };

    format!(
        "Games played: {}\nMinutes practiced: {}\nAverage accuracy: {:.0}%\nBest streak: {}\nActivities: {}\nStrongest activity: {}",
        summary.total_sessions,
        summary.total_time_minutes,
        summary.average_accuracy,
        summary.best_streak,
        activities,
        summary
            .strongest_activity
            .map(|g| g.label())
            .unwrap_or("not enough data yet"),
    )
}
