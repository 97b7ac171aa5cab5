use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use crate::dto::session_dto::{CompleteSessionPayload, SessionOutcomeResponse};
use crate::error::{Error, Result};
use crate::models::difficulty::Difficulty;
use crate::models::session::SessionRecord;
use crate::services::session_aggregator::compute_session_outcome;
use crate::services::stats_store::{merge_session, StatsStore};

#[derive(Clone)]
pub struct SessionService {
    store: Arc<dyn StatsStore>,
    points_per_correct: i32,
}

impl SessionService {
    pub fn new(store: Arc<dyn StatsStore>, points_per_correct: i32) -> Self {
        Self {
            store,
            points_per_correct,
        }
    }

    /// Scores a finished session, picks the next difficulty and stores both.
    ///
    /// Storage failures are logged and reported through `persisted`; they
    /// never fail the request. Only an unknown topic is an error.
    pub async fn complete_session(
        &self,
        student_id: Uuid,
        topic_id: &str,
        payload: &CompleteSessionPayload,
    ) -> Result<SessionOutcomeResponse> {
        match self.store.get_topic(topic_id).await {
            Ok(Some(_)) => {}
            Ok(None) => return Err(Error::NotFound(format!("Topic {} not found", topic_id))),
            Err(e) => {
                tracing::warn!(
                    %student_id,
                    topic_id,
                    error = %e,
                    "topic lookup failed, continuing"
                );
            }
        }

        let existing = match self.store.get_topic_stat(student_id, topic_id).await {
            Ok(stat) => stat,
            Err(e) => {
                tracing::warn!(
                    %student_id,
                    topic_id,
                    error = %e,
                    "topic stat read failed, treating as new"
                );
                None
            }
        };

        let current = payload
            .difficulty
            .or_else(|| existing.as_ref().map(|s| s.current_difficulty))
            .unwrap_or(Difficulty::Easy);

        let outcome = compute_session_outcome(&payload.outcomes, current, self.points_per_correct);
        let now = Utc::now();
        let patch = merge_session(existing.as_ref(), &outcome, now);

        let mut persisted = true;
        if let Err(e) = self.store.upsert_topic_stat(student_id, topic_id, &patch).await {
            persisted = false;
            tracing::error!(%student_id, topic_id, error = %e, "failed to persist topic stat");
        }

        let record = SessionRecord {
            id: Uuid::new_v4(),
            student_id,
            topic_id: topic_id.to_string(),
            questions_attempted: outcome.aggregate.questions_attempted,
            correct_answers: outcome.aggregate.correct_answers,
            accuracy_percentage: outcome.aggregate.accuracy,
            score: outcome.aggregate.score,
            difficulty_level: outcome.difficulty_level,
            next_difficulty: outcome.next_difficulty,
            time_spent_ms: outcome.aggregate.time_spent_ms,
            best_streak: outcome.aggregate.best_streak,
            completed_at: now,
        };
        if let Err(e) = self.store.record_session(&record).await {
            persisted = false;
            tracing::error!(%student_id, topic_id, error = %e, "failed to record session history");
        }

        tracing::info!(
            %student_id,
            topic_id,
            accuracy = outcome.aggregate.accuracy,
            from = %outcome.difficulty_level,
            to = %outcome.next_difficulty,
            persisted,
            "session completed"
        );

        Ok(SessionOutcomeResponse {
            session_id: record.id,
            topic_id: record.topic_id,
            difficulty_level: outcome.difficulty_level,
            next_difficulty: outcome.next_difficulty,
            aggregate: outcome.aggregate,
            best_streak: patch.best_streak,
            persisted,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::game_type::GameType;
    use crate::models::topic::Topic;
    use crate::models::topic_stat::TopicStat;
    use crate::services::session_aggregator::QuestionOutcome;
    use crate::services::stats_store::MockStatsStore;

    fn topic() -> Topic {
        Topic {
            id: "addition".into(),
            name: "Addition".into(),
            game_type: GameType::Addition,
            description: None,
        }
    }

    fn payload(
        correct: usize,
        total: usize,
        difficulty: Option<Difficulty>,
    ) -> CompleteSessionPayload {
        CompleteSessionPayload {
            outcomes: (0..total)
                .map(|i| QuestionOutcome {
                    correct: i < correct,
                    time_ms: 2_000,
                })
                .collect(),
            difficulty,
        }
    }

    fn stored(difficulty: Difficulty, best_streak: i32) -> TopicStat {
        TopicStat {
            student_id: Uuid::nil(),
            topic_id: "addition".into(),
            game_type: GameType::Addition,
            total_attempts: 2,
            correct_answers: 14,
            total_questions: 20,
            current_difficulty: difficulty,
            last_accuracy: 70.0,
            best_streak,
            total_time_ms: 40_000,
            last_attempted: Utc::now(),
        }
    }

    #[tokio::test]
    async fn uses_stored_difficulty_and_persists() {
        let mut store = MockStatsStore::new();
        store.expect_get_topic().returning(|_| Ok(Some(topic())));
        store
            .expect_get_topic_stat()
            .returning(|_, _| Ok(Some(stored(Difficulty::Medium, 9))));
        store
            .expect_upsert_topic_stat()
            .withf(|_, topic_id, patch| {
                topic_id == "addition"
                    && patch.total_attempts == 3
                    && patch.current_difficulty == Difficulty::Hard
                    && patch.best_streak == 9
            })
            .times(1)
            .returning(|_, _, _| Ok(()));
        store
            .expect_record_session()
            .withf(|record| record.difficulty_level == Difficulty::Medium && record.score == 90)
            .times(1)
            .returning(|_| Ok(()));

        let service = SessionService::new(Arc::new(store), 10);
        let response = service
            .complete_session(Uuid::new_v4(), "addition", &payload(9, 10, None))
            .await
            .unwrap();

        assert_eq!(response.difficulty_level, Difficulty::Medium);
        assert_eq!(response.next_difficulty, Difficulty::Hard);
        assert_eq!(response.aggregate.accuracy, 90.0);
        assert_eq!(response.best_streak, 9);
        assert!(response.persisted);
    }

    #[tokio::test]
    async fn unknown_topic_is_not_found() {
        let mut store = MockStatsStore::new();
        store.expect_get_topic().returning(|_| Ok(None));

        let service = SessionService::new(Arc::new(store), 10);
        let err = service
            .complete_session(Uuid::new_v4(), "spelling", &payload(1, 1, None))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn storage_failures_do_not_block_the_session() {
        let mut store = MockStatsStore::new();
        store
            .expect_get_topic()
            .returning(|_| Err(Error::Internal("connection refused".into())));
        store
            .expect_get_topic_stat()
            .returning(|_, _| Err(Error::Internal("connection refused".into())));
        store
            .expect_upsert_topic_stat()
            .returning(|_, _, _| Err(Error::Internal("connection refused".into())));
        store
            .expect_record_session()
            .returning(|_| Err(Error::Internal("connection refused".into())));

        let service = SessionService::new(Arc::new(store), 10);
        let response = service
            .complete_session(Uuid::new_v4(), "addition", &payload(5, 10, None))
            .await
            .unwrap();

        assert_eq!(response.difficulty_level, Difficulty::Easy);
        assert_eq!(response.next_difficulty, Difficulty::Easy);
        assert_eq!(response.aggregate.score, 50);
        assert!(!response.persisted);
    }

    #[tokio::test]
    async fn request_difficulty_overrides_stored() {
        let mut store = MockStatsStore::new();
        store.expect_get_topic().returning(|_| Ok(Some(topic())));
        store
            .expect_get_topic_stat()
            .returning(|_, _| Ok(Some(stored(Difficulty::Easy, 2))));
        store.expect_upsert_topic_stat().returning(|_, _, _| Ok(()));
        store.expect_record_session().returning(|_| Ok(()));

        let service = SessionService::new(Arc::new(store), 1);
        let response = service
            .complete_session(Uuid::new_v4(), "addition", &payload(5, 10, Some(Difficulty::Hard)))
            .await
            .unwrap();

        assert_eq!(response.difficulty_level, Difficulty::Hard);
        assert_eq!(response.next_difficulty, Difficulty::Medium);
        assert_eq!(response.aggregate.score, 5);
    }
}
