use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::error::Result;
use crate::models::difficulty::Difficulty;
use crate::models::game_type::GameType;
use crate::models::session::SessionRecord;
use crate::models::topic::Topic;
use crate::models::topic_stat::{TopicStat, TopicStatPatch};
use crate::services::session_aggregator::SessionOutcome;

/// Persistence seam for topics, per-topic stats and session history.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StatsStore: Send + Sync {
    async fn list_topics(&self) -> Result<Vec<Topic>>;

    async fn get_topic(&self, topic_id: &str) -> Result<Option<Topic>>;

    async fn get_topic_stat(&self, student_id: Uuid, topic_id: &str) -> Result<Option<TopicStat>>;

    async fn list_topic_stats(&self, student_id: Uuid) -> Result<Vec<TopicStat>>;

    /// Last-write-wins: the patch replaces the stored values.
    async fn upsert_topic_stat(
        &self,
        student_id: Uuid,
        topic_id: &str,
        patch: &TopicStatPatch,
    ) -> Result<()>;

    async fn record_session(&self, record: &SessionRecord) -> Result<()>;

    async fn recent_sessions(&self, student_id: Uuid, limit: i64) -> Result<Vec<SessionRecord>>;
}

/// Folds a finished session into the existing record for that topic.
///
/// `best_streak` keeps the all-time maximum and `correct_answers` never
/// exceeds `total_questions`.
pub fn merge_session(
    existing: Option<&TopicStat>,
    outcome: &SessionOutcome,
    now: DateTime<Utc>,
) -> TopicStatPatch {
    let agg = &outcome.aggregate;
    let (attempts, correct, questions, streak, time_ms) = match existing {
        Some(stat) => (
            stat.total_attempts.max(0),
            stat.correct_answers.max(0),
            stat.total_questions.max(0),
            stat.best_streak.max(0),
            stat.total_time_ms.max(0),
        ),
        None => (0, 0, 0, 0, 0),
    };

    let total_questions = questions.saturating_add(agg.questions_attempted.max(0));
    let correct_answers = correct
        .saturating_add(agg.correct_answers.max(0))
        .min(total_questions);

    TopicStatPatch {
        total_attempts: attempts.saturating_add(1),
        correct_answers,
        total_questions,
        current_difficulty: outcome.next_difficulty,
        last_accuracy: agg.accuracy.clamp(0.0, 100.0),
        best_streak: streak.max(agg.best_streak),
        total_time_ms: time_ms.saturating_add(agg.time_spent_ms.max(0)),
        last_attempted: now,
    }
}

#[derive(Clone)]
pub struct PgStatsStore {
    pool: PgPool,
}

impl PgStatsStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const TOPIC_STAT_COLUMNS: &str = r#"
    s.student_id, s.topic_id, t.game_type, s.total_attempts, s.correct_answers,
    s.total_questions, s.current_difficulty, s.last_accuracy, s.best_streak,
    s.total_time_ms, s.last_attempted
"#;

const SESSION_COLUMNS: &str = r#"
    id, student_id, topic_id, questions_attempted, correct_answers, accuracy_percentage,
    score, difficulty_level, next_difficulty, time_spent_ms, best_streak, completed_at
"#;

fn parse_game_type(raw: &str) -> Result<GameType> {
    raw.parse()
        .map_err(|e: String| anyhow::anyhow!("Invalid topic row: {}", e).into())
}

fn topic_from_row(row: &PgRow) -> Result<Topic> {
    let game_type: String = row.try_get("game_type")?;
    Ok(Topic {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        game_type: parse_game_type(&game_type)?,
        description: row.try_get("description")?,
    })
}

fn topic_stat_from_row(row: &PgRow) -> Result<TopicStat> {
    let game_type: String = row.try_get("game_type")?;
    let difficulty: String = row.try_get("current_difficulty")?;
    Ok(TopicStat {
        student_id: row.try_get("student_id")?,
        topic_id: row.try_get("topic_id")?,
        game_type: parse_game_type(&game_type)?,
        total_attempts: row.try_get("total_attempts")?,
        correct_answers: row.try_get("correct_answers")?,
        total_questions: row.try_get("total_questions")?,
        current_difficulty: Difficulty::from_stored(&difficulty),
        last_accuracy: row.try_get("last_accuracy")?,
        best_streak: row.try_get("best_streak")?,
        total_time_ms: row.try_get("total_time_ms")?,
        last_attempted: row.try_get("last_attempted")?,
    })
}

fn session_from_row(row: &PgRow) -> Result<SessionRecord> {
    let difficulty_level: String = row.try_get("difficulty_level")?;
    let next_difficulty: String = row.try_get("next_difficulty")?;
    Ok(SessionRecord {
        id: row.try_get("id")?,
        student_id: row.try_get("student_id")?,
        topic_id: row.try_get("topic_id")?,
        questions_attempted: row.try_get("questions_attempted")?,
        correct_answers: row.try_get("correct_answers")?,
        accuracy_percentage: row.try_get("accuracy_percentage")?,
        score: row.try_get("score")?,
        difficulty_level: Difficulty::from_stored(&difficulty_level),
        next_difficulty: Difficulty::from_stored(&next_difficulty),
        time_spent_ms: row.try_get("time_spent_ms")?,
        best_streak: row.try_get("best_streak")?,
        completed_at: row.try_get("completed_at")?,
    })
}

#[async_trait]
impl StatsStore for PgStatsStore {
    async fn list_topics(&self) -> Result<Vec<Topic>> {
        let rows =
            sqlx::query("SELECT id, name, game_type, description FROM topics ORDER BY name ASC")
                .fetch_all(&self.pool)
                .await?;
        rows.iter().map(topic_from_row).collect()
    }

    async fn get_topic(&self, topic_id: &str) -> Result<Option<Topic>> {
        let row = sqlx::query("SELECT id, name, game_type, description FROM topics WHERE id = $1")
            .bind(topic_id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(topic_from_row).transpose()
    }

    async fn get_topic_stat(&self, student_id: Uuid, topic_id: &str) -> Result<Option<TopicStat>> {
        let query = format!(
            "SELECT {} FROM topic_stats s JOIN topics t ON t.id = s.topic_id
             WHERE s.student_id = $1 AND s.topic_id = $2",
            TOPIC_STAT_COLUMNS
        );
        let row = sqlx::query(&query)
            .bind(student_id)
            .bind(topic_id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(topic_stat_from_row).transpose()
    }

    async fn list_topic_stats(&self, student_id: Uuid) -> Result<Vec<TopicStat>> {
        let query = format!(
            "SELECT {} FROM topic_stats s JOIN topics t ON t.id = s.topic_id
             WHERE s.student_id = $1
             ORDER BY s.last_attempted DESC",
            TOPIC_STAT_COLUMNS
        );
        let rows = sqlx::query(&query)
            .bind(student_id)
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(topic_stat_from_row).collect()
    }

    async fn upsert_topic_stat(
        &self,
        student_id: Uuid,
        topic_id: &str,
        patch: &TopicStatPatch,
    ) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO topic_stats (
                student_id, topic_id, total_attempts, correct_answers, total_questions,
                current_difficulty, last_accuracy, best_streak, total_time_ms, last_attempted
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ON CONFLICT (student_id, topic_id) DO UPDATE SET
                total_attempts = EXCLUDED.total_attempts,
                correct_answers = EXCLUDED.correct_answers,
                total_questions = EXCLUDED.total_questions,
                current_difficulty = EXCLUDED.current_difficulty,
                last_accuracy = EXCLUDED.last_accuracy,
                best_streak = EXCLUDED.best_streak,
                total_time_ms = EXCLUDED.total_time_ms,
                last_attempted = EXCLUDED.last_attempted
            "#,
        )
        .bind(student_id)
        .bind(topic_id)
        .bind(patch.total_attempts)
        .bind(patch.correct_answers)
        .bind(patch.total_questions)
        .bind(patch.current_difficulty.as_str())
        .bind(patch.last_accuracy)
        .bind(patch.best_streak)
        .bind(patch.total_time_ms)
        .bind(patch.last_attempted)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn record_session(&self, record: &SessionRecord) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO session_history (
                id, student_id, topic_id, questions_attempted, correct_answers,
                accuracy_percentage, score, difficulty_level, next_difficulty,
                time_spent_ms, best_streak, completed_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(record.id)
        .bind(record.student_id)
        .bind(&record.topic_id)
        .bind(record.questions_attempted)
        .bind(record.correct_answers)
        .bind(record.accuracy_percentage)
        .bind(record.score)
        .bind(record.difficulty_level.as_str())
        .bind(record.next_difficulty.as_str())
        .bind(record.time_spent_ms)
        .bind(record.best_streak)
        .bind(record.completed_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn recent_sessions(&self, student_id: Uuid, limit: i64) -> Result<Vec<SessionRecord>> {
        let query = format!(
            "SELECT {} FROM session_history WHERE student_id = $1
             ORDER BY completed_at DESC LIMIT $2",
            SESSION_COLUMNS
        );
        let rows = sqlx::query(&query)
            .bind(student_id)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(session_from_row).collect()
    }
}
