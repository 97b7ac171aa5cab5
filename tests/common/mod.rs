#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use grade_one_backend::{
    config::Config,
    error::{Error, Result},
    models::{
        game_type::GameType, session::SessionRecord, topic::Topic,
        topic_stat::{TopicStat, TopicStatPatch},
    },
    routes,
    services::{ai_service::TextGenerator, stats_store::StatsStore},
    AppState,
};
use serde_json::Value as JsonValue;
use tower::ServiceExt;
use uuid::Uuid;

#[derive(Default)]
pub struct InMemoryStatsStore {
    topics: Vec<Topic>,
    stats: Mutex<HashMap<(Uuid, String), TopicStat>>,
    sessions: Mutex<Vec<SessionRecord>>,
}

impl InMemoryStatsStore {
    pub fn with_default_topics() -> Self {
        let topic = |id: &str, name: &str, game_type| Topic {
            id: id.to_string(),
            name: name.to_string(),
            game_type,
            description: None,
        };
        Self {
            topics: vec![
                topic("addition", "Addition", GameType::Addition),
                topic("measurement", "Measurement", GameType::Measurement),
                topic("ordinal-numbers", "Ordinal Numbers", GameType::OrdinalNumbers),
                topic("counting", "Numbers and Counting", GameType::Numbers),
                topic("abacus", "Abacus", GameType::Abacus),
                topic("matching", "Matching Game", GameType::Matching),
            ],
            ..Default::default()
        }
    }

    pub fn insert_stat(&self, stat: TopicStat) {
        self.stats
            .lock()
            .unwrap()
            .insert((stat.student_id, stat.topic_id.clone()), stat);
    }
}

#[async_trait]
impl StatsStore for InMemoryStatsStore {
    async fn list_topics(&self) -> Result<Vec<Topic>> {
        Ok(self.topics.clone())
    }

    async fn get_topic(&self, topic_id: &str) -> Result<Option<Topic>> {
        Ok(self.topics.iter().find(|t| t.id == topic_id).cloned())
    }

    async fn get_topic_stat(&self, student_id: Uuid, topic_id: &str) -> Result<Option<TopicStat>> {
        Ok(self
            .stats
            .lock()
            .unwrap()
            .get(&(student_id, topic_id.to_string()))
            .cloned())
    }

    async fn list_topic_stats(&self, student_id: Uuid) -> Result<Vec<TopicStat>> {
        Ok(self
            .stats
            .lock()
            .unwrap()
            .values()
            .filter(|s| s.student_id == student_id)
            .cloned()
            .collect())
    }

    async fn upsert_topic_stat(
        &self,
        student_id: Uuid,
        topic_id: &str,
        patch: &TopicStatPatch,
    ) -> Result<()> {
        let game_type = self
            .topics
            .iter()
            .find(|t| t.id == topic_id)
            .map(|t| t.game_type)
            .ok_or_else(|| Error::NotFound(topic_id.to_string()))?;
        let stat = TopicStat {
            student_id,
            topic_id: topic_id.to_string(),
            game_type,
            total_attempts: patch.total_attempts,
            correct_answers: patch.correct_answers,
            total_questions: patch.total_questions,
            current_difficulty: patch.current_difficulty,
            last_accuracy: patch.last_accuracy,
            best_streak: patch.best_streak,
            total_time_ms: patch.total_time_ms,
            last_attempted: patch.last_attempted,
        };
        self.insert_stat(stat);
        Ok(())
    }

    async fn record_session(&self, record: &SessionRecord) -> Result<()> {
        self.sessions.lock().unwrap().push(record.clone());
        Ok(())
    }

    async fn recent_sessions(&self, student_id: Uuid, limit: i64) -> Result<Vec<SessionRecord>> {
        let sessions = self.sessions.lock().unwrap();
        Ok(sessions
            .iter()
            .rev()
            .filter(|s| s.student_id == student_id)
            .take(limit.max(0) as usize)
            .cloned()
            .collect())
    }
}

/// Store whose every call fails as an unreachable database would.
pub struct UnavailableStatsStore;

fn unavailable() -> Error {
    Error::Database(sqlx::Error::PoolTimedOut)
}

#[async_trait]
impl StatsStore for UnavailableStatsStore {
    async fn list_topics(&self) -> Result<Vec<Topic>> {
        Err(unavailable())
    }

    async fn get_topic(&self, _topic_id: &str) -> Result<Option<Topic>> {
        Err(unavailable())
    }

    async fn get_topic_stat(
        &self,
        _student_id: Uuid,
        _topic_id: &str,
    ) -> Result<Option<TopicStat>> {
        Err(unavailable())
    }

    async fn list_topic_stats(&self, _student_id: Uuid) -> Result<Vec<TopicStat>> {
        Err(unavailable())
    }

    async fn upsert_topic_stat(
        &self,
        _student_id: Uuid,
        _topic_id: &str,
        _patch: &TopicStatPatch,
    ) -> Result<()> {
        Err(unavailable())
    }

    async fn record_session(&self, _record: &SessionRecord) -> Result<()> {
        Err(unavailable())
    }

    async fn recent_sessions(&self, _student_id: Uuid, _limit: i64) -> Result<Vec<SessionRecord>> {
        Err(unavailable())
    }
}

pub struct FailingGenerator;

#[async_trait]
impl TextGenerator for FailingGenerator {
    async fn generate(&self, _system_prompt: &str, _user_prompt: &str) -> Result<String> {
        Err(anyhow::anyhow!("OpenAI API Error 503: unavailable").into())
    }
}

pub struct CannedGenerator(pub &'static str);

#[async_trait]
impl TextGenerator for CannedGenerator {
    async fn generate(&self, _system_prompt: &str, _user_prompt: &str) -> Result<String> {
        Ok(self.0.to_string())
    }
}

pub fn test_config() -> Config {
    Config {
        server_address: "127.0.0.1:0".into(),
        database_url: "postgres://unused".into(),
        database_max_connections: 1,
        openai_api_key: None,
        openai_model: "gpt-4o-mini".into(),
        feedback_timeout_secs: 1,
        points_per_correct: 10,
    }
}

pub fn setup_app(
    store: Arc<dyn StatsStore>,
    generator: Option<Arc<dyn TextGenerator>>,
) -> Router {
    let state = AppState::from_parts(store, generator, &test_config());
    routes::api_router(state)
}

pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, JsonValue) {
    let resp = app.clone().oneshot(request).await.unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), 1024 * 1024).await.unwrap();
    let body = if bytes.is_empty() {
        JsonValue::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(JsonValue::Null)
    };
    (status, body)
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub fn post_json(uri: &str, body: &JsonValue) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}
