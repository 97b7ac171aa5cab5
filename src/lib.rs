pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

use crate::config::Config;
use crate::services::{
    ai_service::{AIService, TextGenerator},
    dashboard_service::DashboardService,
    feedback_service::FeedbackService,
    session_service::SessionService,
    stats_store::{PgStatsStore, StatsStore},
};
use reqwest::Client;
use sqlx::PgPool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub stats_store: Arc<dyn StatsStore>,
    pub session_service: SessionService,
    pub dashboard_service: DashboardService,
    pub feedback_service: FeedbackService,
}

impl AppState {
    /// Production wiring: Postgres-backed store and, when an API key is
    /// configured, an OpenAI client built once and shared.
    pub fn new(pool: PgPool, config: &Config) -> error::Result<Self> {
        let generator: Option<Arc<dyn TextGenerator>> = match config.openai_api_key.clone() {
            Some(api_key) => {
                let http_client = Client::builder()
                    .timeout(std::time::Duration::from_secs(60))
                    .build()?;
                let ai_service: Arc<dyn TextGenerator> = Arc::new(AIService::new(
                    api_key,
                    config.openai_model.clone(),
                    http_client,
                ));
                Some(ai_service)
            }
            None => {
                tracing::info!("OPENAI_API_KEY not set, feedback will use templates");
                None
            }
        };

        Ok(Self::from_parts(
            Arc::new(PgStatsStore::new(pool)),
            generator,
            config,
        ))
    }

    pub fn from_parts(
        stats_store: Arc<dyn StatsStore>,
        generator: Option<Arc<dyn TextGenerator>>,
        config: &Config,
    ) -> Self {
        Self {
            session_service: SessionService::new(stats_store.clone(), config.points_per_correct),
            dashboard_service: DashboardService::new(stats_store.clone()),
            feedback_service: FeedbackService::new(generator, config.feedback_timeout()),
            stats_store,
        }
    }
}
