use std::sync::Arc;
use uuid::Uuid;

use crate::dto::dashboard_dto::DashboardResponse;
use crate::error::Result;
use crate::models::topic_stat::TopicStat;
use crate::services::progress_summary::{OverallSummary, ProgressSummaryBuilder};
use crate::services::stats_store::StatsStore;

pub const RECENT_SESSIONS_LIMIT: i64 = 10;

pub fn summarize_for_dashboard(topic_stats: &[TopicStat]) -> OverallSummary {
    ProgressSummaryBuilder::summarize(topic_stats)
}

#[derive(Clone)]
pub struct DashboardService {
    store: Arc<dyn StatsStore>,
}

impl DashboardService {
    pub fn new(store: Arc<dyn StatsStore>) -> Self {
        Self { store }
    }

    pub async fn summary(&self, student_id: Uuid) -> Result<OverallSummary> {
        let stats = self.store.list_topic_stats(student_id).await?;
        Ok(summarize_for_dashboard(&stats))
    }

    pub async fn dashboard(&self, student_id: Uuid) -> Result<DashboardResponse> {
        let topics = self.store.list_topic_stats(student_id).await?;
        let recent_sessions = self
            .store
            .recent_sessions(student_id, RECENT_SESSIONS_LIMIT)
            .await?;
        let summary = summarize_for_dashboard(&topics);

        Ok(DashboardResponse {
            student_id,
            summary,
            topics,
            recent_sessions,
        })
    }
}
