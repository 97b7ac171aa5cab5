use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::session::SessionRecord;
use crate::models::topic::Topic;
use crate::models::topic_stat::TopicStat;
use crate::services::feedback_service::Feedback;
use crate::services::progress_summary::OverallSummary;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardResponse {
    pub student_id: Uuid,
    pub summary: OverallSummary,
    pub topics: Vec<TopicStat>,
    pub recent_sessions: Vec<SessionRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackResponse {
    pub student_id: Uuid,
    #[serde(flatten)]
    pub feedback: Feedback,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopicListResponse {
    pub items: Vec<Topic>,
}
