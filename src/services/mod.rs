pub mod ai_service;
pub mod dashboard_service;
pub mod difficulty_policy;
pub mod feedback_service;
pub mod progress_summary;
pub mod session_aggregator;
pub mod session_service;
pub mod stats_store;
