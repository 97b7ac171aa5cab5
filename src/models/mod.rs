pub mod difficulty;
pub mod game_type;
pub mod session;
pub mod topic;
pub mod topic_stat;
