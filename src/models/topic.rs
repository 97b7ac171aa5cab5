use serde::{Deserialize, Serialize};

use super::game_type::GameType;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Topic {
    pub id: String,
    pub name: String,
    pub game_type: GameType,
    pub description: Option<String>,
}
