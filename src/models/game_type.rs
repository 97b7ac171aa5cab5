use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Activity family a topic belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameType {
    Addition,
    Measurement,
    OrdinalNumbers,
    Numbers,
    Abacus,
    Matching,
}

impl GameType {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameType::Addition => "addition",
            GameType::Measurement => "measurement",
            GameType::OrdinalNumbers => "ordinal_numbers",
            GameType::Numbers => "numbers",
            GameType::Abacus => "abacus",
            GameType::Matching => "matching",
        }
    }

    /// Human wording used in encouragement text.
    pub fn label(&self) -> &'static str {
        match self {
            GameType::Addition => "addition",
            GameType::Measurement => "measuring",
            GameType::OrdinalNumbers => "ordinal numbers",
            GameType::Numbers => "counting",
            GameType::Abacus => "the abacus",
            GameType::Matching => "matching games",
        }
    }
}

impl fmt::Display for GameType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GameType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "addition" => Ok(GameType::Addition),
            "measurement" => Ok(GameType::Measurement),
            "ordinal_numbers" => Ok(GameType::OrdinalNumbers),
            "numbers" => Ok(GameType::Numbers),
            "abacus" => Ok(GameType::Abacus),
            "matching" => Ok(GameType::Matching),
            other => Err(format!("unknown game type: {}", other)),
        }
    }
}
