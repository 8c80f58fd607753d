use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// One finished (or abandoned) game in a user's history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct GameRecord {
    pub session_id: String,
    pub target_word: String,
    pub attempts: u32,
    pub completed: bool,
    #[serde(rename = "daily_word")]
    pub is_daily: bool,
    pub date: String, // ISO 8601 string
}

/// Stored counters for one user. Missing fields read as zero so older
/// documents keep loading.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(default)]
pub struct UserStatsRecord {
    pub total_games: u32,
    pub completed_games: u32,
    pub total_attempts: u32,
    pub games_history: Vec<GameRecord>, // Oldest first
}

/// Derived view returned to clients.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct UserStatsSummary {
    pub total_games: u32,
    pub completed_games: u32,
    pub average_attempts: f64,
    pub best_score: u32,
    pub games_history: Vec<GameRecord>,
}
