pub mod memory_repository;
pub mod stats_repository;

pub use memory_repository::InMemoryStatsStore;
pub use stats_repository::StatsRepository;

use std::collections::BTreeMap;

use anyhow::Result;
use async_trait::async_trait;
use semantle_types::{GameRecord, SessionState, UserStatsRecord, UserStatsSummary};

/// Whole stats document: user id to that user's record.
pub type StatsDocument = BTreeMap<String, UserStatsRecord>;

/// A game to add to a user's history. The date is stamped on write.
#[derive(Debug, Clone, PartialEq)]
pub struct NewGameRecord {
    pub session_id: String,
    pub target_word: String,
    pub attempts: u32,
    pub completed: bool,
    pub is_daily: bool,
}

impl NewGameRecord {
    pub fn into_record(self) -> GameRecord {
        GameRecord {
            session_id: self.session_id,
            target_word: self.target_word,
            attempts: self.attempts,
            completed: self.completed,
            is_daily: self.is_daily,
            date: chrono::Local::now().to_rfc3339(),
        }
    }
}

impl From<&SessionState> for NewGameRecord {
    fn from(state: &SessionState) -> Self {
        Self {
            session_id: state.session_id.to_string(),
            target_word: state.target_word.clone(),
            attempts: state.attempt_count(),
            completed: state.is_completed,
            is_daily: state.is_daily,
        }
    }
}

/// Per-user game statistics storage.
#[async_trait]
pub trait StatsStore: Send + Sync {
    async fn record_game(&self, user_id: &str, game: NewGameRecord) -> Result<()>;

    /// Never fails; unknown users get zeroed stats.
    async fn get_user_stats(&self, user_id: &str) -> UserStatsSummary;
}
