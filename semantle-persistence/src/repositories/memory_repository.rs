use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::RwLock;

use semantle_core::StatsAggregator;
use semantle_types::UserStatsSummary;

use super::{NewGameRecord, StatsDocument, StatsStore};

/// Process-local stats, lost on restart.
#[derive(Default)]
pub struct InMemoryStatsStore {
    document: RwLock<StatsDocument>,
}

impl InMemoryStatsStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn snapshot(&self) -> StatsDocument {
        self.document.read().await.clone()
    }
}

#[async_trait]
impl StatsStore for InMemoryStatsStore {
    async fn record_game(&self, user_id: &str, game: NewGameRecord) -> Result<()> {
        let mut document = self.document.write().await;
        let record = document.entry(user_id.to_string()).or_default();
        StatsAggregator::apply_game(record, game.into_record());
        Ok(())
    }

    async fn get_user_stats(&self, user_id: &str) -> UserStatsSummary {
        self.document
            .read()
            .await
            .get(user_id)
            .map(StatsAggregator::summarize)
            .unwrap_or_default()
    }
}
