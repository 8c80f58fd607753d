use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use semantle_core::StatsAggregator;
use semantle_types::UserStatsSummary;

use super::{NewGameRecord, StatsDocument, StatsStore};

/// Stats kept in a single JSON document that is read fully and rewritten
/// fully on every save.
///
/// Writes from this process are serialized. Other processes writing the same
/// file can still overwrite each other.
pub struct StatsRepository {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl StatsRepository {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Missing or corrupt files read as an empty document.
    pub async fn load_document(&self) -> StatsDocument {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No stats file at {}", self.path.display());
                return StatsDocument::new();
            }
            Err(e) => {
                warn!("Failed to read stats file {}: {}", self.path.display(), e);
                return StatsDocument::new();
            }
        };

        match serde_json::from_str(&contents) {
            Ok(document) => document,
            Err(e) => {
                warn!(
                    "Stats file {} is corrupt, treating as empty: {}",
                    self.path.display(),
                    e
                );
                StatsDocument::new()
            }
        }
    }

    async fn save_document(&self, document: &StatsDocument) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
        }

        let json = serde_json::to_string_pretty(document)?;
        let tmp_path = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp_path, json)
            .await
            .with_context(|| format!("Failed to write {}", tmp_path.display()))?;
        tokio::fs::rename(&tmp_path, &self.path)
            .await
            .with_context(|| format!("Failed to replace {}", self.path.display()))?;

        Ok(())
    }
}

#[async_trait]
impl StatsStore for StatsRepository {
    async fn record_game(&self, user_id: &str, game: NewGameRecord) -> Result<()> {
        let _guard = self.write_lock.lock().await;

        let mut document = self.load_document().await;
        let record = document.entry(user_id.to_string()).or_default();
        StatsAggregator::apply_game(record, game.into_record());

        self.save_document(&document).await?;
        debug!("Recorded game for user {}", user_id);
        Ok(())
    }

    async fn get_user_stats(&self, user_id: &str) -> UserStatsSummary {
        let document = self.load_document().await;
        document
            .get(user_id)
            .map(StatsAggregator::summarize)
            .unwrap_or_default()
    }
}
