use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Reasons a game operation is refused. Serialized into error bodies so the
/// client can tell the causes apart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, thiserror::Error)]
#[ts(export)]
pub enum GameError {
    #[error("Invalid request body: {message}")]
    InvalidRequest { message: String },
    #[error("Session ID is required")]
    SessionIdRequired,
    #[error("Session not found: {session_id}")]
    SessionNotFound { session_id: String },
    #[error("Game already completed")]
    GameAlreadyCompleted,
    #[error("Invalid word: '{word}'")]
    InvalidWord { word: String },
    #[error("Word already guessed: '{word}'")]
    WordAlreadyGuessed { word: String },
    #[error("Embedding provider unavailable: {message}")]
    EmbeddingUnavailable { message: String },
    #[error("Failed to persist stats: {message}")]
    PersistenceFailure { message: String },
}

impl GameError {
    /// True for the rejections a player can fix by sending a different guess.
    pub fn is_rejected_guess(&self) -> bool {
        matches!(
            self,
            GameError::GameAlreadyCompleted
                | GameError::InvalidWord { .. }
                | GameError::WordAlreadyGuessed { .. }
        )
    }
}
