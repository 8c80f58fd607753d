use crate::SessionId;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// A single player's game against one target word.
///
/// The target word is part of every response; the game does not keep it
/// secret from the client.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SessionState {
    pub session_id: SessionId,
    pub target_word: String,
    #[serde(rename = "daily_word")]
    pub is_daily: bool,
    pub attempts: Vec<Attempt>, // Guess order
    pub is_completed: bool,
    pub created_at: String, // ISO 8601 string
}

impl SessionState {
    pub fn status(&self) -> SessionStatus {
        if self.is_completed {
            SessionStatus::Completed
        } else {
            SessionStatus::Active
        }
    }

    pub fn attempt_count(&self) -> u32 {
        self.attempts.len() as u32
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum SessionStatus {
    Active,
    Completed, // Terminal
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Attempt {
    pub word: String,
    pub similarity: f64, // Rounded to 6 decimals
    pub rank: u32,       // 0 for the target word, 1 otherwise
    pub is_correct: bool,
    pub timestamp: String, // ISO 8601 string
}

/// Result of an accepted guess. `similarity` keeps full precision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct GuessOutcome {
    pub similarity: f64,
    pub rank: u32,
    pub is_correct: bool,
}
