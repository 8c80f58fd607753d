use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::GameError;

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewGameRequest {
    #[serde(default)]
    pub daily: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct GuessRequest {
    pub word: String,
    #[serde(default)]
    pub session_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct GuessResponse {
    pub similarity: f64,
    pub rank: u32,
    pub is_correct: bool,
    pub session_id: String,
    pub attempts: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RecordGameRequest {
    pub session_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct WordValidationResponse {
    pub valid: bool,
    pub word: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ErrorResponse {
    pub detail: String,
    pub error: GameError,
}

impl From<GameError> for ErrorResponse {
    fn from(error: GameError) -> Self {
        Self {
            detail: error.to_string(),
            error,
        }
    }
}
