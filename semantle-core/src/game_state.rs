use semantle_types::{Attempt, GameError, GuessOutcome, SessionId, SessionState};
use std::time::{Duration, Instant};
use uuid::Uuid;

use crate::{ScoringEngine, normalize_word};

/// Server-side wrapper around a session's state.
///
/// `Active` until the target word is guessed, then `Completed` for good.
/// Attempts are append-only and each normalized word appears at most once.
#[derive(Debug, Clone)]
pub struct GameSession {
    pub state: SessionState,
    pub last_activity: Instant,
}

impl GameSession {
    pub fn new(session_id: SessionId, target_word: &str, is_daily: bool) -> Self {
        let state = SessionState {
            session_id,
            target_word: normalize_word(target_word),
            is_daily,
            attempts: Vec::new(),
            is_completed: false,
            created_at: chrono::Local::now().to_rfc3339(),
        };

        Self {
            state,
            last_activity: Instant::now(),
        }
    }

    /// New session with a freshly generated identifier.
    pub fn start(target_word: &str, is_daily: bool) -> Self {
        Self::new(Uuid::new_v4(), target_word, is_daily)
    }

    pub fn id(&self) -> SessionId {
        self.state.session_id
    }

    pub fn target_word(&self) -> &str {
        &self.state.target_word
    }

    pub fn is_completed(&self) -> bool {
        self.state.is_completed
    }

    pub fn has_guessed(&self, word: &str) -> bool {
        let word = normalize_word(word);
        self.state.attempts.iter().any(|a| a.word == word)
    }

    /// Checks that a guess of `word` could be recorded, without scoring it.
    /// Returns the normalized word.
    pub fn check_guess(&self, word: &str) -> Result<String, GameError> {
        if self.state.is_completed {
            return Err(GameError::GameAlreadyCompleted);
        }

        let word = normalize_word(word);
        if word.is_empty() {
            return Err(GameError::InvalidWord { word });
        }

        if self.has_guessed(&word) {
            return Err(GameError::WordAlreadyGuessed { word });
        }

        Ok(word)
    }

    /// Append a scored guess. Completes the session when the word is the
    /// target. The stored similarity is rounded; the returned one is not.
    pub fn record_attempt(&mut self, word: &str, similarity: f64) -> Result<GuessOutcome, GameError> {
        let word = self.check_guess(word)?;

        let is_correct = ScoringEngine::is_exact_match(&word, &self.state.target_word);
        let rank = ScoringEngine::rank(&word, &self.state.target_word);

        self.state.attempts.push(Attempt {
            word,
            similarity: ScoringEngine::round_similarity(similarity),
            rank,
            is_correct,
            timestamp: chrono::Local::now().to_rfc3339(),
        });

        if is_correct {
            self.state.is_completed = true;
        }
        self.touch();

        Ok(GuessOutcome {
            similarity,
            rank,
            is_correct,
        })
    }

    pub fn touch(&mut self) {
        self.last_activity = Instant::now();
    }

    pub fn is_expired(&self, timeout: Duration) -> bool {
        self.last_activity.elapsed() > timeout
    }
}
