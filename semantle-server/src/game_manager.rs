use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use dashmap::DashMap;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::embeddings::EmbeddingService;
use semantle_core::{GameSession, WordPool, normalize_word};
use semantle_types::{GameError, GuessResponse, SessionId, SessionState};

/// Owns every live session and runs guesses against them.
///
/// Each session sits behind its own mutex, held for the whole guess, so two
/// guesses on one session never interleave.
pub struct GameManager {
    sessions: DashMap<SessionId, Arc<Mutex<GameSession>>>,
    word_pool: WordPool,
    embeddings: Arc<EmbeddingService>,
}

impl GameManager {
    pub fn new(word_pool: WordPool, embeddings: Arc<EmbeddingService>) -> Self {
        Self {
            sessions: DashMap::new(),
            word_pool,
            embeddings,
        }
    }

    pub fn word_pool(&self) -> &WordPool {
        &self.word_pool
    }

    pub fn embeddings(&self) -> &EmbeddingService {
        &self.embeddings
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    /// Start a session using today's local date for the daily word.
    pub fn create_session(&self, daily: bool) -> SessionState {
        self.create_session_for_date(daily, chrono::Local::now().date_naive())
    }

    pub fn create_session_for_date(&self, daily: bool, date: NaiveDate) -> SessionState {
        let target_word = if daily {
            self.word_pool.daily_word(date)
        } else {
            self.word_pool.random_word()
        };

        let session = GameSession::start(&target_word, daily);
        let state = session.state.clone();
        self.sessions
            .insert(session.id(), Arc::new(Mutex::new(session)));

        info!("Created session {} (daily: {})", state.session_id, daily);
        debug!("Session {} target word: {}", state.session_id, state.target_word);
        state
    }

    fn find(&self, session_id: SessionId) -> Option<Arc<Mutex<GameSession>>> {
        // Clone out so no map guard is held across an await
        self.sessions.get(&session_id).map(|entry| entry.value().clone())
    }

    pub async fn get_session(&self, session_id: SessionId) -> Option<SessionState> {
        let session = self.find(session_id)?;
        let mut session = session.lock().await;
        session.touch();
        Some(session.state.clone())
    }

    /// Validate, score and record one guess.
    ///
    /// Rejections leave the session untouched. A provider failure while
    /// scoring an already-validated word is reported as
    /// [`GameError::EmbeddingUnavailable`].
    pub async fn submit_guess(
        &self,
        session_id: SessionId,
        word: &str,
    ) -> Result<GuessResponse, GameError> {
        let session = self
            .find(session_id)
            .ok_or_else(|| GameError::SessionNotFound {
                session_id: session_id.to_string(),
            })?;
        let mut session = session.lock().await;

        // Evicted while this guess waited for the lock
        if !self.sessions.contains_key(&session_id) {
            return Err(GameError::SessionNotFound {
                session_id: session_id.to_string(),
            });
        }

        if session.is_completed() {
            return Err(GameError::GameAlreadyCompleted);
        }

        let word = normalize_word(word);
        if word.is_empty() || !self.embeddings.is_word_valid(&word).await {
            return Err(GameError::InvalidWord { word });
        }

        let word = session.check_guess(&word)?;

        let similarity = self
            .embeddings
            .similarity(session.target_word(), &word)
            .await
            .map_err(|e| {
                warn!("Scoring '{}' in session {} failed: {}", word, session_id, e);
                GameError::EmbeddingUnavailable {
                    message: e.to_string(),
                }
            })?;

        let outcome = session.record_attempt(&word, similarity)?;
        if outcome.is_correct {
            info!(
                "Session {} completed in {} attempts",
                session_id,
                session.state.attempt_count()
            );
        }

        Ok(GuessResponse {
            similarity: outcome.similarity,
            rank: outcome.rank,
            is_correct: outcome.is_correct,
            session_id: session_id.to_string(),
            attempts: session.state.attempt_count(),
        })
    }

    pub async fn is_word_valid(&self, word: &str) -> bool {
        self.embeddings.is_word_valid(word).await
    }

    /// Drop sessions idle for longer than `timeout`. Sessions with a guess in
    /// flight are skipped.
    pub fn cleanup_expired_sessions(&self, timeout: Duration) -> usize {
        let before = self.sessions.len();
        self.sessions.retain(|_, session| match session.try_lock() {
            Ok(session) => !session.is_expired(timeout),
            Err(_) => true,
        });

        let removed = before.saturating_sub(self.sessions.len());
        if removed > 0 {
            info!("Removed {} expired sessions", removed);
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embeddings::{EmbeddingError, EmbeddingProvider};
    use async_trait::async_trait;

    struct FixedProvider;

    #[async_trait]
    impl EmbeddingProvider for FixedProvider {
        async fn embed(&self, word: &str) -> Result<Vec<f32>, EmbeddingError> {
            match word {
                "cat" => Ok(vec![1.0, 0.0]),
                "dog" => Ok(vec![0.8, 0.6]),
                _ => Err(EmbeddingError::UnknownWord {
                    word: word.to_string(),
                }),
            }
        }
    }

    fn manager() -> Arc<GameManager> {
        let embeddings = Arc::new(EmbeddingService::new(Arc::new(FixedProvider)));
        Arc::new(GameManager::new(WordPool::new(["cat"]), embeddings))
    }

    #[tokio::test]
    async fn test_guess_on_session_evicted_while_waiting() {
        let game_manager = manager();
        let session_id = game_manager.create_session(false).session_id;

        let session = game_manager.find(session_id).unwrap();
        let guard = session.lock().await;

        let pending = tokio::spawn({
            let game_manager = game_manager.clone();
            async move { game_manager.submit_guess(session_id, "dog").await }
        });
        tokio::time::sleep(Duration::from_millis(20)).await;

        game_manager.sessions.remove(&session_id);
        drop(guard);

        let result = pending.await.unwrap();
        assert_eq!(
            result,
            Err(GameError::SessionNotFound {
                session_id: session_id.to_string()
            })
        );
        assert!(session.lock().await.state.attempts.is_empty());
    }

    #[tokio::test]
    async fn test_cleanup_skips_locked_sessions() {
        let game_manager = manager();
        let session_id = game_manager.create_session(false).session_id;

        let session = game_manager.find(session_id).unwrap();
        let _guard = session.lock().await;
        tokio::time::sleep(Duration::from_millis(2)).await;

        assert_eq!(
            game_manager.cleanup_expired_sessions(Duration::from_millis(1)),
            0
        );
        assert_eq!(game_manager.session_count(), 1);
    }
}
