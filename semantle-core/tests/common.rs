#![allow(dead_code)]

use semantle_core::{GameSession, WordPool};
use semantle_types::GameRecord;

/// Pool used by the daily-word scenarios.
pub fn create_test_pool() -> WordPool {
    WordPool::new(["cat", "dog", "animal"])
}

pub fn create_large_pool() -> WordPool {
    WordPool::new([
        "apple", "banana", "cherry", "house", "mouse", "train", "plane", "water", "stone",
        "bread", "cream", "river", "cloud", "forest", "ocean",
    ])
}

pub fn date(s: &str) -> chrono::NaiveDate {
    chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

/// Creates a session whose target is the pool's word for `day`.
pub fn create_daily_session(pool: &WordPool, day: &str) -> GameSession {
    GameSession::start(&pool.daily_word(date(day)), true)
}

/// Plays `words` in order, using 1.0 for the target and 0.5 otherwise.
pub fn play_words(session: &mut GameSession, words: &[&str]) {
    for word in words {
        let similarity = if *word == session.target_word() { 1.0 } else { 0.5 };
        session.record_attempt(word, similarity).ok();
    }
}

pub fn record_from_session(session: &GameSession) -> GameRecord {
    GameRecord {
        session_id: session.id().to_string(),
        target_word: session.target_word().to_string(),
        attempts: session.state.attempt_count(),
        completed: session.is_completed(),
        is_daily: session.state.is_daily,
        date: session.state.created_at.clone(),
    }
}
