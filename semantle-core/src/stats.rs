use semantle_types::{GameRecord, UserStatsRecord, UserStatsSummary};

/// Games kept per user.
pub const HISTORY_LIMIT: usize = 100;
/// Games returned in a summary.
pub const SUMMARY_HISTORY_LIMIT: usize = 20;

pub struct StatsAggregator;

impl StatsAggregator {
    /// Fold one game into a user's counters. Attempts only count towards the
    /// average when the game was completed.
    pub fn apply_game(record: &mut UserStatsRecord, game: GameRecord) {
        // Counters saturate; a stored document may hold any value
        record.total_games = record.total_games.saturating_add(1);
        if game.completed {
            record.completed_games = record.completed_games.saturating_add(1);
            record.total_attempts = record.total_attempts.saturating_add(game.attempts);
        }

        record.games_history.push(game);
        if record.games_history.len() > HISTORY_LIMIT {
            let overflow = record.games_history.len() - HISTORY_LIMIT;
            record.games_history.drain(..overflow);
        }
    }

    /// Recomputed on every call; nothing is cached.
    pub fn summarize(record: &UserStatsRecord) -> UserStatsSummary {
        let average_attempts = if record.completed_games > 0 {
            let average = record.total_attempts as f64 / record.completed_games as f64;
            (average * 100.0).round() / 100.0
        } else {
            0.0
        };

        let best_score = record
            .games_history
            .iter()
            .filter(|game| game.completed)
            .map(|game| game.attempts)
            .min()
            .unwrap_or(0);

        let recent_start = record
            .games_history
            .len()
            .saturating_sub(SUMMARY_HISTORY_LIMIT);

        UserStatsSummary {
            total_games: record.total_games,
            completed_games: record.completed_games,
            average_attempts,
            best_score,
            games_history: record.games_history[recent_start..].to_vec(),
        }
    }
}
