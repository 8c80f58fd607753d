pub mod game_state;
pub mod scoring;
pub mod stats;
pub mod word_pool;

// Re-export main components
pub use game_state::*;
pub use scoring::*;
pub use stats::*;
pub use word_pool::*;
