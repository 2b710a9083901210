//! Pomodoro - An interval timer with round and goal tracking
//!
//! The timer engine counts a 30 minute round down to zero. Each expired round
//! advances a round counter (4 per cycle); each completed cycle advances a goal
//! counter capped at 12.

pub mod config;
pub mod state;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use state::{AppState, Snapshot, TickOutcome, TimerEngine};
pub use utils::signals::shutdown_signal;
