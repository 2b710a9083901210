//! State management module
//!
//! This module contains the timer engine, its value types and the shared
//! state that funnels all mutation through one lock.

pub mod countdown;
pub mod progress;
pub mod engine;
pub mod app_state;

// Re-export main types
pub use countdown::{Countdown, DEFAULT_MINUTES};
pub use progress::{GoalProgress, RoundProgress, GOAL_TOTAL, ROUNDS_PER_GOAL};
pub use engine::{Phase, Rollover, Snapshot, TickOutcome, TimerEngine};
pub use app_state::{AppState, RunCause, RunChange, StatusReport};
