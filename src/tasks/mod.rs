//! Background tasks module
//!
//! This module contains the tick source and the terminal front end that run
//! alongside each other against the shared state.

pub mod ticker;
pub mod console;

// Re-export main functions
pub use ticker::ticker_task;
pub use console::{input_task, render_task};
