//! Pomodoro - An interval timer with round and goal tracking
//!
//! This is the main entry point for the terminal timer.

use std::sync::Arc;
use tracing::info;

use pomodoro::{
    config::Config,
    state::AppState,
    tasks::{input_task, render_task, ticker_task},
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Logs go to stderr so they stay apart from rendered snapshots
    tracing_subscriber::fmt()
        .with_env_filter(format!("pomodoro={}", config.log_level()))
        .with_writer(std::io::stderr)
        .init();

    info!("Starting pomodoro v1.0.0");

    let state = Arc::new(AppState::new());

    // Start the tick source before accepting input
    let ticker = tokio::spawn(ticker_task(Arc::clone(&state)));
    let renderer = tokio::spawn(render_task(Arc::clone(&state), config.clone()));

    tokio::select! {
        _ = input_task(Arc::clone(&state), config.clone()) => {
            info!("Input closed");
        }
        result = shutdown_signal() => {
            if let Err(e) = result {
                tracing::error!("Signal handler error: {}", e);
            }
            info!("Shutdown signal received");
        }
    }

    ticker.abort();
    renderer.abort();

    let snapshot = state.snapshot().map_err(anyhow::Error::msg)?;
    info!("Session ended at round {}, goal {}", snapshot.round, snapshot.goal);
    Ok(())
}
