//! Terminal front end: stdin commands in, rendered snapshots out

use std::{
    io::{self, BufRead},
    sync::Arc,
    thread,
};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::{
    config::Config,
    state::{AppState, Snapshot},
};

/// A user command read from stdin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Toggle,
    Reset,
    Status,
    Quit,
}

impl Command {
    /// Parse one input line. An empty line toggles.
    pub fn parse(line: &str) -> Option<Self> {
        match line.trim().to_lowercase().as_str() {
            "" | "t" | "toggle" | "space" => Some(Command::Toggle),
            "r" | "reset" => Some(Command::Reset),
            "s" | "status" => Some(Command::Status),
            "q" | "quit" | "exit" => Some(Command::Quit),
            _ => None,
        }
    }
}

/// Format a snapshot as one output line
pub fn render_line(snapshot: &Snapshot, json: bool) -> String {
    if json {
        return serde_json::to_string(snapshot)
            .unwrap_or_else(|e| format!("{{\"error\":\"{}\"}}", e));
    }

    format!(
        "{} [{}] round {} goal {}",
        snapshot.countdown,
        if snapshot.running { "running" } else { "paused" },
        snapshot.round,
        snapshot.goal,
    )
}

/// Read stdin lines on a detached thread.
///
/// A blocking read must not live on the runtime's blocking pool, or runtime
/// shutdown would wait for the next line.
pub fn spawn_stdin_reader() -> io::Result<mpsc::Receiver<String>> {
    let (line_tx, line_rx) = mpsc::channel(16);

    thread::Builder::new()
        .name("stdin-reader".to_string())
        .spawn(move || {
            for line in io::stdin().lock().lines() {
                let line = match line {
                    Ok(line) => line,
                    Err(e) => {
                        error!("Failed to read stdin: {}", e);
                        break;
                    }
                };
                if line_tx.blocking_send(line).is_err() {
                    break;
                }
            }
            debug!("stdin closed");
        })?;

    Ok(line_rx)
}

/// Read commands from stdin until quit or end of input
pub async fn input_task(state: Arc<AppState>, config: Config) {
    info!("Press Enter to start/pause, 'r' to reset, 's' for status, 'q' to quit");

    match spawn_stdin_reader() {
        Ok(lines) => handle_lines(&state, &config, lines).await,
        Err(e) => error!("Failed to start stdin reader: {}", e),
    }
}

/// Apply command lines until quit or the sender goes away
pub async fn handle_lines(state: &AppState, config: &Config, mut lines: mpsc::Receiver<String>) {
    while let Some(line) = lines.recv().await {
        let Some(command) = Command::parse(&line) else {
            warn!("Unknown command: {:?}", line.trim());
            continue;
        };

        let result = match command {
            Command::Toggle => state.toggle_run().map(|_| ()),
            Command::Reset => state.reset().map(|_| ()),
            Command::Status => print_status(state, config.json),
            Command::Quit => break,
        };

        if let Err(e) = result {
            error!("Failed to handle {:?}: {}", command, e);
        }
    }
}

fn print_status(state: &AppState, json: bool) -> Result<(), String> {
    let report = state.status_report()?;

    if json {
        let line = serde_json::to_string(&report)
            .map_err(|e| format!("Failed to encode status: {}", e))?;
        println!("{}", line);
    } else {
        println!(
            "{} ({:?}), up {}, last action: {}",
            render_line(&report.snapshot, false),
            report.phase,
            report.uptime,
            report.last_action.as_deref().unwrap_or("none"),
        );
    }
    Ok(())
}

/// Print every snapshot change. With `quiet`, plain ticks are skipped.
pub async fn render_task(state: Arc<AppState>, config: Config) {
    let mut snapshot_rx = state.subscribe_snapshots();
    let mut last = *snapshot_rx.borrow_and_update();
    println!("{}", render_line(&last, config.json));

    while snapshot_rx.changed().await.is_ok() {
        let snapshot = *snapshot_rx.borrow_and_update();
        if config.quiet && !is_notable(&last, &snapshot) {
            last = snapshot;
            continue;
        }
        println!("{}", render_line(&snapshot, config.json));
        last = snapshot;
    }
}

/// Anything other than the countdown moving
fn is_notable(previous: &Snapshot, current: &Snapshot) -> bool {
    previous.running != current.running
        || previous.round != current.round
        || previous.goal != current.goal
}
