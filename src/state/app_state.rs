//! Shared application state wrapping the timer engine

use std::{
    sync::{Arc, Mutex},
    time::Instant,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::{broadcast, watch};
use tracing::warn;

use super::{Phase, Snapshot, TickOutcome, TimerEngine};

/// Why the run state flipped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RunCause {
    Toggle,
    Reset,
    Expired,
}

/// Notification sent whenever the engine starts or stops running
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunChange {
    pub running: bool,
    pub cause: RunCause,
}

/// Status report for the `status` command
#[derive(Debug, Clone, Serialize)]
pub struct StatusReport {
    #[serde(flatten)]
    pub snapshot: Snapshot,
    pub phase: Phase,
    pub uptime: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Application state shared between the tick source and the console
#[derive(Debug)]
pub struct AppState {
    /// The engine; only reachable through the operations below
    engine: Mutex<TimerEngine>,
    pub start_time: Instant,
    /// Last user action tracking
    pub last_action: Arc<Mutex<Option<String>>>,
    pub last_action_time: Arc<Mutex<Option<DateTime<Utc>>>>,
    /// Run state transitions, consumed by the tick source
    run_change_tx: broadcast::Sender<RunChange>,
    /// Latest snapshot for renderers
    snapshot_tx: watch::Sender<Snapshot>,
    /// Keep the receiver alive to prevent channel closure
    _snapshot_rx: watch::Receiver<Snapshot>,
}

impl AppState {
    /// Create a new AppState around a default engine
    pub fn new() -> Self {
        Self::with_engine(TimerEngine::new())
    }

    /// Create a new AppState around an existing engine
    pub fn with_engine(engine: TimerEngine) -> Self {
        let (run_change_tx, _) = broadcast::channel(16);
        let (snapshot_tx, snapshot_rx) = watch::channel(engine.snapshot());

        Self {
            engine: Mutex::new(engine),
            start_time: Instant::now(),
            last_action: Arc::new(Mutex::new(None)),
            last_action_time: Arc::new(Mutex::new(None)),
            run_change_tx,
            snapshot_tx,
            _snapshot_rx: snapshot_rx,
        }
    }

    /// Apply an engine operation under the lock and publish the result
    fn apply<T, F>(&self, cause: RunCause, op: F) -> Result<T, String>
    where
        F: FnOnce(&mut TimerEngine) -> T,
    {
        let mut engine = self.engine.lock()
            .map_err(|e| format!("Failed to lock timer engine: {}", e))?;

        let was_running = engine.is_running();
        let result = op(&mut *engine);
        let running = engine.is_running();

        // Publish under the guard so concurrent operations land in lock order
        self.snapshot_tx.send_replace(engine.snapshot());

        if was_running != running {
            // No receivers just means the tick source is not listening yet
            if self.run_change_tx.send(RunChange { running, cause }).is_err() {
                warn!("No listeners for run change (running={})", running);
            }
        }
        drop(engine);

        Ok(result)
    }

    fn record_action(&self, action: &str) {
        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }
    }

    /// Start or pause the timer
    pub fn toggle_run(&self) -> Result<Snapshot, String> {
        let snapshot = self.apply(RunCause::Toggle, TimerEngine::toggle_run)?;
        self.record_action(if snapshot.running { "start" } else { "pause" });
        Ok(snapshot)
    }

    /// Abandon the current round and pause
    pub fn reset(&self) -> Result<Snapshot, String> {
        let snapshot = self.apply(RunCause::Reset, TimerEngine::reset)?;
        self.record_action("reset");
        Ok(snapshot)
    }

    /// Deliver one tick from the tick source
    pub fn tick(&self) -> Result<TickOutcome, String> {
        self.apply(RunCause::Expired, TimerEngine::tick)
    }

    /// Get the current snapshot
    pub fn snapshot(&self) -> Result<Snapshot, String> {
        self.engine.lock()
            .map(|engine| engine.snapshot())
            .map_err(|e| format!("Failed to lock timer engine: {}", e))
    }

    /// Check whether the timer is currently running
    pub fn is_running(&self) -> Result<bool, String> {
        self.engine.lock()
            .map(|engine| engine.is_running())
            .map_err(|e| format!("Failed to lock timer engine: {}", e))
    }

    /// Subscribe to run state transitions
    pub fn subscribe_run_changes(&self) -> broadcast::Receiver<RunChange> {
        self.run_change_tx.subscribe()
    }

    /// Subscribe to snapshot updates
    pub fn subscribe_snapshots(&self) -> watch::Receiver<Snapshot> {
        self.snapshot_tx.subscribe()
    }

    /// Calculate uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        format_uptime(self.start_time.elapsed().as_secs())
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }

    /// Build a status report from the current state
    pub fn status_report(&self) -> Result<StatusReport, String> {
        let (snapshot, phase) = {
            let engine = self.engine.lock()
                .map_err(|e| format!("Failed to lock timer engine: {}", e))?;
            (engine.snapshot(), engine.phase())
        };
        let (last_action, last_action_time) = self.get_last_action();

        Ok(StatusReport {
            snapshot,
            phase,
            uptime: self.get_uptime(),
            last_action,
            last_action_time,
        })
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

fn format_uptime(total: u64) -> String {
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;

    if hours > 0 {
        format!("{}h {}m {}s", hours, minutes, seconds)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, seconds)
    } else {
        format!("{}s", seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{sync::Barrier, thread};
    use crate::state::{GoalProgress, RoundProgress};

    #[test]
    fn test_format_uptime() {
        assert_eq!(format_uptime(5), "5s");
        assert_eq!(format_uptime(65), "1m 5s");
        assert_eq!(format_uptime(3725), "1h 2m 5s");
    }

    #[test]
    fn test_toggle_publishes_run_change_and_snapshot() {
        let state = AppState::new();
        let mut run_rx = state.subscribe_run_changes();
        let snapshot_rx = state.subscribe_snapshots();

        let snapshot = state.toggle_run().unwrap();
        assert!(snapshot.running);
        assert_eq!(
            run_rx.try_recv().unwrap(),
            RunChange { running: true, cause: RunCause::Toggle }
        );
        assert_eq!(*snapshot_rx.borrow(), snapshot);

        let (action, time) = state.get_last_action();
        assert_eq!(action.as_deref(), Some("start"));
        assert!(time.is_some());
    }

    #[test]
    fn test_tick_does_not_announce_while_running() {
        let state = AppState::new();
        state.toggle_run().unwrap();
        let mut run_rx = state.subscribe_run_changes();

        assert!(matches!(state.tick().unwrap(), TickOutcome::Ticked(_)));
        assert!(run_rx.try_recv().is_err());
    }

    #[test]
    fn test_expiry_announces_stop() {
        let round = RoundProgress::new(3).unwrap();
        let goal = GoalProgress::new(0).unwrap();
        let state = AppState::with_engine(TimerEngine::with_progress(round, goal));
        state.toggle_run().unwrap();
        let mut run_rx = state.subscribe_run_changes();

        let mut expired = 0;
        for _ in 0..1800 {
            if state.tick().unwrap().is_expired() {
                expired += 1;
            }
        }
        assert_eq!(expired, 1);
        assert_eq!(
            run_rx.try_recv().unwrap(),
            RunChange { running: false, cause: RunCause::Expired }
        );

        let snapshot = state.snapshot().unwrap();
        assert_eq!(snapshot.round.current(), 0);
        assert_eq!(snapshot.goal.current(), 1);
        assert!(!state.is_running().unwrap());
    }

    #[test]
    fn test_published_snapshot_matches_engine_under_contention() {
        let state = AppState::new();
        let snapshot_rx = state.subscribe_snapshots();

        for _ in 0..500 {
            let barrier = Barrier::new(2);
            thread::scope(|scope| {
                scope.spawn(|| {
                    barrier.wait();
                    state.toggle_run().unwrap();
                    state.tick().unwrap();
                });
                scope.spawn(|| {
                    barrier.wait();
                    state.toggle_run().unwrap();
                });
            });
            assert_eq!(*snapshot_rx.borrow(), state.snapshot().unwrap());
        }
    }

    #[test]
    fn test_reset_while_paused_sends_no_run_change() {
        let state = AppState::new();
        let mut run_rx = state.subscribe_run_changes();
        state.reset().unwrap();
        assert!(run_rx.try_recv().is_err());
        assert_eq!(state.get_last_action().0.as_deref(), Some("reset"));
    }

    #[test]
    fn test_status_report_json() {
        let state = AppState::new();
        let report = state.status_report().unwrap();
        assert_eq!(report.phase, Phase::Idle);

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["phase"], "idle");
        assert_eq!(json["running"], false);
        assert_eq!(json["countdown"]["minutes"], 30);
        assert!(json["last_action"].is_null());
    }
}
