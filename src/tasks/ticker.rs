//! Tick source background task
//!
//! Arms a one-second interval when the engine starts running and drops it as
//! soon as the engine stops (pause, reset or expiry), so ticks are only ever
//! delivered while running.

use std::{sync::Arc, time::Duration};
use tokio::{
    sync::broadcast::{self, error::RecvError},
    time::{interval_at, sleep, Instant},
};
use tracing::{debug, error, info, warn};

use crate::state::{AppState, RunChange, TickOutcome};

const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Why an armed interval was dropped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Disarm {
    Paused,
    Expired,
    /// A run change arrived; re-check the engine and re-arm from scratch
    Changed,
    Closed,
}

/// Background task that delivers one tick per second while the timer runs
pub async fn ticker_task(state: Arc<AppState>) {
    info!("Starting tick source");

    // Subscribe before the first state check so no transition is missed
    let mut run_rx = state.subscribe_run_changes();

    loop {
        match state.is_running() {
            Ok(true) => {
                debug!("Arming tick interval");
                match run_armed(&state, &mut run_rx).await {
                    Disarm::Closed => break,
                    Disarm::Changed => {
                        debug!("Run change while armed, re-checking run state");
                        continue;
                    }
                    reason => debug!("Tick interval disarmed: {:?}", reason),
                }
            }
            Ok(false) => {}
            Err(e) => {
                error!("Failed to read run state: {}", e);
                // Wait a bit before retrying
                sleep(TICK_PERIOD).await;
                continue;
            }
        }

        // Paused: wait for the next run change
        match run_rx.recv().await {
            Ok(change) => debug!("Tick source received run change: {:?}", change),
            Err(RecvError::Lagged(skipped)) => {
                warn!("Tick source lagged by {} run changes, re-reading state", skipped);
            }
            Err(RecvError::Closed) => break,
        }
    }

    info!("Tick source stopped");
}

/// Deliver ticks until the engine stops running
async fn run_armed(state: &AppState, run_rx: &mut broadcast::Receiver<RunChange>) -> Disarm {
    // First tick lands one full period after arming
    let mut interval = interval_at(Instant::now() + TICK_PERIOD, TICK_PERIOD);

    loop {
        tokio::select! {
            _ = interval.tick() => {
                match state.tick() {
                    Ok(TickOutcome::Ticked(_)) => {}
                    Ok(TickOutcome::Expired { .. }) => return Disarm::Expired,
                    Ok(TickOutcome::Ignored) => return Disarm::Paused,
                    Err(e) => {
                        error!("Failed to deliver tick: {}", e);
                        return Disarm::Paused;
                    }
                }
            }

            change = run_rx.recv() => {
                match change {
                    // Any transition drops this interval, even a pause and
                    // resume that both queued before we woke
                    Ok(_) | Err(RecvError::Lagged(_)) => return Disarm::Changed,
                    Err(RecvError::Closed) => return Disarm::Closed,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Countdown;

    fn spawn_ticker(state: &Arc<AppState>) -> tokio::task::JoinHandle<()> {
        tokio::spawn(ticker_task(Arc::clone(state)))
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticks_only_while_running() {
        let state = Arc::new(AppState::new());
        let handle = spawn_ticker(&state);

        state.toggle_run().unwrap();
        sleep(Duration::from_millis(5500)).await;
        assert_eq!(state.snapshot().unwrap().countdown, Countdown::new(29, 55).unwrap());

        state.toggle_run().unwrap();
        sleep(Duration::from_secs(3)).await;
        assert_eq!(state.snapshot().unwrap().countdown, Countdown::new(29, 55).unwrap());

        state.toggle_run().unwrap();
        sleep(Duration::from_millis(2500)).await;
        assert_eq!(state.snapshot().unwrap().countdown, Countdown::new(29, 53).unwrap());

        handle.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn test_expiry_disarms_interval() {
        let state = Arc::new(AppState::new());
        let handle = spawn_ticker(&state);

        state.toggle_run().unwrap();
        sleep(Duration::from_secs(1800) + Duration::from_millis(500)).await;

        let snapshot = state.snapshot().unwrap();
        assert!(!snapshot.running);
        assert_eq!(snapshot.countdown, Countdown::full());
        assert_eq!(snapshot.round.current(), 1);
        assert_eq!(snapshot.goal.current(), 0);

        sleep(Duration::from_secs(10)).await;
        assert_eq!(state.snapshot().unwrap(), snapshot);

        handle.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn test_resume_restarts_tick_phase() {
        let state = Arc::new(AppState::new());
        let handle = spawn_ticker(&state);

        state.toggle_run().unwrap();
        sleep(Duration::from_millis(1500)).await;
        assert_eq!(state.snapshot().unwrap().countdown, Countdown::new(29, 59).unwrap());

        // Pause and resume before the tick source gets to run
        state.toggle_run().unwrap();
        state.toggle_run().unwrap();

        // The old phase would tick at 2.0s; a fresh interval ticks at 2.5s
        sleep(Duration::from_millis(750)).await;
        assert_eq!(state.snapshot().unwrap().countdown, Countdown::new(29, 59).unwrap());

        sleep(Duration::from_millis(500)).await;
        assert_eq!(state.snapshot().unwrap().countdown, Countdown::new(29, 58).unwrap());

        handle.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_stops_ticks() {
        let state = Arc::new(AppState::new());
        let handle = spawn_ticker(&state);

        state.toggle_run().unwrap();
        sleep(Duration::from_millis(3500)).await;
        state.reset().unwrap();
        sleep(Duration::from_secs(5)).await;

        let snapshot = state.snapshot().unwrap();
        assert!(!snapshot.running);
        assert_eq!(snapshot.countdown, Countdown::full());

        handle.abort();
    }
}
