//! Timer engine: countdown, run state, round and goal progress
//!
//! All mutation goes through `toggle_run`, `tick` and `reset`. Expiry and the
//! round/goal rollover it causes happen inside the single `tick` call that
//! reaches 0:00, so callers never see a half-applied transition.

use serde::Serialize;
use tracing::{debug, info};

use super::{Countdown, GoalProgress, RoundProgress};

/// Read-only view of the engine handed to renderers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    pub countdown: Countdown,
    pub running: bool,
    pub round: RoundProgress,
    pub goal: GoalProgress,
}

/// Coarse state of the timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Idle,
    Running,
    Expired,
}

/// Counter changes applied by a rollover
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rollover {
    /// Round counter reached its total and wrapped to 0
    pub round_wrapped: bool,
    /// Goal counter moved up (false once the goal is saturated)
    pub goal_advanced: bool,
}

/// Result of delivering one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Timer is paused; nothing changed
    Ignored,
    /// One second elapsed, the round is still running
    Ticked(Snapshot),
    /// The round ran out and the rollover was applied.
    ///
    /// `at_expiry` shows the moment of expiry (0:00, paused, counters already
    /// advanced); the engine itself has moved on to a fresh 30:00 countdown.
    Expired {
        at_expiry: Snapshot,
        rollover: Rollover,
    },
}

impl TickOutcome {
    pub fn is_expired(&self) -> bool {
        matches!(self, TickOutcome::Expired { .. })
    }
}

/// Pomodoro state machine
#[derive(Debug, Clone, Default)]
pub struct TimerEngine {
    countdown: Countdown,
    running: bool,
    round: RoundProgress,
    goal: GoalProgress,
}

impl TimerEngine {
    /// Create an engine at 30:00, paused, round 0/4, goal 0/12
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a paused engine with a fresh countdown and the given progress
    pub fn with_progress(round: RoundProgress, goal: GoalProgress) -> Self {
        Self {
            round,
            goal,
            ..Self::default()
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            countdown: self.countdown,
            running: self.running,
            round: self.round,
            goal: self.goal,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn phase(&self) -> Phase {
        if self.countdown.is_zero() {
            Phase::Expired
        } else if self.running {
            Phase::Running
        } else {
            Phase::Idle
        }
    }

    /// Flip between running and paused.
    ///
    /// A spent countdown is refilled before starting. Pausing never rolls over.
    pub fn toggle_run(&mut self) -> Snapshot {
        if self.countdown.is_zero() {
            self.countdown = Countdown::full();
        }
        self.running = !self.running;
        info!(
            "Timer {} at {}",
            if self.running { "started" } else { "paused" },
            self.countdown
        );
        self.snapshot()
    }

    /// Advance time by one second
    pub fn tick(&mut self) -> TickOutcome {
        if !self.running {
            debug!("Tick delivered while paused, ignoring");
            return TickOutcome::Ignored;
        }

        self.countdown.decrement();
        if !self.countdown.is_zero() {
            debug!("Tick: {} remaining", self.countdown);
            return TickOutcome::Ticked(self.snapshot());
        }

        self.running = false;
        let rollover = self.roll_over();
        let at_expiry = self.snapshot();
        self.countdown = Countdown::full();

        info!(
            "Round expired: round {}, goal {} (wrapped={}, goal_advanced={})",
            self.round, self.goal, rollover.round_wrapped, rollover.goal_advanced
        );
        TickOutcome::Expired { at_expiry, rollover }
    }

    /// Abandon the current round: refill the countdown and pause, keeping progress
    pub fn reset(&mut self) -> Snapshot {
        self.countdown = Countdown::full();
        self.running = false;
        info!("Timer reset to {}", self.countdown);
        self.snapshot()
    }

    fn roll_over(&mut self) -> Rollover {
        let round_wrapped = self.round.advance();
        let goal_advanced = round_wrapped && self.goal.advance();
        Rollover {
            round_wrapped,
            goal_advanced,
        }
    }
}
