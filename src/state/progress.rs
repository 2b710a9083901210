//! Round and goal counters

use std::fmt;
use serde::{ser::SerializeStruct, Serialize, Serializer};

/// Rounds completed before the goal counter advances
pub const ROUNDS_PER_GOAL: u8 = 4;
/// Cap on the goal counter
pub const GOAL_TOTAL: u8 = 12;

/// Completed rounds within the current goal cycle.
///
/// `current` stays below `ROUNDS_PER_GOAL`: reaching the total wraps back to 0
/// in the same call, so a full count is never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RoundProgress {
    current: u8,
}

impl RoundProgress {
    /// Create round progress, rejecting values that would already have wrapped
    pub fn new(current: u8) -> Option<Self> {
        (current < ROUNDS_PER_GOAL).then_some(Self { current })
    }

    pub fn current(&self) -> u8 {
        self.current
    }

    pub fn total(&self) -> u8 {
        ROUNDS_PER_GOAL
    }

    /// Record a completed round. Returns `true` when the counter wrapped to 0.
    pub fn advance(&mut self) -> bool {
        let next = self.current + 1;
        if next >= ROUNDS_PER_GOAL {
            self.current = 0;
            true
        } else {
            self.current = next;
            false
        }
    }
}

/// Completed goals, saturating at `GOAL_TOTAL`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GoalProgress {
    current: u8,
}

impl GoalProgress {
    /// Create goal progress, rejecting values above the cap
    pub fn new(current: u8) -> Option<Self> {
        (current <= GOAL_TOTAL).then_some(Self { current })
    }

    pub fn current(&self) -> u8 {
        self.current
    }

    pub fn total(&self) -> u8 {
        GOAL_TOTAL
    }

    pub fn is_complete(&self) -> bool {
        self.current == GOAL_TOTAL
    }

    /// Count one more goal. Returns `false` if the cap was already reached.
    pub fn advance(&mut self) -> bool {
        if self.is_complete() {
            return false;
        }
        self.current += 1;
        true
    }
}

fn serialize_progress<S: Serializer>(
    serializer: S,
    name: &'static str,
    current: u8,
    total: u8,
) -> Result<S::Ok, S::Error> {
    let mut state = serializer.serialize_struct(name, 2)?;
    state.serialize_field("current", &current)?;
    state.serialize_field("total", &total)?;
    state.end()
}

impl Serialize for RoundProgress {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_progress(serializer, "RoundProgress", self.current, self.total())
    }
}

impl Serialize for GoalProgress {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_progress(serializer, "GoalProgress", self.current, self.total())
    }
}

impl fmt::Display for RoundProgress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.current, self.total())
    }
}

impl fmt::Display for GoalProgress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.current, self.total())
    }
}
