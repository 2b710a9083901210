//! Countdown value for the current round

use std::fmt;
use serde::Serialize;

/// Length of a round in minutes
pub const DEFAULT_MINUTES: u32 = 30;

/// Time left in the current round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Countdown {
    minutes: u32,
    seconds: u8,
}

impl Countdown {
    /// Create a countdown, rejecting a seconds component above 59
    pub fn new(minutes: u32, seconds: u8) -> Option<Self> {
        if seconds > 59 {
            return None;
        }
        Some(Self { minutes, seconds })
    }

    /// Full round duration (30:00)
    pub fn full() -> Self {
        Self {
            minutes: DEFAULT_MINUTES,
            seconds: 0,
        }
    }

    pub fn minutes(&self) -> u32 {
        self.minutes
    }

    pub fn seconds(&self) -> u8 {
        self.seconds
    }

    /// Total remaining time in seconds
    pub fn total_seconds(&self) -> u64 {
        u64::from(self.minutes) * 60 + u64::from(self.seconds)
    }

    /// Check if the countdown has run out
    pub fn is_zero(&self) -> bool {
        self.minutes == 0 && self.seconds == 0
    }

    /// Step down by one second, borrowing a minute when the seconds are spent.
    ///
    /// Returns `false` (and leaves the value untouched) when already at 0:00.
    pub fn decrement(&mut self) -> bool {
        if self.seconds > 0 {
            self.seconds -= 1;
        } else if self.minutes > 0 {
            self.minutes -= 1;
            self.seconds = 59;
        } else {
            return false;
        }
        true
    }
}

impl Default for Countdown {
    fn default() -> Self {
        Self::full()
    }
}

impl fmt::Display for Countdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.minutes, self.seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_thirty_minutes() {
        let countdown = Countdown::default();
        assert_eq!(countdown.minutes(), 30);
        assert_eq!(countdown.seconds(), 0);
        assert_eq!(countdown.total_seconds(), 1800);
    }

    #[test]
    fn test_new_rejects_out_of_range_seconds() {
        assert!(Countdown::new(1, 60).is_none());
        assert_eq!(Countdown::new(1, 59).map(|c| c.total_seconds()), Some(119));
    }

    #[test]
    fn test_decrement_borrows_minute() {
        let mut countdown = Countdown::new(2, 0).unwrap();
        assert!(countdown.decrement());
        assert_eq!(countdown, Countdown::new(1, 59).unwrap());
    }

    #[test]
    fn test_decrement_stops_at_zero() {
        let mut countdown = Countdown::new(0, 1).unwrap();
        assert!(countdown.decrement());
        assert!(countdown.is_zero());
        assert!(!countdown.decrement());
        assert!(countdown.is_zero());
    }

    #[test]
    fn test_display_is_zero_padded() {
        assert_eq!(Countdown::new(5, 7).unwrap().to_string(), "05:07");
        assert_eq!(Countdown::full().to_string(), "30:00");
    }
}
