//! Trailing-edge debouncing for bursty host signals.
//!
//! Time is passed in as a [`Duration`] since any fixed origin (a
//! `performance.now()` reading, a frame counter, a test clock), so the type
//! works the same on `wasm32` where `std::time::Instant` is unavailable.

use std::time::Duration;

/// Coalesces a burst of triggers into one action after a quiet period.
#[derive(Debug, Clone)]
pub struct Debouncer {
    quiet: Duration,
    last_trigger: Option<Duration>,
}

impl Debouncer {
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            last_trigger: None,
        }
    }

    pub fn quiet(&self) -> Duration {
        self.quiet
    }

    /// Records a trigger at `now`, restarting the quiet period.
    pub fn trigger(&mut self, now: Duration) {
        self.last_trigger = Some(now);
    }

    /// Returns `true` exactly once per burst, on the first poll at least
    /// `quiet` after the latest trigger.
    pub fn poll(&mut self, now: Duration) -> bool {
        match self.last_trigger {
            Some(at) if now.saturating_sub(at) >= self.quiet => {
                self.last_trigger = None;
                true
            }
            _ => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.last_trigger.is_some()
    }

    /// How long until a poll could fire, or `None` when nothing is pending.
    pub fn remaining(&self, now: Duration) -> Option<Duration> {
        self.last_trigger
            .map(|at| self.quiet.saturating_sub(now.saturating_sub(at)))
    }

    pub fn cancel(&mut self) {
        self.last_trigger = None;
    }
}
