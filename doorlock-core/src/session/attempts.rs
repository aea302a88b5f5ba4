//! Failed-attempt tracking
//!
//! Counts consecutive failed credential attempts within one flow. Reaching
//! the limit triggers a lockout, after which the count starts over.

/// Consecutive failures that trigger a lockout
pub const MAX_ATTEMPTS: u8 = 3;

/// Lockout duration
pub const LOCKOUT_SECONDS: u8 = 20;

/// Outcome of recording a failed attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AttemptStatus {
    /// The user may try again
    Retry {
        /// Attempts left before a lockout
        remaining: u8,
    },
    /// Limit reached; the caller must enforce the lockout
    LockedOut,
}

/// Consecutive failure counter
#[derive(Debug, Clone, Default)]
pub struct AttemptCounter {
    failures: u8,
    lockouts: u32,
}

impl AttemptCounter {
    /// Create a counter with no failures
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget failures; called on flow entry and on success
    pub fn reset(&mut self) {
        self.failures = 0;
    }

    /// Record one failed attempt
    pub fn record_failure(&mut self) -> AttemptStatus {
        self.failures = self.failures.saturating_add(1);
        if self.failures >= MAX_ATTEMPTS {
            self.failures = 0;
            self.lockouts = self.lockouts.saturating_add(1);
            AttemptStatus::LockedOut
        } else {
            AttemptStatus::Retry {
                remaining: MAX_ATTEMPTS - self.failures,
            }
        }
    }

    /// Consecutive failures so far
    pub fn failures(&self) -> u8 {
        self.failures
    }

    /// Lockouts triggered since start-up
    pub fn lockouts(&self) -> u32 {
        self.lockouts
    }
}
