//! Monotonic time source
//!
//! A periodic tick provides millisecond timestamps. Nothing here sleeps:
//! timeout-bounded waits compare against a [`Deadline`] instead of spinning
//! on a fixed loop count.

/// Monotonic millisecond clock
pub trait Clock {
    /// Milliseconds since an arbitrary, fixed origin
    fn now_ms(&self) -> u64;
}

impl<T: Clock + ?Sized> Clock for &T {
    fn now_ms(&self) -> u64 {
        T::now_ms(self)
    }
}

/// Point in time after which a wait is abandoned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Deadline {
    at_ms: u64,
}

impl Deadline {
    /// Deadline `timeout_ms` from now
    pub fn after<C: Clock + ?Sized>(clock: &C, timeout_ms: u32) -> Self {
        Self {
            at_ms: clock.now_ms().saturating_add(u64::from(timeout_ms)),
        }
    }

    /// Check whether the deadline has passed
    pub fn expired<C: Clock + ?Sized>(&self, clock: &C) -> bool {
        clock.now_ms() >= self.at_ms
    }

    /// Milliseconds left before the deadline (zero once expired)
    pub fn remaining_ms<C: Clock + ?Sized>(&self, clock: &C) -> u64 {
        self.at_ms.saturating_sub(clock.now_ms())
    }
}
