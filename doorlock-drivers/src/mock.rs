//! Test doubles for `embedded-hal` pins and delays

use std::vec::Vec;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{Error, ErrorKind, ErrorType, OutputPin};

#[derive(Debug)]
pub struct MockPinError;

impl Error for MockPinError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

/// Output pin recording every level it is set to
#[derive(Debug, Default)]
pub struct MockPin {
    history: Vec<bool>,
    failing: bool,
}

impl MockPin {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pin whose every write fails
    pub fn failing() -> Self {
        Self {
            history: Vec::new(),
            failing: true,
        }
    }

    pub fn history(&self) -> &[bool] {
        &self.history
    }

    pub fn is_high(&self) -> bool {
        self.history.last().copied().unwrap_or(false)
    }

    fn set(&mut self, high: bool) -> Result<(), MockPinError> {
        if self.failing {
            return Err(MockPinError);
        }
        self.history.push(high);
        Ok(())
    }
}

impl ErrorType for MockPin {
    type Error = MockPinError;
}

impl OutputPin for MockPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.set(false)
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.set(true)
    }
}

/// Delay that only adds up the requested time
#[derive(Debug, Default)]
pub struct MockDelay {
    total_ns: u64,
}

impl MockDelay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total_ms(&self) -> u64 {
        self.total_ns / 1_000_000
    }
}

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.total_ns += u64::from(ns);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.total_ns += u64::from(ms) * 1_000_000;
    }
}
