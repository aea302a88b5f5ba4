//! HMI node session
//!
//! The session owns the link client, the operator console, the
//! potentiometer, the failed-attempt counter and the cached timeout. It
//! runs the boot sequence, then serves the main menu forever:
//!
//! ```text
//! boot ──► query-initialized ─┬─ '0' ──► provisioning ──┐
//!                             └─ '1' ───────────────────┴─► get-timeout ──► menu
//!
//! menu ─┬─ Open Door        verify ──► open ──► countdown ──► lock
//!       ├─ Set Timeout      pot ──► verify + set-timeout
//!       ├─ Change Password  verify ──► provisioning
//!       └─ Reset System     verify ──► reset ──► boot
//! ```
//!
//! Every credential-gated flow allows [`MAX_ATTEMPTS`] consecutive failures
//! before a [`LOCKOUT_SECONDS`] lockout.

pub mod attempts;
pub mod client;
pub mod console;
pub mod entry;
pub mod menu;

mod flows;

use doorlock_hal::{AnalogInput, ADC_MAX};
use doorlock_protocol::{
    clamp_timeout, DEFAULT_TIMEOUT_SECONDS, MAX_TIMEOUT_SECONDS, MIN_TIMEOUT_SECONDS,
};

pub use attempts::{AttemptCounter, AttemptStatus, LOCKOUT_SECONDS, MAX_ATTEMPTS};
pub use client::{ClientError, ControlClient};
pub use console::Console;
pub use entry::{CredentialEntry, EntryStep};
pub use menu::{Menu, MenuItem};

// Message hold times
pub const MSG_SHORT_MS: u32 = 800;
pub const MSG_MEDIUM_MS: u32 = 1200;
pub const MSG_LONG_MS: u32 = 1500;

/// Back-off between boot queries
pub const BOOT_RETRY_MS: u32 = 50;

/// Keypad poll interval while the timeout is being adjusted
pub const KEY_POLL_MS: u32 = 50;

/// Potentiometer read bound; a failed read counts as zero
pub const POT_READ_TIMEOUT_MS: u32 = 200;

/// Map a potentiometer reading to a timeout
pub fn timeout_from_adc(raw: u16) -> u8 {
    let raw = u32::from(raw.min(ADC_MAX));
    let span = u32::from(MAX_TIMEOUT_SECONDS - MIN_TIMEOUT_SECONDS);
    let seconds = u32::from(MIN_TIMEOUT_SECONDS) + raw * span / u32::from(ADC_MAX);
    clamp_timeout(seconds.min(u32::from(u8::MAX)) as u8)
}

/// Why a flow ended without doing its job
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FlowError {
    /// Too many failed attempts; the lockout has already been served
    LockedOut,
    /// Control node did not answer
    NoResponse,
    /// Control node refused the request as malformed or could not store it
    Malformed,
    /// Operator backed out
    Cancelled,
}

/// Result of a menu flow
pub type FlowOutcome<T = ()> = Result<T, FlowError>;

/// HMI node state
pub struct Session<L, K, D, F, P, T> {
    client: ControlClient<L>,
    console: Console<K, D, F, T>,
    pot: P,
    attempts: AttemptCounter,
    timeout_seconds: u8,
}

impl<L, K, D, F, P: AnalogInput, T> Session<L, K, D, F, P, T> {
    pub fn new(client: ControlClient<L>, console: Console<K, D, F, T>, pot: P) -> Self {
        Self {
            client,
            console,
            pot,
            attempts: AttemptCounter::new(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
        }
    }

    /// Cached auto-relock timeout
    pub fn timeout_seconds(&self) -> u8 {
        self.timeout_seconds
    }

    pub fn attempts(&self) -> &AttemptCounter {
        &self.attempts
    }

    pub fn client(&self) -> &ControlClient<L> {
        &self.client
    }

    pub fn client_mut(&mut self) -> &mut ControlClient<L> {
        &mut self.client
    }

    pub fn console(&self) -> &Console<K, D, F, T> {
        &self.console
    }

    /// Sample the potentiometer as a timeout
    pub fn read_pot_timeout(&mut self) -> u8 {
        let raw = self.pot.read_timeout(POT_READ_TIMEOUT_MS).unwrap_or(0);
        timeout_from_adc(raw)
    }
}
