//! Control node protocol engine
//!
//! The engine owns the configuration store, the latch actuator and the
//! in-memory configuration mirror. It consumes request bytes one at a time
//! and answers each completed request with at most one reply byte.
//!
//! ```text
//! link RX ──► RequestParser ──► handle() ──► Reply ──► link TX
//!                                   │
//!                      ┌────────────┴────────────┐
//!                      ▼                         ▼
//!                 ConfigStore                 Actuator
//! ```
//!
//! The mirror only changes after the store has accepted the new
//! configuration, so a persistence failure leaves both in agreement.

mod handlers;

use doorlock_hal::{Uart, WordStorage};
use doorlock_protocol::{Reply, RequestParser};

use crate::config::{ConfigStore, Configuration};
use crate::fmt::Debug2Format;
use crate::traits::{Actuator, Indicator, NoIndicator};

/// Behaviour switches for the Control node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EngineConfig {
    /// Reply `'K'` (or `'E'`) once an open or lock run has finished
    pub acknowledge_motion: bool,
    /// Reply `'?'` to unrecognized command bytes instead of ignoring them
    pub reject_unknown: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            acknowledge_motion: true,
            reject_unknown: true,
        }
    }
}

impl EngineConfig {
    /// Stay silent on motion commands and unknown bytes
    pub const fn silent() -> Self {
        Self {
            acknowledge_motion: false,
            reject_unknown: false,
        }
    }
}

/// Flashes of the status indicator when the node starts serving
pub const READY_BLINKS: u8 = 3;

/// Control node state
pub struct Engine<S, A, I = NoIndicator> {
    store: ConfigStore<S>,
    actuator: A,
    indicator: I,
    config: Configuration,
    parser: RequestParser,
    options: EngineConfig,
}

impl<S: WordStorage, A: Actuator> Engine<S, A> {
    /// Create an engine, loading the persisted configuration once
    ///
    /// A missing record, or one that cannot be read, starts the node with
    /// the default (uninitialized) configuration.
    pub fn new(store: ConfigStore<S>, actuator: A, options: EngineConfig) -> Self {
        let mut store = store;
        let config = match store.load() {
            Ok(Some(config)) => {
                info!(
                    "configuration loaded: initialized={}, timeout={}s",
                    config.initialized,
                    config.timeout_seconds
                );
                config
            }
            Ok(None) => {
                info!("no stored configuration, using defaults");
                Configuration::default()
            }
            Err(e) => {
                error!("configuration load failed: {:?}", Debug2Format(&e));
                Configuration::default()
            }
        };

        Self {
            store,
            actuator,
            indicator: NoIndicator,
            config,
            parser: RequestParser::new(),
            options,
        }
    }
}

impl<S: WordStorage, A: Actuator, I: Indicator> Engine<S, A, I> {
    /// Report activity on a status indicator
    pub fn with_indicator<J: Indicator>(self, indicator: J) -> Engine<S, A, J> {
        Engine {
            store: self.store,
            actuator: self.actuator,
            indicator,
            config: self.config,
            parser: self.parser,
            options: self.options,
        }
    }

    /// Current in-memory configuration
    pub fn configuration(&self) -> &Configuration {
        &self.config
    }

    /// Configuration store, for inspection
    pub fn store(&self) -> &ConfigStore<S> {
        &self.store
    }

    /// Actuator, for inspection
    pub fn actuator(&self) -> &A {
        &self.actuator
    }

    /// Status indicator, for inspection
    pub fn indicator(&self) -> &I {
        &self.indicator
    }

    /// Take the engine apart
    pub fn into_parts(self) -> (ConfigStore<S>, A) {
        (self.store, self.actuator)
    }

    /// Feed one received byte
    ///
    /// Returns the reply once the byte completes a request that has one.
    pub fn feed(&mut self, byte: u8) -> Option<Reply> {
        let request = self.parser.feed(byte)?;
        self.handle(request)
    }

    /// Drop any partially received request
    pub fn resync(&mut self) {
        if !self.parser.is_idle() {
            debug!("discarding partial request");
        }
        self.parser.reset();
    }

    /// Receive one byte from `link` and send the reply, if any
    pub fn poll<L: Uart>(&mut self, link: &mut L) -> Result<Option<Reply>, L::Error> {
        let byte = link.read_byte()?;
        let reply = self.feed(byte);
        if let Some(reply) = reply {
            link.write_byte(reply.to_byte())?;
            link.flush()?;
        }
        Ok(reply)
    }

    /// Signal that the node is about to serve requests
    pub fn announce(&mut self) {
        info!("control node ready");
        self.indicator.blink(READY_BLINKS);
    }

    /// Serve requests from `link` forever
    ///
    /// Link errors are logged and drop any partial request; service then
    /// continues with the next byte.
    pub fn run<L: Uart>(&mut self, link: &mut L) -> ! {
        self.announce();
        loop {
            if let Err(e) = self.poll(link) {
                warn!("link error: {:?}", Debug2Format(&e));
                self.resync();
            }
        }
    }
}
