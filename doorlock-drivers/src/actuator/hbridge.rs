//! DC latch motor behind an H-bridge
//!
//! Two inputs select the direction: `IN1` high and `IN2` low drives the
//! latch open, the reverse drives it shut, both low stops the motor. A run
//! is timed rather than sensed; the motor is driven for a fixed time and
//! then stopped.
//!
//! ```ignore
//! let mut latch = HBridgeActuator::new(in1, in2, delay, HBridgeConfig::default());
//! latch.open()?;   // blocks for the whole run
//! latch.close()?;
//! ```

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{OutputPin, PinState};

use doorlock_core::traits::{Actuator, ActuatorError};

/// Motor run timing
#[derive(Debug, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HBridgeConfig {
    /// Time to drive the latch end to end (ms)
    pub run_ms: u32,
    /// Settling time after the motor is stopped (ms)
    pub brake_ms: u32,
}

impl Default for HBridgeConfig {
    fn default() -> Self {
        Self {
            run_ms: 2000,
            brake_ms: 20,
        }
    }
}

/// Last position the latch was driven to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LatchPosition {
    /// Not driven since power-up, or a run failed part-way
    Unknown,
    Open,
    Locked,
}

#[derive(Clone, Copy)]
enum Direction {
    Open,
    Close,
}

/// H-bridge latch driver
pub struct HBridgeActuator<A, B, D> {
    in1: A,
    in2: B,
    delay: D,
    config: HBridgeConfig,
    position: LatchPosition,
}

impl<A: OutputPin, B: OutputPin, D: DelayNs> HBridgeActuator<A, B, D> {
    /// Create the driver with the motor stopped
    pub fn new(in1: A, in2: B, delay: D, config: HBridgeConfig) -> Self {
        let mut actuator = Self {
            in1,
            in2,
            delay,
            config,
            position: LatchPosition::Unknown,
        };
        actuator.stop();
        actuator
    }

    /// Get the last position driven to
    pub fn position(&self) -> LatchPosition {
        self.position
    }

    /// Get the configuration
    pub fn config(&self) -> &HBridgeConfig {
        &self.config
    }

    /// Give back the pins and delay
    pub fn release(self) -> (A, B, D) {
        (self.in1, self.in2, self.delay)
    }

    fn set_inputs(&mut self, in1: bool, in2: bool) -> Result<(), ActuatorError> {
        // Lower one input before raising the other so both are never high together
        if in1 {
            self.in2.set_state(PinState::from(in2)).map_err(|_| ActuatorError::Drive)?;
            self.in1.set_state(PinState::from(in1)).map_err(|_| ActuatorError::Drive)?;
        } else {
            self.in1.set_state(PinState::from(in1)).map_err(|_| ActuatorError::Drive)?;
            self.in2.set_state(PinState::from(in2)).map_err(|_| ActuatorError::Drive)?;
        }
        Ok(())
    }

    fn run(&mut self, direction: Direction) -> Result<(), ActuatorError> {
        self.position = LatchPosition::Unknown;

        let (in1, in2) = match direction {
            Direction::Open => (true, false),
            Direction::Close => (false, true),
        };
        if let Err(e) = self.set_inputs(in1, in2) {
            self.stop();
            return Err(e);
        }
        self.delay.delay_ms(self.config.run_ms);

        self.set_inputs(false, false)?;
        self.delay.delay_ms(self.config.brake_ms);

        self.position = match direction {
            Direction::Open => LatchPosition::Open,
            Direction::Close => LatchPosition::Locked,
        };
        Ok(())
    }
}

impl<A: OutputPin, B: OutputPin, D: DelayNs> Actuator for HBridgeActuator<A, B, D> {
    fn open(&mut self) -> Result<(), ActuatorError> {
        self.run(Direction::Open)
    }

    fn close(&mut self) -> Result<(), ActuatorError> {
        self.run(Direction::Close)
    }

    fn stop(&mut self) {
        // Best effort: a pin that cannot be driven low has nothing better to fall back to
        let _ = self.in1.set_low();
        let _ = self.in2.set_low();
    }
}
