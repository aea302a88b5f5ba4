//! Latch actuator implementations

pub mod hbridge;

pub use hbridge::{HBridgeActuator, HBridgeConfig, LatchPosition};
