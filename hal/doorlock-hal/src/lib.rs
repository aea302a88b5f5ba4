//! Doorlock Hardware Access Layer
//!
//! This crate defines the thin hardware-access traits both nodes are built
//! on. Chip support crates implement them; the protocol engine and the HMI
//! session only ever see these traits.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────┐        ┌──────────────────────┐
//! │  HMI node (session)  │        │ Control node (engine)│
//! └──────────────────────┘        └──────────────────────┘
//!            │                               │
//!            ▼                               ▼
//! ┌─────────────────────────────────────────────────────┐
//! │  doorlock-hal (this crate - traits)                 │
//! └─────────────────────────────────────────────────────┘
//!            │                               │
//!            ▼                               ▼
//!      UART, ADC, clock             UART, EEPROM, clock
//! ```
//!
//! # Traits
//!
//! - [`uart::UartTx`], [`uart::UartRx`] - Serial byte link
//! - [`eeprom::WordStorage`] - Word-addressed persistent storage
//! - [`adc::AnalogInput`] - Analog sampling (0..=4095)
//! - [`clock::Clock`] - Monotonic millisecond timestamps

#![no_std]
#![deny(unsafe_code)]

pub mod adc;
pub mod clock;
pub mod eeprom;
pub mod uart;

// Re-export key traits at crate root for convenience
pub use adc::{AnalogInput, ADC_MAX};
pub use clock::{Clock, Deadline};
pub use eeprom::{EepromError, RamEeprom, WordStorage, ERASED_WORD};
pub use uart::{ErrorType, SerialError, SerialPort, Uart, UartConfig, UartRx, UartTx};
