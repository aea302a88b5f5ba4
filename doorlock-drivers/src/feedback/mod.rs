//! Audible feedback implementations

pub mod buzzer;

pub use buzzer::PinBuzzer;
