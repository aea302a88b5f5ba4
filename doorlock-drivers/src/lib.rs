//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in doorlock-core on top of `embedded-hal` digital outputs and delays:
//!
//! - Latch actuator (DC motor behind an H-bridge)
//! - Buzzer on a GPIO pin
//! - Status LED on a GPIO pin

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod actuator;
pub mod feedback;
pub mod indicator;

#[cfg(test)]
mod mock;
