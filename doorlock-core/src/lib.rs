//! Board-agnostic core logic for the door-lock nodes
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Collaborator traits (actuator, status indicator, keypad, display, feedback)
//! - Configuration types and the persisted record layout
//! - Control node: command protocol engine
//! - HMI node: link client and session orchestration
//!
//! Both nodes run a single blocking thread of control. All state is owned
//! by an [`engine::Engine`] or a [`session::Session`] value, so several
//! instances can be exercised side by side in tests.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

// This mod MUST go first, so that the others see its macros.
#[macro_use]
mod fmt;

pub mod config;
pub mod engine;
pub mod session;
pub mod traits;

#[cfg(test)]
mod testing;
