//! Doorlock Link Protocol
//!
//! This crate defines the byte protocol between the HMI node (the only
//! initiator) and the Control node (a purely reactive server) over a
//! point-to-point UART.
//!
//! # Protocol Overview
//!
//! Every exchange is a single command byte, a command-specific fixed-length
//! payload, then a command-specific fixed-length reply:
//! ```text
//! ┌─────────┬──────────────────┐        ┌────────────┐
//! │ COMMAND │ PAYLOAD          │  ───▶  │ REPLY      │
//! │ 1B      │ 0, 1, 2, 5 or 7B │  ◀───  │ 0B or 1B   │
//! └─────────┴──────────────────┘        └────────────┘
//! ```
//!
//! There are no length prefixes, delimiters, or checksums. Correctness
//! depends on both ends producing and consuming exactly the byte counts in
//! [`Command::payload_len`].

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod command;
pub mod credential;
pub mod reply;
pub mod timeout;

pub use command::{
    Command, ProtocolError, Request, RequestParser, MAX_PAYLOAD_LEN, MAX_REQUEST_LEN,
};
pub use credential::{Credential, CredentialError, CREDENTIAL_LEN, DEFAULT_CREDENTIAL};
pub use reply::{Ack, Reply};
pub use timeout::{
    clamp_timeout, encode_digits, parse_digits, TimeoutValue, DEFAULT_TIMEOUT_SECONDS,
    MAX_TIMEOUT_SECONDS, MIN_TIMEOUT_SECONDS,
};
