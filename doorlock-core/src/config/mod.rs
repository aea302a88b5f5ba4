//! Configuration types
//!
//! The Control node's configuration, its fixed-layout persisted record, and
//! the store that reads and writes that record through [`WordStorage`].
//!
//! [`WordStorage`]: doorlock_hal::WordStorage

pub mod record;
pub mod store;
pub mod types;

pub use record::{PersistedRecord, RECORD_MAGIC, RECORD_WORDS};
pub use store::{ConfigStore, StoreError};
pub use types::Configuration;
