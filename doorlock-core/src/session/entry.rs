//! Masked credential entry

use heapless::Vec;

use doorlock_protocol::{Credential, CREDENTIAL_LEN};

use crate::traits::Key;

/// Result of one key press during entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EntryStep {
    /// Key ignored
    Ignored,
    /// Digit accepted; echo one mask character
    Echo,
    /// Buffer emptied by the user
    Cleared,
    /// Submitted with fewer than five digits; buffer emptied
    TooShort,
    /// Five digits submitted
    Complete(Credential),
}

/// Digit buffer for one credential
#[derive(Debug, Clone, Default)]
pub struct CredentialEntry {
    digits: Vec<u8, CREDENTIAL_LEN>,
}

impl CredentialEntry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Digits entered so far
    pub fn len(&self) -> usize {
        self.digits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.digits.is_empty()
    }

    /// Apply a key press
    pub fn handle(&mut self, key: Key) -> EntryStep {
        match key {
            Key::Digit(byte) => match self.digits.push(byte) {
                Ok(()) => EntryStep::Echo,
                Err(_) => EntryStep::Ignored,
            },
            Key::Clear => {
                self.digits.clear();
                EntryStep::Cleared
            }
            Key::Enter => {
                let step = match Credential::from_slice(&self.digits) {
                    Ok(credential) => EntryStep::Complete(credential),
                    Err(_) => EntryStep::TooShort,
                };
                self.digits.clear();
                step
            }
            _ => EntryStep::Ignored,
        }
    }
}
