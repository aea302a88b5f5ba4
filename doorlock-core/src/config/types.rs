//! Control node configuration

use doorlock_protocol::{clamp_timeout, Credential, DEFAULT_TIMEOUT_SECONDS};

/// Everything the Control node remembers across power cycles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Configuration {
    /// Access credential; meaningless until `initialized` is set
    pub credential: Credential,
    /// Auto-relock timeout in seconds (5..=30)
    pub timeout_seconds: u8,
    /// Whether a credential has been provisioned
    pub initialized: bool,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            credential: Credential::default(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            initialized: false,
        }
    }
}

impl Configuration {
    /// Copy with the timeout clamped into range
    pub fn normalized(self) -> Self {
        Self {
            timeout_seconds: clamp_timeout(self.timeout_seconds),
            ..self
        }
    }

    /// Copy with a newly provisioned credential
    pub fn with_credential(self, credential: Credential) -> Self {
        Self {
            credential,
            initialized: true,
            ..self
        }
    }

    /// Copy with a new timeout, clamped into range
    pub fn with_timeout(self, seconds: u8) -> Self {
        Self {
            timeout_seconds: clamp_timeout(seconds),
            ..self
        }
    }

    /// Check a received credential
    ///
    /// Always false while uninitialized, whatever the default credential is.
    pub fn accepts(&self, candidate: &[u8; doorlock_protocol::CREDENTIAL_LEN]) -> bool {
        self.initialized && self.credential.matches(candidate)
    }
}
