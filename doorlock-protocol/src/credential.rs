//! Access credential
//!
//! A credential is exactly five ASCII decimal digits. It travels and is
//! stored in the clear and is compared byte for byte.

/// Number of bytes in a credential
pub const CREDENTIAL_LEN: usize = 5;

/// Credential the Control node holds before it is provisioned
///
/// Never accepted: verification fails while the node is uninitialized.
pub const DEFAULT_CREDENTIAL: [u8; CREDENTIAL_LEN] = *b"12345";

/// Errors when constructing a credential
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CredentialError {
    /// Input was not exactly five bytes
    InvalidLength,
    /// A byte outside `'0'..='9'`
    NonDigit,
}

/// Five-digit access code
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Credential([u8; CREDENTIAL_LEN]);

impl Credential {
    /// Validate and wrap five digit bytes
    pub fn new(bytes: [u8; CREDENTIAL_LEN]) -> Result<Self, CredentialError> {
        if bytes.iter().all(u8::is_ascii_digit) {
            Ok(Self(bytes))
        } else {
            Err(CredentialError::NonDigit)
        }
    }

    /// Validate and wrap a slice of digit bytes
    pub fn from_slice(bytes: &[u8]) -> Result<Self, CredentialError> {
        let bytes: [u8; CREDENTIAL_LEN] = bytes
            .try_into()
            .map_err(|_| CredentialError::InvalidLength)?;
        Self::new(bytes)
    }

    /// Raw digit bytes, as sent on the wire
    pub fn as_bytes(&self) -> &[u8; CREDENTIAL_LEN] {
        &self.0
    }

    /// Compare against bytes received from the link
    ///
    /// Every byte is examined regardless of where the first difference is.
    pub fn matches(&self, candidate: &[u8; CREDENTIAL_LEN]) -> bool {
        self.0
            .iter()
            .zip(candidate.iter())
            .fold(0u8, |diff, (a, b)| diff | (a ^ b))
            == 0
    }
}

impl Default for Credential {
    fn default() -> Self {
        Self(DEFAULT_CREDENTIAL)
    }
}

impl TryFrom<[u8; CREDENTIAL_LEN]> for Credential {
    type Error = CredentialError;

    fn try_from(bytes: [u8; CREDENTIAL_LEN]) -> Result<Self, Self::Error> {
        Self::new(bytes)
    }
}

// Keep the digits out of logs
impl core::fmt::Debug for Credential {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("Credential(*****)")
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Credential {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "Credential(*****)")
    }
}
