//! Persisted record layout
//!
//! Five consecutive 32-bit words:
//!
//! | Word | Contents                                        |
//! |------|-------------------------------------------------|
//! | 0    | validity tag, [`RECORD_MAGIC`] when valid       |
//! | 1    | initialized flag (1 = true, anything else false)|
//! | 2    | timeout seconds in the low byte                 |
//! | 3    | credential bytes 0..=3, little-endian           |
//! | 4    | credential byte 4 in the low byte               |

use doorlock_protocol::{Credential, CREDENTIAL_LEN};

use super::Configuration;

/// Tag value marking a valid record
pub const RECORD_MAGIC: u32 = 0xA5A5_C0DE;

/// Tag value written to invalidate a record
pub const RECORD_INVALID: u32 = 0;

/// Number of words in a record
pub const RECORD_WORDS: usize = 5;

// Word offsets within the record
pub const OFFSET_TAG: usize = 0;
pub const OFFSET_INITIALIZED: usize = 1;
pub const OFFSET_TIMEOUT: usize = 2;
pub const OFFSET_CREDENTIAL_LOW: usize = 3;
pub const OFFSET_CREDENTIAL_HIGH: usize = 4;

/// Raw record words
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PersistedRecord {
    pub words: [u32; RECORD_WORDS],
}

impl PersistedRecord {
    /// Lay out a configuration as record words, tag included
    ///
    /// The timeout is clamped before it is stored.
    pub fn encode(config: &Configuration) -> Self {
        let config = config.normalized();
        let c = config.credential.as_bytes();

        let mut words = [0u32; RECORD_WORDS];
        words[OFFSET_TAG] = RECORD_MAGIC;
        words[OFFSET_INITIALIZED] = u32::from(config.initialized);
        words[OFFSET_TIMEOUT] = u32::from(config.timeout_seconds);
        words[OFFSET_CREDENTIAL_LOW] = u32::from_le_bytes([c[0], c[1], c[2], c[3]]);
        words[OFFSET_CREDENTIAL_HIGH] = u32::from(c[4]);
        Self { words }
    }

    /// Whether the tag marks the record as valid
    pub fn is_valid(&self) -> bool {
        self.words[OFFSET_TAG] == RECORD_MAGIC
    }

    /// Interpret the words as a configuration
    ///
    /// Returns `None` when the tag is wrong or the stored credential is not
    /// five digits. The timeout comes back clamped.
    pub fn decode(&self) -> Option<Configuration> {
        if !self.is_valid() {
            return None;
        }

        let low = self.words[OFFSET_CREDENTIAL_LOW].to_le_bytes();
        let high = self.words[OFFSET_CREDENTIAL_HIGH].to_le_bytes()[0];
        let bytes: [u8; CREDENTIAL_LEN] = [low[0], low[1], low[2], low[3], high];
        let credential = Credential::new(bytes).ok()?;

        let timeout = self.words[OFFSET_TIMEOUT].to_le_bytes()[0];

        Some(
            Configuration {
                credential,
                timeout_seconds: timeout,
                initialized: self.words[OFFSET_INITIALIZED] == 1,
            }
            .normalized(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provisioned(digits: &[u8; 5], timeout: u8) -> Configuration {
        Configuration::default()
            .with_credential(Credential::new(*digits).unwrap())
            .with_timeout(timeout)
    }

    #[test]
    fn test_encode_layout() {
        let record = PersistedRecord::encode(&provisioned(b"13579", 12));
        assert_eq!(record.words[0], RECORD_MAGIC);
        assert_eq!(record.words[1], 1);
        assert_eq!(record.words[2], 12);
        assert_eq!(record.words[3], u32::from_le_bytes(*b"1357"));
        assert_eq!(record.words[4], u32::from(b'9'));
    }

    #[test]
    fn test_decode_encoded() {
        let config = provisioned(b"00042", 30);
        assert_eq!(PersistedRecord::encode(&config).decode(), Some(config));
    }

    #[test]
    fn test_bad_tag_is_absent() {
        let mut record = PersistedRecord::encode(&provisioned(b"11111", 10));
        record.words[OFFSET_TAG] = RECORD_INVALID;
        assert_eq!(record.decode(), None);

        let erased = PersistedRecord { words: [0xFFFF_FFFF; RECORD_WORDS] };
        assert_eq!(erased.decode(), None);
    }

    #[test]
    fn test_non_digit_credential_is_absent() {
        let mut record = PersistedRecord::encode(&provisioned(b"11111", 10));
        record.words[OFFSET_CREDENTIAL_HIGH] = 0xFF;
        assert_eq!(record.decode(), None);
    }

    #[test]
    fn test_decode_clamps_timeout_and_reads_low_byte() {
        let mut record = PersistedRecord::encode(&provisioned(b"11111", 10));
        record.words[OFFSET_TIMEOUT] = 0x0000_0102;
        assert_eq!(record.decode().unwrap().timeout_seconds, 5);

        record.words[OFFSET_TIMEOUT] = 0xFFFF_FF1E;
        assert_eq!(record.decode().unwrap().timeout_seconds, 30);
    }

    #[test]
    fn test_initialized_only_when_one() {
        let mut record = PersistedRecord::encode(&provisioned(b"11111", 10));
        record.words[OFFSET_INITIALIZED] = 2;
        assert!(!record.decode().unwrap().initialized);
        record.words[OFFSET_INITIALIZED] = 0;
        assert!(!record.decode().unwrap().initialized);
    }
}
