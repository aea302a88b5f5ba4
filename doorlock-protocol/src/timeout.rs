//! Auto-relock timeout values and their wire encodings
//!
//! The timeout travels either as two ASCII digits (`"07"`) or, on the bare
//! set-timeout command only, as a single raw byte. Raw values in range
//! (5..=30) never collide with the ASCII digits (0x30..=0x39), which is how
//! the receiver tells the two apart.

/// Shortest allowed auto-relock timeout
pub const MIN_TIMEOUT_SECONDS: u8 = 5;

/// Longest allowed auto-relock timeout
pub const MAX_TIMEOUT_SECONDS: u8 = 30;

/// Timeout used before anything is configured
pub const DEFAULT_TIMEOUT_SECONDS: u8 = 10;

/// Clamp a requested timeout into the allowed range
pub const fn clamp_timeout(seconds: u8) -> u8 {
    if seconds < MIN_TIMEOUT_SECONDS {
        MIN_TIMEOUT_SECONDS
    } else if seconds > MAX_TIMEOUT_SECONDS {
        MAX_TIMEOUT_SECONDS
    } else {
        seconds
    }
}

/// Decode two ASCII digits, most significant first
///
/// Returns `None` if either byte is not `'0'..='9'`.
pub fn parse_digits(digits: [u8; 2]) -> Option<u8> {
    let [tens, ones] = digits;
    if tens.is_ascii_digit() && ones.is_ascii_digit() {
        Some((tens - b'0') * 10 + (ones - b'0'))
    } else {
        None
    }
}

/// Encode a value as two ASCII digits
///
/// Values above 99 keep only their last two digits.
pub fn encode_digits(seconds: u8) -> [u8; 2] {
    let value = seconds % 100;
    [b'0' + value / 10, b'0' + value % 10]
}

/// Timeout payload of the bare set-timeout command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimeoutValue {
    /// Two ASCII digit bytes
    Digits([u8; 2]),
    /// One raw byte holding the seconds value
    Raw(u8),
}

impl TimeoutValue {
    /// Requested seconds, before clamping
    ///
    /// `None` when the digit form contains a non-digit byte.
    pub fn seconds(&self) -> Option<u8> {
        match *self {
            TimeoutValue::Digits(digits) => parse_digits(digits),
            TimeoutValue::Raw(value) => Some(value),
        }
    }
}
