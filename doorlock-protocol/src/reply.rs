//! Reply bytes sent by the Control node

// Acknowledgement bytes
pub const REPLY_YES: u8 = b'Y';
pub const REPLY_NO: u8 = b'N';
pub const REPLY_OK: u8 = b'K';
pub const REPLY_ERROR: u8 = b'E';
pub const REPLY_UNKNOWN: u8 = b'?';

// Initialized flag bytes
pub const REPLY_INITIALIZED: u8 = b'1';
pub const REPLY_UNINITIALIZED: u8 = b'0';

/// Single-letter acknowledgement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Ack {
    /// Credential accepted
    Yes,
    /// Credential rejected, or node not initialized
    No,
    /// Command carried out
    Ok,
    /// Malformed payload or persistence failure; nothing changed
    Error,
    /// Command byte not recognized
    Unknown,
}

impl Ack {
    /// Parse an acknowledgement byte
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            REPLY_YES => Some(Ack::Yes),
            REPLY_NO => Some(Ack::No),
            REPLY_OK => Some(Ack::Ok),
            REPLY_ERROR => Some(Ack::Error),
            REPLY_UNKNOWN => Some(Ack::Unknown),
            _ => None,
        }
    }

    /// Convert to wire format byte
    pub fn to_byte(self) -> u8 {
        match self {
            Ack::Yes => REPLY_YES,
            Ack::No => REPLY_NO,
            Ack::Ok => REPLY_OK,
            Ack::Error => REPLY_ERROR,
            Ack::Unknown => REPLY_UNKNOWN,
        }
    }
}

/// Complete reply to one request (always exactly one byte)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Reply {
    /// Acknowledgement letter
    Ack(Ack),
    /// Answer to query-initialized
    Initialized(bool),
    /// Answer to get-timeout: the raw seconds value
    Timeout(u8),
}

impl Reply {
    /// Convert to wire format byte
    pub fn to_byte(self) -> u8 {
        match self {
            Reply::Ack(ack) => ack.to_byte(),
            Reply::Initialized(true) => REPLY_INITIALIZED,
            Reply::Initialized(false) => REPLY_UNINITIALIZED,
            Reply::Timeout(seconds) => seconds,
        }
    }

    /// Parse the answer to query-initialized
    ///
    /// Any byte other than `'1'` or `'0'` is not an answer.
    pub fn initialized_from_byte(byte: u8) -> Option<bool> {
        match byte {
            REPLY_INITIALIZED => Some(true),
            REPLY_UNINITIALIZED => Some(false),
            _ => None,
        }
    }
}

impl From<Ack> for Reply {
    fn from(ack: Ack) -> Self {
        Reply::Ack(ack)
    }
}
