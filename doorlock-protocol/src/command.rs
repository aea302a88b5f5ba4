//! Commands, requests, and the request parser
//!
//! A request is a command byte followed by its fixed payload:
//!
//! | Command | Byte | Payload |
//! |---|---|---|
//! | query-initialized | `I` | none |
//! | verify-credential | `V` | 5 credential bytes |
//! | set-credential | `N` | 5 credential bytes |
//! | get-timeout | `G` | none |
//! | set-timeout-with-credential | `S` | 5 credential bytes + 2 ASCII digits |
//! | set-timeout-bare | `T` | 2 ASCII digits, or 1 raw byte |
//! | reset | `R` | none |
//! | open | `O` | none |
//! | lock | `L` | none |

use heapless::Vec;

use crate::credential::{Credential, CREDENTIAL_LEN};
use crate::timeout::{encode_digits, TimeoutValue};

// Command bytes: HMI → Control
pub const CMD_QUERY_INITIALIZED: u8 = b'I';
pub const CMD_VERIFY_CREDENTIAL: u8 = b'V';
pub const CMD_SET_CREDENTIAL: u8 = b'N';
pub const CMD_GET_TIMEOUT: u8 = b'G';
pub const CMD_SET_TIMEOUT_WITH_CREDENTIAL: u8 = b'S';
pub const CMD_SET_TIMEOUT_BARE: u8 = b'T';
pub const CMD_RESET: u8 = b'R';
pub const CMD_OPEN: u8 = b'O';
pub const CMD_LOCK: u8 = b'L';

/// Longest payload of any command
pub const MAX_PAYLOAD_LEN: usize = CREDENTIAL_LEN + 2;

/// Longest complete request (command byte + payload)
pub const MAX_REQUEST_LEN: usize = 1 + MAX_PAYLOAD_LEN;

/// Errors when encoding requests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ProtocolError {
    /// Buffer too small for encoding
    BufferTooSmall,
}

/// Command set understood by the Control node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// Ask whether a credential has been provisioned
    QueryInitialized,
    /// Check a credential
    VerifyCredential,
    /// Provision or replace the credential
    SetCredential,
    /// Read the stored auto-relock timeout
    GetTimeout,
    /// Change the timeout, authorized by the credential
    SetTimeoutWithCredential,
    /// Change the timeout without a credential check
    SetTimeoutBare,
    /// Forget the credential and timeout
    Reset,
    /// Drive the actuator to the unlocked position
    Open,
    /// Drive the actuator to the locked position
    Lock,
}

impl Command {
    /// Parse a command from its wire format byte
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            CMD_QUERY_INITIALIZED => Some(Command::QueryInitialized),
            CMD_VERIFY_CREDENTIAL => Some(Command::VerifyCredential),
            CMD_SET_CREDENTIAL => Some(Command::SetCredential),
            CMD_GET_TIMEOUT => Some(Command::GetTimeout),
            CMD_SET_TIMEOUT_WITH_CREDENTIAL => Some(Command::SetTimeoutWithCredential),
            CMD_SET_TIMEOUT_BARE => Some(Command::SetTimeoutBare),
            CMD_RESET => Some(Command::Reset),
            CMD_OPEN => Some(Command::Open),
            CMD_LOCK => Some(Command::Lock),
            _ => None,
        }
    }

    /// Convert to wire format byte
    pub fn to_byte(self) -> u8 {
        match self {
            Command::QueryInitialized => CMD_QUERY_INITIALIZED,
            Command::VerifyCredential => CMD_VERIFY_CREDENTIAL,
            Command::SetCredential => CMD_SET_CREDENTIAL,
            Command::GetTimeout => CMD_GET_TIMEOUT,
            Command::SetTimeoutWithCredential => CMD_SET_TIMEOUT_WITH_CREDENTIAL,
            Command::SetTimeoutBare => CMD_SET_TIMEOUT_BARE,
            Command::Reset => CMD_RESET,
            Command::Open => CMD_OPEN,
            Command::Lock => CMD_LOCK,
        }
    }

    /// Payload bytes that follow the command byte
    ///
    /// For the bare set-timeout command this is the minimum; a leading
    /// ASCII digit means one more digit follows.
    pub fn payload_len(self) -> usize {
        match self {
            Command::QueryInitialized
            | Command::GetTimeout
            | Command::Reset
            | Command::Open
            | Command::Lock => 0,
            Command::VerifyCredential | Command::SetCredential => CREDENTIAL_LEN,
            Command::SetTimeoutWithCredential => CREDENTIAL_LEN + 2,
            Command::SetTimeoutBare => 1,
        }
    }
}

/// A complete request with its payload
///
/// Credential bytes are kept exactly as received; validating them is the
/// handler's job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Request {
    QueryInitialized,
    VerifyCredential([u8; CREDENTIAL_LEN]),
    SetCredential([u8; CREDENTIAL_LEN]),
    GetTimeout,
    SetTimeoutWithCredential {
        credential: [u8; CREDENTIAL_LEN],
        digits: [u8; 2],
    },
    SetTimeoutBare(TimeoutValue),
    Reset,
    Open,
    Lock,
    /// Byte that is not a command
    Unknown(u8),
}

impl Request {
    /// Verify-credential request
    pub fn verify(credential: &Credential) -> Self {
        Request::VerifyCredential(*credential.as_bytes())
    }

    /// Set-credential request
    pub fn set_credential(credential: &Credential) -> Self {
        Request::SetCredential(*credential.as_bytes())
    }

    /// Set-timeout request authorized by `credential`
    pub fn set_timeout(credential: &Credential, seconds: u8) -> Self {
        Request::SetTimeoutWithCredential {
            credential: *credential.as_bytes(),
            digits: encode_digits(seconds),
        }
    }

    /// Command this request carries, `None` for unknown bytes
    pub fn command(&self) -> Option<Command> {
        match self {
            Request::QueryInitialized => Some(Command::QueryInitialized),
            Request::VerifyCredential(_) => Some(Command::VerifyCredential),
            Request::SetCredential(_) => Some(Command::SetCredential),
            Request::GetTimeout => Some(Command::GetTimeout),
            Request::SetTimeoutWithCredential { .. } => Some(Command::SetTimeoutWithCredential),
            Request::SetTimeoutBare(_) => Some(Command::SetTimeoutBare),
            Request::Reset => Some(Command::Reset),
            Request::Open => Some(Command::Open),
            Request::Lock => Some(Command::Lock),
            Request::Unknown(_) => None,
        }
    }

    /// Encode this request into a byte buffer
    ///
    /// Returns the number of bytes written
    pub fn encode(&self, buffer: &mut [u8]) -> Result<usize, ProtocolError> {
        let mut out = Vec::<u8, MAX_REQUEST_LEN>::new();
        let lead = match self {
            Request::Unknown(byte) => *byte,
            _ => self.command().map_or(0, Command::to_byte),
        };
        out.push(lead).map_err(|_| ProtocolError::BufferTooSmall)?;

        match self {
            Request::VerifyCredential(credential) | Request::SetCredential(credential) => {
                out.extend_from_slice(credential)
                    .map_err(|_| ProtocolError::BufferTooSmall)?;
            }
            Request::SetTimeoutWithCredential { credential, digits } => {
                out.extend_from_slice(credential)
                    .map_err(|_| ProtocolError::BufferTooSmall)?;
                out.extend_from_slice(digits)
                    .map_err(|_| ProtocolError::BufferTooSmall)?;
            }
            Request::SetTimeoutBare(TimeoutValue::Digits(digits)) => {
                out.extend_from_slice(digits)
                    .map_err(|_| ProtocolError::BufferTooSmall)?;
            }
            Request::SetTimeoutBare(TimeoutValue::Raw(value)) => {
                out.push(*value).map_err(|_| ProtocolError::BufferTooSmall)?;
            }
            _ => {}
        }

        if buffer.len() < out.len() {
            return Err(ProtocolError::BufferTooSmall);
        }
        buffer[..out.len()].copy_from_slice(&out);
        Ok(out.len())
    }

    /// Encode this request into a heapless Vec
    pub fn encode_to_vec(&self) -> Result<Vec<u8, MAX_REQUEST_LEN>, ProtocolError> {
        let mut buffer = [0u8; MAX_REQUEST_LEN];
        let len = self.encode(&mut buffer)?;
        Vec::from_slice(&buffer[..len]).map_err(|_| ProtocolError::BufferTooSmall)
    }

    /// Build a request from a command and its complete payload
    fn from_parts(command: Command, payload: &[u8]) -> Self {
        let mut credential = [0u8; CREDENTIAL_LEN];
        match command {
            Command::QueryInitialized => Request::QueryInitialized,
            Command::VerifyCredential => {
                credential.copy_from_slice(&payload[..CREDENTIAL_LEN]);
                Request::VerifyCredential(credential)
            }
            Command::SetCredential => {
                credential.copy_from_slice(&payload[..CREDENTIAL_LEN]);
                Request::SetCredential(credential)
            }
            Command::GetTimeout => Request::GetTimeout,
            Command::SetTimeoutWithCredential => {
                credential.copy_from_slice(&payload[..CREDENTIAL_LEN]);
                Request::SetTimeoutWithCredential {
                    credential,
                    digits: [payload[CREDENTIAL_LEN], payload[CREDENTIAL_LEN + 1]],
                }
            }
            Command::SetTimeoutBare => match payload {
                [tens, ones] => Request::SetTimeoutBare(TimeoutValue::Digits([*tens, *ones])),
                _ => Request::SetTimeoutBare(TimeoutValue::Raw(payload[0])),
            },
            Command::Reset => Request::Reset,
            Command::Open => Request::Open,
            Command::Lock => Request::Lock,
        }
    }
}

/// Byte-at-a-time request parser
///
/// Collects the full payload of a command before yielding it, so a handler
/// never sees a partial request and never leaves payload bytes behind for
/// the next command to misinterpret.
#[derive(Debug, Clone)]
pub struct RequestParser {
    state: ParseState,
    buffer: Vec<u8, MAX_PAYLOAD_LEN>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseState {
    /// Waiting for a command byte
    WaitingForCommand,
    /// Reading `expected` payload bytes for `command`
    ReadingPayload { command: Command, expected: usize },
}

impl Default for RequestParser {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestParser {
    /// Create a new request parser
    pub fn new() -> Self {
        Self {
            state: ParseState::WaitingForCommand,
            buffer: Vec::new(),
        }
    }

    /// Reset the parser state, dropping any partial request
    pub fn reset(&mut self) {
        self.state = ParseState::WaitingForCommand;
        self.buffer.clear();
    }

    /// Check whether the parser is between requests
    pub fn is_idle(&self) -> bool {
        self.state == ParseState::WaitingForCommand
    }

    /// Feed a single byte to the parser
    ///
    /// Returns `Some(request)` once the request is complete, `None` while
    /// more payload bytes are needed.
    pub fn feed(&mut self, byte: u8) -> Option<Request> {
        match self.state {
            ParseState::WaitingForCommand => {
                let Some(command) = Command::from_byte(byte) else {
                    return Some(Request::Unknown(byte));
                };
                let expected = command.payload_len();
                if expected == 0 {
                    return Some(Request::from_parts(command, &[]));
                }
                self.buffer.clear();
                self.state = ParseState::ReadingPayload { command, expected };
                None
            }
            ParseState::ReadingPayload { command, expected } => {
                // Cannot fail: expected never exceeds MAX_PAYLOAD_LEN
                let _ = self.buffer.push(byte);

                // A leading digit on the bare timeout means a second digit follows
                let expected = if command == Command::SetTimeoutBare
                    && self.buffer.len() == 1
                    && byte.is_ascii_digit()
                {
                    2
                } else {
                    expected
                };

                if self.buffer.len() < expected {
                    self.state = ParseState::ReadingPayload { command, expected };
                    return None;
                }

                let request = Request::from_parts(command, &self.buffer);
                self.reset();
                Some(request)
            }
        }
    }

    /// Feed multiple bytes to the parser
    ///
    /// Returns the first complete request found, if any.
    /// Remaining bytes after a complete request are not consumed.
    pub fn feed_bytes(&mut self, bytes: &[u8]) -> Option<Request> {
        for &byte in bytes {
            if let Some(request) = self.feed(byte) {
                return Some(request);
            }
        }
        None
    }
}
