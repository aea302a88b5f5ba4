//! HMI side of the link
//!
//! Every exchange discards stale received bytes, sends one request and
//! waits a bounded time for the single reply byte. A missing reply is
//! reported as [`ClientError::NoResponse`]; the link itself is never
//! assumed to be reliable.

use doorlock_hal::Uart;
use doorlock_protocol::{clamp_timeout, Ack, Credential, Reply, Request, TimeoutValue};

use crate::fmt::Debug2Format;

// Reply wait per command, in milliseconds
pub const WAIT_QUERY_MS: u32 = 300;
pub const WAIT_GET_TIMEOUT_MS: u32 = 300;
pub const WAIT_VERIFY_MS: u32 = 400;
pub const WAIT_SET_CREDENTIAL_MS: u32 = 500;
pub const WAIT_SET_TIMEOUT_MS: u32 = 600;
pub const WAIT_RESET_MS: u32 = 500;
pub const WAIT_MOTION_MS: u32 = 3000;

/// Errors from a link exchange
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClientError {
    /// No reply within the wait bound
    NoResponse,
    /// Credential refused (`'N'`)
    Rejected,
    /// Request malformed, not persisted, or not carried out (`'E'`)
    Malformed,
    /// Reply byte that does not answer this request
    Unexpected(u8),
    /// Link driver error
    Link,
}

/// Typed requests to the Control node
pub struct ControlClient<L> {
    link: L,
}

impl<L: Uart> ControlClient<L> {
    /// Wrap a link
    pub fn new(link: L) -> Self {
        Self { link }
    }

    /// Borrow the link
    pub fn link(&self) -> &L {
        &self.link
    }

    /// Mutably borrow the link
    pub fn link_mut(&mut self) -> &mut L {
        &mut self.link
    }

    /// Ask whether a credential has been provisioned
    pub fn query_initialized(&mut self) -> Result<bool, ClientError> {
        let byte = self.exchange(&Request::QueryInitialized, WAIT_QUERY_MS)?;
        Reply::initialized_from_byte(byte).ok_or(ClientError::Unexpected(byte))
    }

    /// Check a credential
    pub fn verify(&mut self, credential: &Credential) -> Result<(), ClientError> {
        let byte = self.exchange(&Request::verify(credential), WAIT_VERIFY_MS)?;
        match Ack::from_byte(byte) {
            Some(Ack::Yes) => Ok(()),
            Some(Ack::No) => Err(ClientError::Rejected),
            _ => Err(ClientError::Unexpected(byte)),
        }
    }

    /// Provision or replace the credential
    pub fn set_credential(&mut self, credential: &Credential) -> Result<(), ClientError> {
        let byte = self.exchange(&Request::set_credential(credential), WAIT_SET_CREDENTIAL_MS)?;
        Self::expect_ok(byte)
    }

    /// Read the auto-relock timeout
    ///
    /// The value is clamped to the allowed range.
    pub fn get_timeout(&mut self) -> Result<u8, ClientError> {
        let byte = self.exchange(&Request::GetTimeout, WAIT_GET_TIMEOUT_MS)?;
        Ok(clamp_timeout(byte))
    }

    /// Change the timeout, authorized by `credential`
    pub fn set_timeout(&mut self, credential: &Credential, seconds: u8) -> Result<(), ClientError> {
        let request = Request::set_timeout(credential, seconds);
        let byte = self.exchange(&request, WAIT_SET_TIMEOUT_MS)?;
        Self::expect_ok(byte)
    }

    /// Change the timeout without a credential, as a single raw byte
    pub fn set_timeout_bare(&mut self, seconds: u8) -> Result<(), ClientError> {
        let request = Request::SetTimeoutBare(TimeoutValue::Raw(clamp_timeout(seconds)));
        let byte = self.exchange(&request, WAIT_SET_TIMEOUT_MS)?;
        Self::expect_ok(byte)
    }

    /// Erase the stored configuration
    pub fn reset(&mut self) -> Result<(), ClientError> {
        let byte = self.exchange(&Request::Reset, WAIT_RESET_MS)?;
        Self::expect_ok(byte)
    }

    /// Run the latch open
    ///
    /// Waits for the run to be acknowledged. A Control node that does not
    /// acknowledge motion stays silent, which is not an error.
    pub fn open(&mut self) -> Result<(), ClientError> {
        self.motion(&Request::Open)
    }

    /// Run the latch shut; see [`ControlClient::open`]
    pub fn lock(&mut self) -> Result<(), ClientError> {
        self.motion(&Request::Lock)
    }

    fn motion(&mut self, request: &Request) -> Result<(), ClientError> {
        self.send(request)?;
        match self.link.read_byte_timeout(WAIT_MOTION_MS).map_err(Self::link_error)? {
            None => Ok(()),
            Some(byte) => Self::expect_ok(byte),
        }
    }

    fn expect_ok(byte: u8) -> Result<(), ClientError> {
        match Ack::from_byte(byte) {
            Some(Ack::Ok) => Ok(()),
            Some(Ack::No) => Err(ClientError::Rejected),
            Some(Ack::Error) => Err(ClientError::Malformed),
            _ => Err(ClientError::Unexpected(byte)),
        }
    }

    fn send(&mut self, request: &Request) -> Result<(), ClientError> {
        let bytes = request.encode_to_vec().map_err(|_| ClientError::Link)?;

        let stale = self.link.discard_pending().map_err(Self::link_error)?;
        if stale > 0 {
            debug!("discarded {} stale bytes", stale);
        }

        self.link.write_blocking(&bytes).map_err(Self::link_error)?;
        self.link.flush().map_err(Self::link_error)
    }

    fn exchange(&mut self, request: &Request, wait_ms: u32) -> Result<u8, ClientError> {
        self.send(request)?;
        match self.link.read_byte_timeout(wait_ms).map_err(Self::link_error)? {
            Some(byte) => Ok(byte),
            None => {
                debug!("no reply to {:?} within {} ms", request.command(), wait_ms);
                Err(ClientError::NoResponse)
            }
        }
    }

    fn link_error(e: L::Error) -> ClientError {
        warn!("link error: {:?}", Debug2Format(&e));
        ClientError::Link
    }
}
