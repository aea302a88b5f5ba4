//! Request handlers

use doorlock_hal::WordStorage;
use doorlock_protocol::{
    parse_digits, Ack, Credential, Reply, Request, TimeoutValue, CREDENTIAL_LEN,
};

use super::Engine;
use crate::config::Configuration;
use crate::fmt::Debug2Format;
use crate::traits::{Actuator, ActuatorError, Indicator};

impl<S: WordStorage, A: Actuator, I: Indicator> Engine<S, A, I> {
    /// Carry out one complete request
    ///
    /// Returns the reply byte to send, or `None` for requests that are
    /// answered with silence under the current [`EngineConfig`].
    ///
    /// [`EngineConfig`]: super::EngineConfig
    pub fn handle(&mut self, request: Request) -> Option<Reply> {
        trace!("request: {:?}", request);
        let reply = match request {
            Request::QueryInitialized => Some(Reply::Initialized(self.config.initialized)),
            Request::VerifyCredential(candidate) => Some(self.verify(&candidate).into()),
            Request::SetCredential(bytes) => Some(self.set_credential(bytes).into()),
            Request::GetTimeout => Some(Reply::Timeout(self.config.timeout_seconds)),
            Request::SetTimeoutWithCredential { credential, digits } => {
                Some(self.set_timeout_authorized(&credential, digits).into())
            }
            Request::SetTimeoutBare(value) => Some(self.set_timeout_bare(value).into()),
            Request::Reset => Some(self.reset().into()),
            Request::Open => self.motion(Motion::Open),
            Request::Lock => self.motion(Motion::Lock),
            Request::Unknown(byte) => {
                debug!("unknown command byte {:#x}", byte);
                self.indicator.blink(1);
                self.options.reject_unknown.then_some(Reply::Ack(Ack::Unknown))
            }
        };
        if let Some(reply) = reply {
            trace!("reply: {:?}", reply);
        }
        reply
    }

    fn verify(&self, candidate: &[u8; CREDENTIAL_LEN]) -> Ack {
        if self.config.accepts(candidate) {
            Ack::Yes
        } else {
            Ack::No
        }
    }

    fn set_credential(&mut self, bytes: [u8; CREDENTIAL_LEN]) -> Ack {
        let Ok(credential) = Credential::new(bytes) else {
            warn!("set-credential payload is not five digits");
            return Ack::Error;
        };
        let candidate = self.config.with_credential(credential);
        self.commit(candidate)
    }

    fn set_timeout_authorized(&mut self, candidate: &[u8; CREDENTIAL_LEN], digits: [u8; 2]) -> Ack {
        if !self.config.accepts(candidate) {
            return Ack::No;
        }
        match parse_digits(digits) {
            Some(seconds) => {
                let candidate = self.config.with_timeout(seconds);
                self.commit(candidate)
            }
            None => Ack::Error,
        }
    }

    fn set_timeout_bare(&mut self, value: TimeoutValue) -> Ack {
        match value.seconds() {
            Some(seconds) => {
                let candidate = self.config.with_timeout(seconds);
                self.commit(candidate)
            }
            None => Ack::Error,
        }
    }

    fn reset(&mut self) -> Ack {
        self.actuator.stop();
        match self.store.clear() {
            Ok(()) => {
                self.config = Configuration::default();
                info!("configuration reset to defaults");
                Ack::Ok
            }
            Err(e) => {
                error!("reset failed: {:?}", Debug2Format(&e));
                Ack::Error
            }
        }
    }

    fn motion(&mut self, motion: Motion) -> Option<Reply> {
        self.indicator.on();
        let result: Result<(), ActuatorError> = match motion {
            Motion::Open => {
                info!("opening latch");
                self.actuator.open()
            }
            Motion::Lock => {
                info!("locking latch");
                self.actuator.close()
            }
        };
        if let Err(e) = result {
            error!("latch drive failed: {:?}", e);
            self.actuator.stop();
        }
        self.indicator.off();

        if !self.options.acknowledge_motion {
            return None;
        }
        Some(Reply::Ack(if result.is_ok() { Ack::Ok } else { Ack::Error }))
    }

    /// Persist `candidate`, then adopt it as the mirror
    fn commit(&mut self, candidate: Configuration) -> Ack {
        match self.store.save(&candidate) {
            Ok(written) => {
                self.config = written;
                Ack::Ok
            }
            Err(e) => {
                error!("configuration save failed: {:?}", Debug2Format(&e));
                Ack::Error
            }
        }
    }
}

#[derive(Clone, Copy)]
enum Motion {
    Open,
    Lock,
}
