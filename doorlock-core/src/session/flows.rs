//! Boot sequence and menu flows

use embedded_hal::delay::DelayNs;

use doorlock_hal::{AnalogInput, Uart};
use doorlock_protocol::{Credential, DEFAULT_TIMEOUT_SECONDS};

use super::{
    AttemptStatus, ClientError, ControlClient, FlowError, FlowOutcome, Menu, MenuItem, Session,
    BOOT_RETRY_MS, KEY_POLL_MS, LOCKOUT_SECONDS, MSG_LONG_MS, MSG_MEDIUM_MS, MSG_SHORT_MS,
};
use crate::traits::{Feedback, Key, Keypad, TextDisplay};

impl<L, K, D, F, P, T> Session<L, K, D, F, P, T>
where
    L: Uart,
    K: Keypad,
    D: TextDisplay,
    F: Feedback,
    P: AnalogInput,
    T: DelayNs,
{
    /// Boot, then serve the main menu forever
    pub fn run(&mut self) -> ! {
        self.boot();
        self.run_menu()
    }

    /// Wait for the Control node and make sure it is provisioned
    ///
    /// Queries until the Control node answers, runs provisioning if it has
    /// no credential yet, then refreshes the cached timeout.
    pub fn boot(&mut self) {
        info!("waiting for control node");
        self.console.show_lines("Door Lock", "Connecting...");

        let initialized = loop {
            match self.client.query_initialized() {
                Ok(initialized) => break initialized,
                Err(e) => {
                    trace!("boot query failed: {:?}", e);
                    self.console.pause(BOOT_RETRY_MS);
                }
            }
        };

        if initialized {
            self.refresh_timeout();
        } else {
            info!("control node not provisioned");
            self.provision("Enter Password");
        }
    }

    /// Enter and confirm a new credential until the Control node stores it
    pub fn provision(&mut self, title: &str) {
        loop {
            let first = self.console.read_credential(title);
            self.console.pause(250);
            let confirm = self.console.read_credential("Re-enter Pass");

            if first != confirm {
                self.console.show_lines("Mismatch!", "Try again");
                self.console.tones(3, 100, 150);
                self.console.pause(MSG_SHORT_MS);
                continue;
            }

            match self.client.set_credential(&first) {
                Ok(()) => {
                    info!("credential stored");
                    self.console.show_lines("Pass Saved", "");
                    self.console.tone(300);
                    self.console.pause(MSG_MEDIUM_MS);
                    self.refresh_timeout();
                    return;
                }
                Err(ClientError::NoResponse | ClientError::Link) => {
                    self.console.notice("No Response", "Try again", MSG_MEDIUM_MS);
                }
                Err(e) => {
                    warn!("credential not stored: {:?}", e);
                    self.console.notice("Save Error", "Try again", MSG_MEDIUM_MS);
                }
            }
        }
    }

    /// Prompt for the credential until it verifies or the attempts run out
    pub fn verify_with_attempts(&mut self, title: &str) -> FlowOutcome {
        self.authorize(title, Retry::OnSilence, |client, credential| client.verify(credential))
    }

    /// Verify, open, count down the relock timeout, lock
    pub fn open_door(&mut self) -> FlowOutcome {
        self.attempts.reset();
        self.verify_with_attempts("Enter Password")?;

        self.console.show_lines("Door Unlocking", "");
        self.console.tone(200);
        if let Err(e) = self.client.open() {
            return Err(self.motion_failed(e));
        }
        info!("door unlocked for {}s", self.timeout_seconds);

        self.console.show_lines("Door Open", "");
        for remaining in (1..=self.timeout_seconds).rev() {
            self.console.write_value("Auto-lock in ", remaining.into(), "s");
            self.console.pause(1000);
        }

        self.console.show_lines("Relocking Door", "");
        if let Err(e) = self.client.lock() {
            error!("relock failed: {:?}", e);
            return Err(self.motion_failed(e));
        }
        self.console.pause(MSG_SHORT_MS);
        Ok(())
    }

    fn motion_failed(&mut self, e: ClientError) -> FlowError {
        if let ClientError::Malformed = e {
            self.console.notice("Latch Fault", "", MSG_LONG_MS);
            FlowError::Malformed
        } else {
            self.console.notice("No Response", "", MSG_LONG_MS);
            FlowError::NoResponse
        }
    }

    /// Pick a timeout on the potentiometer and store it
    ///
    /// Returns the new timeout.
    pub fn set_timeout(&mut self) -> FlowOutcome<u8> {
        self.attempts.reset();
        self.console.show_lines("Set Timeout", "");

        let seconds = loop {
            let seconds = self.read_pot_timeout();
            self.console.write_value("Value: ", seconds.into(), "s");
            match self.console.poll_key(KEY_POLL_MS) {
                Some(Key::Enter) => break seconds,
                Some(Key::Clear) => {
                    self.console.notice("Cancelled", "", MSG_SHORT_MS);
                    return Err(FlowError::Cancelled);
                }
                _ => {}
            }
        };

        let outcome = self.authorize("Enter Password", Retry::OnRejection, |client, credential| {
            client.set_timeout(credential, seconds)
        });
        match outcome {
            Ok(()) => {
                self.timeout_seconds = seconds;
                info!("timeout set to {}s", seconds);
                self.console.show_lines("Timeout Saved", "");
                self.console.write_value("Value: ", seconds.into(), "s");
                self.console.tone(300);
                self.console.pause(MSG_MEDIUM_MS);
                Ok(seconds)
            }
            Err(e @ (FlowError::Malformed | FlowError::NoResponse)) => {
                self.console.notice("Timeout Err", "", MSG_MEDIUM_MS);
                Err(e)
            }
            Err(e) => Err(e),
        }
    }

    /// Verify the old credential, then provision a new one
    pub fn change_credential(&mut self) -> FlowOutcome {
        self.attempts.reset();
        self.verify_with_attempts("Old Password")?;
        self.provision("New Password");
        Ok(())
    }

    /// Verify, erase the Control node's configuration, then boot again
    pub fn reset_system(&mut self) -> FlowOutcome {
        self.attempts.reset();
        self.verify_with_attempts("Enter Password")?;

        match self.client.reset() {
            Ok(()) => {
                info!("control node reset");
                self.timeout_seconds = DEFAULT_TIMEOUT_SECONDS;
                self.console.notice("System Reset", "", MSG_LONG_MS);
                self.boot();
                Ok(())
            }
            Err(ClientError::NoResponse | ClientError::Link) => {
                self.console.notice("No Response", "", MSG_MEDIUM_MS);
                Err(FlowError::NoResponse)
            }
            Err(e) => {
                warn!("reset refused: {:?}", e);
                self.console.notice("Reset Failed", "", MSG_MEDIUM_MS);
                Err(FlowError::Malformed)
            }
        }
    }

    /// Run one menu entry
    pub fn run_item(&mut self, item: MenuItem) -> FlowOutcome {
        debug!("menu: {:?}", item);
        match item {
            MenuItem::OpenDoor => self.open_door(),
            MenuItem::SetTimeout => self.set_timeout().map(|_| ()),
            MenuItem::ChangeCredential => self.change_credential(),
            MenuItem::ResetSystem => self.reset_system(),
        }
    }

    /// Draw the menu, take one key and run the entry it activates
    pub fn menu_step(&mut self, menu: &mut Menu) -> Option<(MenuItem, FlowOutcome)> {
        self.console.show_lines("Main Menu", menu.selected().label());
        let key = self.console.read_key();
        let item = menu.handle(key)?;
        Some((item, self.run_item(item)))
    }

    /// Serve the main menu forever
    pub fn run_menu(&mut self) -> ! {
        let mut menu = Menu::new();
        loop {
            if let Some((item, Err(e))) = self.menu_step(&mut menu) {
                info!("{:?} ended early: {:?}", item, e);
            }
        }
    }

    /// Credential prompt with attempt counting and lockout
    ///
    /// `exchange` sends the gated request. A rejection always counts as a
    /// failed attempt and a malformed-request reply always ends the flow;
    /// `retry` decides what every other failure does.
    fn authorize<R>(
        &mut self,
        title: &str,
        retry: Retry,
        mut exchange: impl FnMut(&mut ControlClient<L>, &Credential) -> Result<R, ClientError>,
    ) -> FlowOutcome<R> {
        loop {
            let credential = self.console.read_credential(title);
            let message = match exchange(&mut self.client, &credential) {
                Ok(value) => {
                    self.attempts.reset();
                    return Ok(value);
                }
                Err(ClientError::Malformed) => return Err(FlowError::Malformed),
                Err(ClientError::Rejected) => "Wrong Password",
                Err(e) if retry == Retry::OnRejection => {
                    debug!("gated exchange ended: {:?}", e);
                    return Err(match e {
                        ClientError::NoResponse | ClientError::Link => FlowError::NoResponse,
                        _ => FlowError::Malformed,
                    });
                }
                Err(ClientError::NoResponse) => "No Response",
                Err(ClientError::Link | ClientError::Unexpected(_)) => "Link Error",
            };
            debug!("attempt failed: {}", message);

            match self.attempts.record_failure() {
                AttemptStatus::Retry { remaining } => {
                    self.console.show_lines(message, "");
                    self.console.write_value("Tries left: ", remaining.into(), "");
                    self.console.tones(2, 100, 100);
                    self.console.pause(MSG_MEDIUM_MS);
                }
                AttemptStatus::LockedOut => {
                    self.console.notice(message, "", MSG_SHORT_MS);
                    self.lockout();
                    return Err(FlowError::LockedOut);
                }
            }
        }
    }

    /// Count down the lockout with one beep per second
    fn lockout(&mut self) {
        warn!("too many failed attempts, locked out for {}s", LOCKOUT_SECONDS);
        self.console.show_lines("LOCKOUT", "");
        for remaining in (1..=LOCKOUT_SECONDS).rev() {
            self.console.write_value("Wait: ", remaining.into(), "s");
            self.console.tone(100);
            self.console.pause(900);
        }
    }

    fn refresh_timeout(&mut self) {
        match self.client.get_timeout() {
            Ok(seconds) => {
                debug!("cached timeout {}s", seconds);
                self.timeout_seconds = seconds;
            }
            Err(e) => warn!("timeout query failed: {:?}", e),
        }
    }
}

/// Which failed exchanges prompt for the credential again
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Retry {
    /// Missing or unreadable replies count as failed attempts
    OnSilence,
    /// Only a rejected credential counts; anything else ends the flow
    OnRejection,
}
