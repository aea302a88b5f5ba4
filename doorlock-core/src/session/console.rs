//! Operator console: keypad, display, buzzer and timing

use embedded_hal::delay::DelayNs;

use doorlock_protocol::Credential;

use super::entry::{CredentialEntry, EntryStep};
use super::MSG_SHORT_MS;
use crate::traits::{Feedback, Key, Keypad, TextDisplay, TextDisplayExt};

/// Mask character echoed per entered digit
const MASK: &str = "*";

/// The HMI node's local peripherals
pub struct Console<K, D, F, T> {
    keypad: K,
    display: D,
    feedback: F,
    delay: T,
}

impl<K, D, F, T> Console<K, D, F, T>
where
    K: Keypad,
    D: TextDisplay,
    F: Feedback,
    T: DelayNs,
{
    pub fn new(keypad: K, display: D, feedback: F, delay: T) -> Self {
        Self {
            keypad,
            display,
            feedback,
            delay,
        }
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn display_mut(&mut self) -> &mut D {
        &mut self.display
    }

    pub fn keypad(&self) -> &K {
        &self.keypad
    }

    pub fn feedback(&self) -> &F {
        &self.feedback
    }

    pub fn delay(&self) -> &T {
        &self.delay
    }

    /// Block for a key press, with a click
    pub fn read_key(&mut self) -> Key {
        let key = self.keypad.read_key();
        self.feedback.beep_short();
        key
    }

    /// Wait up to `timeout_ms` for a key press, with a click
    pub fn poll_key(&mut self, timeout_ms: u32) -> Option<Key> {
        let key = self.keypad.read_key_timeout(timeout_ms)?;
        self.feedback.beep_short();
        Some(key)
    }

    pub fn pause(&mut self, ms: u32) {
        self.delay.delay_ms(ms);
    }

    /// Continuous tone for `ms`
    pub fn tone(&mut self, ms: u32) {
        self.feedback.on();
        self.delay.delay_ms(ms);
        self.feedback.off();
    }

    /// `count` tones of `on_ms`, separated by `off_ms` of silence
    pub fn tones(&mut self, count: u8, on_ms: u32, off_ms: u32) {
        for _ in 0..count {
            self.tone(on_ms);
            self.delay.delay_ms(off_ms);
        }
    }

    /// Show a message and hold it for `hold_ms`
    pub fn notice(&mut self, top: &str, bottom: &str, hold_ms: u32) {
        self.display.show_lines(top, bottom);
        self.delay.delay_ms(hold_ms);
    }

    /// Title and a free-form second row
    pub fn show_lines(&mut self, top: &str, bottom: &str) {
        self.display.show_lines(top, bottom);
    }

    pub fn write_row(&mut self, row: u8, text: &str) {
        self.display.write_row(row, text);
    }

    /// Rewrite the bottom row as `prefix`, a number and `suffix`
    pub fn write_value(&mut self, prefix: &str, value: u32, suffix: &str) {
        self.display.write_row(1, "");
        self.display.set_cursor(1, 0);
        self.display.write(prefix);
        self.display.write_number(value);
        self.display.write(suffix);
    }

    /// Collect a five-digit credential under `title`
    ///
    /// Digits are echoed as `*`. Loops until five digits are submitted.
    pub fn read_credential(&mut self, title: &str) -> Credential {
        let mut entry = CredentialEntry::new();
        self.display.show(title);
        self.display.set_cursor(1, 0);

        loop {
            let key = self.read_key();
            match entry.handle(key) {
                EntryStep::Echo => self.display.write(MASK),
                EntryStep::Cleared => {
                    self.display.write_row(1, "");
                    self.display.set_cursor(1, 0);
                }
                EntryStep::TooShort => {
                    self.notice("Enter 5 digits", "", MSG_SHORT_MS);
                    self.display.show(title);
                    self.display.set_cursor(1, 0);
                }
                EntryStep::Complete(credential) => return credential,
                EntryStep::Ignored => {}
            }
        }
    }
}
