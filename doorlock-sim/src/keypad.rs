//! Keypad fed through a channel
//!
//! The simulator binary feeds it from stdin, one key legend per character;
//! tests feed it directly.

use std::io::BufRead;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::Duration;

use doorlock_core::traits::{Key, Keypad};

/// What to do once no more keys can arrive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OnClose {
    /// Leave the process; used when stdin reaches end of file
    Exit,
    /// Fail loudly; a test script ran out
    Panic,
}

/// Keypad reading keys from a channel
pub struct ChannelKeypad {
    rx: Receiver<Key>,
    on_close: OnClose,
}

impl ChannelKeypad {
    /// Keypad plus the sender that presses its keys
    pub fn channel() -> (Self, Sender<Key>) {
        let (tx, rx) = mpsc::channel();
        (
            Self {
                rx,
                on_close: OnClose::Panic,
            },
            tx,
        )
    }

    /// Keypad driven by lines typed on stdin
    ///
    /// Characters that are not key legends are ignored.
    pub fn stdin() -> std::io::Result<Self> {
        let (tx, rx) = mpsc::channel();
        thread::Builder::new()
            .name("keypad".into())
            .spawn(move || {
                for line in std::io::stdin().lock().lines() {
                    let Ok(line) = line else { break };
                    for key in line.chars().filter_map(Key::from_char) {
                        if tx.send(key).is_err() {
                            return;
                        }
                    }
                }
                log::info!("keypad input closed");
            })?;
        Ok(Self {
            rx,
            on_close: OnClose::Exit,
        })
    }

    fn closed(&self) -> ! {
        match self.on_close {
            OnClose::Exit => std::process::exit(0),
            OnClose::Panic => panic!("keypad input closed"),
        }
    }
}

impl Keypad for ChannelKeypad {
    fn read_key(&mut self) -> Key {
        match self.rx.recv() {
            Ok(key) => key,
            Err(_) => self.closed(),
        }
    }

    fn read_key_timeout(&mut self, timeout_ms: u32) -> Option<Key> {
        match self.rx.recv_timeout(Duration::from_millis(u64::from(timeout_ms))) {
            Ok(key) => Some(key),
            Err(RecvTimeoutError::Timeout) => None,
            Err(RecvTimeoutError::Disconnected) => self.closed(),
        }
    }
}

/// Press every key legend in `script`, ignoring other characters
pub fn press(keys: &Sender<Key>, script: &str) {
    for key in script.chars().filter_map(Key::from_char) {
        // A dropped keypad just means nobody is listening any more
        let _ = keys.send(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pressed_keys_arrive_in_order() {
        let (mut keypad, keys) = ChannelKeypad::channel();
        press(&keys, "1 2A");
        assert_eq!(keypad.read_key(), Key::Digit(b'1'));
        assert_eq!(keypad.read_key(), Key::Digit(b'2'));
        assert_eq!(keypad.read_key_timeout(10), Some(Key::Enter));
        assert_eq!(keypad.read_key_timeout(10), None);
    }

    #[test]
    #[should_panic(expected = "keypad input closed")]
    fn test_closed_script_panics() {
        let (mut keypad, keys) = ChannelKeypad::channel();
        drop(keys);
        keypad.read_key();
    }
}
