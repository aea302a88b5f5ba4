//! 4x4 matrix keypad trait

/// A key press, already debounced by the driver
///
/// The lettered column doubles as the navigation keys:
/// `A` submits, `B` clears or cancels, `C` and `D` step through the menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Key {
    /// Digit key, holding its ASCII byte (`b'0'..=b'9'`)
    Digit(u8),
    /// `A`: submit or activate
    Enter,
    /// `B`: clear or cancel
    Clear,
    /// `C`: next menu item
    Next,
    /// `D`: previous menu item
    Previous,
    /// `*`
    Star,
    /// `#`
    Hash,
}

impl Key {
    /// Map a keypad legend character to a key
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '0'..='9' => Some(Key::Digit(c as u8)),
            'A' | 'a' => Some(Key::Enter),
            'B' | 'b' => Some(Key::Clear),
            'C' | 'c' => Some(Key::Next),
            'D' | 'd' => Some(Key::Previous),
            '*' => Some(Key::Star),
            '#' => Some(Key::Hash),
            _ => None,
        }
    }

    /// Legend printed on the key
    pub fn to_char(self) -> char {
        match self {
            Key::Digit(byte) => byte as char,
            Key::Enter => 'A',
            Key::Clear => 'B',
            Key::Next => 'C',
            Key::Previous => 'D',
            Key::Star => '*',
            Key::Hash => '#',
        }
    }
}

/// Keypad input
pub trait Keypad {
    /// Block until a key is pressed
    fn read_key(&mut self) -> Key;

    /// Wait up to `timeout_ms` for a key press
    fn read_key_timeout(&mut self, timeout_ms: u32) -> Option<Key>;
}

impl<T: Keypad + ?Sized> Keypad for &mut T {
    fn read_key(&mut self) -> Key {
        T::read_key(self)
    }

    fn read_key_timeout(&mut self, timeout_ms: u32) -> Option<Key> {
        T::read_key_timeout(self, timeout_ms)
    }
}
