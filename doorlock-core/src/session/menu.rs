//! Main menu navigation

use crate::traits::Key;

/// Main menu entries, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MenuItem {
    OpenDoor,
    SetTimeout,
    ChangeCredential,
    ResetSystem,
}

impl MenuItem {
    /// All entries in display order
    pub const ALL: [MenuItem; 4] = [
        MenuItem::OpenDoor,
        MenuItem::SetTimeout,
        MenuItem::ChangeCredential,
        MenuItem::ResetSystem,
    ];

    /// Text shown on the bottom row
    pub fn label(self) -> &'static str {
        match self {
            MenuItem::OpenDoor => "Open Door",
            MenuItem::SetTimeout => "Set Timeout",
            MenuItem::ChangeCredential => "Change Password",
            MenuItem::ResetSystem => "Reset System",
        }
    }

    fn index(self) -> usize {
        match self {
            MenuItem::OpenDoor => 0,
            MenuItem::SetTimeout => 1,
            MenuItem::ChangeCredential => 2,
            MenuItem::ResetSystem => 3,
        }
    }

    /// Following entry, wrapping around
    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    /// Preceding entry, wrapping around
    pub fn previous(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// Menu cursor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Menu {
    selected: MenuItem,
}

impl Default for Menu {
    fn default() -> Self {
        Self::new()
    }
}

impl Menu {
    /// Cursor on the first entry
    pub fn new() -> Self {
        Self {
            selected: MenuItem::OpenDoor,
        }
    }

    /// Entry under the cursor
    pub fn selected(&self) -> MenuItem {
        self.selected
    }

    /// Apply a key press
    ///
    /// Returns the entry to run when the key activates it.
    pub fn handle(&mut self, key: Key) -> Option<MenuItem> {
        match key {
            Key::Next => {
                self.selected = self.selected.next();
                None
            }
            Key::Previous => {
                self.selected = self.selected.previous();
                None
            }
            Key::Enter => Some(self.selected),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_navigation_wraps() {
        let mut menu = Menu::new();
        menu.handle(Key::Previous);
        assert_eq!(menu.selected(), MenuItem::ResetSystem);
        menu.handle(Key::Next);
        assert_eq!(menu.selected(), MenuItem::OpenDoor);
    }

    #[test]
    fn test_enter_activates_selection() {
        let mut menu = Menu::new();
        menu.handle(Key::Next);
        menu.handle(Key::Next);
        assert_eq!(menu.handle(Key::Enter), Some(MenuItem::ChangeCredential));
        assert_eq!(menu.handle(Key::Digit(b'1')), None);
        assert_eq!(menu.handle(Key::Clear), None);
        assert_eq!(menu.selected(), MenuItem::ChangeCredential);
    }

    #[test]
    fn test_next_cycles_through_all() {
        let mut item = MenuItem::OpenDoor;
        for expected in MenuItem::ALL.iter().cycle().skip(1).take(8) {
            item = item.next();
            assert_eq!(item, *expected);
        }
    }
}
