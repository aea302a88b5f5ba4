//! Character display trait for the 16x2 LCD

use core::fmt::Write;

use heapless::String;

/// Text rows on the display
pub const DISPLAY_ROWS: u8 = 2;

/// Characters per row
pub const DISPLAY_COLUMNS: u8 = 16;

/// Character display
///
/// Writes start at the cursor and advance it. Text past the end of a row is
/// dropped by the driver.
pub trait TextDisplay {
    /// Blank the screen and home the cursor
    fn clear(&mut self);

    /// Move the cursor to `row` (0-1), `col` (0-15)
    fn set_cursor(&mut self, row: u8, col: u8);

    /// Write ASCII text at the cursor
    fn write(&mut self, text: &str);
}

impl<T: TextDisplay + ?Sized> TextDisplay for &mut T {
    fn clear(&mut self) {
        T::clear(self)
    }

    fn set_cursor(&mut self, row: u8, col: u8) {
        T::set_cursor(self, row, col)
    }

    fn write(&mut self, text: &str) {
        T::write(self, text)
    }
}

/// Helpers for common screen layouts
pub trait TextDisplayExt: TextDisplay {
    /// Clear and show a single line on the top row
    fn show(&mut self, top: &str) {
        self.clear();
        self.set_cursor(0, 0);
        self.write(top);
    }

    /// Clear and show two lines
    fn show_lines(&mut self, top: &str, bottom: &str) {
        self.show(top);
        self.set_cursor(1, 0);
        self.write(bottom);
    }

    /// Overwrite a whole row, padding with spaces
    fn write_row(&mut self, row: u8, text: &str) {
        let mut line: String<{ DISPLAY_COLUMNS as usize }> = String::new();
        for c in text.chars().take(DISPLAY_COLUMNS as usize) {
            // Capacity is the column count, so this cannot fail
            let _ = line.push(c);
        }
        while line.len() < DISPLAY_COLUMNS as usize {
            let _ = line.push(' ');
        }
        self.set_cursor(row, 0);
        self.write(&line);
    }

    /// Write a decimal number at the cursor
    fn write_number(&mut self, value: u32) {
        let mut digits: String<10> = String::new();
        // u32::MAX has ten digits
        let _ = write!(digits, "{}", value);
        self.write(&digits);
    }
}

impl<T: TextDisplay + ?Sized> TextDisplayExt for T {}
