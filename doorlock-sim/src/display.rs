//! 16x2 character display rendered as text

use std::io::{self, Write};

use doorlock_core::traits::{TextDisplay, DISPLAY_COLUMNS, DISPLAY_ROWS};

const ROWS: usize = DISPLAY_ROWS as usize;
const COLUMNS: usize = DISPLAY_COLUMNS as usize;

/// Character display that redraws a framed screen into `W` whenever its
/// contents change
pub struct TerminalDisplay<W> {
    cells: [[u8; COLUMNS]; ROWS],
    cursor: (usize, usize),
    shown: Option<[[u8; COLUMNS]; ROWS]>,
    out: W,
}

impl TerminalDisplay<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> TerminalDisplay<W> {
    pub fn new(out: W) -> Self {
        Self {
            cells: [[b' '; COLUMNS]; ROWS],
            cursor: (0, 0),
            shown: None,
            out,
        }
    }

    /// Current screen contents, trailing spaces removed
    pub fn rows(&self) -> [String; ROWS] {
        self.cells
            .map(|row| String::from_utf8_lossy(&row).trim_end().to_string())
    }

    /// Output sink
    pub fn output(&self) -> &W {
        &self.out
    }

    fn render(&mut self) {
        if self.shown == Some(self.cells) {
            return;
        }
        self.shown = Some(self.cells);

        let border = format!("+{}+", "-".repeat(COLUMNS));
        let mut frame = String::new();
        frame.push_str(&border);
        frame.push('\n');
        for row in &self.cells {
            frame.push('|');
            frame.push_str(&String::from_utf8_lossy(row));
            frame.push_str("|\n");
        }
        frame.push_str(&border);
        frame.push('\n');

        if let Err(e) = self.out.write_all(frame.as_bytes()).and_then(|()| self.out.flush()) {
            log::warn!("display output failed: {}", e);
        }
    }
}

impl<W: Write> TextDisplay for TerminalDisplay<W> {
    fn clear(&mut self) {
        self.cells = [[b' '; COLUMNS]; ROWS];
        self.cursor = (0, 0);
    }

    fn set_cursor(&mut self, row: u8, col: u8) {
        self.cursor = (usize::from(row).min(ROWS - 1), usize::from(col).min(COLUMNS));
    }

    fn write(&mut self, text: &str) {
        let (row, mut col) = self.cursor;
        for byte in text.bytes() {
            if col >= COLUMNS {
                break;
            }
            // The controller's character ROM is ASCII only
            self.cells[row][col] = if byte.is_ascii_graphic() || byte == b' ' {
                byte
            } else {
                b'?'
            };
            col += 1;
        }
        self.cursor = (row, col);
        self.render();
    }
}
