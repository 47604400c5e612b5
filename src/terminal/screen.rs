//! Plain-text screen model backed by the VTE parser
//!
//! Keeps a line grid with a scrollback cap and enough control-sequence
//! handling (CR, LF, tab, backspace, cursor position, erase) to reconstruct
//! readable output. It is not a terminal emulator: styling, alternate
//! screens and scroll regions are ignored.

use crate::core::config::SessionConfig;
use crate::core::theme::Theme;
use crate::terminal::surface::{InputCallback, TerminalSurface};
use std::collections::VecDeque;
use vte::{Params, Parser, Perform};

/// Construction options for [`VteScreen`]
#[derive(Debug, Clone)]
pub struct ScreenOptions {
    /// Initial column count
    pub cols: u16,
    /// Initial row count
    pub rows: u16,
    /// Scrollback line limit beyond the visible rows
    pub scrollback: usize,
    /// Treat a bare line feed as CR+LF
    pub convert_eol: bool,
    /// Resolved color theme
    pub theme: Theme,
}

impl Default for ScreenOptions {
    fn default() -> Self {
        Self {
            cols: 80,
            rows: 24,
            scrollback: 1000,
            convert_eol: true,
            theme: Theme::default(),
        }
    }
}

impl ScreenOptions {
    /// Options matching a session configuration, with the theme resolved
    /// from the session's variant and overrides.
    pub fn for_session(config: &SessionConfig, scrollback: usize) -> Self {
        Self {
            cols: config.cols,
            rows: config.rows,
            scrollback,
            convert_eol: true,
            theme: Theme::resolve(config.variant, &config.theme),
        }
    }
}

/// Line grid state driven by the VTE parser
struct Grid {
    cols: u16,
    rows: u16,
    scrollback: usize,
    convert_eol: bool,
    lines: VecDeque<Vec<char>>,
    cursor_row: usize,
    cursor_col: usize,
}

impl Grid {
    fn new(cols: u16, rows: u16, scrollback: usize, convert_eol: bool) -> Self {
        let mut lines = VecDeque::new();
        lines.push_back(Vec::new());
        Self {
            cols,
            rows,
            scrollback,
            convert_eol,
            lines,
            cursor_row: 0,
            cursor_col: 0,
        }
    }

    fn put_char(&mut self, c: char) {
        let line = &mut self.lines[self.cursor_row];
        while line.len() < self.cursor_col {
            line.push(' ');
        }
        if self.cursor_col < line.len() {
            line[self.cursor_col] = c;
        } else {
            line.push(c);
        }
        self.cursor_col += 1;
    }

    fn line_feed(&mut self) {
        self.cursor_row += 1;
        if self.cursor_row == self.lines.len() {
            self.lines.push_back(Vec::new());
        }
        if self.convert_eol {
            self.cursor_col = 0;
        }
        self.trim_scrollback();
    }

    fn trim_scrollback(&mut self) {
        let cap = self.rows as usize + self.scrollback;
        while self.lines.len() > cap {
            self.lines.pop_front();
            self.cursor_row = self.cursor_row.saturating_sub(1);
        }
    }

    fn clear(&mut self) {
        self.lines.clear();
        self.lines.push_back(Vec::new());
        self.cursor_row = 0;
        self.cursor_col = 0;
    }

    /// Move the cursor to a 1-based row/col within the visible window
    fn move_cursor(&mut self, row: u16, col: u16) {
        let top = self.lines.len().saturating_sub(self.rows as usize);
        let target = top + (row.max(1) - 1) as usize;
        while self.lines.len() <= target {
            self.lines.push_back(Vec::new());
        }
        self.cursor_row = target;
        self.cursor_col = (col.max(1) - 1) as usize;
        self.trim_scrollback();
    }
}

impl Perform for Grid {
    fn print(&mut self, c: char) {
        self.put_char(c);
    }

    fn execute(&mut self, byte: u8) {
        match byte {
            0x08 => self.cursor_col = self.cursor_col.saturating_sub(1),
            0x09 => self.cursor_col = (self.cursor_col / 8 + 1) * 8,
            0x0A => self.line_feed(),
            0x0D => self.cursor_col = 0,
            _ => {}
        }
    }

    fn hook(&mut self, _params: &Params, _intermediates: &[u8], _ignore: bool, _action: char) {}

    fn put(&mut self, _byte: u8) {}

    fn unhook(&mut self) {}

    fn osc_dispatch(&mut self, _params: &[&[u8]], _bell_terminated: bool) {}

    fn csi_dispatch(&mut self, params: &Params, _intermediates: &[u8], _ignore: bool, action: char) {
        match action {
            'H' | 'f' => {
                let mut iter = params.iter();
                let row = iter.next().and_then(|p| p.first().copied()).unwrap_or(1);
                let col = iter.next().and_then(|p| p.first().copied()).unwrap_or(1);
                self.move_cursor(row, col);
            }
            'J' => {
                let mode = params.iter().next().and_then(|p| p.first().copied()).unwrap_or(0);
                if mode == 2 || mode == 3 {
                    self.clear();
                }
            }
            'K' => {
                let line = &mut self.lines[self.cursor_row];
                line.truncate(self.cursor_col);
            }
            _ => {}
        }
    }

    fn esc_dispatch(&mut self, _intermediates: &[u8], _ignore: bool, _byte: u8) {}
}

/// Terminal surface backed by a [`vte`] parser and a plain-text line grid
pub struct VteScreen {
    parser: Parser,
    grid: Grid,
    theme: Theme,
    attached: bool,
    disposed: bool,
    focus_count: u32,
    input_cb: Option<InputCallback>,
}

impl VteScreen {
    /// Create a screen from options
    pub fn new(options: ScreenOptions) -> Self {
        Self {
            parser: Parser::new(),
            grid: Grid::new(
                options.cols,
                options.rows,
                options.scrollback,
                options.convert_eol,
            ),
            theme: options.theme,
            attached: false,
            disposed: false,
            focus_count: 0,
            input_cb: None,
        }
    }

    /// The resolved theme this screen was constructed with
    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    /// Whether the screen is currently attached
    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// Number of focus requests received
    pub fn focus_count(&self) -> u32 {
        self.focus_count
    }

    /// Deliver user input to the registered input callback
    pub fn feed_input(&self, data: &[u8]) {
        if let Some(cb) = &self.input_cb {
            cb(data);
        }
    }

    /// All grid lines as strings
    pub fn lines(&self) -> Vec<String> {
        self.grid
            .lines
            .iter()
            .map(|l| l.iter().collect::<String>())
            .collect()
    }

    /// The grid contents as one newline-joined string, trailing blank
    /// lines removed
    pub fn text(&self) -> String {
        let mut lines = self.lines();
        while lines.last().is_some_and(|l| l.trim().is_empty()) {
            lines.pop();
        }
        lines.join("\n")
    }
}

impl TerminalSurface for VteScreen {
    fn attach(&mut self) -> anyhow::Result<()> {
        if self.disposed {
            anyhow::bail!("screen already disposed");
        }
        self.attached = true;
        Ok(())
    }

    fn focus(&mut self) {
        if !self.disposed {
            self.focus_count += 1;
        }
    }

    fn write(&mut self, text: &str) {
        if self.disposed {
            return;
        }
        for byte in text.as_bytes() {
            self.parser.advance(&mut self.grid, *byte);
        }
    }

    fn writeln(&mut self, text: &str) {
        self.write(text);
        self.write("\r\n");
    }

    fn resize(&mut self, cols: u16, rows: u16) {
        self.grid.cols = cols;
        self.grid.rows = rows;
        self.grid.trim_scrollback();
    }

    fn size(&self) -> (u16, u16) {
        (self.grid.cols, self.grid.rows)
    }

    fn on_input(&mut self, callback: InputCallback) {
        self.input_cb = Some(callback);
    }

    fn dispose(&mut self) {
        self.disposed = true;
        self.attached = false;
        self.input_cb = None;
        self.grid.clear();
    }
}
