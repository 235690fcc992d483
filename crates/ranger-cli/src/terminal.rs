//! Crossterm-backed [`Screen`] for the live view.

use std::io::{self, Stdout, Write};
use std::time::Duration;

use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::style::Print;
use crossterm::terminal::{
    self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::{execute, queue};

use ranger_hal::Screen;
use ranger_types::RangerError;

/// Raw-mode, alternate-screen terminal.  Restored on drop.
pub struct TerminalScreen {
    out: Stdout,
    active: bool,
}

impl TerminalScreen {
    /// Switch the terminal into raw mode on the alternate screen.
    pub fn setup() -> io::Result<Self> {
        let mut out = io::stdout();
        terminal::enable_raw_mode()?;
        if let Err(e) = execute!(out, EnterAlternateScreen, Hide) {
            let _ = terminal::disable_raw_mode();
            return Err(e);
        }
        Ok(Self { out, active: true })
    }

    pub fn teardown(&mut self) {
        if self.active {
            restore();
            self.active = false;
        }
    }
}

impl Drop for TerminalScreen {
    fn drop(&mut self) {
        self.teardown();
    }
}

/// Put the terminal back into cooked mode.  Safe to call more than once and
/// from a panic hook.
pub fn restore() {
    let mut out = io::stdout();
    let _ = execute!(out, Show, LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();
    let _ = out.flush();
}

fn screen_err(e: io::Error) -> RangerError {
    RangerError::Screen(e.to_string())
}

impl Screen for TerminalScreen {
    fn clear(&mut self) -> Result<(), RangerError> {
        queue!(self.out, MoveTo(0, 0), Clear(ClearType::All)).map_err(screen_err)
    }

    fn write_at(&mut self, row: u16, col: u16, text: &str) -> Result<(), RangerError> {
        queue!(self.out, MoveTo(col, row), Print(text)).map_err(screen_err)
    }

    fn refresh(&mut self) -> Result<(), RangerError> {
        self.out.flush().map_err(screen_err)
    }

    fn poll_key(&mut self) -> Result<Option<char>, RangerError> {
        if !event::poll(Duration::ZERO).map_err(screen_err)? {
            return Ok(None);
        }
        match event::read().map_err(screen_err)? {
            Event::Key(key) if key.kind == KeyEventKind::Press => Ok(key_char(key.code, key.modifiers)),
            _ => Ok(None),
        }
    }
}

/// Raw mode swallows SIGINT, so Ctrl-C and Esc are folded into `q`.
fn key_char(code: KeyCode, modifiers: KeyModifiers) -> Option<char> {
    match code {
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => Some('q'),
        KeyCode::Esc => Some('q'),
        KeyCode::Char(c) => Some(c),
        _ => None,
    }
}
