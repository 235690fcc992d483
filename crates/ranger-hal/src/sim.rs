//! In-process stand-ins for headless testing without a terminal or debugfs.
//!
//! [`ScriptedSource`] replays a fixed list of read results per path, and
//! [`MemoryScreen`] records everything painted onto it while handing out
//! queued key presses.  Together they let the full sampling loop run in unit
//! tests and CI.
//!
//! # Example
//!
//! ```rust
//! use std::path::Path;
//! use ranger_hal::{LineSource, ScriptedSource};
//!
//! let mut src = ScriptedSource::new()
//!     .with_line("/dev/ranger", "0.5,0.5,0.5,0.5,0.5\n");
//!
//! let line = src.read_first_line(Path::new("/dev/ranger")).unwrap();
//! assert!(line.starts_with("0.5"));
//! ```

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::path::{Path, PathBuf};

use ranger_types::RangerError;

use crate::screen::Screen;
use crate::source::LineSource;

// ────────────────────────────────────────────────────────────────────────────
// Scripted source
// ────────────────────────────────────────────────────────────────────────────

/// A [`LineSource`] that replays queued results, one per read.
///
/// Once a path's queue is down to its final entry that entry is returned for
/// every subsequent read, mimicking a pseudo-file whose content stopped
/// changing.  Paths with no script behave like a missing file.
#[derive(Debug, Default)]
pub struct ScriptedSource {
    scripts: HashMap<PathBuf, VecDeque<Result<String, RangerError>>>,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful read of `line` at `path`.
    pub fn with_line(self, path: impl Into<PathBuf>, line: impl Into<String>) -> Self {
        self.with_result(path, Ok(line.into()))
    }

    /// Queue a failed read at `path`.
    pub fn with_error(self, path: impl Into<PathBuf>, err: RangerError) -> Self {
        self.with_result(path, Err(err))
    }

    fn with_result(
        mut self,
        path: impl Into<PathBuf>,
        result: Result<String, RangerError>,
    ) -> Self {
        self.scripts.entry(path.into()).or_default().push_back(result);
        self
    }
}

impl LineSource for ScriptedSource {
    fn read_first_line(&mut self, path: &Path) -> Result<String, RangerError> {
        let Some(queue) = self.scripts.get_mut(path) else {
            return Err(RangerError::SourceNotFound(path.display().to_string()));
        };
        match queue.len() {
            0 => Err(RangerError::SourceNotFound(path.display().to_string())),
            1 => queue[0].clone(),
            _ => queue
                .pop_front()
                .unwrap_or_else(|| Err(RangerError::SourceNotFound(path.display().to_string()))),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Memory screen
// ────────────────────────────────────────────────────────────────────────────

/// A [`Screen`] that keeps the last refreshed frame as plain text rows.
#[derive(Debug, Default)]
pub struct MemoryScreen {
    pending: BTreeMap<u16, String>,
    visible: BTreeMap<u16, String>,
    keys: VecDeque<char>,
    refreshes: usize,
}

impl MemoryScreen {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue key presses to be returned by [`Screen::poll_key`], in order.
    pub fn with_keys(mut self, keys: impl IntoIterator<Item = char>) -> Self {
        self.keys.extend(keys);
        self
    }

    /// Queue a single key press.
    pub fn press(&mut self, key: char) {
        self.keys.push_back(key);
    }

    /// Text of `row` as of the last refresh, without trailing blanks.
    pub fn row(&self, row: u16) -> &str {
        self.visible.get(&row).map(|s| s.trim_end()).unwrap_or("")
    }

    /// Whole visible frame, rows joined with newlines.
    pub fn contents(&self) -> String {
        let last = self.visible.keys().next_back().copied().unwrap_or(0);
        (0..=last)
            .map(|r| self.row(r))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn refresh_count(&self) -> usize {
        self.refreshes
    }
}

impl Screen for MemoryScreen {
    fn clear(&mut self) -> Result<(), RangerError> {
        self.pending.clear();
        Ok(())
    }

    fn write_at(&mut self, row: u16, col: u16, text: &str) -> Result<(), RangerError> {
        let line = self.pending.entry(row).or_default();
        let mut cells: Vec<char> = line.chars().collect();
        let col = usize::from(col);
        if cells.len() < col {
            cells.resize(col, ' ');
        }
        for (i, ch) in text.chars().enumerate() {
            match cells.get_mut(col + i) {
                Some(cell) => *cell = ch,
                None => cells.push(ch),
            }
        }
        *line = cells.into_iter().collect();
        Ok(())
    }

    fn refresh(&mut self) -> Result<(), RangerError> {
        self.visible = self.pending.clone();
        self.refreshes += 1;
        Ok(())
    }

    fn poll_key(&mut self) -> Result<Option<char>, RangerError> {
        Ok(self.keys.pop_front())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scripted_source_replays_in_order_then_sticks() {
        let path = Path::new("/sys/kernel/debug/ranger_k/distances");
        let mut src = ScriptedSource::new()
            .with_line(path, "1,1,1,1,1")
            .with_error(path, RangerError::OtherReadFailure("boom".into()))
            .with_line(path, "2,2,2,2,2");

        assert_eq!(src.read_first_line(path).unwrap(), "1,1,1,1,1");
        assert!(src.read_first_line(path).is_err());
        assert_eq!(src.read_first_line(path).unwrap(), "2,2,2,2,2");
        assert_eq!(src.read_first_line(path).unwrap(), "2,2,2,2,2");
    }

    #[test]
    fn scripted_source_unknown_path_is_not_found() {
        let mut src = ScriptedSource::new();
        let err = src.read_first_line(Path::new("/missing")).unwrap_err();
        assert_eq!(err, RangerError::SourceNotFound("/missing".to_string()));
    }

    #[test]
    fn memory_screen_shows_only_refreshed_content() {
        let mut screen = MemoryScreen::new();
        screen.write_at(0, 0, "hello").unwrap();
        assert_eq!(screen.row(0), "");
        screen.refresh().unwrap();
        assert_eq!(screen.row(0), "hello");
        assert_eq!(screen.refresh_count(), 1);
    }

    #[test]
    fn memory_screen_writes_at_column() {
        let mut screen = MemoryScreen::new();
        screen.write_at(2, 4, "abc").unwrap();
        screen.write_at(2, 0, "xy").unwrap();
        screen.refresh().unwrap();
        assert_eq!(screen.row(2), "xy  abc");
        assert_eq!(screen.contents(), "\n\nxy  abc");
    }

    #[test]
    fn memory_screen_clear_blanks_next_frame() {
        let mut screen = MemoryScreen::new();
        screen.write_at(0, 0, "old").unwrap();
        screen.refresh().unwrap();
        screen.clear().unwrap();
        screen.write_at(1, 0, "new").unwrap();
        screen.refresh().unwrap();
        assert_eq!(screen.row(0), "");
        assert_eq!(screen.row(1), "new");
    }

    #[test]
    fn memory_screen_hands_out_keys_in_order() {
        let mut screen = MemoryScreen::new().with_keys(['+', '-']);
        screen.press('q');
        assert_eq!(screen.poll_key().unwrap(), Some('+'));
        assert_eq!(screen.poll_key().unwrap(), Some('-'));
        assert_eq!(screen.poll_key().unwrap(), Some('q'));
        assert_eq!(screen.poll_key().unwrap(), None);
    }
}
