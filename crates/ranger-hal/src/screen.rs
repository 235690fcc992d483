//! Generic `Screen` trait for character-cell displays.

use ranger_types::RangerError;

/// A character-cell surface the viewer paints its frame onto.
///
/// Rows and columns are zero-based from the top-left corner.  Writes may be
/// buffered until [`refresh`][Screen::refresh] is called.
pub trait Screen {
    /// Blank the whole surface.
    fn clear(&mut self) -> Result<(), RangerError>;

    /// Write `text` starting at (`row`, `col`).
    fn write_at(&mut self, row: u16, col: u16, text: &str) -> Result<(), RangerError>;

    /// Make everything written since the last refresh visible.
    fn refresh(&mut self) -> Result<(), RangerError>;

    /// Return the next pending key press without blocking, if any.
    fn poll_key(&mut self) -> Result<Option<char>, RangerError>;
}
