//! `ranger-hal` – the viewer's edge to the outside world.
//!
//! The sampling loop never touches a file or a terminal directly; it talks to
//! two small traits instead:
//!
//! - [`source`] – [`LineSource`][source::LineSource]: read the first line of
//!   a pseudo-file.  [`FileLineSource`][source::FileLineSource] is the real
//!   implementation used against debugfs.
//! - [`screen`] – [`Screen`][screen::Screen]: a character-cell surface with a
//!   non-blocking key poll.
//! - [`sim`] – scripted and in-memory stand-ins for both traits so the whole
//!   loop can run headless in tests.

pub mod screen;
pub mod sim;
pub mod source;

pub use screen::Screen;
pub use sim::{MemoryScreen, ScriptedSource};
pub use source::{FileLineSource, LineSource};
