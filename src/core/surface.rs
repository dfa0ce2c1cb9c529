//! Render surface contract consumed by the Screen.

use std::io;

/// How long `read_input_unit` may wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadMode {
    /// Wait up to the configured input timeout.
    WaitTimeout,
    /// Return only what is already available (or arrives within the short drain window).
    NonBlocking,
}

/// Character-cell terminal surface.
///
/// Drawing calls are buffered until [`Surface::flush`].
pub trait Surface {
    /// Enter raw mode and take over the screen. Calling it again while open
    /// re-clears the screen without re-entering raw mode.
    fn init_screen(&mut self) -> io::Result<()>;

    fn set_echo(&mut self, enabled: bool) -> io::Result<()>;

    fn set_input_timeout_ms(&mut self, timeout_ms: u64);

    fn move_cursor(&mut self, row: u16, col: u16);

    fn write_text(&mut self, text: &str);

    fn clear(&mut self);

    fn flush(&mut self) -> io::Result<()>;

    fn columns(&self) -> u16;

    /// One raw input unit, or `None` when nothing arrived in time.
    fn read_input_unit(&mut self, mode: ReadMode) -> io::Result<Option<u8>>;

    /// Restore the terminal. Must tolerate being called when already closed.
    fn close_screen(&mut self) -> io::Result<()>;

    fn is_closed(&self) -> bool;
}
