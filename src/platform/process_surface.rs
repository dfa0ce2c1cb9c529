//! Surface backed by the process's controlling terminal.

#[cfg(unix)]
use std::fs::{File, OpenOptions};
use std::io;
#[cfg(unix)]
use std::os::unix::fs::OpenOptionsExt;
#[cfg(unix)]
use std::os::unix::io::AsRawFd;

use crate::config::{DEFAULT_ESCAPE_DRAIN_MS, DEFAULT_INPUT_TIMEOUT_MS};
use crate::core::output::{OutputGate, TerminalCmd};
use crate::core::surface::{ReadMode, Surface};

#[cfg(unix)]
use libc::{self, c_int};

#[cfg(unix)]
fn wait_writable(fd: c_int) -> io::Result<()> {
    let mut fds = libc::pollfd {
        fd,
        events: libc::POLLOUT,
        revents: 0,
    };
    loop {
        let result = unsafe { libc::poll(&mut fds, 1, -1) };
        if result < 0 {
            let err = io::Error::last_os_error();
            if err.kind() == io::ErrorKind::Interrupted {
                continue;
            }
            return Err(err);
        }
        if result == 0 {
            continue;
        }
        if (fds.revents & libc::POLLOUT) != 0 {
            return Ok(());
        }

        return Err(io::Error::other(format!(
            "poll(POLLOUT) returned revents=0x{:x}",
            fds.revents
        )));
    }
}

#[cfg(unix)]
fn write_all_fd_with<FWrite, FWait>(
    fd: c_int,
    bytes: &[u8],
    mut write_once: FWrite,
    mut wait_writable: FWait,
) -> io::Result<()>
where
    FWrite: FnMut(c_int, &[u8]) -> io::Result<usize>,
    FWait: FnMut(c_int) -> io::Result<()>,
{
    let mut written = 0;
    while written < bytes.len() {
        match write_once(fd, &bytes[written..]) {
            Ok(0) => {
                return Err(io::Error::new(io::ErrorKind::WriteZero, "write returned 0"));
            }
            Ok(count) => {
                if count > bytes.len() - written {
                    return Err(io::Error::other("write returned more bytes than requested"));
                }
                written += count;
            }
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(err) if err.kind() == io::ErrorKind::WouldBlock => wait_writable(fd)?,
            Err(err) => return Err(err),
        }
    }
    Ok(())
}

#[cfg(unix)]
fn write_fd(fd: c_int, data: &str) -> io::Result<()> {
    if data.is_empty() {
        return Ok(());
    }
    write_all_fd_with(
        fd,
        data.as_bytes(),
        |fd, buf| {
            let result = unsafe { libc::write(fd, buf.as_ptr() as *const libc::c_void, buf.len()) };
            if result < 0 {
                Err(io::Error::last_os_error())
            } else {
                Ok(result as usize)
            }
        },
        wait_writable,
    )
}

#[cfg(unix)]
fn read_winsize(fd: c_int) -> Option<(u16, u16)> {
    let mut size = libc::winsize {
        ws_row: 0,
        ws_col: 0,
        ws_xpixel: 0,
        ws_ypixel: 0,
    };
    let result = unsafe { libc::ioctl(fd, libc::TIOCGWINSZ, &mut size) };
    if result == 0 && size.ws_col > 0 && size.ws_row > 0 {
        Some((size.ws_col, size.ws_row))
    } else {
        None
    }
}

#[cfg(unix)]
fn poll_readable(fd: c_int, timeout_ms: i32) -> io::Result<bool> {
    let mut fds = libc::pollfd {
        fd,
        events: libc::POLLIN,
        revents: 0,
    };
    let result = unsafe { libc::poll(&mut fds, 1, timeout_ms) };
    if result < 0 {
        let err = io::Error::last_os_error();
        // A signal (SIGWINCH) cut the wait short; treat as idle.
        if err.kind() == io::ErrorKind::Interrupted {
            return Ok(false);
        }
        return Err(err);
    }
    Ok(result > 0 && (fds.revents & libc::POLLIN) != 0)
}

#[cfg(unix)]
fn read_unit(fd: c_int) -> io::Result<Option<u8>> {
    let mut unit = 0u8;
    loop {
        let result = unsafe { libc::read(fd, &mut unit as *mut u8 as *mut libc::c_void, 1) };
        if result == 1 {
            return Ok(Some(unit));
        }
        if result == 0 {
            return Ok(None);
        }
        let err = io::Error::last_os_error();
        match err.kind() {
            io::ErrorKind::Interrupted => continue,
            io::ErrorKind::WouldBlock => return Ok(None),
            _ => return Err(err),
        }
    }
}

#[cfg(unix)]
fn get_termios(fd: c_int) -> io::Result<libc::termios> {
    let mut termios = unsafe { std::mem::zeroed::<libc::termios>() };
    let result = unsafe { libc::tcgetattr(fd, &mut termios) };
    if result != 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(termios)
}

#[cfg(unix)]
fn set_termios(fd: c_int, termios: &libc::termios) -> io::Result<()> {
    let result = unsafe { libc::tcsetattr(fd, libc::TCSANOW, termios) };
    if result != 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}

#[cfg(unix)]
fn clamp_timeout(ms: u64) -> i32 {
    ms.min(i32::MAX as u64) as i32
}

#[cfg(unix)]
fn leave_screen_cmds() -> [TerminalCmd; 2] {
    [TerminalCmd::ShowCursor, TerminalCmd::LeaveAltScreen]
}

#[cfg(unix)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lifecycle {
    Fresh,
    Open,
    Closed,
}

/// Snapshot of the terminal state a crash or signal handler needs to put
/// things back. Safe to use from any thread.
#[cfg(unix)]
#[derive(Clone, Copy)]
pub struct TerminalRestore {
    stdin_fd: c_int,
    original: libc::termios,
}

#[cfg(unix)]
impl TerminalRestore {
    /// Best-effort restore: leave the alternate screen, show the cursor, reset termios.
    pub fn restore(&self) {
        let mut hook = crate::platform::hooks::HookWriter::new();
        let mut gate = OutputGate::new();
        gate.extend(leave_screen_cmds());
        hook.write_best_effort(&gate.take_encoded());
        let _ = set_termios(self.stdin_fd, &self.original);
    }
}

#[cfg(unix)]
pub struct ProcessSurface {
    stdin_fd: c_int,
    stdout_fd: c_int,
    original_termios: Option<libc::termios>,
    output: OutputGate,
    input_timeout_ms: u64,
    drain_ms: u64,
    lifecycle: Lifecycle,
    // Owns both descriptors when opened from `/dev/tty`.
    tty: Option<File>,
}

#[cfg(unix)]
impl ProcessSurface {
    /// Surface over the process's stdin and stdout.
    pub fn new() -> Self {
        Self::with_fds(libc::STDIN_FILENO, libc::STDOUT_FILENO)
    }

    /// Surface over the controlling terminal, independent of redirected
    /// stdin or stdout.
    pub fn open_tty() -> io::Result<Self> {
        let tty = OpenOptions::new()
            .read(true)
            .write(true)
            .custom_flags(libc::O_NOCTTY | libc::O_CLOEXEC)
            .open("/dev/tty")?;
        Ok(Self::from_tty(tty))
    }

    pub(crate) fn from_tty(tty: File) -> Self {
        let fd = tty.as_raw_fd();
        let mut surface = Self::with_fds(fd, fd);
        surface.tty = Some(tty);
        surface
    }

    pub(crate) fn with_fds(stdin_fd: c_int, stdout_fd: c_int) -> Self {
        Self {
            stdin_fd,
            stdout_fd,
            original_termios: None,
            output: OutputGate::new(),
            input_timeout_ms: DEFAULT_INPUT_TIMEOUT_MS,
            drain_ms: DEFAULT_ESCAPE_DRAIN_MS,
            lifecycle: Lifecycle::Fresh,
            tty: None,
        }
    }

    /// Window a non-blocking read waits for the rest of an escape burst.
    pub fn with_drain_ms(mut self, drain_ms: u64) -> Self {
        self.drain_ms = drain_ms;
        self
    }

    /// Handle for signal/panic cleanup. `None` until the screen has been initialized.
    pub fn restore_handle(&self) -> Option<TerminalRestore> {
        self.original_termios.map(|original| TerminalRestore {
            stdin_fd: self.stdin_fd,
            original,
        })
    }

    /// Records the current terminal mode so a restore handle exists before
    /// the screen is initialized.
    pub fn capture_mode(&mut self) -> io::Result<TerminalRestore> {
        let original = self.original_mode()?;
        Ok(TerminalRestore {
            stdin_fd: self.stdin_fd,
            original,
        })
    }

    fn original_mode(&mut self) -> io::Result<libc::termios> {
        match self.original_termios {
            Some(original) => Ok(original),
            None => {
                let original = get_termios(self.stdin_fd)?;
                self.original_termios = Some(original);
                Ok(original)
            }
        }
    }

    fn enable_raw_mode(&mut self) -> io::Result<()> {
        let original = self.original_mode()?;
        let mut raw = original;
        unsafe {
            libc::cfmakeraw(&mut raw);
        }
        set_termios(self.stdin_fd, &raw)
    }

    fn restore_raw_mode(&mut self) -> io::Result<()> {
        if let Some(original) = self.original_termios.as_ref() {
            set_termios(self.stdin_fd, original)?;
        }
        Ok(())
    }
}

#[cfg(unix)]
impl Default for ProcessSurface {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(unix)]
impl Surface for ProcessSurface {
    fn init_screen(&mut self) -> io::Result<()> {
        if self.lifecycle != Lifecycle::Open {
            self.enable_raw_mode()?;
            self.output.push(TerminalCmd::EnterAltScreen);
            self.lifecycle = Lifecycle::Open;
        }
        self.output.push(TerminalCmd::Clear);
        Ok(())
    }

    fn set_echo(&mut self, enabled: bool) -> io::Result<()> {
        let mut termios = get_termios(self.stdin_fd)?;
        if enabled {
            termios.c_lflag |= libc::ECHO;
        } else {
            termios.c_lflag &= !libc::ECHO;
        }
        set_termios(self.stdin_fd, &termios)
    }

    fn set_input_timeout_ms(&mut self, timeout_ms: u64) {
        self.input_timeout_ms = timeout_ms;
    }

    fn move_cursor(&mut self, row: u16, col: u16) {
        self.output.push(TerminalCmd::MoveTo { row, col });
    }

    fn write_text(&mut self, text: &str) {
        self.output.push(TerminalCmd::text(text));
    }

    fn clear(&mut self) {
        self.output.push(TerminalCmd::Clear);
    }

    fn flush(&mut self) -> io::Result<()> {
        let encoded = self.output.take_encoded();
        write_fd(self.stdout_fd, &encoded)
    }

    fn columns(&self) -> u16 {
        read_winsize(self.stdout_fd)
            .map(|(cols, _)| cols)
            .unwrap_or(80)
    }

    fn read_input_unit(&mut self, mode: ReadMode) -> io::Result<Option<u8>> {
        let timeout_ms = match mode {
            ReadMode::WaitTimeout => self.input_timeout_ms,
            ReadMode::NonBlocking => self.drain_ms,
        };
        if !poll_readable(self.stdin_fd, clamp_timeout(timeout_ms))? {
            return Ok(None);
        }
        read_unit(self.stdin_fd)
    }

    fn close_screen(&mut self) -> io::Result<()> {
        if self.lifecycle != Lifecycle::Open {
            self.lifecycle = Lifecycle::Closed;
            return Ok(());
        }
        self.lifecycle = Lifecycle::Closed;

        self.output.clear();
        self.output.extend(leave_screen_cmds());
        let flushed = self.flush();

        // Drop pending input before leaving raw mode so it does not leak to the shell.
        let _ = unsafe { libc::tcflush(self.stdin_fd, libc::TCIFLUSH) };

        let restored = self.restore_raw_mode();
        flushed.and(restored)
    }

    fn is_closed(&self) -> bool {
        self.lifecycle == Lifecycle::Closed
    }
}

#[cfg(unix)]
impl Drop for ProcessSurface {
    fn drop(&mut self) {
        if self.lifecycle == Lifecycle::Open {
            let _ = self.close_screen();
        }
    }
}

#[cfg(not(unix))]
pub struct ProcessSurface;

#[cfg(not(unix))]
impl ProcessSurface {
    pub fn new() -> Self {
        Self
    }

    pub fn open_tty() -> io::Result<Self> {
        Ok(Self)
    }

    pub fn with_drain_ms(self, _drain_ms: u64) -> Self {
        self
    }
}

#[cfg(not(unix))]
impl Surface for ProcessSurface {
    fn init_screen(&mut self) -> io::Result<()> {
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "ProcessSurface is only supported on Unix platforms",
        ))
    }

    fn set_echo(&mut self, _enabled: bool) -> io::Result<()> {
        Ok(())
    }

    fn set_input_timeout_ms(&mut self, _timeout_ms: u64) {}

    fn move_cursor(&mut self, _row: u16, _col: u16) {}

    fn write_text(&mut self, _text: &str) {}

    fn clear(&mut self) {}

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn columns(&self) -> u16 {
        80
    }

    fn read_input_unit(&mut self, _mode: ReadMode) -> io::Result<Option<u8>> {
        Ok(None)
    }

    fn close_screen(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn is_closed(&self) -> bool {
        true
    }
}
