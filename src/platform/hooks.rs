//! Signal and panic cleanup hooks.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

#[cfg(unix)]
use libc::c_int;
#[cfg(unix)]
use signal_hook::iterator::Signals;

fn run_cleanup_once<F>(cleanup: &F, ran: &AtomicBool, signal: i32)
where
    F: Fn(i32) + ?Sized,
{
    if !ran.swap(true, Ordering::SeqCst) {
        cleanup(signal);
    }
}

/// Keeps the SIGINT/SIGTERM listener alive; closing it joins the listener thread.
#[cfg(unix)]
pub struct SignalHookGuard {
    handle: signal_hook::iterator::Handle,
    thread: Option<JoinHandle<()>>,
}

#[cfg(unix)]
impl Drop for SignalHookGuard {
    fn drop(&mut self) {
        self.handle.close();
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

/// Runs `cleanup(signal)` at most once on the first SIGINT/SIGTERM/SIGHUP.
#[cfg(unix)]
pub fn install_signal_handlers<F>(cleanup: F) -> std::io::Result<SignalHookGuard>
where
    F: Fn(i32) + Send + Sync + 'static,
{
    let mut signals = Signals::new([libc::SIGINT, libc::SIGTERM, libc::SIGHUP])?;
    let handle = signals.handle();
    let ran = Arc::new(AtomicBool::new(false));

    let thread = thread::spawn(move || {
        for signal in signals.forever() {
            tracing::info!(signal, "terminating on signal");
            run_cleanup_once(&cleanup, &ran, signal);
        }
    });

    Ok(SignalHookGuard {
        handle,
        thread: Some(thread),
    })
}

/// Wraps the current panic hook so `cleanup` runs once before it.
pub fn install_panic_hook<F>(cleanup: F)
where
    F: Fn() + Send + Sync + 'static,
{
    let ran = AtomicBool::new(false);
    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        if !ran.swap(true, Ordering::SeqCst) {
            cleanup();
        }
        previous(info);
    }));
}

/// Minimal terminal writer for signal/panic cleanup.
///
/// Never panics and never blocks: it writes to a non-blocking `/dev/tty` and
/// drops output it cannot write right away.
#[cfg(unix)]
pub(crate) struct HookWriter {
    fd: c_int,
    owns_fd: bool,
}

#[cfg(unix)]
impl HookWriter {
    pub(crate) fn new() -> Self {
        let flags = libc::O_WRONLY | libc::O_NONBLOCK | libc::O_NOCTTY | libc::O_CLOEXEC;
        let fd = unsafe { libc::open(c"/dev/tty".as_ptr(), flags) };
        if fd >= 0 {
            Self { fd, owns_fd: true }
        } else {
            Self {
                fd: -1,
                owns_fd: false,
            }
        }
    }

    pub(crate) fn write_best_effort(&mut self, data: &str) {
        if self.fd < 0 || data.is_empty() {
            return;
        }

        let bytes = data.as_bytes();
        let mut written = 0;
        while written < bytes.len() {
            let remaining = &bytes[written..];
            let result = unsafe {
                libc::write(
                    self.fd,
                    remaining.as_ptr() as *const libc::c_void,
                    remaining.len(),
                )
            };
            if result > 0 {
                written = written.saturating_add(result as usize);
                continue;
            }
            if result == 0 {
                break;
            }
            if std::io::Error::last_os_error().kind() == std::io::ErrorKind::Interrupted {
                continue;
            }
            break;
        }
    }
}

#[cfg(unix)]
impl Drop for HookWriter {
    fn drop(&mut self) {
        if self.owns_fd {
            unsafe {
                libc::close(self.fd);
            }
        }
    }
}
