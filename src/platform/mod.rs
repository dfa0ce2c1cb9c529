//! Surface implementations and process-level hooks.

pub mod hooks;
pub mod process_surface;
pub mod recording;

pub use hooks::install_panic_hook;
#[cfg(unix)]
pub use hooks::{install_signal_handlers, SignalHookGuard};
#[cfg(unix)]
pub use process_surface::TerminalRestore;
pub use process_surface::ProcessSurface;
pub use recording::{RecordingSurface, SurfaceOp};
