//! File-backed tracing setup.
//!
//! The terminal belongs to the Screen, so log records never go to stdout or
//! stderr. Without `EXFUZ_LOG` no subscriber is installed and `tracing` macros
//! are no-ops.

use std::fs::{File, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::config::EnvConfig;
use crate::error::{Error, Result};

/// Installs the global subscriber when a log file is configured.
///
/// Returns `Ok(false)` when logging is disabled or a subscriber is already set.
pub fn init_logging(config: &EnvConfig) -> Result<bool> {
    let Some(path) = config.log_file.as_deref() else {
        return Ok(false);
    };
    let file = open_log_file(Path::new(path))?;
    let filter = EnvFilter::try_new(&config.log_filter)
        .map_err(|err| Error::Config(format!("invalid log filter `{}`: {err}", config.log_filter)))?;

    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .is_ok();
    Ok(installed)
}

fn open_log_file(path: &Path) -> Result<File> {
    Ok(OpenOptions::new().create(true).append(true).open(path)?)
}
