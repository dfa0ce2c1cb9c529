//! Crate error type.

use thiserror::Error;

/// Fatal conditions surfaced to the driver.
///
/// Idle input, unbound keys and clamped edits are expected states and never
/// produce an `Error`.
#[derive(Debug, Error)]
pub enum Error {
    /// Terminal or file I/O failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A configuration value could not be applied.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The search command could not run to completion.
    #[error("Search error: {0}")]
    Search(String),
}

pub type Result<T> = std::result::Result<T, Error>;
