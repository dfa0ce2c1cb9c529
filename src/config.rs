//! Environment configuration.

use std::env;

use crate::core::keymap::KeyMapConfig;
use crate::error::Result;

pub const DEFAULT_INPUT_TIMEOUT_MS: u64 = 100;
pub const DEFAULT_ESCAPE_DRAIN_MS: u64 = 5;
pub const DEFAULT_ESCAPE_MAX_UNITS: usize = 8;
pub const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Clone)]
pub struct EnvConfig {
    /// How long one idle tick waits for a key.
    pub input_timeout_ms: u64,
    /// How long a non-blocking read waits for the rest of an escape burst.
    pub escape_drain_ms: u64,
    /// Cap on units accumulated for one multi-unit key.
    pub escape_max_units: usize,
    /// Stop a search after this many matches.
    pub max_results: Option<usize>,
    pub keys: KeyMapConfig,
    pub log_file: Option<String>,
    pub log_filter: String,
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self {
            input_timeout_ms: DEFAULT_INPUT_TIMEOUT_MS,
            escape_drain_ms: DEFAULT_ESCAPE_DRAIN_MS,
            escape_max_units: DEFAULT_ESCAPE_MAX_UNITS,
            max_results: None,
            keys: KeyMapConfig::default(),
            log_file: None,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl EnvConfig {
    /// Reads `EXFUZ_*` variables. Malformed numbers fall back to defaults;
    /// malformed key bindings are an error.
    pub fn from_env() -> Result<Self> {
        let keys = match env_string_opt("EXFUZ_KEYS") {
            Some(spec) => KeyMapConfig::parse(&spec)?,
            None => KeyMapConfig::default(),
        };

        Ok(Self {
            input_timeout_ms: env_number("EXFUZ_INPUT_TIMEOUT_MS").unwrap_or(DEFAULT_INPUT_TIMEOUT_MS),
            escape_drain_ms: env_number("EXFUZ_ESCAPE_DRAIN_MS").unwrap_or(DEFAULT_ESCAPE_DRAIN_MS),
            escape_max_units: env_number("EXFUZ_ESCAPE_MAX_UNITS")
                .filter(|units| *units > 0)
                .unwrap_or(DEFAULT_ESCAPE_MAX_UNITS),
            max_results: env_number("EXFUZ_MAX_RESULTS"),
            keys,
            log_file: env_string_opt("EXFUZ_LOG"),
            log_filter: env_string_opt("EXFUZ_LOG_FILTER")
                .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string()),
        })
    }
}

fn env_number<T: std::str::FromStr>(key: &str) -> Option<T> {
    env_string_opt(key).and_then(|value| value.trim().parse().ok())
}

fn env_string_opt(key: &str) -> Option<String> {
    env::var(key).ok().and_then(|value| {
        if value.trim().is_empty() {
            None
        } else {
            Some(value)
        }
    })
}
