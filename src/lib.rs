//! exfuz: a terminal fuzzy-finder front end.
//!
//! A [`Screen`] owns a character-cell [`Surface`], an editable [`Query`] on
//! the first display line and a [`Status`] indicator in its top-right corner.
//! Raw key input is decoded, resolved through a [`KeyMap`] and performed as an
//! [`Action`]; searches stream their matches back through a [`SearchCommand`].
//!
//! Invariant: only `Surface::flush` writes to the terminal.

pub mod config;
pub mod error;
pub mod logging;

pub mod core;
pub mod platform;
pub mod runtime;
pub mod search;

pub use crate::config::EnvConfig;
pub use crate::error::{Error, Result};

/// Query buffer and caret.
pub use crate::core::query::{Caret, Query};

/// Key decoding and bindings.
pub use crate::core::key::{decode, is_self_describing, KeyId};
pub use crate::core::keymap::{Action, ActionKind, KeyMap, KeyMapConfig};

/// Load status.
pub use crate::core::status::{LoadProgress, LoadStatus, Status};

/// Surface contract and implementations.
pub use crate::core::surface::{ReadMode, Surface};
pub use crate::platform::{ProcessSurface, RecordingSurface, SurfaceOp};

/// Screen runtime.
pub use crate::runtime::{KeyReader, Screen, ScreenSettings, ScreenState};

/// Candidates and search commands.
pub use crate::search::{
    Candidate, CandidateSearch, Candidates, SearchCommand, SourceName, StaticSearch,
};
