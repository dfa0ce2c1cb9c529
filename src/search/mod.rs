//! Candidate storage, loading and search commands.

pub mod candidates;
pub mod command;
pub mod loader;
pub mod source;

pub use candidates::{Candidate, Candidates};
pub use command::{CandidateSearch, SearchCommand, StaticSearch};
pub use loader::{load_source, load_sources, spawn_loader};
pub use source::SourceName;
