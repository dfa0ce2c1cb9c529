//! Core types shared by the Screen and its collaborators.

pub mod fuzzy;
pub mod key;
pub mod keymap;
pub mod output;
pub mod query;
pub mod status;
pub mod surface;
