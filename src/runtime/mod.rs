//! Screen event loop.

pub mod input;
pub mod screen;

pub use input::KeyReader;
pub use screen::{Screen, ScreenSettings, ScreenState};
