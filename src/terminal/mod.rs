//! Terminal module - display-side collaborators of the view
//!
//! This module provides:
//! - `TerminalSurface`: the trait seam for the display surface
//! - `VteScreen`: a plain-text screen model backed by the `vte` parser
//! - `sanitize_chunk`: the output scrubber applied before every write

pub mod sanitize;
mod screen;
mod surface;

pub use sanitize::sanitize_chunk;
pub use screen::{ScreenOptions, VteScreen};
pub use surface::{InputCallback, SharedSurface, TerminalSurface};
