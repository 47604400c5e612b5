//! Terminal surface trait
//!
//! The seam between the view and whatever actually displays the terminal.
//! The crate ships `VteScreen` as a concrete implementation; tests substitute
//! fakes.

use parking_lot::Mutex;
use std::sync::Arc;

/// Callback invoked with user input bytes originating from the surface
pub type InputCallback = Arc<dyn Fn(&[u8]) + Send + Sync>;

/// Shared handle to a surface, lockable from view callbacks
pub type SharedSurface = Arc<Mutex<dyn TerminalSurface + Send>>;

/// A terminal display surface owned by one view activation cycle.
pub trait TerminalSurface: Send {
    /// Bind the surface to its container. Fails when no container is
    /// available, in which case the view aborts activation.
    fn attach(&mut self) -> anyhow::Result<()>;

    /// Request input focus
    fn focus(&mut self);

    /// Write already-sanitized text to the surface
    fn write(&mut self, text: &str);

    /// Write text followed by a line break
    fn writeln(&mut self, text: &str);

    /// Resize the surface grid
    fn resize(&mut self, cols: u16, rows: u16);

    /// Current grid geometry as (cols, rows)
    fn size(&self) -> (u16, u16);

    /// Register the callback receiving user input from the surface
    fn on_input(&mut self, callback: InputCallback);

    /// Release the surface. Later writes are ignored.
    fn dispose(&mut self);
}
