//! Container resize tracking for TerminalView

use super::TerminalView;
use tracing::{debug, warn};

/// Approximate cell width in pixels; not measured from font metrics
pub const CELL_WIDTH_PX: f32 = 9.0;
/// Approximate cell height in pixels; not measured from font metrics
pub const CELL_HEIGHT_PX: f32 = 17.0;
/// Grid floor below which the view refuses to shrink
pub const MIN_COLS: u16 = 20;
/// Grid floor below which the view refuses to shrink
pub const MIN_ROWS: u16 = 10;

/// Map container pixel dimensions to a column/row grid.
///
/// Returns `None` for a hidden container (either dimension not positive).
pub fn grid_for_pixels(width: f32, height: f32) -> Option<(u16, u16)> {
    if width <= 0.0 || height <= 0.0 {
        return None;
    }
    let cols = ((width / CELL_WIDTH_PX).floor() as u16).max(MIN_COLS);
    let rows = ((height / CELL_HEIGHT_PX).floor() as u16).max(MIN_ROWS);
    Some((cols, rows))
}

impl TerminalView {
    /// React to an observed change of the container's content box.
    ///
    /// Hidden containers are ignored. When the computed grid differs from
    /// the surface's current geometry, the surface is resized and a PTY
    /// resize is issued; a bridge resize failure is logged and swallowed
    /// since the PTY may already have closed.
    pub fn handle_container_resize(&mut self, width: f32, height: f32) {
        if !self.is_active() {
            return;
        }
        let Some((cols, rows)) = grid_for_pixels(width, height) else {
            return;
        };

        {
            let mut surface = self.surface.lock();
            if surface.size() == (cols, rows) {
                return;
            }
            debug!(
                "Container resize: {width:.0}x{height:.0} -> {cols} cols x {rows} rows for session {}",
                self.config.id
            );
            surface.resize(cols, rows);
        }

        if let Err(e) = self.bridge.resize(&self.config.id, cols, rows) {
            warn!("PTY resize failed for session {}: {e}", self.config.id);
        }
    }
}
