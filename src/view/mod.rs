//! Terminal view - binds one surface to one PTY session
//!
//! A `TerminalView` lives for exactly one activation cycle: construct it for
//! a session id, `activate` it, and `deactivate` (or drop) it when that id
//! goes away. A new session id means a new view; nothing is reused across
//! cycles.

mod io;
mod resize;

pub use io::startup_failure_message;
pub use resize::{grid_for_pixels, CELL_HEIGHT_PX, CELL_WIDTH_PX, MIN_COLS, MIN_ROWS};

use crate::core::config::SessionConfig;
use crate::core::theme::Theme;
use crate::pty::PtyBridge;
use crate::terminal::SharedSurface;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Instant;
use std::panic::{catch_unwind, AssertUnwindSafe};
use tracing::{error, warn};

/// Optional caller callbacks for view events
#[derive(Clone, Default)]
pub struct ViewHooks {
    pub(crate) on_activity: Option<Arc<dyn Fn() + Send + Sync>>,
    pub(crate) on_start_error: Option<Arc<dyn Fn(&str) + Send + Sync>>,
    pub(crate) on_start_success: Option<Arc<dyn Fn() + Send + Sync>>,
}

impl ViewHooks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Called before each input chunk is forwarded to the PTY
    pub fn on_activity(mut self, f: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_activity = Some(Arc::new(f));
        self
    }

    /// Called with the error message when the PTY fails to start, or when
    /// it exits early enough to count as a startup failure
    pub fn on_start_error(mut self, f: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.on_start_error = Some(Arc::new(f));
        self
    }

    /// Called once the PTY start call succeeds
    pub fn on_start_success(mut self, f: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_start_success = Some(Arc::new(f));
        self
    }
}

/// Terminal view bound to one PTY session.
///
/// Owns the surface for the duration of the activation cycle, forwards
/// surface input to the bridge, routes sanitized bridge output back to the
/// surface, and keeps PTY geometry in sync with the container.
pub struct TerminalView {
    pub(crate) config: SessionConfig,
    pub(crate) theme: Theme,
    pub(crate) bridge: Arc<dyn PtyBridge>,
    pub(crate) surface: SharedSurface,
    pub(crate) hooks: Arc<ViewHooks>,
    pub(crate) disposers: Vec<Box<dyn FnOnce() + Send>>,
    pub(crate) started_at: Arc<Mutex<Option<Instant>>>,
    active: bool,
    pending_focus: bool,
}

impl TerminalView {
    /// Create a view for a session. The surface should already be
    /// configured with the geometry and theme from `config`
    /// (see `ScreenOptions::for_session`).
    pub fn new(
        config: SessionConfig,
        surface: SharedSurface,
        bridge: Arc<dyn PtyBridge>,
        hooks: ViewHooks,
    ) -> Self {
        let theme = Theme::resolve(config.variant, &config.theme);
        Self {
            config,
            theme,
            bridge,
            surface,
            hooks: Arc::new(hooks),
            disposers: Vec::new(),
            started_at: Arc::new(Mutex::new(None)),
            active: false,
            pending_focus: false,
        }
    }

    /// The session id this view is bound to
    pub fn id(&self) -> &str {
        &self.config.id
    }

    /// The resolved theme for this session
    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    /// Whether the view is in an active cycle
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Activate the view: attach and focus the surface, wire the bridge
    /// subscriptions, and issue the asynchronous PTY start.
    ///
    /// If the surface cannot attach, activation aborts: no subscriptions
    /// are registered, no start is issued, no hooks fire.
    pub fn activate(&mut self) {
        if self.active {
            return;
        }

        {
            let mut surface = self.surface.lock();
            if let Err(e) = surface.attach() {
                error!("No container for terminal view {}: {e:#}", self.config.id);
                return;
            }
            surface.focus();
        }
        // Immediate focus can be lost to layout timing; focus again on the
        // next tick
        self.pending_focus = true;
        self.active = true;

        self.wire_input();
        self.wire_output();
        self.wire_exit();
        self.spawn_start();
    }

    /// Host scheduling tick; completes the deferred second focus
    pub fn tick(&mut self) {
        if self.active && self.pending_focus {
            self.surface.lock().focus();
            self.pending_focus = false;
        }
    }

    /// Tear the cycle down: run every disposer exactly once, kill the PTY
    /// regardless of whether start succeeded, and dispose the surface.
    /// A failing disposer does not stop the rest of the teardown.
    pub fn deactivate(&mut self) {
        if !self.active {
            return;
        }
        self.active = false;

        for disposer in self.disposers.drain(..) {
            if catch_unwind(AssertUnwindSafe(disposer)).is_err() {
                warn!("Subscription release failed for session {}", self.config.id);
            }
        }
        self.bridge.kill(&self.config.id);
        self.surface.lock().dispose();
    }
}

impl Drop for TerminalView {
    fn drop(&mut self) {
        self.deactivate();
    }
}
