//! Input routing, output processing and lifecycle wiring for TerminalView

use super::{TerminalView, ViewHooks};
use crate::pty::StartRequest;
use crate::terminal::{sanitize_chunk, SharedSurface};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::warn;

/// Exits this soon after start are treated as startup failures
const STARTUP_FAILURE_WINDOW: Duration = Duration::from_millis(1500);

/// Classify a PTY exit: an exit within the startup window yields the
/// start-error message, a later exit yields nothing (normal end of life is
/// the caller's concern).
pub fn startup_failure_message(elapsed: Duration, exit_code: Option<i32>) -> Option<String> {
    if elapsed >= STARTUP_FAILURE_WINDOW {
        return None;
    }
    let code = exit_code.map_or_else(|| "n/a".to_string(), |c| c.to_string());
    Some(format!("PTY exited during startup (exit code {code})"))
}

/// Single-quote a path for insertion into a shell command line
fn shell_quote(path: &str) -> String {
    format!("'{}'", path.replace('\'', "'\\''"))
}

/// Write the red failure line and fire the start-error hook
fn report_start_failure(surface: &SharedSurface, hooks: &ViewHooks, msg: &str) {
    surface
        .lock()
        .writeln(&format!("\x1b[31mFailed to start PTY: {msg}\x1b[0m"));
    if let Some(cb) = &hooks.on_start_error {
        cb(msg);
    }
}

impl TerminalView {
    /// Route surface input to the bridge. The activity hook fires before
    /// the input is forwarded; that ordering is part of the contract.
    pub(super) fn wire_input(&mut self) {
        let bridge = self.bridge.clone();
        let hooks = self.hooks.clone();
        let id = self.config.id.clone();
        self.surface.lock().on_input(Arc::new(move |data: &[u8]| {
            if let Some(cb) = &hooks.on_activity {
                cb();
            }
            if let Err(e) = bridge.input(&id, data) {
                warn!("PTY input failed for session {id}: {e}");
            }
        }));
    }

    /// Route live data and history replay through the sanitizer to the
    /// surface. Both feeds share one path; chunks are written as received,
    /// in arrival order, with no deduplication.
    pub(super) fn wire_output(&mut self) {
        let id = &self.config.id;

        let surface = self.surface.clone();
        let sub = self.bridge.on_data(
            id,
            Arc::new(move |data: &[u8]| {
                let text = String::from_utf8_lossy(data);
                surface.lock().write(&sanitize_chunk(&text));
            }),
        );
        self.disposers.push(sub.into_disposer());

        let surface = self.surface.clone();
        if let Some(sub) = self.bridge.on_history(
            id,
            Arc::new(move |data: &[u8]| {
                let text = String::from_utf8_lossy(data);
                surface.lock().write(&sanitize_chunk(&text));
            }),
        ) {
            self.disposers.push(sub.into_disposer());
        }
    }

    /// Watch for early exits that indicate the shell never came up
    pub(super) fn wire_exit(&mut self) {
        let hooks = self.hooks.clone();
        let started_at = self.started_at.clone();
        let sub = self.bridge.on_exit(
            &self.config.id,
            Arc::new(move |exit_code: Option<i32>| {
                let elapsed = (*started_at.lock()).map(|t| t.elapsed());
                let Some(elapsed) = elapsed else {
                    return;
                };
                if let Some(msg) = startup_failure_message(elapsed, exit_code) {
                    if let Some(cb) = &hooks.on_start_error {
                        cb(&msg);
                    }
                }
            }),
        );
        self.disposers.push(sub.into_disposer());
    }

    /// Issue the PTY start on a background task. Start errors surface as a
    /// red line in the terminal plus the start-error hook; the view never
    /// retries. Activating outside a tokio runtime is a start error like
    /// any other, not a panic.
    pub(super) fn spawn_start(&mut self) {
        *self.started_at.lock() = Some(Instant::now());

        let handle = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(_) => {
                report_start_failure(&self.surface, &self.hooks, "no async runtime available");
                return;
            }
        };

        let request = StartRequest::from(&self.config);
        let bridge = self.bridge.clone();
        let surface = self.surface.clone();
        let hooks = self.hooks.clone();
        handle.spawn(async move {
            match bridge.start(request).await {
                Ok(()) => {
                    if let Some(cb) = &hooks.on_start_success {
                        cb();
                    }
                }
                Err(e) => report_start_failure(&surface, &hooks, &format!("{e:#}")),
            }
        });
    }

    /// Insert dropped file paths as quoted PTY input, then refocus.
    /// Paths go straight to the bridge, not through the surface input
    /// path, so the activity hook does not fire.
    pub fn handle_file_drop(&mut self, paths: &[PathBuf]) {
        if !self.is_active() {
            return;
        }

        let joined = paths
            .iter()
            .filter_map(|p| {
                let s = p.to_string_lossy();
                (!s.is_empty()).then(|| shell_quote(&s))
            })
            .collect::<Vec<_>>()
            .join(" ");
        if joined.is_empty() {
            return;
        }

        if let Err(e) = self.bridge.input(&self.config.id, joined.as_bytes()) {
            warn!("Dropped-path input failed for session {}: {e}", self.config.id);
        }
        self.surface.lock().focus();
    }
}
