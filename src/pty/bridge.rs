//! PTY bridge capability
//!
//! The view never talks to a PTY directly; it goes through this trait so the
//! process-control side can be swapped out (local PTYs in production, fakes
//! in tests). Subscriptions hand back an unsubscribe guard that the view
//! folds into its disposal registry.

use crate::core::config::SessionConfig;
use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::sync::Arc;
use thiserror::Error;

/// Callback invoked with raw PTY output bytes
pub type OutputCallback = Arc<dyn Fn(&[u8]) + Send + Sync>;

/// Callback invoked with the process exit code, if one was observed
pub type ExitCallback = Arc<dyn Fn(Option<i32>) + Send + Sync>;

/// Future returned by [`PtyBridge::start`]
pub type StartFuture<'a> = Pin<Box<dyn Future<Output = anyhow::Result<()>> + Send + 'a>>;

/// Errors from synchronous bridge operations
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("no session with id {0}")]
    UnknownSession(String),
    #[error("session {0} is not running")]
    NotRunning(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Pty(String),
}

/// Parameters for starting a PTY session
#[derive(Debug, Clone)]
pub struct StartRequest {
    /// Opaque session identifier
    pub id: String,
    /// Working directory; `None` means the current directory
    pub cwd: Option<PathBuf>,
    /// Initial column count
    pub cols: u16,
    /// Initial row count
    pub rows: u16,
    /// Shell executable; `None` means the bridge default
    pub shell: Option<String>,
}

impl From<&SessionConfig> for StartRequest {
    fn from(config: &SessionConfig) -> Self {
        Self {
            id: config.id.clone(),
            cwd: config.working_directory.clone(),
            cols: config.cols,
            rows: config.rows,
            shell: config.shell.clone(),
        }
    }
}

/// Unsubscribe guard returned by bridge subscriptions.
///
/// The release action runs at most once, either through
/// [`Subscription::unsubscribe`] or after conversion into a disposer.
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    /// Wrap a release action
    pub fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// A subscription with nothing to release
    pub fn noop() -> Self {
        Self { cancel: None }
    }

    /// Run the release action now
    pub fn unsubscribe(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }

    /// Extract the release action for a disposal registry
    pub fn into_disposer(mut self) -> Box<dyn FnOnce() + Send> {
        self.cancel.take().unwrap_or_else(|| Box::new(|| {}))
    }
}

/// External PTY process control, injected into the view.
pub trait PtyBridge: Send + Sync {
    /// Start a PTY session. Issued once per activation; resolution is
    /// asynchronous so the view stays interactive while pending.
    fn start(&self, request: StartRequest) -> StartFuture<'_>;

    /// Forward input bytes to the session
    fn input(&self, id: &str, data: &[u8]) -> Result<(), BridgeError>;

    /// Resize the PTY
    fn resize(&self, id: &str, cols: u16, rows: u16) -> Result<(), BridgeError>;

    /// Terminate the session. Safe to call whether or not start succeeded.
    fn kill(&self, id: &str);

    /// Subscribe to live output
    fn on_data(&self, id: &str, callback: OutputCallback) -> Subscription;

    /// Subscribe to buffered history replay. Optional; bridges without
    /// history support return `None`.
    fn on_history(&self, _id: &str, _callback: OutputCallback) -> Option<Subscription> {
        None
    }

    /// Subscribe to process exit
    fn on_exit(&self, id: &str, callback: ExitCallback) -> Subscription;
}
