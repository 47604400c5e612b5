//! Local PTY bridge backed by portable-pty
//!
//! Spawns one shell per session, fans PTY output out to data subscribers
//! from a per-session reader thread, keeps a bounded history buffer for
//! replay, and delivers the exit code once the child is reaped.

use crate::pty::bridge::{
    BridgeError, ExitCallback, OutputCallback, PtyBridge, StartFuture, StartRequest, Subscription,
};
use anyhow::{Context, Result};
use parking_lot::Mutex;
use portable_pty::{native_pty_system, ChildKiller, CommandBuilder, MasterPty, PtySize};
use std::collections::HashMap;
use std::io::{Read, Write};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// History buffer cap per session (bytes, trimmed from the front)
const HISTORY_LIMIT: usize = 256 * 1024;

/// Per-session PTY state
#[derive(Default)]
struct PtySession {
    master: Option<Box<dyn MasterPty + Send>>,
    writer: Option<Box<dyn Write + Send>>,
    killer: Option<Box<dyn ChildKiller + Send + Sync>>,
    running: bool,
    history: Vec<u8>,
    next_sub: u64,
    data_subs: HashMap<u64, OutputCallback>,
    exit_subs: HashMap<u64, ExitCallback>,
}

/// PTY bridge over local pseudo-terminals
pub struct PtyHost {
    sessions: Arc<Mutex<HashMap<String, Arc<Mutex<PtySession>>>>>,
    default_shell: Option<String>,
}

impl Default for PtyHost {
    fn default() -> Self {
        Self::new()
    }
}

impl PtyHost {
    /// Create a host using `$SHELL` (falling back to `/bin/sh`) for
    /// sessions that do not name a shell
    pub fn new() -> Self {
        Self {
            sessions: Arc::new(Mutex::new(HashMap::new())),
            default_shell: None,
        }
    }

    /// Create a host with an explicit default shell
    pub fn with_default_shell(shell: impl Into<String>) -> Self {
        let shell = shell.into();
        Self {
            sessions: Arc::new(Mutex::new(HashMap::new())),
            default_shell: (!shell.is_empty()).then_some(shell),
        }
    }

    /// Get or create the state slot for a session id. Subscriptions may be
    /// registered before start is issued.
    fn session(&self, id: &str) -> Arc<Mutex<PtySession>> {
        self.sessions
            .lock()
            .entry(id.to_string())
            .or_default()
            .clone()
    }

    fn lookup(&self, id: &str) -> Result<Arc<Mutex<PtySession>>, BridgeError> {
        self.sessions
            .lock()
            .get(id)
            .cloned()
            .ok_or_else(|| BridgeError::UnknownSession(id.to_string()))
    }

    fn spawn_session(&self, request: StartRequest) -> Result<()> {
        let shell = request
            .shell
            .clone()
            .filter(|s| !s.is_empty())
            .or_else(|| self.default_shell.clone())
            .or_else(|| std::env::var("SHELL").ok())
            .unwrap_or_else(|| "/bin/sh".to_string());

        let pty_system = native_pty_system();
        let pair = pty_system
            .openpty(PtySize {
                rows: request.rows,
                cols: request.cols,
                pixel_width: 0,
                pixel_height: 0,
            })
            .context("Failed to create PTY")?;

        let mut cmd = CommandBuilder::new(&shell);
        if let Some(ref cwd) = request.cwd {
            cmd.cwd(cwd);
        } else if let Ok(cwd) = std::env::current_dir() {
            cmd.cwd(cwd);
        }

        // Color support for agent CLIs that probe the terminal
        cmd.env("TERM", "xterm-256color");
        cmd.env("COLORTERM", "truecolor");

        info!("Starting PTY session {}: {}", request.id, shell);

        let child = pair
            .slave
            .spawn_command(cmd)
            .with_context(|| format!("Failed to spawn {}", shell))?;
        let killer = child.clone_killer();
        let writer = pair
            .master
            .take_writer()
            .context("Failed to get PTY writer")?;
        let reader = pair
            .master
            .try_clone_reader()
            .context("Failed to get PTY reader")?;

        let session = self.session(&request.id);
        {
            let mut s = session.lock();
            s.master = Some(pair.master);
            s.writer = Some(writer);
            s.killer = Some(killer);
            s.running = true;
        }

        let id = request.id.clone();
        std::thread::spawn(move || reader_loop(id, session, reader, child));

        Ok(())
    }

    #[cfg(test)]
    fn data_subscriber_count(&self, id: &str) -> usize {
        self.session(id).lock().data_subs.len()
    }
}

impl PtyBridge for PtyHost {
    fn start(&self, request: StartRequest) -> StartFuture<'_> {
        Box::pin(async move { self.spawn_session(request) })
    }

    fn input(&self, id: &str, data: &[u8]) -> Result<(), BridgeError> {
        let session = self.lookup(id)?;
        let mut s = session.lock();
        let writer = s
            .writer
            .as_mut()
            .ok_or_else(|| BridgeError::NotRunning(id.to_string()))?;
        writer.write_all(data)?;
        writer.flush()?;
        Ok(())
    }

    fn resize(&self, id: &str, cols: u16, rows: u16) -> Result<(), BridgeError> {
        let session = self.lookup(id)?;
        let s = session.lock();
        let master = s
            .master
            .as_ref()
            .ok_or_else(|| BridgeError::NotRunning(id.to_string()))?;
        master
            .resize(PtySize {
                rows,
                cols,
                pixel_width: 0,
                pixel_height: 0,
            })
            .map_err(|e| BridgeError::Pty(e.to_string()))
    }

    fn kill(&self, id: &str) {
        let session = self.sessions.lock().remove(id);
        if let Some(session) = session {
            let killer = session.lock().killer.take();
            if let Some(mut killer) = killer {
                if let Err(e) = killer.kill() {
                    debug!("Kill for session {id}: {e}");
                }
            }
        }
    }

    fn on_data(&self, id: &str, callback: OutputCallback) -> Subscription {
        let session = self.session(id);
        let key = {
            let mut s = session.lock();
            let key = s.next_sub;
            s.next_sub += 1;
            s.data_subs.insert(key, callback);
            key
        };
        let weak = Arc::downgrade(&session);
        Subscription::new(move || {
            if let Some(session) = weak.upgrade() {
                session.lock().data_subs.remove(&key);
            }
        })
    }

    fn on_history(&self, id: &str, callback: OutputCallback) -> Option<Subscription> {
        let history = self.session(id).lock().history.clone();
        if !history.is_empty() {
            callback(&history);
        }
        Some(Subscription::noop())
    }

    fn on_exit(&self, id: &str, callback: ExitCallback) -> Subscription {
        let session = self.session(id);
        let key = {
            let mut s = session.lock();
            let key = s.next_sub;
            s.next_sub += 1;
            s.exit_subs.insert(key, callback);
            key
        };
        let weak = Arc::downgrade(&session);
        Subscription::new(move || {
            if let Some(session) = weak.upgrade() {
                session.lock().exit_subs.remove(&key);
            }
        })
    }
}

/// Reader loop for one session, run on its own thread
fn reader_loop(
    id: String,
    session: Arc<Mutex<PtySession>>,
    mut reader: Box<dyn Read + Send>,
    mut child: Box<dyn portable_pty::Child + Send + Sync>,
) {
    let mut buffer = [0u8; 4096];

    loop {
        match reader.read(&mut buffer) {
            Ok(0) => {
                debug!("PTY EOF for session {id}");
                break;
            }
            Ok(n) => {
                let data = &buffer[..n];
                let subs: Vec<OutputCallback> = {
                    let mut s = session.lock();
                    s.history.extend_from_slice(data);
                    if s.history.len() > HISTORY_LIMIT {
                        let excess = s.history.len() - HISTORY_LIMIT;
                        s.history.drain(..excess);
                    }
                    s.data_subs.values().cloned().collect()
                };
                // Callbacks run without the session lock held
                for cb in subs {
                    cb(data);
                }
            }
            Err(e) => {
                if e.kind() != std::io::ErrorKind::Interrupted {
                    warn!("PTY read error for session {id}: {e}");
                    break;
                }
            }
        }
    }

    let exit_code: Option<i32> = match child.wait() {
        Ok(status) => {
            info!("Session {id} exited with status: {:?}", status);
            Some(status.exit_code() as i32)
        }
        Err(e) => {
            error!("Failed to wait for session {id}: {e}");
            None
        }
    };

    let subs: Vec<ExitCallback> = {
        let mut s = session.lock();
        s.running = false;
        s.exit_subs.values().cloned().collect()
    };
    for cb in subs {
        cb(exit_code);
    }
}
