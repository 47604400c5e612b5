//! Agent Term - Entry Point
//!
//! Headless demo: binds a terminal view to a local PTY session, runs one
//! short shell command through the full input/sanitize/output path, and
//! prints the resulting screen contents.

use agent_term::{
    Config, PtyBridge, PtyHost, ScreenOptions, SessionConfig, TerminalView, ViewHooks, VteScreen,
};
use anyhow::Result;
use parking_lot::Mutex;
use std::sync::mpsc;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load().unwrap_or_else(|e| {
        warn!("Falling back to default config: {e:#}");
        Config::default()
    });

    let mut session = SessionConfig::new(uuid::Uuid::new_v4().to_string());
    session.variant = config.appearance.variant;
    session.theme = config.appearance.theme.clone();
    if !config.terminal.working_directory.is_empty() {
        session.working_directory = Some(config.terminal.working_directory.clone().into());
    }

    let screen = Arc::new(Mutex::new(VteScreen::new(ScreenOptions::for_session(
        &session,
        config.terminal.scrollback,
    ))));
    let bridge: Arc<PtyHost> = Arc::new(PtyHost::with_default_shell(config.terminal.shell.as_str()));

    let hooks = ViewHooks::new()
        .on_start_success(|| info!("PTY session started"))
        .on_start_error(|msg| error!("PTY start failed: {msg}"));

    let session_id = session.id.clone();
    let mut view = TerminalView::new(session.clone(), screen.clone(), bridge.clone(), hooks);

    // Observe the exit so the demo knows when to stop
    let (exit_tx, exit_rx) = mpsc::channel();
    let exit_sub = bridge.on_exit(
        &session_id,
        Arc::new(move |code| {
            let _ = exit_tx.send(code);
        }),
    );

    view.activate();
    view.tick();

    // Give the shell a moment to come up, then drive it through the
    // surface input path
    tokio::time::sleep(Duration::from_millis(500)).await;
    view.handle_container_resize(900.0, 510.0);
    screen.lock().feed_input(b"echo agent-term demo; exit\n");

    match exit_rx.recv_timeout(Duration::from_secs(10)) {
        Ok(code) => info!("Session ended with exit code {:?}", code),
        Err(_) => warn!("Timed out waiting for the session to end"),
    }

    println!("{}", screen.lock().text());

    exit_sub.unsubscribe();
    view.deactivate();
    Ok(())
}
