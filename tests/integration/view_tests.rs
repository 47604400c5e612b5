//! View lifecycle and wiring tests against fake collaborators

use crate::fakes::{FakeBridge, FakeSurface};
use agent_term::{SessionConfig, TerminalView, ViewHooks};
use parking_lot::Mutex;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

fn view_with(
    surface: &Arc<Mutex<FakeSurface>>,
    bridge: &Arc<FakeBridge>,
    hooks: ViewHooks,
) -> TerminalView {
    TerminalView::new(
        SessionConfig::new("s1"),
        surface.clone(),
        bridge.clone(),
        hooks,
    )
}

async fn settle() {
    tokio::time::sleep(Duration::from_millis(25)).await;
}

#[tokio::test]
async fn test_one_attach_and_one_dispose_per_cycle() {
    let surface = Arc::new(Mutex::new(FakeSurface::new()));
    let bridge = Arc::new(FakeBridge::new());
    let mut view = view_with(&surface, &bridge, ViewHooks::new());

    view.activate();
    view.activate();
    view.tick();
    settle().await;

    assert_eq!(surface.lock().attach_count, 1);
    // Immediate focus plus the deferred tick focus
    assert!(surface.lock().focus_count >= 2);
    assert!(view.is_active());

    view.deactivate();
    view.deactivate();

    assert_eq!(surface.lock().dispose_count, 1);
    // Data and exit subscriptions both released
    assert_eq!(*bridge.cancelled.lock(), 2);
    assert!(bridge.log.lock().iter().any(|l| l == "kill:s1"));
    assert!(!view.is_active());
}

#[tokio::test]
async fn test_drop_tears_the_cycle_down() {
    let surface = Arc::new(Mutex::new(FakeSurface::new()));
    let bridge = Arc::new(FakeBridge::new());
    {
        let mut view = view_with(&surface, &bridge, ViewHooks::new());
        view.activate();
        settle().await;
    }
    assert_eq!(surface.lock().dispose_count, 1);
    assert!(bridge.log.lock().iter().any(|l| l == "kill:s1"));
}

#[tokio::test]
async fn test_start_success_invokes_hook() {
    let surface = Arc::new(Mutex::new(FakeSurface::new()));
    let bridge = Arc::new(FakeBridge::new());
    let started = Arc::new(Mutex::new(false));
    let seen = started.clone();
    let hooks = ViewHooks::new().on_start_success(move || *seen.lock() = true);
    let mut view = view_with(&surface, &bridge, hooks);

    view.activate();
    settle().await;

    assert!(*started.lock());
    assert!(bridge.log.lock().iter().any(|l| l == "start:s1"));
    view.deactivate();
}

#[tokio::test]
async fn test_start_failure_writes_error_line_and_invokes_hook() {
    let surface = Arc::new(Mutex::new(FakeSurface::new()));
    let bridge = Arc::new(FakeBridge::failing_start("spawn ENOENT"));
    let errors: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let seen = errors.clone();
    let hooks = ViewHooks::new().on_start_error(move |msg| seen.lock().push(msg.to_string()));
    let mut view = view_with(&surface, &bridge, hooks);

    view.activate();
    settle().await;

    let text = surface.lock().all_text();
    assert!(text.contains("Failed to start PTY"));
    assert!(text.contains("spawn ENOENT"));
    assert_eq!(errors.lock().as_slice(), ["spawn ENOENT".to_string()]);
    view.deactivate();
}

#[tokio::test]
async fn test_early_exit_reports_startup_failure() {
    let surface = Arc::new(Mutex::new(FakeSurface::new()));
    let bridge = Arc::new(FakeBridge::new());
    let errors: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let seen = errors.clone();
    let hooks = ViewHooks::new().on_start_error(move |msg| seen.lock().push(msg.to_string()));
    let mut view = view_with(&surface, &bridge, hooks);

    view.activate();
    settle().await;

    // Well inside the 1500 ms startup window
    bridge.fire_exit(Some(1));

    let errors = errors.lock();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains('1'));
    drop(errors);
    view.deactivate();
}

#[tokio::test]
async fn test_activity_hook_fires_before_input_is_forwarded() {
    let surface = Arc::new(Mutex::new(FakeSurface::new()));
    let bridge = Arc::new(FakeBridge::new());
    let log = bridge.log.clone();
    let hooks = ViewHooks::new().on_activity(move || log.lock().push("activity".to_string()));
    let mut view = view_with(&surface, &bridge, hooks);

    view.activate();
    settle().await;
    surface.lock().feed_input(b"ls\n");

    let log = bridge.log.lock();
    let activity = log.iter().position(|l| l == "activity").unwrap();
    let input = log.iter().position(|l| l == "input:ls\n").unwrap();
    assert!(activity < input);
    drop(log);
    view.deactivate();
}

#[tokio::test]
async fn test_resize_pushes_changed_geometry_to_surface_and_pty() {
    let surface = Arc::new(Mutex::new(FakeSurface::new()));
    let bridge = Arc::new(FakeBridge::new());
    let mut view = view_with(&surface, &bridge, ViewHooks::new());
    view.activate();
    settle().await;

    view.handle_container_resize(900.0, 510.0);
    assert_eq!(surface.lock().resizes.as_slice(), [(100, 30)]);
    assert!(bridge.log.lock().iter().any(|l| l == "resize:100x30"));

    // Unchanged geometry issues nothing
    view.handle_container_resize(900.0, 510.0);
    assert_eq!(surface.lock().resizes.len(), 1);

    // Hidden container issues nothing
    view.handle_container_resize(0.0, 510.0);
    view.handle_container_resize(900.0, 0.0);
    assert_eq!(surface.lock().resizes.len(), 1);

    // Tiny container clamps to the minimum grid
    view.handle_container_resize(50.0, 50.0);
    assert_eq!(surface.lock().resizes.last(), Some(&(20, 10)));
    view.deactivate();
}

#[tokio::test]
async fn test_resize_failure_is_swallowed() {
    let surface = Arc::new(Mutex::new(FakeSurface::new()));
    let bridge = Arc::new(FakeBridge::new());
    *bridge.fail_resize.lock() = true;
    let mut view = view_with(&surface, &bridge, ViewHooks::new());
    view.activate();
    settle().await;

    view.handle_container_resize(900.0, 510.0);

    // Surface still resized; the bridge failure never propagates
    assert_eq!(surface.lock().resizes.as_slice(), [(100, 30)]);
    view.deactivate();
}

#[tokio::test]
async fn test_file_drop_forwards_quoted_paths_and_refocuses() {
    let surface = Arc::new(Mutex::new(FakeSurface::new()));
    let bridge = Arc::new(FakeBridge::new());
    let mut view = view_with(&surface, &bridge, ViewHooks::new());
    view.activate();
    settle().await;
    let focus_before = surface.lock().focus_count;

    view.handle_file_drop(&[PathBuf::from("/a/b c.txt"), PathBuf::from("/d e/f")]);

    assert!(bridge
        .log
        .lock()
        .iter()
        .any(|l| l == "input:'/a/b c.txt' '/d e/f'"));
    assert!(surface.lock().focus_count > focus_before);

    // Nothing usable dropped: no input, no focus
    let log_len = bridge.log.lock().len();
    let focus_after = surface.lock().focus_count;
    view.handle_file_drop(&[]);
    view.handle_file_drop(&[PathBuf::from("")]);
    assert_eq!(bridge.log.lock().len(), log_len);
    assert_eq!(surface.lock().focus_count, focus_after);
    view.deactivate();
}

#[tokio::test]
async fn test_output_is_sanitized_before_write() {
    let surface = Arc::new(Mutex::new(FakeSurface::new()));
    let bridge = Arc::new(FakeBridge::new());
    let mut view = view_with(&surface, &bridge, ViewHooks::new());
    view.activate();
    settle().await;

    bridge.fire_data(b"\x1b[?1;2chello\r\n");

    let text = surface.lock().all_text();
    assert!(text.contains("hello"));
    assert!(!text.contains("\x1b[?1;2c"));
    view.deactivate();
}

#[tokio::test]
async fn test_history_replay_precedes_live_data() {
    let surface = Arc::new(Mutex::new(FakeSurface::new()));
    let bridge = Arc::new(FakeBridge::new());
    *bridge.history.lock() = Some(b"old output\r\n".to_vec());
    let mut view = view_with(&surface, &bridge, ViewHooks::new());

    view.activate();
    settle().await;
    bridge.fire_data(b"new output\r\n");

    let writes = surface.lock().writes.clone();
    let old = writes.iter().position(|w| w.contains("old output")).unwrap();
    let new = writes.iter().position(|w| w.contains("new output")).unwrap();
    assert!(old < new);

    view.deactivate();
    // Data, history and exit subscriptions all released
    assert_eq!(*bridge.cancelled.lock(), 3);
}

#[test]
fn test_activate_outside_runtime_reports_start_error() {
    let surface = Arc::new(Mutex::new(FakeSurface::new()));
    let bridge = Arc::new(FakeBridge::new());
    let errors: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let seen = errors.clone();
    let hooks = ViewHooks::new().on_start_error(move |msg| seen.lock().push(msg.to_string()));
    let mut view = view_with(&surface, &bridge, hooks);

    // No runtime here: the start must fail through the hook, not panic
    view.activate();

    assert_eq!(errors.lock().len(), 1);
    assert!(surface.lock().all_text().contains("Failed to start PTY"));
    assert!(!bridge.log.lock().iter().any(|l| l == "start:s1"));
    view.deactivate();
}

#[tokio::test]
async fn test_panicking_disposer_does_not_stop_teardown() {
    let surface = Arc::new(Mutex::new(FakeSurface::new()));
    let bridge = Arc::new(FakeBridge::new());
    *bridge.panic_data_cancel.lock() = true;
    let mut view = view_with(&surface, &bridge, ViewHooks::new());
    view.activate();
    settle().await;

    view.deactivate();

    // The exit subscription after the failing data one is still released,
    // and the PTY and surface still go down
    assert_eq!(*bridge.cancelled.lock(), 1);
    assert!(bridge.log.lock().iter().any(|l| l == "kill:s1"));
    assert_eq!(surface.lock().dispose_count, 1);
    assert!(!view.is_active());
}

#[tokio::test]
async fn test_attach_failure_aborts_activation() {
    let surface = Arc::new(Mutex::new(FakeSurface::failing_attach()));
    let bridge = Arc::new(FakeBridge::new());
    let failed = Arc::new(Mutex::new(false));
    let seen = failed.clone();
    let hooks = ViewHooks::new().on_start_error(move |_| *seen.lock() = true);
    let mut view = view_with(&surface, &bridge, hooks);

    view.activate();
    settle().await;

    assert!(!view.is_active());
    assert!(bridge.log.lock().is_empty());
    assert!(bridge.data_cbs.lock().is_empty());
    assert!(!surface.lock().has_input_callback());
    assert!(!*failed.lock());
}

#[tokio::test]
async fn test_theme_override_reaches_resolved_theme() {
    let surface = Arc::new(Mutex::new(FakeSurface::new()));
    let bridge = Arc::new(FakeBridge::new());
    let mut config = SessionConfig::new("s1");
    config.theme.background = Some("#123456".to_string());
    let view = TerminalView::new(config, surface.clone(), bridge.clone(), ViewHooks::new());

    assert_eq!(view.theme().background, "#123456");
    assert_eq!(view.theme().foreground, agent_term::Theme::dark().foreground);
}
