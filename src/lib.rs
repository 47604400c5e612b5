//! Agent Term
//!
//! A terminal view component for AI-agent-driven PTY sessions.
//!
//! # Features
//! - Binds one terminal surface to one PTY session per session id
//! - Forwards surface input to the PTY and PTY output to the surface
//! - Scrubs terminal-query echo artifacts from output before display
//! - Maps container pixel dimensions to a column/row grid and keeps the
//!   PTY size in sync
//! - Inserts shell-quoted filesystem paths on file drop
//! - Ships a `portable-pty`-backed bridge and a `vte`-backed screen model
//!   so the component runs end to end out of the box

pub mod core;
pub mod pty;
pub mod terminal;
pub mod view;

pub use self::core::config::{Config, SessionConfig};
pub use self::core::theme::{Theme, ThemeOverride, ThemeVariant};
pub use pty::{PtyBridge, PtyHost, StartRequest, Subscription};
pub use terminal::{ScreenOptions, TerminalSurface, VteScreen};
pub use view::{TerminalView, ViewHooks};
