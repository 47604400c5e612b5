//! PTY module - the bridge capability and its local implementation

mod bridge;
mod host;

pub use bridge::{
    BridgeError, ExitCallback, OutputCallback, PtyBridge, StartFuture, StartRequest, Subscription,
};
pub use host::PtyHost;
