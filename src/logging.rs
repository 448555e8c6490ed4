//! Tracing subscriber setup.
//!
//! The bridge is embedded in a host process that may or may not have its
//! own subscriber, so installation is opt-in and idempotent.

use tracing_subscriber::EnvFilter;

/// Install the global fmt subscriber.
///
/// Filtering follows `RUST_LOG` when set, otherwise defaults to `info`.
/// Calling this when a subscriber is already installed is a no-op.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init();
}
