//! Logging setup for embedding applications.
//!
//! The library itself only emits `tracing` events; installing a subscriber
//! is the application's choice. This helper wires up a sensible console
//! subscriber for hosts that do not bring their own, configurable via the
//! `RUST_LOG` environment variable and defaulting to `info`.

use tracing_subscriber::EnvFilter;

/// Install a console `tracing` subscriber.
///
/// # Errors
///
/// Fails if a global subscriber is already set.
pub fn init_logging() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .try_init()
}
