//! Rutalive - live bus tracking feed for fixed urban routes
//!
//! This library turns an unreliable upstream telemetry endpoint and a static
//! route geometry into a continuous stream of vehicle positions. When the
//! endpoint is healthy its positions are published verbatim; when it is not,
//! the feed falls back to a synthetic fleet advancing along the route so the
//! display never goes blank.
//!
//! # High-Level API
//!
//! ```ignore
//! use rutalive::feed::{FeedConfig, PositionFeed};
//! use rutalive::telemetry::TelemetryConfig;
//!
//! let telemetry = TelemetryConfig {
//!     api_key: "...".to_string(),
//!     ..Default::default()
//! };
//! let feed = PositionFeed::over_http(telemetry, FeedConfig::default());
//!
//! let mut updates = feed.subscribe();
//! feed.select_route(geometry);
//!
//! while let Ok(update) = updates.recv().await {
//!     // update.positions + update.status
//! }
//! ```

pub mod feed;
pub mod geo;
pub mod logging;
pub mod route;
pub mod sim;
pub mod stops;
pub mod telemetry;
pub mod vehicle;

/// Version of the rutalive library.
///
/// The version is defined in `Cargo.toml` and injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
