//! Configuration for the telemetry source.

use std::time::Duration;

use super::retry::RetryPolicy;

/// Default production endpoint for unit locations.
pub const DEFAULT_BASE_URL: &str = "https://wstijuana45da56.nrtec-sys.com/tebsa/getUbicacion";

/// Default request timeout.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Selector value requesting the positions of all units.
pub const ALL_UNITS: u32 = 0;

/// Configuration for the telemetry source.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// Endpoint URL for the location query.
    pub base_url: String,

    /// API key sent with every request. An empty key means the source is
    /// not configured and every fetch fails fast without hitting the network.
    pub api_key: String,

    /// Unit selector: [`ALL_UNITS`] (0) for every unit, otherwise one unit id.
    pub unit_selector: u32,

    /// Timeout applied to each HTTP request.
    pub request_timeout: Duration,

    /// Retry budget and backoff schedule for transient failures.
    pub retry: RetryPolicy,
}

impl TelemetryConfig {
    /// Whether an API key has been provided.
    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty()
    }
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: String::new(),
            unit_selector: ALL_UNITS,
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            retry: RetryPolicy::default(),
        }
    }
}
