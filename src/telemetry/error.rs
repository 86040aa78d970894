//! Error types for the telemetry source.

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur when fetching unit positions.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// No API key configured; the request was never sent.
    #[error("telemetry API key not configured")]
    NotConfigured,

    /// Connection-level failure (DNS, connect, broken transfer).
    #[error("request failed: {0}")]
    Transport(String),

    /// The request exceeded the configured timeout.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// Non-success HTTP status from the endpoint.
    #[error("HTTP {status} from telemetry endpoint")]
    HttpStatus { status: u16 },

    /// The response body was not the expected JSON envelope.
    #[error("failed to decode response: {0}")]
    Decode(String),

    /// The endpoint rejected the request parameters (`codigo` 3).
    #[error("parameter error: {0}")]
    Parameter(String),

    /// The endpoint reported an internal error (`codigo` 4).
    #[error("internal error from endpoint: {0}")]
    Internal(String),

    /// A `codigo` value outside the documented set.
    #[error("unknown status code {code}: {message}")]
    UnknownStatus { code: i32, message: String },

    /// The retry budget was exhausted on transient failures.
    ///
    /// Carries the total attempt count and the last underlying failure.
    /// Means "source unavailable right now", not a permanent condition.
    #[error("telemetry unavailable after {attempts} attempts: {cause}")]
    Exhausted {
        attempts: u32,
        #[source]
        cause: Box<TelemetryError>,
    },
}

impl TelemetryError {
    /// Whether another attempt could plausibly succeed.
    ///
    /// Transport failures, timeouts, HTTP 5xx and upstream internal errors
    /// are transient; everything else fails the call immediately.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(_) | Self::Timeout(_) | Self::Internal(_) => true,
            Self::HttpStatus { status } => *status >= 500,
            _ => false,
        }
    }

    /// Total attempts behind this error (1 unless retries were exhausted).
    pub fn attempts(&self) -> u32 {
        match self {
            Self::Exhausted { attempts, .. } => *attempts,
            _ => 1,
        }
    }
}
