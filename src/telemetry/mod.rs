//! Telemetry acquisition from the upstream vehicle-location endpoint.
//!
//! The upstream is a single HTTP GET returning a small JSON envelope with a
//! status code (`codigo`) that decides how the response is treated:
//!
//! - **1** - unit available, coordinates present (success)
//! - **2** - unit not available (an empty, successful result)
//! - **3** - parameter error (fatal for the call, never retried)
//! - **4** - internal server error (retryable)
//!
//! Transport failures, timeouts, HTTP 5xx, and code 4 are retried with
//! exponential backoff under a bounded [`RetryPolicy`]; parameter errors and
//! malformed responses fail the call immediately. Exhausting the retry
//! budget yields [`TelemetryError::Exhausted`], which callers must treat as
//! "source unavailable right now", never as a permanent condition.
//!
//! # Components
//!
//! - [`client`] - `TelemetryClient` trait and the `reqwest` implementation
//! - [`config`] - endpoint, API key, selector and timeout configuration
//! - [`error`] - `TelemetryError` with retryability classification
//! - [`retry`] - `RetryPolicy` with its delay schedule
//! - [`source`] - `TelemetrySource`, the retrying fetch used by the feed

mod client;
mod config;
mod error;
mod retry;
mod source;

pub use client::{HttpTelemetryClient, TelemetryClient, TelemetryEnvelope};
pub use config::{TelemetryConfig, ALL_UNITS, DEFAULT_BASE_URL, DEFAULT_REQUEST_TIMEOUT_SECS};
pub use error::TelemetryError;
pub use retry::{RetryPolicy, DEFAULT_BASE_DELAY, DEFAULT_MAX_RETRIES};
pub use source::TelemetrySource;
