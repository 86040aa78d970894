//! Retrying telemetry source.
//!
//! [`TelemetrySource`] wraps a [`TelemetryClient`] with envelope
//! interpretation and the bounded retry loop. Each call is independent; no
//! connection state survives between polls beyond the client's pool.

use crate::geo::Coordinate;
use crate::vehicle::VehiclePosition;

use super::client::{HttpTelemetryClient, TelemetryClient, TelemetryEnvelope};
use super::config::{TelemetryConfig, ALL_UNITS};
use super::error::TelemetryError;

/// Telemetry source: fetches current unit positions with bounded retry.
pub struct TelemetrySource<C: TelemetryClient> {
    client: C,
    config: TelemetryConfig,
}

impl TelemetrySource<HttpTelemetryClient> {
    /// Create a source over the production HTTP client.
    pub fn over_http(config: TelemetryConfig) -> Self {
        let client = HttpTelemetryClient::new(&config);
        Self::new(config, client)
    }
}

impl<C: TelemetryClient> TelemetrySource<C> {
    /// Create a source over an explicit client (injected in tests).
    pub fn new(config: TelemetryConfig, client: C) -> Self {
        Self { client, config }
    }

    /// The configuration this source was built with.
    pub fn config(&self) -> &TelemetryConfig {
        &self.config
    }

    /// Fetch the current unit positions.
    ///
    /// Transient failures are retried per the configured
    /// [`RetryPolicy`](super::RetryPolicy) with exponential backoff;
    /// non-retryable failures return immediately after a single attempt.
    /// An unavailable unit is an empty `Ok`, not an error.
    ///
    /// # Errors
    ///
    /// [`TelemetryError::Exhausted`] once the retry budget is spent on
    /// transient failures; the underlying error directly for fatal ones.
    pub async fn fetch_positions(&self) -> Result<Vec<VehiclePosition>, TelemetryError> {
        if !self.config.is_configured() {
            return Err(TelemetryError::NotConfigured);
        }

        let policy = self.config.retry;
        let mut attempt: u32 = 0;

        loop {
            attempt += 1;

            let result = self
                .client
                .fetch_envelope(self.config.unit_selector)
                .await
                .and_then(|envelope| interpret_envelope(envelope, self.config.unit_selector));

            match result {
                Ok(units) => {
                    tracing::debug!(attempt, units = units.len(), "Telemetry fetch succeeded");
                    return Ok(units);
                }
                Err(e) if e.is_retryable() && attempt <= policy.max_retries => {
                    let delay = policy.delay_for(attempt - 1);
                    tracing::debug!(
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "Telemetry fetch failed, backing off before retry"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) if e.is_retryable() => {
                    tracing::warn!(attempts = attempt, error = %e, "Telemetry retries exhausted");
                    return Err(TelemetryError::Exhausted {
                        attempts: attempt,
                        cause: Box::new(e),
                    });
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Telemetry fetch failed without retry");
                    return Err(e);
                }
            }
        }
    }
}

/// Interpret the status code of a decoded envelope.
fn interpret_envelope(
    envelope: TelemetryEnvelope,
    selector: u32,
) -> Result<Vec<VehiclePosition>, TelemetryError> {
    match envelope.codigo {
        1 => match (envelope.latitud, envelope.longitud) {
            (Some(latitude), Some(longitude)) => {
                let position = Coordinate::new(latitude, longitude)
                    .map_err(|e| TelemetryError::Decode(e.to_string()))?;
                Ok(vec![VehiclePosition {
                    unit_id: unit_id_for(selector),
                    position,
                    speed_kmh: envelope.velocidad.unwrap_or(0.0).max(0.0),
                    heading_degrees: envelope.orientacion.unwrap_or(0.0).rem_euclid(360.0),
                    available: true,
                }])
            }
            _ => {
                tracing::warn!("Unit reported available but without coordinates");
                Ok(Vec::new())
            }
        },
        2 => {
            tracing::debug!(selector, message = %envelope.mensaje, "Unit not available");
            Ok(Vec::new())
        }
        3 => Err(TelemetryError::Parameter(envelope.mensaje)),
        4 => Err(TelemetryError::Internal(envelope.mensaje)),
        code => Err(TelemetryError::UnknownStatus {
            code,
            message: envelope.mensaje,
        }),
    }
}

/// Unit id for a selector: the all-units selector has no single id upstream.
fn unit_id_for(selector: u32) -> String {
    if selector == ALL_UNITS {
        "auto".to_string()
    } else {
        selector.to_string()
    }
}
