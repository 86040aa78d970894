//! Telemetry client trait and HTTP implementation.
//!
//! The [`TelemetryClient`] trait abstracts the transport so the retrying
//! source (and tests) can run against anything that yields envelopes.
//! [`HttpTelemetryClient`] is the production implementation: one GET per
//! call against the location endpoint via a pooled `reqwest::Client`.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;

use super::config::TelemetryConfig;
use super::error::TelemetryError;

/// JSON envelope returned by the location endpoint.
///
/// Unknown fields are ignored; the coordinate and vector fields are only
/// present when `codigo` reports the unit as available.
#[derive(Debug, Clone, Deserialize)]
pub struct TelemetryEnvelope {
    /// Status code: 1 available, 2 unavailable, 3 parameter error,
    /// 4 internal error.
    pub codigo: i32,

    /// Human-readable message accompanying the status code.
    #[serde(default)]
    pub mensaje: String,

    pub latitud: Option<f64>,
    pub longitud: Option<f64>,

    /// Speed in km/h.
    pub velocidad: Option<f64>,

    /// Heading in degrees.
    pub orientacion: Option<f64>,
}

/// Trait for fetching one telemetry envelope.
///
/// Implementations map transport-level failures to [`TelemetryError`];
/// interpreting the envelope's status code is the source's job.
pub trait TelemetryClient: Send + Sync {
    /// Fetch the envelope for the given unit selector (0 = all units).
    fn fetch_envelope(
        &self,
        selector: u32,
    ) -> impl Future<Output = Result<TelemetryEnvelope, TelemetryError>> + Send;
}

impl<T: TelemetryClient> TelemetryClient for Arc<T> {
    fn fetch_envelope(
        &self,
        selector: u32,
    ) -> impl Future<Output = Result<TelemetryEnvelope, TelemetryError>> + Send {
        T::fetch_envelope(self, selector)
    }
}

/// HTTP client for the location endpoint.
///
/// Holds a reusable `reqwest::Client` with the configured request timeout;
/// no other state is retained between calls.
pub struct HttpTelemetryClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    request_timeout: Duration,
}

impl HttpTelemetryClient {
    /// Build a client from the telemetry configuration.
    pub fn new(config: &TelemetryConfig) -> Self {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            http,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
            request_timeout: config.request_timeout,
        }
    }
}

impl TelemetryClient for HttpTelemetryClient {
    async fn fetch_envelope(&self, selector: u32) -> Result<TelemetryEnvelope, TelemetryError> {
        let response = self
            .http
            .get(&self.base_url)
            .query(&[
                ("id", selector.to_string()),
                ("apikey", self.api_key.clone()),
            ])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    TelemetryError::Timeout(self.request_timeout)
                } else {
                    TelemetryError::Transport(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(TelemetryError::HttpStatus {
                status: status.as_u16(),
            });
        }

        let bytes = response.bytes().await.map_err(|e| {
            if e.is_timeout() {
                TelemetryError::Timeout(self.request_timeout)
            } else {
                TelemetryError::Transport(e.to_string())
            }
        })?;

        tracing::trace!(selector, bytes = bytes.len(), "Telemetry response received");

        serde_json::from_slice(&bytes).map_err(|e| TelemetryError::Decode(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_client_from_config() {
        let config = TelemetryConfig {
            base_url: "http://localhost/ubicacion".to_string(),
            api_key: "key".to_string(),
            ..Default::default()
        };
        let client = HttpTelemetryClient::new(&config);
        assert_eq!(client.base_url, "http://localhost/ubicacion");
        assert_eq!(client.api_key, "key");
        assert_eq!(client.request_timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_envelope_deserialize_available() {
        let json = r#"{
            "codigo": 1,
            "mensaje": "Disponible",
            "latitud": 32.4427,
            "longitud": -116.9883,
            "velocidad": 38.5,
            "orientacion": 145.0
        }"#;

        let envelope: TelemetryEnvelope = serde_json::from_str(json).unwrap();
        assert_eq!(envelope.codigo, 1);
        assert_eq!(envelope.latitud, Some(32.4427));
        assert_eq!(envelope.longitud, Some(-116.9883));
        assert_eq!(envelope.velocidad, Some(38.5));
        assert_eq!(envelope.orientacion, Some(145.0));
    }

    #[test]
    fn test_envelope_deserialize_unavailable() {
        let json = r#"{"codigo": 2, "mensaje": "No disponible"}"#;

        let envelope: TelemetryEnvelope = serde_json::from_str(json).unwrap();
        assert_eq!(envelope.codigo, 2);
        assert_eq!(envelope.mensaje, "No disponible");
        assert_eq!(envelope.latitud, None);
        assert_eq!(envelope.velocidad, None);
    }

    #[test]
    fn test_envelope_deserialize_ignores_extra_fields() {
        let json = r#"{
            "codigo": 1,
            "mensaje": "Disponible",
            "latitud": 32.0,
            "longitud": -116.0,
            "velocidad": 40.0,
            "orientacion": 90.0,
            "unidad": "073",
            "ruta": "M1 R18"
        }"#;

        let envelope: TelemetryEnvelope = serde_json::from_str(json).unwrap();
        assert_eq!(envelope.codigo, 1);
    }

    #[test]
    fn test_envelope_deserialize_missing_mensaje() {
        let json = r#"{"codigo": 4}"#;

        let envelope: TelemetryEnvelope = serde_json::from_str(json).unwrap();
        assert_eq!(envelope.codigo, 4);
        assert!(envelope.mensaje.is_empty());
    }

    #[test]
    fn test_envelope_rejects_non_object() {
        let result: Result<TelemetryEnvelope, _> = serde_json::from_str("\"<html>error\"");
        assert!(result.is_err());
    }
}
