//! HTTP client for the listing price prediction endpoint.
//!
//! The endpoint contract is a single `POST` with a JSON [`ListingQuery`] body.
//! The response is an envelope:
//!
//! ```json
//! { "success": true, "price": 182.5, "range_low": 160, "range_high": 205,
//!   "rf": 179.0, "tier": "Standard Class",
//!   "impact": { "Size": 0.4, "Beds": 0.2, "Baths": 0.1, "Amenities": 0.3 },
//!   "insights": ["..."] }
//! ```
//!
//! or `{ "success": false, "error": "..." }` (possibly with a 4xx status).

use reqwest::StatusCode;
use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::domain::{DashboardSettings, ListingQuery, PredictionResult};
use crate::error::AppError;

/// Why a submission produced no result.
///
/// None of these are fatal: the dashboard keeps its last good state.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClientFailure {
    #[error("prediction request failed: {0}")]
    Transport(String),
    #[error("prediction service answered with HTTP {0}")]
    HttpStatus(u16),
    #[error("could not decode prediction response: {0}")]
    Decode(String),
    #[error("prediction rejected: {}", .0.as_deref().unwrap_or("no reason given"))]
    Rejected(Option<String>),
}

/// One request/response exchange with a prediction backend.
///
/// Implementations must be callable from a worker thread.
pub trait PredictionService: Send + Sync {
    fn predict(&self, query: &ListingQuery) -> Result<PredictionResult, ClientFailure>;
}

/// Blocking `reqwest` implementation of [`PredictionService`].
///
/// Exactly one attempt per call; no retries.
pub struct HttpPredictionClient {
    client: Client,
    endpoint: String,
}

impl HttpPredictionClient {
    pub fn new(settings: &DashboardSettings) -> Result<Self, AppError> {
        // The blocking client defaults to a 30s timeout; `None` must really mean "wait".
        let client = Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|e| AppError::config(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            endpoint: settings.endpoint.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl PredictionService for HttpPredictionClient {
    fn predict(&self, query: &ListingQuery) -> Result<PredictionResult, ClientFailure> {
        tracing::debug!(endpoint = %self.endpoint, neighborhood = %query.neighborhood, "posting prediction query");

        let resp = self
            .client
            .post(&self.endpoint)
            .json(query)
            .send()
            .map_err(|e| ClientFailure::Transport(e.to_string()))?;

        let status = resp.status();
        let body = resp
            .text()
            .map_err(|e| ClientFailure::Transport(e.to_string()))?;

        interpret_response(status, &body)
    }
}

/// Turn a status and body into a result.
///
/// A readable envelope wins regardless of status; a non-2xx answer without one
/// is reported by status.
pub fn interpret_response(status: StatusCode, body: &str) -> Result<PredictionResult, ClientFailure> {
    match decode_envelope(body) {
        Err(ClientFailure::Decode(_)) if !status.is_success() => Err(ClientFailure::HttpStatus(status.as_u16())),
        other => other,
    }
}

#[derive(Debug, Deserialize)]
struct Envelope {
    success: bool,
    #[serde(default)]
    error: Option<String>,
    #[serde(flatten)]
    fields: Map<String, Value>,
}

/// Decode a response body into a result, honoring the `success` flag.
pub fn decode_envelope(body: &str) -> Result<PredictionResult, ClientFailure> {
    let envelope: Envelope =
        serde_json::from_str(body).map_err(|e| ClientFailure::Decode(e.to_string()))?;

    if !envelope.success {
        return Err(ClientFailure::Rejected(envelope.error));
    }

    serde_json::from_value(Value::Object(envelope.fields))
        .map_err(|e| ClientFailure::Decode(e.to_string()))
}
