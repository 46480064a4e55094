//! Backend types: errors, wire bodies, and the `Beautifier` seam.

use canvas::stroke::{PolylineRequest, PolylineResponse};
use serde::{Deserialize, Serialize};

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced by backend configuration and requests.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// A configuration value could not be parsed.
    #[error("config parse failed: {0}")]
    ConfigParse(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),

    /// The HTTP request to the backend failed.
    #[error("API request failed: {0}")]
    ApiRequest(String),

    /// The backend returned a non-success HTTP status.
    #[error("API response error: status {status}")]
    ApiResponse { status: u16, body: String },

    /// The backend response body could not be deserialized.
    #[error("API response parse failed: {0}")]
    ApiParse(String),
}

impl BackendError {
    /// Whether retrying the same request could plausibly succeed. Nothing
    /// retries automatically; this only shapes the log line.
    #[must_use]
    pub fn retryable(&self) -> bool {
        matches!(self, Self::ApiRequest(_) | Self::ApiResponse { status: 429 | 500..=599, .. })
    }
}

// =============================================================================
// WIRE TYPES
// =============================================================================

/// Request and response body of the drawing endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawingBody {
    /// Newline-delimited flat text, one shape per line.
    pub csv: String,
}

// =============================================================================
// BEAUTIFIER TRAIT
// =============================================================================

/// Async access to the beautification backend. Enables mocking in tests.
#[async_trait::async_trait]
pub trait Beautifier: Send + Sync {
    /// Send a flat text doodle and receive the backend's flat text reply.
    ///
    /// # Errors
    ///
    /// Returns a [`BackendError`] if the request fails or the reply is not a
    /// drawing body.
    async fn process_drawing(&self, csv: &str) -> Result<String, BackendError>;

    /// Send one stroke and receive the beautified curves.
    ///
    /// # Errors
    ///
    /// Returns a [`BackendError`] if the request fails or the reply is not a
    /// list of path-command arrays.
    async fn process_polylines(&self, request: &PolylineRequest) -> Result<PolylineResponse, BackendError>;
}

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;
