//! HTTP client for the beautification backend.
//!
//! Thin `reqwest` wrapper for the two endpoints. Response parsing lives in
//! pure functions so it can be tested without a server.

use std::time::Duration;

use canvas::stroke::{PolylineRequest, PolylineResponse};

use super::types::{BackendError, Beautifier, DrawingBody};
use crate::config::BackendConfig;

// =============================================================================
// CLIENT
// =============================================================================

pub struct HttpBeautifier {
    http: reqwest::Client,
    polyline_url: String,
    drawing_url: String,
}

impl HttpBeautifier {
    /// Build a client for the configured backend.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::HttpClientBuild`] if the HTTP client fails to build.
    pub fn new(config: &BackendConfig) -> Result<Self, BackendError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeouts.request_secs))
            .connect_timeout(Duration::from_secs(config.timeouts.connect_secs))
            .build()
            .map_err(|e| BackendError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, polyline_url: config.polyline_url(), drawing_url: config.drawing_url() })
    }

    async fn post_json<T: serde::Serialize + Sync>(&self, url: &str, body: &T) -> Result<String, BackendError> {
        let response = self
            .http
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| BackendError::ApiRequest(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| BackendError::ApiRequest(e.to_string()))?;

        if !status.is_success() {
            return Err(BackendError::ApiResponse { status: status.as_u16(), body: text });
        }
        Ok(text)
    }
}

#[async_trait::async_trait]
impl Beautifier for HttpBeautifier {
    async fn process_drawing(&self, csv: &str) -> Result<String, BackendError> {
        let body = DrawingBody { csv: csv.to_owned() };
        let text = self.post_json(&self.drawing_url, &body).await?;
        parse_drawing_response(&text)
    }

    async fn process_polylines(&self, request: &PolylineRequest) -> Result<PolylineResponse, BackendError> {
        let text = self.post_json(&self.polyline_url, request).await?;
        parse_polyline_response(&text)
    }
}

// =============================================================================
// PARSING
// =============================================================================

fn parse_drawing_response(json: &str) -> Result<String, BackendError> {
    let body: DrawingBody = serde_json::from_str(json).map_err(|e| BackendError::ApiParse(e.to_string()))?;
    Ok(body.csv)
}

fn parse_polyline_response(json: &str) -> Result<PolylineResponse, BackendError> {
    serde_json::from_str(json).map_err(|e| BackendError::ApiParse(e.to_string()))
}

#[cfg(test)]
#[path = "http_test.rs"]
mod tests;
