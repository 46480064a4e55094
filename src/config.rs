//! Backend configuration parsed from environment variables.

use crate::backend::BackendError;

pub const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_POLYLINE_PATH: &str = "/api/polylines/";
pub const DEFAULT_DRAWING_PATH: &str = "/api/drawings/";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackendTimeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

impl Default for BackendTimeouts {
    fn default() -> Self {
        Self { request_secs: DEFAULT_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendConfig {
    pub base_url: String,
    pub polyline_path: String,
    pub drawing_path: String,
    pub timeouts: BackendTimeouts,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BACKEND_URL.to_owned(),
            polyline_path: DEFAULT_POLYLINE_PATH.to_owned(),
            drawing_path: DEFAULT_DRAWING_PATH.to_owned(),
            timeouts: BackendTimeouts::default(),
        }
    }
}

impl BackendConfig {
    /// Build typed backend config from environment variables.
    ///
    /// All optional:
    /// - `CURVETOPIA_BACKEND_URL`: default `http://127.0.0.1:8000`
    /// - `CURVETOPIA_POLYLINE_PATH`: default `/api/polylines/`
    /// - `CURVETOPIA_DRAWING_PATH`: default `/api/drawings/`
    /// - `CURVETOPIA_REQUEST_TIMEOUT_SECS`: default 30
    /// - `CURVETOPIA_CONNECT_TIMEOUT_SECS`: default 10
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::ConfigParse`] if the base URL is not http(s).
    pub fn from_env() -> Result<Self, BackendError> {
        let base_url = parse_base_url(std::env::var("CURVETOPIA_BACKEND_URL").ok().as_deref())?;
        let polyline_path = normalize_path(
            &std::env::var("CURVETOPIA_POLYLINE_PATH").unwrap_or_else(|_| DEFAULT_POLYLINE_PATH.to_owned()),
        );
        let drawing_path = normalize_path(
            &std::env::var("CURVETOPIA_DRAWING_PATH").unwrap_or_else(|_| DEFAULT_DRAWING_PATH.to_owned()),
        );
        let timeouts = BackendTimeouts {
            request_secs: env_parse_u64("CURVETOPIA_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS),
            connect_secs: env_parse_u64("CURVETOPIA_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS),
        };

        Ok(Self { base_url, polyline_path, drawing_path, timeouts })
    }

    /// Same as the defaults but pointed at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::ConfigParse`] if the URL is not http(s).
    pub fn with_base_url(base_url: &str) -> Result<Self, BackendError> {
        Ok(Self { base_url: parse_base_url(Some(base_url))?, ..Self::default() })
    }

    /// Full URL of the polyline endpoint.
    #[must_use]
    pub fn polyline_url(&self) -> String {
        format!("{}{}", self.base_url, self.polyline_path)
    }

    /// Full URL of the drawing endpoint.
    #[must_use]
    pub fn drawing_url(&self) -> String {
        format!("{}{}", self.base_url, self.drawing_path)
    }
}

fn env_parse_u64(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(default)
}

fn parse_base_url(raw: Option<&str>) -> Result<String, BackendError> {
    let url = raw.unwrap_or(DEFAULT_BACKEND_URL).trim().trim_end_matches('/');
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(BackendError::ConfigParse(format!(
            "CURVETOPIA_BACKEND_URL must start with http:// or https:// (got '{url}')"
        )));
    }
    Ok(url.to_owned())
}

fn normalize_path(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.starts_with('/') { trimmed.to_owned() } else { format!("/{trimmed}") }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
