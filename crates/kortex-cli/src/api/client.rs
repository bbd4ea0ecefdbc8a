//! KORTEX REST API client.
//!
//! Uses reqwest to call the backend's auth, marker and admin endpoints.

use std::time::Duration;

use kortex_core::marker::{Marker, NewMarker};
use kortex_core::pending::RemotePendingUser;
use thiserror::Error;
use tracing::debug;

use super::Backend;
use super::types::{ErrorBody, TokenResponse};

/// API client errors.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// Connection refused, DNS failure, timeout and the like.
    #[error("Backend unreachable: {0}")]
    Unreachable(String),

    #[error("API error ({status}): {}", detail.as_deref().unwrap_or("no detail"))]
    Api { status: u16, detail: Option<String> },

    #[error("Invalid response body: {0}")]
    Decode(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ApiError {
    /// HTTP status for rejections, `None` for everything else.
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            Self::Decode(e.to_string())
        } else {
            Self::Unreachable(e.to_string())
        }
    }
}

/// Configuration for reaching a KORTEX backend.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL (e.g., "<http://127.0.0.1:8000>").
    pub base_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

/// KORTEX REST API client.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Create a new API client.
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        if config.base_url.trim().is_empty() {
            return Err(ApiError::Config("base_url is empty".into()));
        }

        // Ensure a TLS crypto provider is installed (reqwest uses rustls-no-provider).
        // The `Err` case just means it was already installed.
        let _ = rustls::crypto::ring::default_provider().install_default();

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ApiError::Config(e.to_string()))?;

        let base_url = config.base_url.trim().trim_end_matches('/').to_string();
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build the URL for a given path.
    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Pass through success responses; turn anything else into `ApiError::Api`
    /// carrying the backend's `detail` when it sent one.
    async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let detail = resp
            .json::<ErrorBody>()
            .await
            .ok()
            .and_then(ErrorBody::into_detail);
        debug!(status = status.as_u16(), ?detail, "Backend rejected request");
        Err(ApiError::Api {
            status: status.as_u16(),
            detail,
        })
    }
}

impl Backend for ApiClient {
    async fn login(&self, username: &str, password: &str) -> Result<TokenResponse, ApiError> {
        let resp = self
            .http
            .post(self.url("/token"))
            .form(&[("username", username), ("password", password)])
            .send()
            .await?;
        let resp = Self::check_status(resp).await?;
        Ok(resp.json().await?)
    }

    async fn register(&self, username: &str, password: &str) -> Result<(), ApiError> {
        let resp = self
            .http
            .post(self.url("/register"))
            .query(&[("username", username), ("password", password)])
            .send()
            .await?;
        Self::check_status(resp).await?;
        Ok(())
    }

    async fn list_markers(&self, token: &str) -> Result<Vec<Marker>, ApiError> {
        let resp = self
            .http
            .get(self.url("/markers"))
            .bearer_auth(token)
            .send()
            .await?;
        let resp = Self::check_status(resp).await?;
        Ok(resp.json().await?)
    }

    async fn create_marker(&self, token: &str, marker: &NewMarker) -> Result<(), ApiError> {
        let mut query = vec![
            ("lat", marker.lat.to_string()),
            ("lon", marker.lon.to_string()),
            ("type", marker.kind.clone()),
            ("label", marker.label.clone()),
        ];
        if let Some(desc) = &marker.description {
            query.push(("description", desc.clone()));
        }
        let resp = self
            .http
            .post(self.url("/markers"))
            .query(&query)
            .bearer_auth(token)
            .send()
            .await?;
        Self::check_status(resp).await?;
        Ok(())
    }

    async fn list_pending(&self, token: &str) -> Result<Vec<RemotePendingUser>, ApiError> {
        let resp = self
            .http
            .get(self.url("/admin/pending"))
            .bearer_auth(token)
            .send()
            .await?;
        let resp = Self::check_status(resp).await?;
        Ok(resp.json().await?)
    }

    async fn approve(&self, token: &str, user_id: i64) -> Result<(), ApiError> {
        let resp = self
            .http
            .post(self.url(&format!("/admin/approve/{user_id}")))
            .bearer_auth(token)
            .send()
            .await?;
        Self::check_status(resp).await?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn config(base_url: &str) -> ApiConfig {
        ApiConfig {
            base_url: base_url.into(),
            timeout: Duration::from_secs(1),
        }
    }

    #[test]
    fn empty_base_url_returns_config_error() {
        let err = ApiClient::new(&config("  ")).unwrap_err();
        assert!(matches!(err, ApiError::Config(_)));
    }

    #[test]
    fn trailing_slash_stripped_from_base_url() {
        let client = ApiClient::new(&config("http://127.0.0.1:8000/")).unwrap();
        assert_eq!(client.base_url(), "http://127.0.0.1:8000");
        assert_eq!(client.url("/markers"), "http://127.0.0.1:8000/markers");
    }

    #[test]
    fn api_error_display_includes_detail() {
        let err = ApiError::Api {
            status: 400,
            detail: Some("Incorrect username or password".into()),
        };
        assert_eq!(
            err.to_string(),
            "API error (400): Incorrect username or password"
        );
        assert_eq!(err.status(), Some(400));
    }

    #[test]
    fn api_error_display_without_detail() {
        let err = ApiError::Api {
            status: 500,
            detail: None,
        };
        assert_eq!(err.to_string(), "API error (500): no detail");
    }

    #[test]
    fn non_status_errors_have_no_status() {
        assert_eq!(ApiError::Unreachable("refused".into()).status(), None);
        assert_eq!(ApiError::Decode("eof".into()).status(), None);
    }
}
