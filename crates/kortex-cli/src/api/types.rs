//! KORTEX REST API request and response types.

use serde::Deserialize;

/// Successful `POST /token` body.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub is_admin: bool,
}

/// Error body returned with non-success statuses.
///
/// `detail` is usually a string but validation failures carry a list.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub detail: Option<serde_json::Value>,
}

impl ErrorBody {
    pub(crate) fn into_detail(self) -> Option<String> {
        match self.detail? {
            serde_json::Value::String(s) => Some(s),
            serde_json::Value::Null => None,
            other => Some(other.to_string()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn token_response_full() {
        let json = r#"{"access_token": "eyJ", "token_type": "bearer", "is_admin": true}"#;
        let resp: TokenResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.access_token, "eyJ");
        assert_eq!(resp.token_type.as_deref(), Some("bearer"));
        assert!(resp.is_admin);
    }

    #[test]
    fn token_response_without_admin_flag() {
        let resp: TokenResponse = serde_json::from_str(r#"{"access_token": "t"}"#).unwrap();
        assert!(!resp.is_admin);
    }

    #[test]
    fn string_detail_passes_through() {
        let body: ErrorBody =
            serde_json::from_str(r#"{"detail": "Username already registered"}"#).unwrap();
        assert_eq!(body.into_detail().as_deref(), Some("Username already registered"));
    }

    #[test]
    fn structured_detail_is_stringified() {
        let body: ErrorBody =
            serde_json::from_str(r#"{"detail": [{"loc": ["query", "lat"], "msg": "field required"}]}"#)
                .unwrap();
        assert!(body.into_detail().unwrap().contains("field required"));
    }

    #[test]
    fn missing_detail_is_none() {
        let body: ErrorBody = serde_json::from_str("{}").unwrap();
        assert!(body.into_detail().is_none());
    }
}
