use serde_json::Value;
use thiserror::Error;

pub type Result<T, E = ClientError> = std::result::Result<T, E>;

/// Failures surfaced by the SDK.
///
/// Per-input rejections (blurry photo, no face, ...) are not errors: they come
/// back as [`crate::models::InputResult`] entries inside a successful response.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("HTTP error {status}: {body}")]
    Http { status: u16, body: Value },

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("Signature error: {0}")]
    Signature(String),
}

impl ClientError {
    /// Build an [`ClientError::Http`] from a status and a raw body, keeping the
    /// body as JSON when it parses and as a JSON string otherwise.
    pub fn http(status: u16, raw_body: &str) -> Self {
        let body = serde_json::from_str(raw_body)
            .unwrap_or_else(|_| Value::String(raw_body.to_string()));
        ClientError::Http { status, body }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ClientError::Http { status: 401, .. })
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, ClientError::Timeout(_))
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<config::ConfigError> for ClientError {
    fn from(err: config::ConfigError) -> Self {
        ClientError::Configuration(err.to_string())
    }
}

impl From<validator::ValidationErrors> for ClientError {
    fn from(err: validator::ValidationErrors) -> Self {
        ClientError::Configuration(err.to_string())
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ClientError::Timeout(err.to_string())
        } else if err.is_decode() {
            ClientError::Decode(err.to_string())
        } else {
            ClientError::Transport(err.to_string())
        }
    }
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        ClientError::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Decode(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_error_keeps_json_body() {
        let err = ClientError::http(422, r#"{"code":"bad"}"#);
        match err {
            ClientError::Http { status, body } => {
                assert_eq!(status, 422);
                assert_eq!(body["code"], "bad");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_http_error_falls_back_to_raw_text() {
        let err = ClientError::http(502, "upstream down");
        assert_eq!(err.status(), Some(502));
        match err {
            ClientError::Http { body, .. } => assert_eq!(body, Value::from("upstream down")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_unauthorized_predicate() {
        assert!(ClientError::http(401, "").is_unauthorized());
        assert!(!ClientError::http(403, "").is_unauthorized());
        assert!(!ClientError::Authentication("x".into()).is_unauthorized());
        assert!(ClientError::Timeout("slow".into()).is_timeout());
    }
}
