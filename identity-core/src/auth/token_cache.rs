use crate::client::{HttpRequest, RequestBody, Transport};
use crate::error::{ClientError, Result};
use http::Method;
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

pub const OAUTH_PATH: &str = "oauth";

/// Upper bound on a token lifetime, whatever `expires_in` says.
pub const MAX_TOKEN_LIFETIME: Duration = Duration::from_secs(365 * 24 * 60 * 60);

/// A bearer token and the instant it stops being usable.
#[derive(Debug, Clone)]
pub struct Token {
    access_token: Secret<String>,
    expires_at: Instant,
    caller_id: Option<String>,
}

impl Token {
    /// `expires_in` is capped at [`MAX_TOKEN_LIFETIME`].
    pub fn new(access_token: impl Into<String>, expires_in: Duration) -> Self {
        let now = Instant::now();
        let expires_at = now
            .checked_add(expires_in.min(MAX_TOKEN_LIFETIME))
            .unwrap_or(now);
        Self {
            access_token: Secret::new(access_token.into()),
            expires_at,
            caller_id: None,
        }
    }

    pub fn access_token(&self) -> &str {
        self.access_token.expose_secret()
    }

    pub fn expires_at(&self) -> Instant {
        self.expires_at
    }

    /// Id of the API user the token was issued to, when the API reports one.
    pub fn caller_id(&self) -> Option<&str> {
        self.caller_id.as_deref()
    }

    pub fn is_valid(&self) -> bool {
        Instant::now() < self.expires_at
    }
}

/// Token endpoint response. Accepts both `expires_in` and `expiresIn`; the
/// latter comes with the caller's user id under `payload.user._id`.
#[derive(Debug, Deserialize)]
struct OAuthResponse {
    access_token: String,
    #[serde(alias = "expiresIn")]
    expires_in: u64,
    #[serde(default)]
    payload: Option<OAuthPayload>,
}

#[derive(Debug, Deserialize)]
struct OAuthPayload {
    user: OAuthUser,
}

#[derive(Debug, Deserialize)]
struct OAuthUser {
    #[serde(rename = "_id")]
    id: String,
}

/// Client-credentials token, fetched lazily and replaced once expired.
///
/// Concurrent callers that all see an expired token may each refresh; the
/// last one written wins and every issued token is usable.
pub struct TokenCache {
    transport: Arc<dyn Transport>,
    oauth_url: String,
    client_id: String,
    client_secret: Secret<String>,
    current: RwLock<Option<Token>>,
}

impl TokenCache {
    pub fn new(
        transport: Arc<dyn Transport>,
        base_url: &str,
        client_id: &str,
        client_secret: Secret<String>,
    ) -> Self {
        Self {
            transport,
            oauth_url: format!("{}/{}", base_url.trim_end_matches('/'), OAUTH_PATH),
            client_id: client_id.to_string(),
            client_secret,
            current: RwLock::new(None),
        }
    }

    /// Cached token if still valid, otherwise a fresh one.
    pub async fn get_valid_token(&self) -> Result<Token> {
        {
            let current = self.current.read().await;
            if let Some(token) = current.as_ref().filter(|t| t.is_valid()) {
                return Ok(token.clone());
            }
        }
        self.refresh().await
    }

    /// Exchange the client credentials for a new token and cache it.
    pub async fn refresh(&self) -> Result<Token> {
        let request = HttpRequest::new(Method::POST, self.oauth_url.clone())
            .with_basic(&self.client_id, self.client_secret.expose_secret())
            .with_body(RequestBody::Form(vec![(
                "grant_type".to_string(),
                "client_credentials".to_string(),
            )]));

        let body = self.transport.execute(&request).await.map_err(|e| {
            tracing::error!(error = %e, "Token exchange failed");
            if e.is_timeout() {
                e
            } else {
                ClientError::Authentication(format!("Token exchange failed: {}", e))
            }
        })?;

        let response: OAuthResponse = serde_json::from_value(body).map_err(|e| {
            tracing::error!(error = %e, "Failed to parse token response");
            ClientError::Authentication(format!("Invalid token response: {}", e))
        })?;

        let mut token = Token::new(
            response.access_token,
            Duration::from_secs(response.expires_in),
        );
        token.caller_id = response.payload.map(|p| p.user.id);

        tracing::info!(expires_in = response.expires_in, "Access token refreshed");

        *self.current.write().await = Some(token.clone());
        Ok(token)
    }

    /// Drop the cached token so the next call re-authenticates.
    pub async fn invalidate(&self) {
        *self.current.write().await = None;
    }

    pub async fn cached(&self) -> Option<Token> {
        self.current.read().await.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::RequestAuth;
    use crate::client::testing::ScriptedTransport;
    use serde_json::json;

    fn cache_with(transport: Arc<ScriptedTransport>) -> TokenCache {
        TokenCache::new(
            transport,
            "http://localhost/",
            "clientId",
            Secret::new("clientSecret".to_string()),
        )
    }

    #[tokio::test]
    async fn test_first_use_fetches_token() {
        let transport = Arc::new(ScriptedTransport::new(vec![]));
        let cache = cache_with(transport.clone());

        assert!(cache.cached().await.is_none());
        let token = cache.get_valid_token().await.unwrap();
        assert_eq!(token.access_token(), "access_token");
        assert!(token.is_valid());

        let requests = transport.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].url, "http://localhost/oauth");
        assert_eq!(requests[0].method, Method::POST);
        assert!(matches!(
            &requests[0].auth,
            RequestAuth::Basic { username, .. } if username == "clientId"
        ));
        assert_eq!(
            requests[0].body,
            RequestBody::Form(vec![(
                "grant_type".to_string(),
                "client_credentials".to_string()
            )])
        );
    }

    #[tokio::test]
    async fn test_valid_token_is_reused() {
        let transport = Arc::new(ScriptedTransport::new(vec![]));
        let cache = cache_with(transport.clone());

        cache.get_valid_token().await.unwrap();
        cache.get_valid_token().await.unwrap();
        assert_eq!(transport.count("/oauth"), 1);
    }

    #[tokio::test]
    async fn test_expired_token_is_refreshed() {
        let transport = Arc::new(ScriptedTransport::with_oauth(
            Box::new(|_| Ok(json!({ "access_token": "short", "expires_in": 0 }))),
            vec![],
        ));
        let cache = cache_with(transport.clone());

        let first = cache.get_valid_token().await.unwrap();
        assert!(!first.is_valid());
        cache.get_valid_token().await.unwrap();
        assert_eq!(transport.count("/oauth"), 2);
    }

    #[tokio::test]
    async fn test_invalidate_forces_refresh() {
        let transport = Arc::new(ScriptedTransport::new(vec![]));
        let cache = cache_with(transport.clone());

        cache.get_valid_token().await.unwrap();
        cache.invalidate().await;
        assert!(cache.cached().await.is_none());
        cache.get_valid_token().await.unwrap();
        assert_eq!(transport.count("/oauth"), 2);
    }

    #[tokio::test]
    async fn test_camel_case_response_carries_caller_id() {
        let transport = Arc::new(ScriptedTransport::with_oauth(
            Box::new(|_| {
                Ok(json!({
                    "access_token": "access_token",
                    "expiresIn": 3600,
                    "payload": { "user": { "_id": "userId" } }
                }))
            }),
            vec![],
        ));
        let cache = cache_with(transport);

        let token = cache.get_valid_token().await.unwrap();
        assert_eq!(token.caller_id(), Some("userId"));
    }

    #[tokio::test]
    async fn test_exchange_failure_is_authentication_error() {
        let transport = Arc::new(ScriptedTransport::with_oauth(
            Box::new(|_| Err(ClientError::http(400, r#"{"message":"invalid_client"}"#))),
            vec![],
        ));
        let cache = cache_with(transport.clone());

        let result = cache.get_valid_token().await;
        assert!(matches!(result, Err(ClientError::Authentication(_))));
        assert!(cache.cached().await.is_none());
        assert_eq!(transport.count("/oauth"), 1);
    }

    #[tokio::test]
    async fn test_exchange_timeout_stays_a_timeout() {
        let transport = Arc::new(ScriptedTransport::with_oauth(
            Box::new(|_| Err(ClientError::Timeout("operation timed out".into()))),
            vec![],
        ));
        let cache = cache_with(transport);

        let result = cache.get_valid_token().await;
        assert!(matches!(result, Err(ClientError::Timeout(_))));
        assert!(cache.cached().await.is_none());
    }

    #[tokio::test]
    async fn test_huge_expires_in_is_capped() {
        let transport = Arc::new(ScriptedTransport::with_oauth(
            Box::new(|_| Ok(json!({ "access_token": "a", "expires_in": u64::MAX }))),
            vec![],
        ));
        let cache = cache_with(transport.clone());

        let token = cache.get_valid_token().await.unwrap();
        assert!(token.is_valid());
        assert!(token.expires_at() <= Instant::now() + MAX_TOKEN_LIFETIME);

        cache.get_valid_token().await.unwrap();
        assert_eq!(transport.count("/oauth"), 1);
    }

    #[tokio::test]
    async fn test_malformed_token_response_is_authentication_error() {
        let transport = Arc::new(ScriptedTransport::with_oauth(
            Box::new(|_| Ok(json!({ "token": "nope" }))),
            vec![],
        ));
        let cache = cache_with(transport);

        assert!(matches!(
            cache.get_valid_token().await,
            Err(ClientError::Authentication(_))
        ));
    }
}
