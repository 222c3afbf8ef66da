use super::transport::{HttpRequest, RequestBody, Transport};
use crate::auth::TokenCache;
use crate::error::{ClientError, Result};
use http::Method;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;

/// Sends API calls with a bearer token from the [`TokenCache`].
///
/// A 401 invalidates the token and the call is replayed once with a fresh
/// one. A second 401 is an authentication failure; there is no third try.
pub struct AuthenticatedRequester {
    transport: Arc<dyn Transport>,
    tokens: TokenCache,
    base_url: String,
}

impl AuthenticatedRequester {
    pub fn new(transport: Arc<dyn Transport>, tokens: TokenCache, base_url: &str) -> Self {
        Self {
            transport,
            tokens,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn tokens(&self) -> &TokenCache {
        &self.tokens
    }

    /// Absolute URLs pass through; anything else is joined to the base URL.
    pub fn resolve_url(&self, path_or_url: &str) -> String {
        if path_or_url.starts_with("http://") || path_or_url.starts_with("https://") {
            path_or_url.to_string()
        } else {
            format!("{}/{}", self.base_url, path_or_url.trim_start_matches('/'))
        }
    }

    /// Absolute URL of `segments` under the base URL. Each segment is
    /// percent-encoded, so `/` or `?` inside an id cannot change the target.
    pub fn segment_url(&self, segments: &[&str]) -> Result<String> {
        let mut url = reqwest::Url::parse(&self.base_url).map_err(|e| {
            ClientError::Configuration(format!("Invalid base URL '{}': {}", self.base_url, e))
        })?;
        url.path_segments_mut()
            .map_err(|_| {
                ClientError::Configuration(format!(
                    "Base URL '{}' cannot carry a path",
                    self.base_url
                ))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url.into())
    }

    pub async fn call(&self, method: Method, path: &str, body: RequestBody) -> Result<Value> {
        let token = self.tokens.get_valid_token().await?;
        let request = HttpRequest::new(method, self.resolve_url(path))
            .with_body(body)
            .with_bearer(token.access_token());

        match self.transport.execute(&request).await {
            Err(err) if err.is_unauthorized() => {
                tracing::warn!(
                    method = %request.method,
                    url = %request.url,
                    "Access token rejected, re-authenticating"
                );
                self.tokens.invalidate().await;
                let token = self.tokens.refresh().await?;
                let retry = request.with_bearer(token.access_token());

                match self.transport.execute(&retry).await {
                    Err(err) if err.is_unauthorized() => {
                        tracing::error!(
                            method = %retry.method,
                            url = %retry.url,
                            "Request still unauthorized after token refresh"
                        );
                        Err(ClientError::Authentication(format!(
                            "{} {} unauthorized after token refresh",
                            retry.method, retry.url
                        )))
                    }
                    other => other,
                }
            }
            other => other,
        }
    }

    pub async fn call_as<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: RequestBody,
    ) -> Result<T> {
        let value = self.call(method, path, body).await?;
        serde_json::from_value(value)
            .map_err(|e| ClientError::Decode(format!("Unexpected response for {}: {}", path, e)))
    }
}
