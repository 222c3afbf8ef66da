use crate::error::{ClientError, Result};
use config::{Config as Cfg, File};
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use validator::Validate;

pub const DEFAULT_HOST: &str = "https://api.getmati.com";

/// Credentials and options for talking to the verification API.
///
/// Only `client_id` and `client_secret` are required. `webhook_secret` is
/// needed for signature validation only.
#[derive(Debug, Deserialize, Clone, Validate)]
pub struct ClientConfig {
    #[validate(length(min = 1, message = "client_id must not be empty"))]
    pub client_id: String,
    pub client_secret: Secret<String>,
    #[serde(default)]
    pub webhook_secret: Option<Secret<String>>,
    #[serde(default)]
    #[validate(url(message = "host must be a valid URL"))]
    pub host: Option<String>,
    #[serde(default)]
    pub flow_id: Option<String>,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_request_timeout_secs() -> u64 {
    30
}

impl ClientConfig {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: Secret::new(client_secret.into()),
            webhook_secret: None,
            host: None,
            flow_id: None,
            request_timeout_secs: default_request_timeout_secs(),
        }
    }

    pub fn with_webhook_secret(mut self, secret: impl Into<String>) -> Self {
        self.webhook_secret = Some(Secret::new(secret.into()));
        self
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    pub fn with_flow_id(mut self, flow_id: impl Into<String>) -> Self {
        self.flow_id = Some(flow_id.into());
        self
    }

    /// Load from an optional `identity.{toml,yaml,json}` file and `IDENTITY__*`
    /// environment variables (after reading `.env`).
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let config = Cfg::builder()
            .add_source(File::with_name("identity").required(false))
            .add_source(config::Environment::with_prefix("IDENTITY").separator("__"))
            .build()?;

        let config: Self = config.try_deserialize()?;
        config.ensure_valid()?;
        Ok(config)
    }

    /// Reject configs that cannot authenticate.
    pub fn ensure_valid(&self) -> Result<()> {
        self.validate()?;
        if self.client_secret.expose_secret().is_empty() {
            return Err(ClientError::Configuration(
                "client_secret must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Base URL without a trailing slash.
    pub fn base_url(&self) -> String {
        self.host
            .as_deref()
            .filter(|h| !h.is_empty())
            .unwrap_or(DEFAULT_HOST)
            .trim_end_matches('/')
            .to_string()
    }

    pub fn webhook_secret(&self) -> Option<&str> {
        self.webhook_secret
            .as_ref()
            .map(|s| s.expose_secret().as_str())
            .filter(|s| !s.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config_is_valid() {
        let config = ClientConfig::new("clientId", "clientSecret");
        assert!(config.ensure_valid().is_ok());
        assert_eq!(config.base_url(), DEFAULT_HOST);
        assert!(config.webhook_secret().is_none());
    }

    #[test]
    fn test_missing_client_id_is_rejected() {
        let config = ClientConfig::new("", "clientSecret");
        assert!(matches!(
            config.ensure_valid(),
            Err(ClientError::Configuration(_))
        ));
    }

    #[test]
    fn test_missing_client_secret_is_rejected() {
        let config = ClientConfig::new("clientId", "");
        assert!(matches!(
            config.ensure_valid(),
            Err(ClientError::Configuration(_))
        ));
    }

    #[test]
    fn test_invalid_host_is_rejected() {
        let config = ClientConfig::new("clientId", "clientSecret").with_host("not a url");
        assert!(matches!(
            config.ensure_valid(),
            Err(ClientError::Configuration(_))
        ));
    }

    #[test]
    fn test_host_override_trims_trailing_slash() {
        let config = ClientConfig::new("id", "secret").with_host("http://localhost:8080/");
        assert_eq!(config.base_url(), "http://localhost:8080");
    }

    #[test]
    fn test_debug_output_redacts_secrets() {
        let config = ClientConfig::new("id", "super-secret").with_webhook_secret("hook-secret");
        let debug = format!("{config:?}");
        assert!(!debug.contains("super-secret"));
        assert!(!debug.contains("hook-secret"));
    }
}
