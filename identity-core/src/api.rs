//! `ApiService`: the public face of the SDK.
//!
//! ```rust,no_run
//! # async fn example() -> identity_core::Result<()> {
//! use identity_core::{ApiService, ClientConfig};
//! use identity_core::builder::SendInputRequestBuilder;
//! use identity_core::models::{DocumentMetadata, DocumentType, FileData};
//!
//! let mut api = ApiService::new();
//! api.init(ClientConfig::new("clientId", "clientSecret"))?;
//!
//! let identity = api
//!     .create_identity(&identity_core::serde_json::json!({ "email": "john@gmail.com" }), None)
//!     .await?;
//! let request = SendInputRequestBuilder::create_with_document_photo(
//!     DocumentMetadata::new(DocumentType::NationalId, "US").with_region("IL"),
//!     FileData::from_path("./assets/front.png"),
//!     None,
//! )
//! .build();
//! let results = api.send_input(&identity.id, request).await?;
//! assert!(results.iter().all(|r| r.is_success()));
//! # Ok(())
//! # }
//! ```

use crate::auth::TokenCache;
use crate::client::{
    AuthenticatedRequester, FilePart, MultipartBody, ReqwestTransport, RequestBody, Transport,
};
use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::models::identity::CreateIdentityRequest;
use crate::models::{
    IdentityResource, InputResult, SendInputRequest, VerificationResource, WebhookResource,
};
use crate::utils::signature::SignatureValidator;
use http::Method;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

pub const IDENTITIES_PATH: &str = "v2/identities";

struct ServiceState {
    config: ClientConfig,
    requester: AuthenticatedRequester,
    signatures: SignatureValidator,
}

/// Facade over token handling, request signing and the verification API.
///
/// Starts uninitialized; every operation fails with
/// [`ClientError::Configuration`] until [`ApiService::init`] succeeds.
/// Re-initializing replaces the credentials and the token cache together.
#[derive(Default)]
pub struct ApiService {
    state: Option<ServiceState>,
}

impl ApiService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: ClientConfig) -> Result<Self> {
        let mut service = Self::new();
        service.init(config)?;
        Ok(service)
    }

    /// Validate `config` and (re)build the service over a `reqwest` transport.
    pub fn init(&mut self, config: ClientConfig) -> Result<()> {
        let transport = ReqwestTransport::new(Duration::from_secs(config.request_timeout_secs));
        self.init_with_transport(config, Arc::new(transport))
    }

    /// Like [`Self::init`], with a caller-supplied transport.
    pub fn init_with_transport(
        &mut self,
        config: ClientConfig,
        transport: Arc<dyn Transport>,
    ) -> Result<()> {
        config.ensure_valid()?;

        let base_url = config.base_url();
        let tokens = TokenCache::new(
            transport.clone(),
            &base_url,
            &config.client_id,
            config.client_secret.clone(),
        );
        let requester = AuthenticatedRequester::new(transport, tokens, &base_url);
        let signatures = SignatureValidator::new(config.webhook_secret());

        tracing::info!(
            host = %base_url,
            webhook_validation = signatures.is_configured(),
            "Identity API client initialized"
        );

        self.state = Some(ServiceState {
            config,
            requester,
            signatures,
        });
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.state.is_some()
    }

    fn state(&self) -> Result<&ServiceState> {
        self.state.as_ref().ok_or_else(|| {
            ClientError::Configuration("ApiService is not initialized; call init first".to_string())
        })
    }

    pub fn config(&self) -> Option<&ClientConfig> {
        self.state.as_ref().map(|state| &state.config)
    }

    /// Start a verification. `flow_id` overrides the configured default flow.
    pub async fn create_identity(
        &self,
        metadata: &Value,
        flow_id: Option<&str>,
    ) -> Result<IdentityResource> {
        let state = self.state()?;
        let body = CreateIdentityRequest {
            metadata,
            flow_id: flow_id.or(state.config.flow_id.as_deref()),
        };

        let identity: IdentityResource = state
            .requester
            .call_as(
                Method::POST,
                IDENTITIES_PATH,
                RequestBody::Json(serde_json::to_value(&body)?),
            )
            .await?;

        tracing::info!(identity_id = %identity.id, status = ?identity.status, "Identity created");
        Ok(identity)
    }

    /// Upload the inputs and their files.
    ///
    /// Results are returned as the API sent them, one per input in
    /// submission order. Per-input rejections are data; only transport and
    /// auth failures are errors. Files are opened while the request is sent
    /// and closed before this returns, whatever the outcome.
    pub async fn send_input(
        &self,
        identity_id: &str,
        request: SendInputRequest,
    ) -> Result<Vec<InputResult>> {
        let state = self.state()?;
        let (inputs, files) = request.into_parts();
        let input_count = inputs.len();

        let mut body = MultipartBody::new().text("inputs", serde_json::to_string(&inputs)?);
        for record in files {
            let mime = record.mime_type().to_string();
            body = body.file(FilePart {
                field: record.media_type.as_str().to_string(),
                file_name: record.file_name,
                mime,
                source: record.source,
            });
        }

        let url = state
            .requester
            .segment_url(&["v2", "identities", identity_id, "send-input"])?;
        let results: Vec<InputResult> = state
            .requester
            .call_as(Method::POST, &url, RequestBody::Multipart(body))
            .await?;

        if results.len() != input_count {
            tracing::warn!(
                identity_id = %identity_id,
                inputs = input_count,
                results = results.len(),
                "Result count differs from submitted input count"
            );
        }

        let rejected = results.iter().filter(|r| !r.is_success()).count();
        tracing::info!(
            identity_id = %identity_id,
            inputs = input_count,
            rejected,
            "Inputs submitted"
        );

        Ok(results)
    }

    /// Current state of an identity created by [`ApiService::create_identity`].
    pub async fn fetch_identity(&self, identity_id: &str) -> Result<IdentityResource> {
        let state = self.state()?;
        let url = state
            .requester
            .segment_url(&["v2", "identities", identity_id])?;
        state
            .requester
            .call_as(Method::GET, &url, RequestBody::Empty)
            .await
    }

    /// GET any API resource (e.g. the `resource` URL of a webhook) as JSON.
    pub async fn fetch_resource(&self, url: &str) -> Result<Value> {
        self.state()?
            .requester
            .call(Method::GET, url, RequestBody::Empty)
            .await
    }

    pub async fn fetch_resource_as<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        self.state()?
            .requester
            .call_as(Method::GET, url, RequestBody::Empty)
            .await
    }

    pub async fn fetch_verification(&self, url: &str) -> Result<VerificationResource> {
        self.fetch_resource_as(url).await
    }

    /// Check a webhook signature. Errors only when no webhook secret is
    /// configured; a mismatch is `Ok(false)`.
    pub fn validate_signature(&self, signature: &str, payload: &WebhookResource) -> Result<bool> {
        self.state()?.signatures.validate(signature, payload)
    }

    pub fn validate_signature_or_throw(
        &self,
        signature: &str,
        payload: &WebhookResource,
    ) -> Result<()> {
        self.state()?
            .signatures
            .validate_or_throw(signature, payload)
    }

    /// Check a webhook signature over the raw request body.
    pub fn validate_webhook_body(&self, signature: &str, body: &[u8]) -> Result<bool> {
        self.state()?.signatures.validate_body(signature, body)
    }

    /// API user id reported with the current token, if any.
    pub async fn caller_id(&self) -> Result<Option<String>> {
        let token = self.state()?.requester.tokens().get_valid_token().await?;
        Ok(token.caller_id().map(str::to_string))
    }
}
