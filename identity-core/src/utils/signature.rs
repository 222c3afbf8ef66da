use crate::error::{ClientError, Result};
use crate::models::WebhookResource;
use hmac::{Hmac, Mac};
use http::HeaderMap;
use sha2::Sha256;
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the webhook signature.
pub const SIGNATURE_HEADER: &str = "x-signature";

/// Canonical form of a webhook: compact JSON of `eventName`, `metadata`,
/// `resource`, in that order, metadata keys in received order.
pub fn canonicalize(payload: &WebhookResource) -> Result<String> {
    Ok(serde_json::to_string(payload)?)
}

/// Hex HMAC-SHA256 of `message` keyed by `secret`.
pub fn compute_signature(secret: &str, message: &[u8]) -> Result<String> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| ClientError::Signature(format!("Invalid key length: {}", e)))?;
    mac.update(message);
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Constant-time comparison of hex digests, ignoring hex letter case.
fn signatures_match(expected: &str, candidate: &str) -> bool {
    let candidate = candidate.trim().to_ascii_lowercase();

    if expected.len() != candidate.len() {
        return false;
    }

    expected.as_bytes().ct_eq(candidate.as_bytes()).into()
}

/// Checks webhook signatures against the configured webhook secret.
///
/// Built without a secret it refuses to validate at all: a missing secret
/// is a configuration error, not a mismatch.
#[derive(Clone)]
pub struct SignatureValidator {
    secret: Option<String>,
}

impl SignatureValidator {
    pub fn new(secret: Option<&str>) -> Self {
        Self {
            secret: secret.map(str::to_string),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.secret.is_some()
    }

    fn secret(&self) -> Result<&str> {
        self.secret.as_deref().ok_or_else(|| {
            ClientError::Configuration("No webhook secret configured".to_string())
        })
    }

    /// Signature of the canonical payload.
    pub fn sign(&self, payload: &WebhookResource) -> Result<String> {
        let secret = self.secret()?;
        compute_signature(secret, canonicalize(payload)?.as_bytes())
    }

    /// `Ok(false)` on mismatch, `Err` only when no secret is configured.
    pub fn validate(&self, candidate: &str, payload: &WebhookResource) -> Result<bool> {
        let expected = self.sign(payload)?;
        let is_valid = signatures_match(&expected, candidate);

        if !is_valid {
            tracing::warn!(
                event = ?payload.event_name,
                resource = %payload.resource,
                "Webhook signature verification failed"
            );
        }

        Ok(is_valid)
    }

    /// Like [`Self::validate`], but a mismatch is also an error.
    pub fn validate_or_throw(&self, candidate: &str, payload: &WebhookResource) -> Result<()> {
        if self.validate(candidate, payload)? {
            Ok(())
        } else {
            Err(ClientError::Signature(
                "Webhook signature does not match".to_string(),
            ))
        }
    }

    /// Validate the raw request body exactly as received.
    ///
    /// Use this when the webhook carries fields beyond `eventName`, `metadata`
    /// and `resource`; the HMAC covers the body bytes verbatim.
    pub fn validate_body(&self, candidate: &str, body: &[u8]) -> Result<bool> {
        let secret = self.secret()?;
        let expected = compute_signature(secret, body)?;
        let is_valid = signatures_match(&expected, candidate);

        if !is_valid {
            tracing::warn!("Webhook body signature verification failed");
        }

        Ok(is_valid)
    }
}

/// Pull the signature out of inbound webhook headers.
pub fn signature_from_headers(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(SIGNATURE_HEADER)
        .and_then(|value| value.to_str().ok())
}
