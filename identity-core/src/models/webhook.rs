use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventName {
    VerificationStarted,
    VerificationInputsCompleted,
    VerificationUpdated,
    VerificationCompleted,
    VerificationExpired,
    StepCompleted,
}

/// Webhook notification body.
///
/// Field order is significant: it is the order the signature is computed over.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookResource {
    pub event_name: EventName,
    /// `None` when the key is absent; `Some(Value::Null)` for an explicit
    /// `null`, which stays in the signed string.
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub metadata: Option<Value>,
    /// URL of the verification resource the event refers to.
    pub resource: String,
}

impl WebhookResource {
    pub fn new(
        event_name: EventName,
        metadata: impl Into<Option<Value>>,
        resource: impl Into<String>,
    ) -> Self {
        Self {
            event_name,
            metadata: metadata.into(),
            resource: resource.into(),
        }
    }
}

fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}
