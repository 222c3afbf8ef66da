use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Lifecycle shared by identities and their verification steps.
///
/// Encoded on the wire as `0`, `100` and `200`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub enum VerificationStatus {
    Pending,
    Running,
    Complete,
}

impl TryFrom<u16> for VerificationStatus {
    type Error = String;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(VerificationStatus::Pending),
            100 => Ok(VerificationStatus::Running),
            200 => Ok(VerificationStatus::Complete),
            other => Err(format!("unknown verification status: {other}")),
        }
    }
}

impl From<VerificationStatus> for u16 {
    fn from(status: VerificationStatus) -> Self {
        match status {
            VerificationStatus::Pending => 0,
            VerificationStatus::Running => 100,
            VerificationStatus::Complete => 200,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentityResource {
    #[serde(rename = "_id")]
    pub id: String,
    pub status: VerificationStatus,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

/// Body of `POST /v2/identities`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreateIdentityRequest<'a> {
    pub metadata: &'a Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flow_id: Option<&'a str>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_identity() {
        let identity: IdentityResource =
            serde_json::from_value(json!({ "_id": "x", "status": 0 })).unwrap();
        assert_eq!(identity.id, "x");
        assert_eq!(identity.status, VerificationStatus::Pending);
        assert!(identity.extra.is_empty());
    }

    #[test]
    fn test_unknown_status_is_rejected() {
        let parsed = serde_json::from_value::<IdentityResource>(json!({ "_id": "x", "status": 7 }));
        assert!(parsed.is_err());
    }

    #[test]
    fn test_status_ordering_follows_lifecycle() {
        assert!(VerificationStatus::Pending < VerificationStatus::Running);
        assert!(VerificationStatus::Running < VerificationStatus::Complete);
        assert_eq!(u16::from(VerificationStatus::Complete), 200);
    }

    #[test]
    fn test_create_identity_body_omits_missing_flow() {
        let metadata = json!({ "email": "a@b.com" });
        let body = CreateIdentityRequest {
            metadata: &metadata,
            flow_id: None,
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({ "metadata": { "email": "a@b.com" } })
        );
    }
}
