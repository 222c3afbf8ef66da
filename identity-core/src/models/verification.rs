use super::identity::VerificationStatus;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Verification step identifier. Unlisted ids are kept as `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum StepId {
    AlterationDetection,
    Curp,
    DocumentReading,
    Facematch,
    Ine,
    Liveness,
    Selfie,
    TemplateMatching,
    Watchlists,
    Other(String),
}

impl StepId {
    pub fn as_str(&self) -> &str {
        match self {
            StepId::AlterationDetection => "alteration-detection",
            StepId::Curp => "mexican-curp-validation",
            StepId::DocumentReading => "document-reading",
            StepId::Facematch => "facematch",
            StepId::Ine => "mexican-ine-validation",
            StepId::Liveness => "liveness",
            StepId::Selfie => "selfie",
            StepId::TemplateMatching => "template-matching",
            StepId::Watchlists => "watchlists",
            StepId::Other(id) => id,
        }
    }
}

impl From<String> for StepId {
    fn from(id: String) -> Self {
        match id.as_str() {
            "alteration-detection" => StepId::AlterationDetection,
            "mexican-curp-validation" => StepId::Curp,
            "document-reading" => StepId::DocumentReading,
            "facematch" => StepId::Facematch,
            "mexican-ine-validation" => StepId::Ine,
            "liveness" => StepId::Liveness,
            "selfie" => StepId::Selfie,
            "template-matching" => StepId::TemplateMatching,
            "watchlists" => StepId::Watchlists,
            _ => StepId::Other(id),
        }
    }
}

impl From<StepId> for String {
    fn from(id: StepId) -> Self {
        match id {
            StepId::Other(id) => id,
            known => known.as_str().to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepErrorType {
    SystemError,
    LegacyError,
    StepError,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepError {
    #[serde(rename = "type")]
    pub error_type: StepErrorType,
    pub code: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    pub id: StepId,
    pub status: VerificationStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<StepError>,
}

impl Step {
    pub fn is_complete(&self) -> bool {
        self.status == VerificationStatus::Complete
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub value: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationDocument {
    #[serde(rename = "type")]
    pub document_type: String,
    pub country: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default)]
    pub fields: BTreeMap<String, Field>,
    #[serde(default)]
    pub steps: Vec<Step>,
    #[serde(default)]
    pub photos: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityState {
    pub status: VerificationStatus,
}

/// Verification state as reported by the API. Read-only: the SDK polls it,
/// it never drives the `Pending -> Running -> Complete` transitions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationResource {
    pub id: String,
    #[serde(default)]
    pub documents: Vec<VerificationDocument>,
    #[serde(default)]
    pub expired: bool,
    pub identity: IdentityState,
    #[serde(default)]
    pub steps: Vec<Step>,
}

impl VerificationResource {
    pub fn status(&self) -> VerificationStatus {
        self.identity.status
    }

    pub fn is_complete(&self) -> bool {
        self.identity.status == VerificationStatus::Complete
    }

    /// Every step, top-level and per-document, that reported an error.
    pub fn failed_steps(&self) -> impl Iterator<Item = &Step> {
        self.steps
            .iter()
            .chain(self.documents.iter().flat_map(|doc| doc.steps.iter()))
            .filter(|step| step.error.is_some())
    }
}
