use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Error category. Unlisted categories land in `Unrecognized`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum InputErrorType {
    IntegrationError,
    SystemError,
    ValidationError,
    Unrecognized(String),
}

impl InputErrorType {
    pub fn as_str(&self) -> &str {
        match self {
            InputErrorType::IntegrationError => "IntegrationError",
            InputErrorType::SystemError => "SystemError",
            InputErrorType::ValidationError => "ValidationError",
            InputErrorType::Unrecognized(error_type) => error_type,
        }
    }
}

impl From<String> for InputErrorType {
    fn from(error_type: String) -> Self {
        match error_type.as_str() {
            "IntegrationError" => InputErrorType::IntegrationError,
            "SystemError" => InputErrorType::SystemError,
            "ValidationError" => InputErrorType::ValidationError,
            _ => InputErrorType::Unrecognized(error_type),
        }
    }
}

impl From<InputErrorType> for String {
    fn from(error_type: InputErrorType) -> Self {
        match error_type {
            InputErrorType::Unrecognized(error_type) => error_type,
            known => known.as_str().to_string(),
        }
    }
}

/// Reason an individual input was rejected.
///
/// Codes the API may add later land in `Unrecognized` instead of failing the
/// whole response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum InputErrorCode {
    InputLocked,
    InputNotFound,
    MediaNotFound,
    SystemInternalError,
    DocumentUnexpectedData,
    DocumentBadText,
    DocumentBlurryText,
    DocumentSmallImageSize,
    SelfiePhotoMultipleFaces,
    SelfiePhotoNoFace,
    SelfieVideoConversionFailed,
    SelfieVideoMultipleFaces,
    SelfieVideoNoFace,
    Unrecognized(String),
}

impl InputErrorCode {
    pub fn as_str(&self) -> &str {
        match self {
            InputErrorCode::InputLocked => "input.locked",
            InputErrorCode::InputNotFound => "input.notFound",
            InputErrorCode::MediaNotFound => "media.notFound",
            InputErrorCode::SystemInternalError => "system.internalError",
            InputErrorCode::DocumentUnexpectedData => "documentPhoto.unexpectedData",
            InputErrorCode::DocumentBadText => "documentPhoto.badText",
            InputErrorCode::DocumentBlurryText => "documentPhoto.blurryText",
            InputErrorCode::DocumentSmallImageSize => "documentPhoto.smallImageSize",
            InputErrorCode::SelfiePhotoMultipleFaces => "selfiePhoto.multipleFaces",
            InputErrorCode::SelfiePhotoNoFace => "selfiePhoto.noFace",
            InputErrorCode::SelfieVideoConversionFailed => "selfieVideo.conversionFailed",
            InputErrorCode::SelfieVideoMultipleFaces => "selfieVideo.multipleFaces",
            InputErrorCode::SelfieVideoNoFace => "selfieVideo.noFace",
            InputErrorCode::Unrecognized(code) => code,
        }
    }
}

impl From<String> for InputErrorCode {
    fn from(code: String) -> Self {
        match code.as_str() {
            "input.locked" => InputErrorCode::InputLocked,
            "input.notFound" => InputErrorCode::InputNotFound,
            "media.notFound" => InputErrorCode::MediaNotFound,
            "system.internalError" => InputErrorCode::SystemInternalError,
            "documentPhoto.unexpectedData" => InputErrorCode::DocumentUnexpectedData,
            "documentPhoto.badText" => InputErrorCode::DocumentBadText,
            "documentPhoto.blurryText" => InputErrorCode::DocumentBlurryText,
            "documentPhoto.smallImageSize" => InputErrorCode::DocumentSmallImageSize,
            "selfiePhoto.multipleFaces" => InputErrorCode::SelfiePhotoMultipleFaces,
            "selfiePhoto.noFace" => InputErrorCode::SelfiePhotoNoFace,
            "selfieVideo.conversionFailed" => InputErrorCode::SelfieVideoConversionFailed,
            "selfieVideo.multipleFaces" => InputErrorCode::SelfieVideoMultipleFaces,
            "selfieVideo.noFace" => InputErrorCode::SelfieVideoNoFace,
            _ => InputErrorCode::Unrecognized(code),
        }
    }
}

impl From<InputErrorCode> for String {
    fn from(code: InputErrorCode) -> Self {
        match code {
            InputErrorCode::Unrecognized(code) => code,
            known => known.as_str().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputError {
    #[serde(rename = "type")]
    pub error_type: InputErrorType,
    pub code: InputErrorCode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Verdict for one submitted input, at the same position as the input.
///
/// Fields beyond `result` and `error` are kept in `extra` so the array
/// serializes back exactly as received.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<InputError>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl InputResult {
    pub fn accepted() -> Self {
        Self {
            result: Some(true),
            ..Self::default()
        }
    }

    pub fn is_success(&self) -> bool {
        self.result == Some(true) && self.error.is_none()
    }

    pub fn error(&self) -> Option<&InputError> {
        self.error.as_ref()
    }
}

pub type SendInputResponse = Vec<InputResult>;
