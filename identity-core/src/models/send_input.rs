use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InputType {
    DocumentPhoto,
    SelfiePhoto,
    SelfieVideo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DocumentType {
    DrivingLicense,
    NationalId,
    Passport,
    ProofOfResidency,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Page {
    Front,
    Back,
}

/// Multipart field name a file is uploaded under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Document,
    Selfie,
    Video,
}

impl MediaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Document => "document",
            MediaType::Selfie => "selfie",
            MediaType::Video => "video",
        }
    }

    /// Content type sent for the part when the file name gives no better hint.
    pub fn default_mime(&self) -> &'static str {
        match self {
            MediaType::Document | MediaType::Selfie => "image/jpeg",
            MediaType::Video => "video/mp4",
        }
    }
}

/// Document description shared by both pages of one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentMetadata {
    pub document_type: DocumentType,
    pub country: String,
    pub region: Option<String>,
}

impl DocumentMetadata {
    pub fn new(document_type: DocumentType, country: impl Into<String>) -> Self {
        Self {
            document_type,
            country: country.into(),
            region: None,
        }
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentPhotoData {
    #[serde(rename = "type")]
    pub document_type: DocumentType,
    pub country: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    pub page: Page,
    pub filename: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelfieData {
    pub filename: String,
}

/// Per-input payload, tagged on the wire by `inputType`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "inputType", content = "data", rename_all = "kebab-case")]
pub enum InputData {
    DocumentPhoto(DocumentPhotoData),
    SelfiePhoto(SelfieData),
    SelfieVideo(SelfieData),
}

impl InputData {
    pub fn input_type(&self) -> InputType {
        match self {
            InputData::DocumentPhoto(_) => InputType::DocumentPhoto,
            InputData::SelfiePhoto(_) => InputType::SelfiePhoto,
            InputData::SelfieVideo(_) => InputType::SelfieVideo,
        }
    }

    pub fn media_type(&self) -> MediaType {
        match self {
            InputData::DocumentPhoto(_) => MediaType::Document,
            InputData::SelfiePhoto(_) => MediaType::Selfie,
            InputData::SelfieVideo(_) => MediaType::Video,
        }
    }

    pub fn filename(&self) -> &str {
        match self {
            InputData::DocumentPhoto(data) => &data.filename,
            InputData::SelfiePhoto(data) | InputData::SelfieVideo(data) => &data.filename,
        }
    }
}

/// One unit of evidence. Inputs sharing a `group` are verified together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Input {
    pub group: u32,
    #[serde(flatten)]
    pub data: InputData,
}

/// Where the bytes of a file part come from.
///
/// `Path` is opened only when the request is sent and streamed from disk;
/// the handle lives exactly as long as the request body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileSource {
    Path(PathBuf),
    Bytes(Bytes),
}

/// A named file handed to one of the builder's append operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileData {
    pub filename: String,
    pub source: FileSource,
}

impl FileData {
    /// Use the path's final component as the file name.
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self {
            filename,
            source: FileSource::Path(path.to_path_buf()),
        }
    }

    pub fn from_bytes(filename: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            filename: filename.into(),
            source: FileSource::Bytes(bytes.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    pub file_name: String,
    pub media_type: MediaType,
    pub source: FileSource,
}

impl FileRecord {
    /// Content type from the file extension, falling back to the media type.
    pub fn mime_type(&self) -> &'static str {
        let extension = Path::new(&self.file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("png") => "image/png",
            Some("jpg" | "jpeg") => "image/jpeg",
            Some("webp") => "image/webp",
            Some("pdf") => "application/pdf",
            Some("mp4") => "video/mp4",
            Some("webm") => "video/webm",
            Some("mov") => "video/quicktime",
            _ => self.media_type.default_mime(),
        }
    }
}

/// Finished input submission: inputs and files in append order.
///
/// Obtained from [`crate::builder::SendInputRequestBuilder::build`] and
/// consumed by [`crate::ApiService::send_input`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendInputRequest {
    inputs: Vec<Input>,
    files: Vec<FileRecord>,
}

impl SendInputRequest {
    /// Assemble a request by hand. Prefer the builder, which keeps group ids
    /// and file order consistent.
    pub fn from_parts(inputs: Vec<Input>, files: Vec<FileRecord>) -> Self {
        Self { inputs, files }
    }

    pub fn inputs(&self) -> &[Input] {
        &self.inputs
    }

    pub fn files(&self) -> &[FileRecord] {
        &self.files
    }

    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }

    pub fn into_parts(self) -> (Vec<Input>, Vec<FileRecord>) {
        (self.inputs, self.files)
    }
}
