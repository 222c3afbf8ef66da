//! The HTTP collaborator: send one request, hand back the parsed JSON body,
//! or fail on any non-2xx status.
//!
//! Requests are plain data and `Clone`, so a caller can replay the exact same
//! request (the 401 refresh path does). File parts are opened per attempt.

use crate::error::{ClientError, Result};
use crate::models::FileSource;
use crate::observability::inject_trace_context;
use async_trait::async_trait;
use http::Method;
use reqwest::Client;
use reqwest::header::HeaderMap;
use reqwest::multipart::{Form, Part};
use secrecy::{ExposeSecret, Secret};
use serde_json::Value;
use std::time::Duration;
use tokio_util::io::ReaderStream;

#[derive(Debug, Clone)]
pub enum RequestAuth {
    None,
    Bearer(Secret<String>),
    Basic {
        username: String,
        password: Secret<String>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct FilePart {
    pub field: String,
    pub file_name: String,
    pub mime: String,
    pub source: FileSource,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MultipartPart {
    Text { name: String, value: String },
    File(FilePart),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MultipartBody {
    pub parts: Vec<MultipartPart>,
}

impl MultipartBody {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parts.push(MultipartPart::Text {
            name: name.into(),
            value: value.into(),
        });
        self
    }

    pub fn file(mut self, part: FilePart) -> Self {
        self.parts.push(MultipartPart::File(part));
        self
    }

    pub fn file_parts(&self) -> impl Iterator<Item = &FilePart> {
        self.parts.iter().filter_map(|part| match part {
            MultipartPart::File(file) => Some(file),
            MultipartPart::Text { .. } => None,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum RequestBody {
    #[default]
    Empty,
    Json(Value),
    Form(Vec<(String, String)>),
    Multipart(MultipartBody),
}

#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub auth: RequestAuth,
    pub body: RequestBody,
}

impl HttpRequest {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            auth: RequestAuth::None,
            body: RequestBody::Empty,
        }
    }

    pub fn with_body(mut self, body: RequestBody) -> Self {
        self.body = body;
        self
    }

    pub fn with_bearer(mut self, token: &str) -> Self {
        self.auth = RequestAuth::Bearer(Secret::new(token.to_string()));
        self
    }

    pub fn with_basic(mut self, username: &str, password: &str) -> Self {
        self.auth = RequestAuth::Basic {
            username: username.to_string(),
            password: Secret::new(password.to_string()),
        };
        self
    }
}

#[async_trait]
pub trait Transport: Send + Sync {
    /// Perform `request`; a 2xx yields the JSON body (`Null` when empty), any
    /// other status yields [`ClientError::Http`].
    async fn execute(&self, request: &HttpRequest) -> Result<Value>;
}

/// [`Transport`] over a shared `reqwest` client.
#[derive(Clone)]
pub struct ReqwestTransport {
    client: Client,
    timeout: Duration,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration) -> Self {
        Self {
            client: Client::new(),
            timeout,
        }
    }

    pub fn with_client(client: Client, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    async fn build_form(body: &MultipartBody) -> Result<Form> {
        let mut form = Form::new();
        for part in &body.parts {
            form = match part {
                MultipartPart::Text { name, value } => form.text(name.clone(), value.clone()),
                MultipartPart::File(file) => {
                    let part = Self::file_part(file).await?;
                    form.part(file.field.clone(), part)
                }
            };
        }
        Ok(form)
    }

    async fn file_part(file: &FilePart) -> Result<Part> {
        let part = match &file.source {
            FileSource::Path(path) => {
                let handle = tokio::fs::File::open(path).await.map_err(|e| {
                    ClientError::Transport(format!(
                        "Failed to open '{}': {}",
                        path.display(),
                        e
                    ))
                })?;
                let length = handle.metadata().await?.len();
                let body = reqwest::Body::wrap_stream(ReaderStream::new(handle));
                Part::stream_with_length(body, length)
            }
            FileSource::Bytes(bytes) => {
                let length = bytes.len() as u64;
                Part::stream_with_length(reqwest::Body::from(bytes.clone()), length)
            }
        };

        Ok(part.file_name(file.file_name.clone()).mime_str(&file.mime)?)
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn execute(&self, request: &HttpRequest) -> Result<Value> {
        let mut headers = HeaderMap::new();
        inject_trace_context(&mut headers);

        let mut builder = self
            .client
            .request(request.method.clone(), &request.url)
            .timeout(self.timeout)
            .headers(headers);

        builder = match &request.auth {
            RequestAuth::None => builder,
            RequestAuth::Bearer(token) => builder.bearer_auth(token.expose_secret()),
            RequestAuth::Basic { username, password } => {
                builder.basic_auth(username, Some(password.expose_secret()))
            }
        };

        builder = match &request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(value),
            RequestBody::Form(fields) => builder.form(fields),
            RequestBody::Multipart(body) => {
                tracing::debug!(
                    url = %request.url,
                    files = body.file_parts().count(),
                    "Assembling multipart request"
                );
                builder.multipart(Self::build_form(body).await?)
            }
        };

        let response = builder.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            tracing::warn!(
                method = %request.method,
                url = %request.url,
                status = %status,
                "Request failed"
            );
            return Err(ClientError::http(status.as_u16(), &text));
        }

        tracing::debug!(method = %request.method, url = %request.url, status = %status, "Request succeeded");

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }

        serde_json::from_str(&text)
            .map_err(|e| ClientError::Decode(format!("Invalid JSON from {}: {}", request.url, e)))
    }
}
