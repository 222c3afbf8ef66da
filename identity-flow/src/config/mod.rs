use config::{Config as Cfg, File};
use identity_core::models::{DocumentMetadata, DocumentType};
use identity_core::ClientConfig;
use serde::Deserialize;
use serde_json::Value;
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize)]
pub struct FlowConfig {
    pub client: ClientConfig,
    pub document: DocumentConfig,
    #[serde(default)]
    pub selfie_photo: Option<PathBuf>,
    #[serde(default)]
    pub selfie_video: Option<PathBuf>,
    /// Attached to the identity on creation.
    #[serde(default = "default_metadata")]
    pub metadata: Value,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub otlp_endpoint: Option<String>,
    #[serde(default)]
    pub poll: PollConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DocumentConfig {
    pub document_type: DocumentType,
    pub country: String,
    #[serde(default)]
    pub region: Option<String>,
    pub front: PathBuf,
    #[serde(default)]
    pub back: Option<PathBuf>,
}

impl DocumentConfig {
    pub fn metadata(&self) -> DocumentMetadata {
        let metadata = DocumentMetadata::new(self.document_type, self.country.clone());
        match &self.region {
            Some(region) => metadata.with_region(region.clone()),
            None => metadata,
        }
    }
}

/// `max_attempts == 0` disables polling.
#[derive(Debug, Clone, Deserialize)]
pub struct PollConfig {
    #[serde(default = "default_poll_interval_secs")]
    pub interval_secs: u64,
    #[serde(default)]
    pub max_attempts: u32,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_poll_interval_secs(),
            max_attempts: 0,
        }
    }
}

fn default_metadata() -> Value {
    Value::Object(Default::default())
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_poll_interval_secs() -> u64 {
    5
}

impl FlowConfig {
    /// `.env`, then an optional `flow.{toml,yaml,json}`, then `FLOW__*`
    /// variables (e.g. `FLOW__CLIENT__CLIENT_ID`, `FLOW__DOCUMENT__FRONT`).
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = Cfg::builder()
            .add_source(File::with_name("flow").required(false))
            .add_source(config::Environment::with_prefix("FLOW").separator("__"))
            .build()?;

        let config: Self = config.try_deserialize()?;
        config.client.ensure_valid()?;
        Ok(config)
    }
}
