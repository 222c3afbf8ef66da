//! identity-core: client SDK for the identity verification API.
//!
//! OAuth client-credentials with a cached, self-refreshing token; identity
//! creation; multipart input submission assembled by
//! [`builder::SendInputRequestBuilder`]; resource polling; and HMAC webhook
//! signature validation.
pub mod api;
pub mod auth;
pub mod builder;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod observability;
pub mod utils;

pub use api::ApiService;
pub use builder::SendInputRequestBuilder;
pub use config::ClientConfig;
pub use error::{ClientError, Result};
pub use utils::signature::SignatureValidator;

pub use serde_json;
pub use tracing;
