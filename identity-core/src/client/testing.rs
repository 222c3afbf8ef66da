use super::transport::{HttpRequest, Transport};
use crate::error::{ClientError, Result};
use async_trait::async_trait;
use serde_json::{Value, json};
use std::collections::VecDeque;
use std::sync::Mutex;

type Responder = Box<dyn Fn(&HttpRequest) -> Result<Value> + Send + Sync>;

/// Transport double: token requests (`.../oauth`) and API requests get
/// separate scripted answers, and every request is recorded.
pub(crate) struct ScriptedTransport {
    oauth: Responder,
    api: Mutex<VecDeque<Result<Value>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl ScriptedTransport {
    pub(crate) fn new(api: Vec<Result<Value>>) -> Self {
        Self::with_oauth(
            Box::new(|_| Ok(json!({ "access_token": "access_token", "expires_in": 3600 }))),
            api,
        )
    }

    pub(crate) fn with_oauth(oauth: Responder, api: Vec<Result<Value>>) -> Self {
        Self {
            oauth,
            api: Mutex::new(api.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub(crate) fn count(&self, suffix: &str) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.url.ends_with(suffix))
            .count()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn execute(&self, request: &HttpRequest) -> Result<Value> {
        self.requests.lock().unwrap().push(request.clone());
        if request.url.ends_with("/oauth") {
            return (self.oauth)(request);
        }
        self.api
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ClientError::Transport("no scripted response".into())))
    }
}
