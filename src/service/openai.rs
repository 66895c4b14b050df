use anyhow::{Context, Result};
use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::{Deserialize, Serialize};

use super::{CompletionService, ServiceError};
use crate::config::Config;
use crate::models::{Message, Role};

/// User-Agent sent with every request
pub const USER_AGENT: &str = concat!("chat-ledger/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Deserialize)]
struct ModelList {
    data: Vec<ModelEntry>,
}

#[derive(Debug, Deserialize)]
struct ModelEntry {
    id: String,
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ReplyMessage,
}

/// Reply as sent by the service; role is validated before it becomes a [`Message`]
#[derive(Debug, Deserialize)]
struct ReplyMessage {
    role: String,
    #[serde(default)]
    content: Option<String>,
}

/// Blocking client for an OpenAI-compatible chat completions API
pub struct OpenAiClient {
    http: Client,
    base_url: String,
    api_key: Option<String>,
}

impl OpenAiClient {
    pub fn new(config: &Config) -> Result<Self> {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.request_timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { http, base_url: config.base_url.clone(), api_key: config.api_key.clone() })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    fn authorized(&self, request: RequestBuilder) -> Result<RequestBuilder, ServiceError> {
        match &self.api_key {
            Some(key) => Ok(request.bearer_auth(key)),
            None => Err(ServiceError::Authentication("no API key configured".to_string())),
        }
    }

    /// Send a request and turn non-success statuses into classified errors
    fn send(&self, request: RequestBuilder) -> Result<Response, ServiceError> {
        let response = self.authorized(request)?.send().map_err(|e| {
            let classified = ServiceError::from_transport(&e);
            tracing::debug!(error = %e, "request failed before a response arrived");
            classified
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().unwrap_or_default();
        Err(ServiceError::from_status(status, &body))
    }
}

impl CompletionService for OpenAiClient {
    fn list_models(&self) -> Result<Vec<String>, ServiceError> {
        let response = self.send(self.http.get(self.endpoint("models")))?;
        let list: ModelList = response
            .json()
            .map_err(|e| ServiceError::ServiceUnavailable(format!("malformed model list: {}", e)))?;

        tracing::debug!(count = list.data.len(), "fetched model list");
        Ok(list.data.into_iter().map(|m| m.id).collect())
    }

    fn create_completion(
        &self,
        model: &str,
        messages: &[Message],
    ) -> Result<Message, ServiceError> {
        let body = CompletionRequest { model, messages };
        tracing::debug!(model, messages = messages.len(), "requesting completion");

        let response = self.send(self.http.post(self.endpoint("chat/completions")).json(&body))?;
        let completion: CompletionResponse = response
            .json()
            .map_err(|e| ServiceError::ServiceUnavailable(format!("malformed completion: {}", e)))?;

        let reply = completion
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| {
                ServiceError::ServiceUnavailable("completion had no choices".to_string())
            })?
            .message;

        let role = reply.role.parse::<Role>().map_err(ServiceError::ServiceUnavailable)?;
        Ok(Message::new(role, reply.content.unwrap_or_default()))
    }
}
