// * OpenAI-compatible chat-completions client (openai / azure / custom providers).

use crate::backend::errors::BackendError;
use crate::backend::{BackendFuture, Summarizer};
use crate::config::constants::{REQUEST_MAX_TOKENS, REQUEST_TEMPERATURE};
use crate::config::{Provider, UserConfig};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

pub const OPENAI_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";
pub const CUSTOM_DEFAULT_ENDPOINT: &str = "http://localhost:8000/v1/chat/completions";

/// How the API key travels with the request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthStyle {
    /// `Authorization: Bearer <key>`
    Bearer,
    /// `api-key: <key>`
    ApiKeyHeader,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f64,
    pub max_tokens: u32,
}

impl ChatRequest {
    pub fn new(model: &str, prompt: &str) -> Self {
        Self {
            model: model.to_string(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            temperature: REQUEST_TEMPERATURE,
            max_tokens: REQUEST_MAX_TOKENS,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

/// Endpoint and auth scheme for the configured provider
pub fn resolve_endpoint(config: &UserConfig) -> Result<(Url, AuthStyle), BackendError> {
    let (raw, auth) = match config.provider {
        Provider::Openai | Provider::Unknown => (OPENAI_ENDPOINT, AuthStyle::Bearer),
        Provider::Azure => (
            config
                .endpoint()
                .ok_or(BackendError::MissingEndpoint(Provider::Azure))?,
            AuthStyle::ApiKeyHeader,
        ),
        Provider::Custom => (
            config.endpoint().unwrap_or(CUSTOM_DEFAULT_ENDPOINT),
            AuthStyle::Bearer,
        ),
    };
    Ok((Url::parse(raw)?, auth))
}

/// Pulls the first choice's message text out of a completion body
pub fn completion_text(body: &str) -> Result<String, BackendError> {
    let response: ChatResponse =
        serde_json::from_str(body).map_err(|e| BackendError::MalformedResponse(e.to_string()))?;
    response
        .choices
        .into_iter()
        .next()
        .map(|c| c.message.content)
        .ok_or_else(|| BackendError::MalformedResponse("no choices in response".to_string()))
}

// * The summarizer collaborator over HTTP.
pub struct ChatClient {
    inner: Client,
    endpoint: Url,
    auth: AuthStyle,
    api_key: String,
    model: String,
}

impl ChatClient {
    // * Builds a client for the configured provider.
    // * @param timeout - Optional overall request bound; none by default
    pub fn new(config: &UserConfig, timeout: Option<Duration>) -> Result<Self, BackendError> {
        let (endpoint, auth) = resolve_endpoint(config)?;

        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            inner: builder.build()?,
            endpoint,
            auth,
            api_key: config.api_key().unwrap_or_default().to_string(),
            model: config.model().to_string(),
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub fn auth_style(&self) -> AuthStyle {
        self.auth
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    // * Sends one chat completion and returns the raw message text.
    pub async fn complete(&self, prompt: &str) -> Result<String, BackendError> {
        let request = self
            .inner
            .post(self.endpoint.clone())
            .json(&ChatRequest::new(&self.model, prompt));
        let request = match self.auth {
            AuthStyle::Bearer => request.bearer_auth(&self.api_key),
            AuthStyle::ApiKeyHeader => request.header("api-key", &self.api_key),
        };

        debug!(endpoint = %self.endpoint, model = %self.model, "sending completion request");
        let resp = request.send().await?;
        let status = resp.status();

        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "completion request rejected");
            return Err(BackendError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = resp.text().await?;
        completion_text(&body)
    }
}

impl Summarizer for ChatClient {
    fn complete<'a>(&'a self, prompt: &'a str) -> BackendFuture<'a, String> {
        Box::pin(ChatClient::complete(self, prompt))
    }
}
