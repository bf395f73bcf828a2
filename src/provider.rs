//! Chat messages and the remote chat-completion provider.
//!
//! [`ChatProvider`] is the seam between orchestration and transport: the
//! LLM client retries over any implementation, the CLI plugs in
//! [`OpenRouterProvider`], and tests plug in a scripted mock.
//!
//! ## Wire format
//!
//! ```text
//! POST {api_base}/chat/completions
//! Authorization: Bearer <key>
//! HTTP-Referer:  <site_url>
//! X-Title:       <site_name>
//!
//! {"model": "...", "messages": [{"role": "system", "content": "..."}, ...]}
//! ```
//!
//! Only `choices[0].message.content` of the response is used.

use crate::config::Settings;
use crate::error::DocChatError;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Who authored a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One entry of a chat-completion request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// A backend that answers a list of messages with one completion.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Short identifier for logs and error messages.
    fn name(&self) -> &str;

    /// Send one request and return the first choice's content.
    ///
    /// `timeout` bounds this single request.
    async fn chat(&self, messages: &[ChatMessage], timeout: Duration) -> Result<String, DocChatError>;
}

/// OpenRouter (or any OpenAI-compatible) chat-completion endpoint.
pub struct OpenRouterProvider {
    client: reqwest::Client,
    api_key: String,
    model: String,
    endpoint: String,
}

impl OpenRouterProvider {
    /// Build a provider for `model` using the endpoint and attribution
    /// headers from `settings`.
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        settings: &Settings,
    ) -> Result<Self, DocChatError> {
        let mut headers = HeaderMap::new();
        headers.insert("HTTP-Referer", header_value("SITE_URL", &settings.site_url)?);
        headers.insert("X-Title", header_value("SITE_NAME", &settings.site_name)?);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| DocChatError::Internal(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            model: model.into(),
            endpoint: completions_url(&settings.api_base),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl ChatProvider for OpenRouterProvider {
    fn name(&self) -> &str {
        "openrouter"
    }

    async fn chat(&self, messages: &[ChatMessage], timeout: Duration) -> Result<String, DocChatError> {
        let body = ChatRequest {
            model: &self.model,
            messages,
        };
        debug!("POST {} (model {}, {} messages)", self.endpoint, self.model, messages.len());

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .timeout(timeout)
            .json(&body)
            .send()
            .await
            .map_err(|e| map_transport_error(e, timeout))?;

        let status = response.status();
        let retry_after = response
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok());
        let text = response
            .text()
            .await
            .map_err(|e| map_transport_error(e, timeout))?;

        if !status.is_success() {
            return Err(status_error(status, retry_after, text, &self.endpoint));
        }
        first_choice_content(&text)
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// `{base}/chat/completions`, tolerating a trailing slash on `base`.
pub fn completions_url(api_base: &str) -> String {
    format!("{}/chat/completions", api_base.trim_end_matches('/'))
}

fn header_value(name: &str, value: &str) -> Result<HeaderValue, DocChatError> {
    HeaderValue::from_str(value)
        .map_err(|_| DocChatError::InvalidConfig(format!("{name} is not a valid header value: {value:?}")))
}

fn map_transport_error(e: reqwest::Error, timeout: Duration) -> DocChatError {
    if e.is_timeout() {
        DocChatError::ApiTimeout {
            secs: timeout.as_secs(),
        }
    } else {
        DocChatError::Http(e)
    }
}

/// Map a non-success HTTP status to the matching error.
fn status_error(status: StatusCode, retry_after: Option<u64>, body: String, endpoint: &str) -> DocChatError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => DocChatError::AuthError {
            endpoint: endpoint.to_string(),
            detail: format!("HTTP {status}: {}", body.trim()),
        },
        StatusCode::TOO_MANY_REQUESTS => DocChatError::RateLimitExceeded {
            endpoint: endpoint.to_string(),
            retry_after_secs: retry_after,
        },
        _ => DocChatError::LlmApiError {
            message: format!("HTTP {status}: {}", body.trim()),
        },
    }
}

/// Extract `choices[0].message.content` from a response body.
fn first_choice_content(body: &str) -> Result<String, DocChatError> {
    let parsed: ChatResponse = serde_json::from_str(body).map_err(|e| DocChatError::LlmApiError {
        message: format!("unparseable response: {e}"),
    })?;
    let choice = parsed
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| DocChatError::LlmApiError {
            message: "response contained no choices".into(),
        })?;
    Ok(choice.message.content.unwrap_or_default())
}
