//! LLM client: one question in, one answer out, with retries.
//!
//! All prompt building lives in [`crate::chat`] and [`crate::prompts`];
//! this module only decides how often and how long to try.
//!
//! ## Retry Strategy
//!
//! A fixed attempt budget (`max_attempts`, default 3). After a failed
//! attempt with budget left, sleep `retry_backoff_ms * 2^(attempt-1)` and
//! send the identical request again: with the 1 s default the waits are
//! 1 s then 2 s. The final attempt's error is returned as-is. Each attempt
//! runs under its own timeout, so a hung request costs at most
//! `api_timeout_secs` and never eats into the next attempt.

use crate::config::{ChatConfig, Settings, ENV_API_KEY};
use crate::error::DocChatError;
use crate::provider::{ChatMessage, ChatProvider, OpenRouterProvider};
use std::sync::Arc;
use std::time::Instant;
use tokio::time::{sleep, timeout, Duration};
use tracing::{debug, warn};

/// Retrying wrapper around a [`ChatProvider`].
#[derive(Clone)]
pub struct LlmClient {
    provider: Arc<dyn ChatProvider>,
    max_attempts: u32,
    retry_backoff_ms: u64,
    api_timeout: Duration,
}

impl std::fmt::Debug for LlmClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmClient")
            .field("provider", &self.provider.name())
            .field("max_attempts", &self.max_attempts)
            .field("retry_backoff_ms", &self.retry_backoff_ms)
            .field("api_timeout", &self.api_timeout)
            .finish()
    }
}

impl LlmClient {
    /// Build a client for the OpenRouter endpoint described by `settings`.
    ///
    /// The API key comes from `config.api_key` if set, else from
    /// `settings.api_key`. Fails with [`DocChatError::MissingApiKey`] before
    /// any network activity when neither has one.
    pub fn from_settings(settings: &Settings, config: &ChatConfig) -> Result<Self, DocChatError> {
        let api_key = config
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .unwrap_or(&settings.api_key);
        if api_key.is_empty() {
            return Err(DocChatError::MissingApiKey {
                var: ENV_API_KEY.to_string(),
            });
        }

        let model = config.model.as_deref().unwrap_or(&settings.model);
        let provider = OpenRouterProvider::new(api_key, model, settings)?;
        debug!("LLM client for model {} at {}", model, provider.endpoint());
        Ok(Self::with_provider(Arc::new(provider), config))
    }

    /// Wrap an existing provider (custom backends, tests).
    pub fn with_provider(provider: Arc<dyn ChatProvider>, config: &ChatConfig) -> Self {
        Self {
            provider,
            max_attempts: config.max_attempts.max(1),
            retry_backoff_ms: config.retry_backoff_ms,
            api_timeout: Duration::from_secs(config.api_timeout_secs),
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Send `messages` and return the model's answer.
    pub async fn ask(&self, messages: &[ChatMessage]) -> Result<String, DocChatError> {
        let start = Instant::now();
        let mut attempt = 1u32;

        loop {
            debug!("LLM attempt {}/{}", attempt, self.max_attempts);
            let result = match timeout(self.api_timeout, self.provider.chat(messages, self.api_timeout)).await {
                Ok(inner) => inner,
                Err(_) => Err(DocChatError::ApiTimeout {
                    secs: self.api_timeout.as_secs(),
                }),
            };

            match result {
                Ok(content) => {
                    debug!(
                        "LLM answered in {:?} after {} attempt(s), {} chars",
                        start.elapsed(),
                        attempt,
                        content.len()
                    );
                    return Ok(content);
                }
                Err(e) if attempt >= self.max_attempts => {
                    warn!("LLM attempt {} failed, giving up: {}", attempt, e);
                    return Err(e);
                }
                Err(e) => {
                    let backoff = self.backoff_for(attempt);
                    warn!(
                        "LLM attempt {}/{} failed: {}; retrying in {}ms",
                        attempt, self.max_attempts, e, backoff
                    );
                    sleep(Duration::from_millis(backoff)).await;
                    attempt += 1;
                }
            }
        }
    }

    /// Delay after failed attempt `attempt` (1-based).
    fn backoff_for(&self, attempt: u32) -> u64 {
        self.retry_backoff_ms
            .saturating_mul(2u64.saturating_pow(attempt.saturating_sub(1)))
    }
}
