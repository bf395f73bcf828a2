//! Configuration: process-wide [`Settings`] and per-chat [`ChatConfig`].
//!
//! [`Settings`] is read once from the environment at startup and then passed
//! explicitly to whatever needs it; nothing in the library reads environment
//! variables on its own. [`ChatConfig`] carries the tuning knobs for prompt
//! building, chunking and retries, built via [`ChatConfigBuilder`].

use crate::error::DocChatError;
use crate::prompts::DEFAULT_PREAMBLE;
use std::fmt;

// ── Environment variable names ──────────────────────────────────────────

pub const ENV_API_KEY: &str = "OPENROUTER_API_KEY";
pub const ENV_MODEL: &str = "OPENROUTER_MODEL";
pub const ENV_API_BASE: &str = "OPENROUTER_API_BASE";
pub const ENV_SITE_URL: &str = "SITE_URL";
pub const ENV_SITE_NAME: &str = "SITE_NAME";

pub const DEFAULT_MODEL: &str = "mistralai/mistral-7b-instruct";
pub const DEFAULT_API_BASE: &str = "https://openrouter.ai/api/v1";
pub const DEFAULT_SITE_URL: &str = "http://localhost";
pub const DEFAULT_SITE_NAME: &str = "OpenRouterDocChat";

/// Process-wide settings for the remote endpoint.
///
/// `api_key` is empty when unset; the LLM client refuses to start in that
/// case. All other fields fall back to documented defaults.
#[derive(Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_key: String,
    pub model: String,
    pub api_base: String,
    /// Sent as `HTTP-Referer` for attribution.
    pub site_url: String,
    /// Sent as `X-Title` for attribution.
    pub site_name: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: DEFAULT_MODEL.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            site_url: DEFAULT_SITE_URL.to_string(),
            site_name: DEFAULT_SITE_NAME.to_string(),
        }
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("api_key", &redact(&self.api_key))
            .field("model", &self.model)
            .field("api_base", &self.api_base)
            .field("site_url", &self.site_url)
            .field("site_name", &self.site_name)
            .finish()
    }
}

impl Settings {
    /// Read settings from the process environment.
    ///
    /// Call `dotenvy::dotenv()` first if `.env` files should be honoured.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through an arbitrary lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str, default: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        Self {
            api_key: get(ENV_API_KEY, ""),
            model: get(ENV_MODEL, DEFAULT_MODEL),
            api_base: get(ENV_API_BASE, DEFAULT_API_BASE),
            site_url: get(ENV_SITE_URL, DEFAULT_SITE_URL),
            site_name: get(ENV_SITE_NAME, DEFAULT_SITE_NAME),
        }
    }

    pub fn has_api_key(&self) -> bool {
        !self.api_key.is_empty()
    }
}

fn redact(secret: &str) -> &'static str {
    if secret.is_empty() {
        "<unset>"
    } else {
        "<redacted>"
    }
}

/// Tuning knobs for a chat session.
///
/// Built via [`ChatConfig::builder()`] or [`ChatConfig::default()`].
///
/// # Example
/// ```rust
/// use docchat::ChatConfig;
///
/// let config = ChatConfig::builder()
///     .chunk_size(2000)
///     .chunk_overlap(100)
///     .max_attempts(5)
///     .build()
///     .unwrap();
/// assert_eq!(config.chunk_size, 2000);
/// ```
#[derive(Clone)]
pub struct ChatConfig {
    /// Instruction text placed at the top of every system message.
    pub preamble: String,

    /// Documents longer than this (in characters) are chunked; shorter ones
    /// are embedded whole. Also the hard cap on embedded text. Default: 6000.
    pub doc_threshold: usize,

    /// Target chunk length in characters for sentence-aware chunking. Default: 4000.
    pub chunk_size: usize,

    /// Characters carried over between consecutive chunks. Default: 200.
    pub chunk_overlap: usize,

    /// How many leading chunks go into the system message. Default: 3.
    pub max_context_chunks: usize,

    /// Chunk long documents instead of truncating them. Default: true.
    pub smart_chunking: bool,

    /// Total attempts per question, including the first. Default: 3.
    pub max_attempts: u32,

    /// Delay before the first retry; doubles for each further retry. Default: 1000.
    pub retry_backoff_ms: u64,

    /// Timeout for each individual attempt in seconds. Default: 30.
    pub api_timeout_secs: u64,

    /// Model override. If None, uses [`Settings::model`].
    pub model: Option<String>,

    /// API key override. If None, uses [`Settings::api_key`].
    pub api_key: Option<String>,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            preamble: DEFAULT_PREAMBLE.to_string(),
            doc_threshold: 6000,
            chunk_size: 4000,
            chunk_overlap: 200,
            max_context_chunks: 3,
            smart_chunking: true,
            max_attempts: 3,
            retry_backoff_ms: 1000,
            api_timeout_secs: 30,
            model: None,
            api_key: None,
        }
    }
}

impl fmt::Debug for ChatConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChatConfig")
            .field("doc_threshold", &self.doc_threshold)
            .field("chunk_size", &self.chunk_size)
            .field("chunk_overlap", &self.chunk_overlap)
            .field("max_context_chunks", &self.max_context_chunks)
            .field("smart_chunking", &self.smart_chunking)
            .field("max_attempts", &self.max_attempts)
            .field("retry_backoff_ms", &self.retry_backoff_ms)
            .field("api_timeout_secs", &self.api_timeout_secs)
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_deref().map(redact))
            .finish()
    }
}

impl ChatConfig {
    /// Create a new builder for `ChatConfig`.
    pub fn builder() -> ChatConfigBuilder {
        ChatConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ChatConfig`].
#[derive(Debug)]
pub struct ChatConfigBuilder {
    config: ChatConfig,
}

impl ChatConfigBuilder {
    pub fn preamble(mut self, preamble: impl Into<String>) -> Self {
        self.config.preamble = preamble.into();
        self
    }

    pub fn doc_threshold(mut self, chars: usize) -> Self {
        self.config.doc_threshold = chars;
        self
    }

    pub fn chunk_size(mut self, chars: usize) -> Self {
        self.config.chunk_size = chars;
        self
    }

    pub fn chunk_overlap(mut self, chars: usize) -> Self {
        self.config.chunk_overlap = chars;
        self
    }

    pub fn max_context_chunks(mut self, n: usize) -> Self {
        self.config.max_context_chunks = n.max(1);
        self
    }

    pub fn smart_chunking(mut self, v: bool) -> Self {
        self.config.smart_chunking = v;
        self
    }

    pub fn max_attempts(mut self, n: u32) -> Self {
        self.config.max_attempts = n.max(1);
        self
    }

    pub fn retry_backoff_ms(mut self, ms: u64) -> Self {
        self.config.retry_backoff_ms = ms;
        self
    }

    pub fn api_timeout_secs(mut self, secs: u64) -> Self {
        self.config.api_timeout_secs = secs.max(1);
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = Some(model.into());
        self
    }

    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = Some(key.into());
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ChatConfig, DocChatError> {
        let c = &self.config;
        if c.chunk_size <= c.chunk_overlap {
            return Err(DocChatError::InvalidConfig(format!(
                "chunk_size must be greater than overlap (got {} <= {})",
                c.chunk_size, c.chunk_overlap
            )));
        }
        if c.doc_threshold == 0 {
            return Err(DocChatError::InvalidConfig(
                "doc_threshold must be ≥ 1".into(),
            ));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn settings_defaults_when_env_empty() {
        let s = Settings::from_lookup(lookup(&[]));
        assert_eq!(s.api_key, "");
        assert!(!s.has_api_key());
        assert_eq!(s.model, DEFAULT_MODEL);
        assert_eq!(s.api_base, DEFAULT_API_BASE);
        assert_eq!(s.site_url, DEFAULT_SITE_URL);
        assert_eq!(s.site_name, DEFAULT_SITE_NAME);
    }

    #[test]
    fn settings_read_overrides() {
        let s = Settings::from_lookup(lookup(&[
            (ENV_API_KEY, "sk-or-123"),
            (ENV_MODEL, "openai/gpt-4o-mini"),
            (ENV_API_BASE, "http://127.0.0.1:9000/v1"),
            (ENV_SITE_URL, "https://docs.example.org"),
            (ENV_SITE_NAME, "Docs"),
        ]));
        assert_eq!(s.api_key, "sk-or-123");
        assert_eq!(s.model, "openai/gpt-4o-mini");
        assert_eq!(s.api_base, "http://127.0.0.1:9000/v1");
        assert_eq!(s.site_url, "https://docs.example.org");
        assert_eq!(s.site_name, "Docs");
    }

    #[test]
    fn settings_blank_values_fall_back() {
        let s = Settings::from_lookup(lookup(&[(ENV_MODEL, "   ")]));
        assert_eq!(s.model, DEFAULT_MODEL);
    }

    #[test]
    fn settings_debug_hides_key() {
        let s = Settings::from_lookup(lookup(&[(ENV_API_KEY, "sk-secret")]));
        let dbg = format!("{s:?}");
        assert!(!dbg.contains("sk-secret"), "got: {dbg}");
        assert!(dbg.contains("<redacted>"));
    }

    #[test]
    fn chat_config_defaults() {
        let c = ChatConfig::default();
        assert_eq!(c.doc_threshold, 6000);
        assert_eq!(c.chunk_size, 4000);
        assert_eq!(c.chunk_overlap, 200);
        assert_eq!(c.max_context_chunks, 3);
        assert_eq!(c.max_attempts, 3);
        assert_eq!(c.retry_backoff_ms, 1000);
        assert_eq!(c.api_timeout_secs, 30);
        assert!(c.smart_chunking);
    }

    #[test]
    fn builder_rejects_overlap_not_below_chunk_size() {
        let err = ChatConfig::builder()
            .chunk_size(200)
            .chunk_overlap(200)
            .build()
            .unwrap_err();
        assert!(matches!(err, DocChatError::InvalidConfig(_)));
    }

    #[test]
    fn builder_clamps_attempts() {
        let c = ChatConfig::builder().max_attempts(0).build().unwrap();
        assert_eq!(c.max_attempts, 1);
    }

    #[test]
    fn chat_config_debug_hides_key() {
        let c = ChatConfig::builder().api_key("sk-hidden").build().unwrap();
        assert!(!format!("{c:?}").contains("sk-hidden"));
    }
}
