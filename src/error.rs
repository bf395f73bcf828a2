//! Error types for the docchat library.
//!
//! Every failure a caller can observe is a [`DocChatError`]. Variants are
//! grouped by where they originate so callers can react per group:
//!
//! * **Input / extraction** — the document could not be loaded. The CLI
//!   reports these once and exits.
//! * **Configuration** — chunking parameters or credentials are wrong.
//!   Raised before any network activity.
//! * **Remote** — the chat endpoint failed on every attempt. The interactive
//!   loop prints these and keeps accepting questions
//!   (see [`DocChatError::is_remote`]).
//!
//! Extraction misses for a single page or paragraph are not errors: they
//! are skipped, and only a document that yields no text at all fails with
//! [`DocChatError::EmptyExtraction`].

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the docchat library.
#[derive(Debug, Error)]
pub enum DocChatError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("File not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The file extension is not one of the supported document types.
    #[error("Unsupported file type '{extension}'. Supported types: {supported}")]
    UnsupportedType { extension: String, supported: String },

    /// A `.pdf` file whose first bytes are not the PDF magic.
    #[error("File is not a valid PDF: '{path}'\nFirst bytes: {magic:?}")]
    NotAPdf { path: PathBuf, magic: [u8; 4] },

    /// The file exists but could not be read (I/O error, invalid UTF-8).
    #[error("Failed to read '{path}': {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Extraction errors ─────────────────────────────────────────────────
    /// The format parsed successfully but yielded no usable text.
    #[error("No extractable text found in {format} document '{path}'")]
    EmptyExtraction { path: PathBuf, format: String },

    /// The format-specific parser rejected the file.
    #[error("Failed to extract text from '{path}': {detail}")]
    ExtractionFailed { path: PathBuf, detail: String },

    /// The optional backend for this format was not compiled in.
    #[error("{format} support is not available in this build.\n{hint}")]
    DependencyUnavailable { format: String, hint: String },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder or chunker validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// No API key from the explicit override nor the environment.
    #[error("{var} not set in environment.\nExport it or add it to a .env file.")]
    MissingApiKey { var: String },

    // ── LLM errors ────────────────────────────────────────────────────────
    /// The endpoint answered with a non-success status or an unusable body.
    #[error("LLM API error: {message}")]
    LlmApiError { message: String },

    /// HTTP 429 from the endpoint.
    #[error("Rate limit exceeded for '{endpoint}'")]
    RateLimitExceeded {
        endpoint: String,
        retry_after_secs: Option<u64>,
    },

    /// A single attempt exceeded the per-request timeout.
    #[error("API call timed out after {secs}s")]
    ApiTimeout { secs: u64 },

    /// HTTP 401/403 from the endpoint; retrying will not help.
    #[error("Authentication error from '{endpoint}': {detail}")]
    AuthError { endpoint: String, detail: String },

    /// Transport-level failure (DNS, TLS, connection reset, body decode).
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl DocChatError {
    /// True for failures that came from the remote chat endpoint.
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            DocChatError::LlmApiError { .. }
                | DocChatError::RateLimitExceeded { .. }
                | DocChatError::ApiTimeout { .. }
                | DocChatError::AuthError { .. }
                | DocChatError::Http(_)
        )
    }
}
