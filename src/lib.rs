//! # docchat
//!
//! Ask questions about a local document using a remote chat-completion model
//! served through OpenRouter (or any OpenAI-compatible endpoint).
//!
//! ## Pipeline Overview
//!
//! ```text
//! document (.pdf / .txt / .docx / .md)
//!  │
//!  ├─ 1. Input       validate path, detect format by extension
//!  ├─ 2. Extract     text layer (pdf-extract / docx-rs / plain read)
//!  ├─ 3. Preprocess  collapse whitespace, drop unusual characters
//!  │
//! question
//!  │
//!  ├─ 4. Context     whole document, or first N sentence-aware chunks
//!  ├─ 5. LLM         system + user message, retried with backoff
//!  └─ 6. Answer      first choice's content, verbatim
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use docchat::{ChatConfig, DocChat, DocumentLoader, LlmClient, Settings};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let doc = DocumentLoader::new().load("report.pdf")?;
//!     let config = ChatConfig::default();
//!     let client = LlmClient::from_settings(&Settings::from_env(), &config)?;
//!     let chat = DocChat::new(client, config);
//!     println!("{}", chat.ask_with_doc(&doc.text, "What is the main finding?").await?);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `docchat` binary (clap + anyhow + tracing-subscriber + dotenvy) |
//! | `docx`  | on      | Word document extraction via `docx-rs` |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod chat;
pub mod config;
pub mod error;
pub mod loader;
pub mod pipeline;
pub mod prompts;
pub mod provider;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use chat::DocChat;
pub use config::{ChatConfig, ChatConfigBuilder, Settings};
pub use error::DocChatError;
pub use loader::{load_document, supported_extensions, DocumentLoader, LoadedDocument};
pub use pipeline::input::{Capabilities, DocumentFormat};
pub use pipeline::llm::LlmClient;
pub use provider::{ChatMessage, ChatProvider, OpenRouterProvider, Role};
