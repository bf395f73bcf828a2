//! Question answering over a loaded document.
//!
//! [`DocChat`] turns (document, question) into exactly two messages, a
//! `system` message carrying the preamble and document context and a `user`
//! message carrying the question verbatim, and hands them to the
//! [`LlmClient`]. Each question is independent; no history is kept.
//!
//! ## Context selection
//!
//! ```text
//! len(doc) > doc_threshold && smart_chunking
//!     ├─ yes: sentence-aware chunks, first `max_context_chunks`, joined by ---
//!     └─ no:  whole document, capped at doc_threshold characters
//! ```

use crate::config::ChatConfig;
use crate::error::DocChatError;
use crate::pipeline::chunk::chunk_text_smart;
use crate::pipeline::llm::LlmClient;
use crate::prompts;
use crate::provider::ChatMessage;
use tracing::{debug, info};

/// Chat session bound to one client and one configuration.
#[derive(Debug, Clone)]
pub struct DocChat {
    client: LlmClient,
    config: ChatConfig,
}

impl DocChat {
    pub fn new(client: LlmClient, config: ChatConfig) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &ChatConfig {
        &self.config
    }

    /// Ask `question` about `doc_text`.
    pub async fn ask_with_doc(&self, doc_text: &str, question: &str) -> Result<String, DocChatError> {
        let messages = self.build_messages(doc_text, question)?;
        info!("Asking question ({} chars) with document context", question.chars().count());
        self.client.ask(&messages).await
    }

    /// Ask `question` with no document context.
    pub async fn ask_simple(&self, question: &str) -> Result<String, DocChatError> {
        let messages = vec![
            ChatMessage::system(self.config.preamble.clone()),
            ChatMessage::user(question),
        ];
        info!("Asking question ({} chars) without context", question.chars().count());
        self.client.ask(&messages).await
    }

    /// The `[system, user]` pair sent for `question` about `doc_text`.
    pub fn build_messages(&self, doc_text: &str, question: &str) -> Result<Vec<ChatMessage>, DocChatError> {
        Ok(vec![
            ChatMessage::system(self.system_message(doc_text)?),
            ChatMessage::user(question),
        ])
    }

    /// System message content for `doc_text`.
    pub fn system_message(&self, doc_text: &str) -> Result<String, DocChatError> {
        let c = &self.config;
        let len = doc_text.chars().count();

        if c.smart_chunking && len > c.doc_threshold {
            let chunks = chunk_text_smart(doc_text, c.chunk_size, c.chunk_overlap)?;
            let selected = &chunks[..chunks.len().min(c.max_context_chunks)];
            debug!(
                "Document has {} chars; using {}/{} chunks",
                len,
                selected.len(),
                chunks.len()
            );
            Ok(prompts::chunks_prompt(&c.preamble, selected))
        } else {
            let embedded = truncate_chars(doc_text, c.doc_threshold);
            debug!("Embedding {} of {} chars", embedded.chars().count(), len);
            Ok(prompts::document_prompt(&c.preamble, embedded))
        }
    }
}

/// The first `max` characters of `s`.
fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((i, _)) => &s[..i],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{ChatProvider, Role};
    use async_trait::async_trait;
    use std::sync::Arc;
    use std::time::Duration;

    struct Echo;

    #[async_trait]
    impl ChatProvider for Echo {
        fn name(&self) -> &str {
            "echo"
        }

        async fn chat(&self, messages: &[ChatMessage], _timeout: Duration) -> Result<String, DocChatError> {
            Ok(messages.last().map(|m| m.content.clone()).unwrap_or_default())
        }
    }

    fn chat(config: ChatConfig) -> DocChat {
        DocChat::new(LlmClient::with_provider(Arc::new(Echo), &config), config)
    }

    #[test]
    fn truncate_is_char_based() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("abc", 10), "abc");
        assert_eq!(truncate_chars("abc", 0), "");
    }

    #[test]
    fn short_document_embedded_whole() {
        let c = chat(ChatConfig::default());
        let msgs = c.build_messages("A short note.", "What is it?").unwrap();
        assert_eq!(msgs.len(), 2);
        assert_eq!(msgs[0].role, Role::System);
        assert_eq!(
            msgs[0].content,
            format!("{}\n\nDocument:\nA short note.", prompts::DEFAULT_PREAMBLE)
        );
        assert_eq!(msgs[1], ChatMessage::user("What is it?"));
    }

    #[test]
    fn long_document_uses_first_chunks() {
        let config = ChatConfig::builder()
            .doc_threshold(100)
            .chunk_size(60)
            .chunk_overlap(10)
            .max_context_chunks(2)
            .build()
            .unwrap();
        let doc = (0..20)
            .map(|i| format!("Fact {i} is recorded."))
            .collect::<Vec<_>>()
            .join(" ");
        let system = chat(config).system_message(&doc).unwrap();

        assert!(system.contains("Document Context:\n"));
        assert_eq!(system.matches(prompts::CHUNK_SEPARATOR).count(), 1);
        assert!(system.contains("Fact 0 is recorded."));
        assert!(!system.contains("Fact 19 is recorded."));
    }

    #[test]
    fn without_smart_chunking_long_document_is_capped() {
        let config = ChatConfig::builder()
            .doc_threshold(10)
            .chunk_size(5)
            .chunk_overlap(1)
            .smart_chunking(false)
            .build()
            .unwrap();
        let system = chat(config).system_message("0123456789ABCDEF").unwrap();
        assert!(system.ends_with("Document:\n0123456789"));
    }

    #[test]
    fn threshold_is_exclusive() {
        let config = ChatConfig::builder()
            .doc_threshold(10)
            .chunk_size(5)
            .chunk_overlap(1)
            .build()
            .unwrap();
        let system = chat(config).system_message("0123456789").unwrap();
        assert!(system.ends_with("Document:\n0123456789"));
    }

    #[tokio::test]
    async fn ask_returns_client_answer_unmodified() {
        let c = chat(ChatConfig::default());
        let answer = c.ask_with_doc("Doc.", "  Verbatim question?  ").await.unwrap();
        assert_eq!(answer, "  Verbatim question?  ");
    }

    #[tokio::test]
    async fn ask_simple_uses_bare_preamble() {
        struct FirstMessage;

        #[async_trait]
        impl ChatProvider for FirstMessage {
            fn name(&self) -> &str {
                "first"
            }

            async fn chat(&self, messages: &[ChatMessage], _timeout: Duration) -> Result<String, DocChatError> {
                Ok(messages[0].content.clone())
            }
        }

        let config = ChatConfig::builder().preamble("Answer tersely.").build().unwrap();
        let c = DocChat::new(LlmClient::with_provider(Arc::new(FirstMessage), &config), config);
        assert_eq!(c.ask_simple("hi").await.unwrap(), "Answer tersely.");
    }
}
