//! System prompts for document chat.
//!
//! All prompt text lives here so the orchestration in [`crate::chat`] never
//! embeds literal strings and tests can inspect the exact layout the model
//! receives. Callers override the preamble via
//! [`crate::config::ChatConfig::preamble`].

/// Default instruction placed at the top of every system message.
pub const DEFAULT_PREAMBLE: &str =
    "You are a helpful assistant. Use the provided document context to answer questions.";

/// Separator placed between chunks in a multi-chunk system message.
pub const CHUNK_SEPARATOR: &str = "\n\n---\n\n";

/// System message embedding a whole (already capped) document.
pub fn document_prompt(preamble: &str, document: &str) -> String {
    format!("{preamble}\n\nDocument:\n{document}")
}

/// System message embedding a selection of chunks.
pub fn chunks_prompt<S: AsRef<str>>(preamble: &str, chunks: &[S]) -> String {
    let combined = chunks
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(CHUNK_SEPARATOR);
    format!("{preamble}\n\nDocument Context:\n{combined}")
}
