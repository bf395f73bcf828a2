//! Pipeline stages for document chat.
//!
//! Each submodule implements exactly one step, so each can be tested on its
//! own and swapped without touching the others.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ extract ──▶ preprocess ──▶ chunk ──▶ llm
//! (path)    (pdf/docx/   (cleanup)     (if long)  (retry)
//!            md/txt)
//! ```
//!
//! 1. [`input`]      — validate the path, detect the format, hold capabilities
//! 2. [`extract`]    — pull raw text out of the file; [`markdown`] helps
//!    with `.md`
//! 3. [`preprocess`] — whitespace and character cleanup
//! 4. [`chunk`]      — overlapping windows for documents over the threshold
//! 5. [`llm`]        — the remote call with retry/backoff; the only stage
//!    with network I/O

pub mod chunk;
pub mod extract;
pub mod input;
pub mod llm;
pub mod markdown;
pub mod preprocess;
