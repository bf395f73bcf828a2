//! Document loading: path in, cleaned text out.

use crate::error::DocChatError;
use crate::pipeline::extract;
use crate::pipeline::input::{resolve_input, Capabilities, DocumentFormat};
use crate::pipeline::preprocess::preprocess;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::info;

/// A loaded document. The text is final; nothing mutates it afterwards.
#[derive(Debug, Clone)]
pub struct LoadedDocument {
    pub path: PathBuf,
    pub format: DocumentFormat,
    pub text: String,
}

impl LoadedDocument {
    /// Length of the text in characters.
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

/// Loads documents using the extraction backends in [`Capabilities`].
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentLoader {
    caps: Capabilities,
}

impl DocumentLoader {
    /// Loader with the capabilities compiled into this binary.
    pub fn new() -> Self {
        Self::with_capabilities(Capabilities::detect())
    }

    pub fn with_capabilities(caps: Capabilities) -> Self {
        Self { caps }
    }

    pub fn capabilities(&self) -> Capabilities {
        self.caps
    }

    /// Extensions this loader accepts, e.g. `[".pdf", ".txt", …]`.
    pub fn supported_extensions(&self) -> Vec<&'static str> {
        self.caps.supported_extensions()
    }

    /// Load, extract and clean the document at `path`.
    pub fn load(&self, path: impl AsRef<Path>) -> Result<LoadedDocument, DocChatError> {
        let start = Instant::now();
        let resolved = resolve_input(path, &self.caps)?;

        let raw = match resolved.format {
            DocumentFormat::Pdf => extract::extract_pdf(&resolved.path)?,
            DocumentFormat::Text => extract::extract_text(&resolved.path)?,
            DocumentFormat::Markdown => extract::extract_markdown(&resolved.path)?,
            DocumentFormat::Docx if self.caps.docx => extract::extract_docx(&resolved.path)?,
            DocumentFormat::Docx => return Err(extract::docx_unavailable()),
        };
        let text = preprocess(&raw);

        info!(
            "Loaded {} document {} ({} chars) in {}ms",
            resolved.format,
            resolved.path.display(),
            text.chars().count(),
            start.elapsed().as_millis()
        );

        Ok(LoadedDocument {
            path: resolved.path,
            format: resolved.format,
            text,
        })
    }
}

/// Load `path` with the default loader and return only its text.
pub fn load_document(path: impl AsRef<Path>) -> Result<String, DocChatError> {
    DocumentLoader::new().load(path).map(|doc| doc.text)
}

/// Extensions accepted by the default loader.
pub fn supported_extensions() -> Vec<&'static str> {
    DocumentLoader::new().supported_extensions()
}
