//! Input resolution: validate a user-supplied path and decide its format.
//!
//! The extension is checked first, then existence and permissions, so a typo
//! in the path of a supported document is always reported as
//! [`DocChatError::FileNotFound`] rather than as an extraction problem, and
//! an unsupported extension is rejected without touching the file system.
//! PDF files additionally have their magic bytes (`%PDF`) checked so a
//! renamed file gets a clear error instead of a parser failure.

use crate::error::DocChatError;
use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Document formats the loader understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentFormat {
    Pdf,
    Text,
    Docx,
    Markdown,
}

impl DocumentFormat {
    /// Map a file extension (without the dot, any case) to a format.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "txt" => Some(Self::Text),
            "docx" => Some(Self::Docx),
            "md" | "markdown" => Some(Self::Markdown),
            _ => None,
        }
    }

    /// Human-readable name used in error messages.
    pub fn name(self) -> &'static str {
        match self {
            Self::Pdf => "PDF",
            Self::Text => "text",
            Self::Docx => "DOCX",
            Self::Markdown => "Markdown",
        }
    }

    /// Extensions (with the dot) accepted for this format.
    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            Self::Pdf => &[".pdf"],
            Self::Text => &[".txt"],
            Self::Docx => &[".docx"],
            Self::Markdown => &[".md", ".markdown"],
        }
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Optional extraction backends available in this process.
///
/// Resolved once at startup via [`Capabilities::detect`]; the loader consults
/// it instead of discovering a missing backend halfway through a load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    /// Word documents can be parsed.
    pub docx: bool,
}

impl Capabilities {
    /// Capabilities compiled into this binary.
    pub fn detect() -> Self {
        Self {
            docx: cfg!(feature = "docx"),
        }
    }

    pub fn supports(&self, format: DocumentFormat) -> bool {
        match format {
            DocumentFormat::Docx => self.docx,
            _ => true,
        }
    }

    /// Supported formats in display order.
    pub fn formats(&self) -> Vec<DocumentFormat> {
        [
            DocumentFormat::Pdf,
            DocumentFormat::Text,
            DocumentFormat::Docx,
            DocumentFormat::Markdown,
        ]
        .into_iter()
        .filter(|f| self.supports(*f))
        .collect()
    }

    /// Supported extensions in display order, e.g. `.pdf, .txt, .docx, .md, .markdown`.
    pub fn supported_extensions(&self) -> Vec<&'static str> {
        self.formats()
            .into_iter()
            .flat_map(|f| f.extensions().iter().copied())
            .collect()
    }
}

impl Default for Capabilities {
    fn default() -> Self {
        Self::detect()
    }
}

/// A path that exists, is readable and has a recognised extension.
#[derive(Debug, Clone)]
pub struct ResolvedInput {
    pub path: PathBuf,
    pub format: DocumentFormat,
}

/// Validate `path` and detect its format.
///
/// The capability check happens later, in the loader, so an unavailable
/// backend is reported as such instead of as an unsupported extension.
pub fn resolve_input(path: impl AsRef<Path>, caps: &Capabilities) -> Result<ResolvedInput, DocChatError> {
    let path = path.as_ref().to_path_buf();
    let format = detect_format(&path, caps)?;

    if !path.exists() {
        return Err(DocChatError::FileNotFound { path });
    }

    match std::fs::File::open(&path) {
        Ok(mut f) => {
            if format == DocumentFormat::Pdf {
                let mut magic = [0u8; 4];
                if f.read_exact(&mut magic).is_ok() && &magic != b"%PDF" {
                    return Err(DocChatError::NotAPdf { path, magic });
                }
            }
        }
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            return Err(DocChatError::PermissionDenied { path });
        }
        Err(_) => {
            return Err(DocChatError::FileNotFound { path });
        }
    }

    debug!("Resolved {} document: {}", format, path.display());
    Ok(ResolvedInput { path, format })
}

/// Map the path's extension to a format, or fail naming the supported set.
pub fn detect_format(path: &Path, caps: &Capabilities) -> Result<DocumentFormat, DocChatError> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    DocumentFormat::from_extension(ext).ok_or_else(|| DocChatError::UnsupportedType {
        extension: if ext.is_empty() {
            "(none)".to_string()
        } else {
            format!(".{ext}")
        },
        supported: caps.supported_extensions().join(", "),
    })
}
