//! Format-specific text extraction.
//!
//! Each extractor turns one resolved file into raw text. None of them clean
//! the text; the loader runs [`crate::pipeline::preprocess`] on whatever
//! comes back. Pages and paragraphs that yield nothing are skipped, and only
//! a document that yields nothing at all is an error.

use crate::error::DocChatError;
use crate::pipeline::markdown::strip_markdown;
use std::path::Path;
use tracing::debug;

/// pdf-extract separates pages with a form feed.
const PAGE_BREAK: char = '\x0C';

/// Extract the text layer of a PDF.
pub fn extract_pdf(path: &Path) -> Result<String, DocChatError> {
    let bytes = read_bytes(path)?;
    let raw = pdf_extract::extract_text_from_mem(&bytes).map_err(|e| {
        DocChatError::ExtractionFailed {
            path: path.to_path_buf(),
            detail: e.to_string(),
        }
    })?;

    join_pdf_pages(&raw).ok_or_else(|| DocChatError::EmptyExtraction {
        path: path.to_path_buf(),
        format: "PDF".into(),
    })
}

/// Join the non-empty pages of pdf-extract output with newlines.
///
/// Returns `None` when every page is empty (scanned or image-only PDFs).
pub fn join_pdf_pages(raw: &str) -> Option<String> {
    let pages: Vec<&str> = raw
        .split(PAGE_BREAK)
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect();
    debug!("PDF yielded {} non-empty pages", pages.len());

    let text = pages.join("\n");
    let text = text.trim();
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

/// Read a UTF-8 text file as-is.
pub fn extract_text(path: &Path) -> Result<String, DocChatError> {
    std::fs::read_to_string(path).map_err(|source| DocChatError::ReadFailed {
        path: path.to_path_buf(),
        source,
    })
}

/// Read a Markdown file and reduce it to plain text.
pub fn extract_markdown(path: &Path) -> Result<String, DocChatError> {
    let source = extract_text(path)?;
    Ok(strip_markdown(&source))
}

/// Extract paragraph and table text from a Word document.
#[cfg(feature = "docx")]
pub fn extract_docx(path: &Path) -> Result<String, DocChatError> {
    let bytes = read_bytes(path)?;
    let docx = docx_rs::read_docx(&bytes).map_err(|e| DocChatError::ExtractionFailed {
        path: path.to_path_buf(),
        detail: format!("{e:?}"),
    })?;

    let text = docx_text::collect(&docx.document);
    if text.trim().is_empty() {
        return Err(DocChatError::EmptyExtraction {
            path: path.to_path_buf(),
            format: "DOCX".into(),
        });
    }
    Ok(text)
}

/// Without the `docx` feature the backend is absent.
#[cfg(not(feature = "docx"))]
pub fn extract_docx(_path: &Path) -> Result<String, DocChatError> {
    Err(docx_unavailable())
}

pub(crate) fn docx_unavailable() -> DocChatError {
    DocChatError::DependencyUnavailable {
        format: "DOCX".into(),
        hint: "Rebuild with `--features docx` to enable Word documents.".into(),
    }
}

fn read_bytes(path: &Path) -> Result<Vec<u8>, DocChatError> {
    std::fs::read(path).map_err(|source| DocChatError::ReadFailed {
        path: path.to_path_buf(),
        source,
    })
}

/// Walking the docx-rs tree:
///
/// ```text
/// Document ─┬─ Paragraph ── Run ── Text
///           └─ Table ── TableRow ── TableCell ── Paragraph ── …
/// ```
///
/// Paragraph text comes first, one line per non-empty paragraph, followed by
/// one ` | `-joined line per table row.
#[cfg(feature = "docx")]
mod docx_text {
    use docx_rs::{
        Document, DocumentChild, Paragraph, ParagraphChild, RunChild, Table, TableCellContent,
        TableChild, TableRowChild,
    };

    pub(super) fn collect(document: &Document) -> String {
        let mut lines: Vec<String> = Vec::new();
        let mut rows: Vec<String> = Vec::new();

        for child in &document.children {
            match child {
                DocumentChild::Paragraph(para) => {
                    let text = paragraph_text(para);
                    if !text.trim().is_empty() {
                        lines.push(text);
                    }
                }
                DocumentChild::Table(table) => collect_rows(table, &mut rows),
                _ => {}
            }
        }

        lines.extend(rows);
        lines.join("\n")
    }

    fn collect_rows(table: &Table, rows: &mut Vec<String>) {
        for child in &table.rows {
            #[allow(irrefutable_let_patterns)]
            let TableChild::TableRow(row) = child else {
                continue;
            };
            let cells: Vec<String> = row
                .cells
                .iter()
                .filter_map(|cell| {
                    #[allow(irrefutable_let_patterns)]
                    let TableRowChild::TableCell(cell) = cell else {
                        return None;
                    };
                    Some(cell_text(&cell.children))
                })
                .filter(|t| !t.trim().is_empty())
                .collect();

            if !cells.is_empty() {
                rows.push(cells.join(" | "));
            }
        }
    }

    fn cell_text(contents: &[TableCellContent]) -> String {
        contents
            .iter()
            .filter_map(|content| match content {
                TableCellContent::Paragraph(p) => Some(paragraph_text(p)),
                _ => None,
            })
            .filter(|t| !t.trim().is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub(super) fn paragraph_text(para: &Paragraph) -> String {
        let mut parts = Vec::new();
        for child in &para.children {
            if let ParagraphChild::Run(run) = child {
                for rc in &run.children {
                    if let RunChild::Text(t) = rc {
                        parts.push(t.text.as_str());
                    }
                }
            }
        }
        parts.concat()
    }
}
