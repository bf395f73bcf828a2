//! Text cleanup applied to every extracted document before prompting.
//!
//! Extractors hand over text full of layout debris: hard line breaks from
//! PDF columns, tabs from tables, bullets and dingbats, private-use glyphs.
//! None of it helps the model. The passes below reduce the text to single
//! spaced words and a small punctuation set.
//!
//! ## Rule Order
//!
//! 1. Collapse whitespace runs to one space
//! 2. Replace characters outside the allow-list with a space
//! 3. Collapse repeated newlines
//! 4. Re-split on whitespace, rejoin with single spaces, trim
//!
//! Step 2 replaces instead of deleting so `foo•bar` does not become
//! `foobar`. Step 4 removes the double spaces that replacement leaves behind.
//! The composition is idempotent.

use once_cell::sync::Lazy;
use regex::Regex;

static RE_WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

static RE_DISALLOWED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"[^\w\s.,!?;:\-()\[\]{}"'/@#$%&*+=<>|]"#).unwrap()
});

static RE_NEWLINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{2,}").unwrap());

/// Clean raw extracted text for use in a prompt.
pub fn preprocess(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    let s = RE_WHITESPACE.replace_all(text, " ");
    let s = RE_DISALLOWED.replace_all(&s, " ");
    let s = RE_NEWLINES.replace_all(&s, "\n");
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
