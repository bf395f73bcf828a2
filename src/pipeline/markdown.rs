//! Markdown → plain text by pattern substitution.
//!
//! Not a Markdown parser: the output is a readable plain-text
//! approximation. Markup that survives (nested emphasis, reference-style
//! links, HTML) is left for the preprocessor.
//!
//! ## Rule Order
//!
//! Fenced code is removed first so nothing inside it is mistaken for a
//! heading or bullet. Bullets go before emphasis because a `* item` bullet
//! would otherwise read as an unterminated italic. Images go before links
//! because `![alt](src)` contains a link pattern.

use once_cell::sync::Lazy;
use regex::Regex;

static RE_FENCED_CODE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)```.*?```").unwrap());
static RE_INLINE_CODE: Lazy<Regex> = Lazy::new(|| Regex::new(r"`([^`\n]+)`").unwrap());
static RE_HEADING: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^[ \t]*#{1,6}[ \t]+").unwrap());
static RE_BLOCKQUOTE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^[ \t]*>[ \t]?").unwrap());
static RE_BULLET: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^[ \t]*[-*+][ \t]+").unwrap());
static RE_NUMBERED: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^[ \t]*\d+\.[ \t]+").unwrap());
static RE_BOLD_STARS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*([^*\n]+)\*\*").unwrap());
static RE_BOLD_UNDERSCORES: Lazy<Regex> = Lazy::new(|| Regex::new(r"__([^_\n]+)__").unwrap());
static RE_ITALIC_STAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*([^*\n]+)\*").unwrap());
static RE_ITALIC_UNDERSCORE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b_([^_\n]+)_\b").unwrap());
static RE_IMAGE: Lazy<Regex> = Lazy::new(|| Regex::new(r"!\[([^\]]*)\]\([^)]*\)").unwrap());
static RE_LINK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[([^\]]+)\]\([^)]*\)").unwrap());

/// Strip Markdown syntax, keeping the visible text.
pub fn strip_markdown(input: &str) -> String {
    let s = RE_FENCED_CODE.replace_all(input, "");
    let s = RE_INLINE_CODE.replace_all(&s, "$1");
    let s = RE_HEADING.replace_all(&s, "");
    let s = RE_BLOCKQUOTE.replace_all(&s, "");
    let s = RE_BULLET.replace_all(&s, "");
    let s = RE_NUMBERED.replace_all(&s, "");
    let s = RE_BOLD_STARS.replace_all(&s, "$1");
    let s = RE_BOLD_UNDERSCORES.replace_all(&s, "$1");
    let s = RE_ITALIC_STAR.replace_all(&s, "$1");
    let s = RE_ITALIC_UNDERSCORE.replace_all(&s, "$1");
    let s = RE_IMAGE.replace_all(&s, "$1");
    RE_LINK.replace_all(&s, "$1").into_owned()
}
