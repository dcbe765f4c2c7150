//! Cleans model output before it reaches the speech synthesizer

use regex::Regex;
use std::sync::LazyLock;

/// Markdown link: keep the label
static LINK_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]*)\]\([^)]*\)").expect("valid regex"));

/// Emphasis runs (`*`, `**`, ...)
static EMPHASIS_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*+").expect("valid regex"));

/// Bare http/https URLs
static URL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https?://[^\s<>\[\](){}]+").expect("valid regex"));

/// Markdown structure characters
static MARKUP_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[#_`\[\]]").expect("valid regex"));

/// Parentheses emptied by URL removal
static EMPTY_PARENS_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(\s*\)").expect("valid regex"));

static WHITESPACE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Strip formatting a speech engine would read aloud
#[must_use]
pub fn sanitize(text: &str) -> String {
    let text = LINK_REGEX.replace_all(text, "$1");
    let text = EMPHASIS_REGEX.replace_all(&text, "");
    let text = URL_REGEX.replace_all(&text, "");
    let text = MARKUP_REGEX.replace_all(&text, "");
    let text = EMPTY_PARENS_REGEX.replace_all(&text, "");
    WHITESPACE_REGEX.replace_all(&text, " ").trim().to_string()
}
