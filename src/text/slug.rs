//! Normalized ids derived from text, used to look translations up by content.

use std::sync::LazyLock;

use regex::Regex;

use super::markdown::re;

static MARKDOWN_LINK_RE: LazyLock<Regex> = LazyLock::new(|| re(r"(?:__[*#])|\[(.*?)\]\(.*?\)"));

/// Characters removed before slugging.
const REMOVED_CHARS: &[char] = &['.', '*', ',', ':', '/'];

/// Punctuation that survives slugging.
const KEPT_PUNCTUATION: &[char] = &['$', '_', '+', '~', '(', ')', '\'', '"', '!', '-', '@'];

/// Derives the normalized id of a text (e.g. `"Hello World"` -> `"hello-world"`).
///
/// Returns an empty string for empty input.
#[must_use]
pub fn text_id(text: &str) -> String {
    let lower = text.to_lowercase();
    let unlinked = MARKDOWN_LINK_RE.replace_all(&lower, "${1}");

    let kept: String = unlinked
        .chars()
        .filter(|c| !REMOVED_CHARS.contains(c))
        .filter(|c| c.is_alphanumeric() || c.is_whitespace() || KEPT_PUNCTUATION.contains(c))
        .collect();

    kept.split_whitespace().collect::<Vec<_>>().join("-")
}
