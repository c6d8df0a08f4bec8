//! HTML to markdown conversion and the character-stripping passes used for
//! labels, comments and highlight phrases.

use std::sync::LazyLock;

use regex::{
    Captures,
    Regex,
};

/// Labels longer than this many characters are cut and suffixed with `...`.
pub const LABEL_MAX_CHARS: usize = 42;

/// Characters stripped from highlight phrases.
const PHRASE_STRIP_CHARS: &[char] =
    &['&', '/', '\\', '#', ',', '+', '(', ')', '$', '~', '%', '.', '"', ':', '*', '?', '<', '>', '{', '}'];

/// Characters stripped from labels and comment annotations.
const COMMENT_STRIP_CHARS: &[char] =
    &['&', '/', '\\', '#', '+', '(', ')', '$', '~', '%', '"', '*', '<', '>', '{', '}'];

/// Regex literal that is known to be valid.
#[allow(clippy::expect_used)]
pub(crate) fn re(pattern: &str) -> Regex {
    Regex::new(pattern).expect("static regex")
}

static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| re(r"\s+"));
static HEADING_RE: LazyLock<Regex> =
    LazyLock::new(|| re(r"(?is)<h([1-6])(?:\s[^>]*)?>(.*?)</h[1-6]\s*>"));
static BR_RE: LazyLock<Regex> = LazyLock::new(|| re(r"(?i)<br\s*/?>"));
static STRONG_RE: LazyLock<Regex> =
    LazyLock::new(|| re(r"(?is)<(?:strong|b)(?:\s[^>]*)?>(.*?)</(?:strong|b)\s*>"));
static EM_RE: LazyLock<Regex> =
    LazyLock::new(|| re(r"(?is)<(?:em|i)(?:\s[^>]*)?>(.*?)</(?:em|i)\s*>"));
static CODE_RE: LazyLock<Regex> = LazyLock::new(|| re(r"(?is)<code(?:\s[^>]*)?>(.*?)</code\s*>"));
static ANCHOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    re(r#"(?is)<a\s[^>]*?href\s*=\s*["']([^"']*)["'][^>]*>(.*?)</a\s*>"#)
});
static LIST_ITEM_RE: LazyLock<Regex> = LazyLock::new(|| re(r"(?is)<li(?:\s[^>]*)?>(.*?)</li\s*>"));
static BLOCK_TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    re(r"(?i)</?(?:p|div|section|article|header|footer|ul|ol|blockquote|table|tr)(?:\s[^>]*)?>")
});
static ANY_TAG_RE: LazyLock<Regex> = LazyLock::new(|| re(r"<[^>]+>"));
static MARKDOWN_LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| re(r"(?:__[*#])|\[(.*?)\]\(.*?\)"));

/// Converts Rosey-extracted HTML into markdown.
///
/// Whitespace follows HTML rules: every run collapses to a single space, and
/// line breaks only come from block-level tags and `<br>`.
#[must_use]
pub fn html_to_markdown(html: &str) -> String {
    let collapsed = WHITESPACE_RE.replace_all(html.trim(), " ");
    if !collapsed.contains('<') && !collapsed.contains('&') {
        return collapsed.into_owned();
    }

    let text = HEADING_RE.replace_all(&collapsed, |caps: &Captures<'_>| {
        let level = caps.get(1).and_then(|m| m.as_str().parse::<usize>().ok()).unwrap_or(1);
        let inner = caps.get(2).map_or("", |m| m.as_str()).trim();
        format!("\n\n{} {inner}\n\n", "#".repeat(level))
    });
    let text = BR_RE.replace_all(&text, "\n");
    let text = STRONG_RE.replace_all(&text, "**${1}**");
    let text = EM_RE.replace_all(&text, "_${1}_");
    let text = CODE_RE.replace_all(&text, "`${1}`");
    let text = ANCHOR_RE.replace_all(&text, "[${2}](${1})");
    let text = LIST_ITEM_RE.replace_all(&text, |caps: &Captures<'_>| {
        format!("\n* {}", caps.get(1).map_or("", |m| m.as_str()).trim())
    });
    let text = BLOCK_TAG_RE.replace_all(&text, "\n\n");
    let text = ANY_TAG_RE.replace_all(&text, "");
    let text = decode_entities(&text);

    tidy_lines(&text)
}

/// Decodes the handful of entities that appear in extracted text.
fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

/// Trims every line and keeps at most one blank line between paragraphs.
fn tidy_lines(text: &str) -> String {
    let mut lines: Vec<&str> = Vec::new();
    for line in text.lines().map(str::trim) {
        if line.is_empty() && lines.last().is_none_or(|last| last.is_empty()) {
            continue;
        }
        lines.push(line);
    }
    while lines.last().is_some_and(|last| last.is_empty()) {
        lines.pop();
    }
    lines.join("\n")
}

/// Replaces markdown links by their text and drops `__*` / `__#` markers.
fn unlink(markdown: &str) -> String {
    MARKDOWN_LINK_RE.replace_all(markdown.trim(), "${1}").into_owned()
}

/// Cleans markdown into a phrase suitable for a text-fragment highlight.
#[must_use]
pub fn clean_phrase(markdown: &str) -> String {
    unlink(markdown).replace(PHRASE_STRIP_CHARS, "").trim().to_string()
}

/// Cleans markdown for embedding in an editor label or comment.
///
/// Keeps sentence punctuation (`, . : ?`) that [`clean_phrase`] removes.
#[must_use]
pub fn clean_comment(markdown: &str) -> String {
    unlink(markdown).replace(COMMENT_STRIP_CHARS, "").trim().to_string()
}

/// Cuts a label to [`LABEL_MAX_CHARS`] characters, appending `...` when cut.
#[must_use]
pub fn truncate_label(text: &str) -> String {
    if is_label_truncated(text) {
        let head: String = text.chars().take(LABEL_MAX_CHARS).collect();
        format!("{head}...")
    } else {
        text.to_string()
    }
}

/// Whether [`truncate_label`] would cut this text.
#[must_use]
pub fn is_label_truncated(text: &str) -> bool {
    text.chars().count() > LABEL_MAX_CHARS
}
