//! Per-key editor configuration: input type, label, annotations.

use super::record::{
    EditorOptions,
    InputConfig,
    InputContext,
    InputType,
};
use crate::annotation::{
    build_location_link,
    describe_change,
};
use crate::store::KeyNamespace;
use crate::text::markdown::is_label_truncated;
use crate::text::{
    clean_comment,
    clean_phrase,
    html_to_markdown,
    truncate_label,
};

/// Source texts shorter than this many characters get a single-line input.
pub const SHORT_TEXT_CHARS: usize = 20;

/// Everything needed to describe one key's input on one page.
#[derive(Debug, Clone, Copy)]
pub struct InputSource<'a> {
    pub key: &'a str,
    /// Current canonical text (HTML as extracted).
    pub original: &'a str,
    /// Canonical text recorded by the previous run for this locale.
    pub previous_original: Option<&'a str>,
    pub page: &'a str,
    pub base_url: &'a str,
}

#[must_use]
pub fn input_type_for(namespace: KeyNamespace, original: &str) -> InputType {
    if namespace.is_rich() {
        InputType::Markdown
    } else if original.trim().chars().count() < SHORT_TEXT_CHARS {
        InputType::Text
    } else {
        InputType::Textarea
    }
}

/// Builds the editor configuration for one key.
#[must_use]
pub fn build_input_config(source: &InputSource<'_>) -> InputConfig {
    let namespace = KeyNamespace::of(source.key);
    let original = source.original.trim();
    let markdown = html_to_markdown(original);
    let input_type = input_type_for(namespace, original);

    let options =
        if input_type == InputType::Markdown { EditorOptions::rich() } else { EditorOptions::default() };

    let diff_note = if namespace == KeyNamespace::Static {
        let previous = source.previous_original.map(html_to_markdown).unwrap_or_default();
        describe_change(&previous, &markdown)
    } else {
        String::new()
    };
    let location = build_location_link(&clean_phrase(&markdown), source.page, source.base_url);
    let comment =
        if diff_note.is_empty() { location } else { format!("{diff_note}\n\n{location}") };

    let label_text = clean_comment(&markdown);
    let context = is_label_truncated(&label_text)
        .then(|| InputContext::untranslated_text(markdown.clone()));

    InputConfig {
        label: truncate_label(&label_text),
        hidden: original.is_empty(),
        input_type,
        options,
        comment,
        context,
    }
}
