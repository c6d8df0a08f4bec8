//! Builds the translation file of one page for one locale.

use indexmap::IndexMap;

use super::input_config::{
    InputSource,
    build_input_config,
};
use super::record::{
    ExistingRecord,
    InputGroup,
    InputsSection,
    PageMeta,
    PageOptions,
    TranslationFile,
    is_reserved_key,
};
use crate::store::{
    CanonicalKeyStore,
    LocaleSnapshot,
};
use crate::text::{
    page_link_path,
    translation_file_stem,
};

/// Index of the "still to translate" group in the page metadata.
pub const UNTRANSLATED_GROUP: usize = 0;
/// Index of the "already translated" group in the page metadata.
pub const TRANSLATED_GROUP: usize = 1;

/// Page and locale a translation file is generated for.
#[derive(Debug, Clone, Copy)]
pub struct RecordTarget<'a> {
    pub page: &'a str,
    pub locale: &'a str,
    pub base_url: &'a str,
}

/// File name of a page's translation file inside a locale folder.
#[must_use]
pub fn record_file_name(page: &str) -> String {
    format!("{}.yaml", translation_file_stem(page))
}

impl PageMeta {
    /// Metadata object with both groups empty.
    #[must_use]
    pub fn for_page(target: &RecordTarget<'_>) -> Self {
        let page_path = page_link_path(target.page);
        let link = format!("[{page_path}]({}{page_path})", target.base_url);
        let locale = target.locale;

        Self {
            kind: "object".to_string(),
            comment: format!("[See {page_path}]({}{page_path})", target.base_url),
            options: PageOptions {
                place_groups_below: false,
                groups: vec![
                    InputGroup {
                        heading: format!("Still to translate ({locale})"),
                        comment: format!("Text to translate on {link}"),
                        inputs: Vec::new(),
                    },
                    InputGroup {
                        heading: format!("Already translated ({locale})"),
                        comment: format!("Text already translated on {link}"),
                        inputs: Vec::new(),
                    },
                ],
            },
        }
    }
}

/// Produces the translation file for `target` from the canonical store, the
/// file already on disk and the previous locale snapshot.
///
/// Keys follow canonical store order, so identical inputs give identical output.
#[must_use]
pub fn synthesize_record(
    store: &CanonicalKeyStore,
    snapshot: &LocaleSnapshot,
    existing: &ExistingRecord,
    target: &RecordTarget<'_>,
) -> TranslationFile {
    let mut page_meta = PageMeta::for_page(target);
    let mut inputs = IndexMap::new();
    let mut values = IndexMap::new();

    for (key, entry) in store.keys_for_page(target.page) {
        if is_reserved_key(key) {
            tracing::warn!(page = target.page, key = %key, "Key collides with a reserved field, skipping");
            continue;
        }

        let value = existing.translated(key).unwrap_or_default().to_string();
        let group = if value.is_empty() { UNTRANSLATED_GROUP } else { TRANSLATED_GROUP };
        if let Some(group) = page_meta.options.groups.get_mut(group) {
            group.inputs.push(key.clone());
        }

        let source = InputSource {
            key,
            original: &entry.original,
            previous_original: snapshot.previous_original(key),
            page: target.page,
            base_url: target.base_url,
        };
        inputs.insert(key.clone(), build_input_config(&source));
        values.insert(key.clone(), value);
    }

    TranslationFile {
        url_translation: existing
            .url_translation
            .clone()
            .unwrap_or_else(|| target.page.to_string()),
        inputs: InputsSection { page: page_meta, inputs },
        values,
    }
}
