//! Pulls translated values from the translation files back into a page's
//! content blocks.

use indexmap::IndexMap;
use serde_yaml::Value;

use super::document::ContentDocument;
use crate::store::CanonicalKeyStore;
use crate::synthesis::ExistingRecord;
use crate::text::text_id;
use crate::tree::{
    LocaleTranslations,
    MergeError,
    MergeOutcome,
    locate_value,
    merge,
};

/// Translation file of one page, per locale. Locales without a file are absent.
pub type PageTranslations = IndexMap<String, ExistingRecord>;

/// What resynchronising one page did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResyncOutcome {
    pub promoted: usize,
    pub updated: usize,
    /// Keys of this page whose text no longer appears in any content block.
    pub drifted: Vec<String>,
}

impl ResyncOutcome {
    /// Whether the content tree was touched.
    #[must_use]
    pub const fn changed(&self) -> bool {
        self.promoted + self.updated > 0
    }
}

/// Translated values for one canonical text across locales.
///
/// Each record is searched by the canonical key first, then by the text id of
/// the canonical text. An empty stored value is a value.
#[must_use]
pub fn lookup_translations(
    translations: &PageTranslations,
    key: &str,
    original: &str,
) -> LocaleTranslations {
    let id = text_id(original);
    translations
        .iter()
        .filter_map(|(locale, record)| {
            let value = record.value(key).or_else(|| record.value(&id))?;
            Some((locale.clone(), value.to_string()))
        })
        .collect()
}

/// Merges every canonical key's translations into the document's content blocks.
///
/// Each block is searched on its own, so text repeated across blocks is
/// translated in each of them.
pub fn resynchronize_page(
    document: &mut ContentDocument,
    store: &CanonicalKeyStore,
    translations: &PageTranslations,
    page: &str,
    locales: &[String],
) -> Result<ResyncOutcome, MergeError> {
    let mut outcome = ResyncOutcome::default();
    let Some(blocks) = document.content_blocks_mut() else {
        return Ok(outcome);
    };

    for (key, entry) in &store.keys {
        let original = entry.original_trimmed();
        if original.is_empty() {
            continue;
        }

        let values = lookup_translations(translations, key, original);
        let mut found = false;
        for block in blocks.iter_mut() {
            found |= merge_into_block(block, original, &values, locales, &mut outcome)?;
        }

        if !found && entry.is_on_page(page) {
            outcome.drifted.push(key.clone());
        }
    }
    Ok(outcome)
}

fn merge_into_block(
    block: &mut Value,
    original: &str,
    values: &LocaleTranslations,
    locales: &[String],
    outcome: &mut ResyncOutcome,
) -> Result<bool, MergeError> {
    let Some(path) = locate_value(block, original).map(|located| located.path) else {
        return Ok(false);
    };
    match merge(block, &path, original, values, locales)? {
        MergeOutcome::Promoted => outcome.promoted += 1,
        MergeOutcome::Updated => outcome.updated += 1,
    }
    tracing::debug!(path = %path, "Merged translations");
    Ok(true)
}
