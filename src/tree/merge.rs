//! Writing per-locale translations into a located content tree entry.

use indexmap::IndexMap;
use serde_yaml::{
    Mapping,
    Value,
};
use thiserror::Error;

use super::{
    ORIGINAL_KEY,
    PathSegment,
    SELECTED_TRANSLATION_KEY,
    TreePath,
    is_translation_record,
    locale_field,
    resolve_mut,
    untagged_mut,
};

/// Value of `selected_translation` in a freshly promoted leaf.
const DEFAULT_SELECTION: &str = "None";

/// Translated values for one canonical text, keyed by locale.
///
/// A locale missing from the map has no record value; an empty string is a value.
pub type LocaleTranslations = IndexMap<String, String>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MergeError {
    #[error("No mapping entry at '{0}'")]
    PathNotFound(TreePath),

    #[error("'{0}' is a field of a translation record, not its original text")]
    RecordField(TreePath),
}

/// What a merge did to the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    /// A plain leaf was replaced by a translation record.
    Promoted,
    /// An existing translation record had its locale fields refreshed.
    Updated,
}

/// Upserts translations into the entry at `path` (as returned by `locate_value`).
///
/// If the containing mapping is already a translation record, `path` must name
/// its `original` entry, and the record's `<locale>_translation` fields are
/// overwritten for every locale that has a value. Otherwise the entry is promoted to a record holding `original` and
/// one field per locale (empty when no value exists). Promotion is one-way.
pub fn merge(
    tree: &mut Value,
    path: &TreePath,
    original: &str,
    translations: &LocaleTranslations,
    locales: &[String],
) -> Result<MergeOutcome, MergeError> {
    let not_found = || MergeError::PathNotFound(path.clone());

    let Some((PathSegment::Key(key), parent)) = path.split_last() else {
        return Err(not_found());
    };
    let Some(Value::Mapping(container)) = resolve_mut(tree, parent).map(untagged_mut) else {
        return Err(not_found());
    };
    if !container.contains_key(key) {
        return Err(not_found());
    }

    if is_translation_record(container) {
        if key.as_str() != Some(ORIGINAL_KEY) {
            return Err(MergeError::RecordField(path.clone()));
        }
        for locale in locales {
            if let Some(value) = translations.get(locale) {
                container.insert(Value::from(locale_field(locale)), Value::from(value.as_str()));
            }
        }
        return Ok(MergeOutcome::Updated);
    }

    container.insert(key.clone(), Value::Mapping(new_record(original, translations, locales)));
    Ok(MergeOutcome::Promoted)
}

fn new_record(original: &str, translations: &LocaleTranslations, locales: &[String]) -> Mapping {
    let mut record = Mapping::new();
    record.insert(Value::from(SELECTED_TRANSLATION_KEY), Value::from(DEFAULT_SELECTION));
    record.insert(Value::from(ORIGINAL_KEY), Value::from(original));
    for locale in locales {
        let value = translations.get(locale).map_or("", String::as_str);
        record.insert(Value::from(locale_field(locale)), Value::from(value));
    }
    record
}
