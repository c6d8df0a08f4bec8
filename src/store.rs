//! Read-only inputs produced by the Rosey extraction step: the canonical key
//! store, the page inventory and the previous per-locale snapshots.

use indexmap::{
    IndexMap,
    IndexSet,
};
use serde::Deserialize;
use serde_json::Value;

/// Namespace prefix of structural fragments that receive diff annotations.
pub const STATIC_NAMESPACE: &str = "static:";
/// Namespace prefix of rich-text fragments.
pub const MARKDOWN_NAMESPACE: &str = "markdown:";

/// Namespace carried by a canonical key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyNamespace {
    Static,
    Markdown,
    Inline,
}

impl KeyNamespace {
    #[must_use]
    pub fn of(key: &str) -> Self {
        if key.starts_with(STATIC_NAMESPACE) {
            Self::Static
        } else if key.starts_with(MARKDOWN_NAMESPACE) {
            Self::Markdown
        } else {
            Self::Inline
        }
    }

    /// Whether inputs for this key are edited as markdown.
    #[must_use]
    pub const fn is_rich(self) -> bool {
        matches!(self, Self::Static | Self::Markdown)
    }
}

/// One extracted text fragment.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CanonicalKeyEntry {
    #[serde(default)]
    pub original: String,

    /// Pages referencing this fragment. Values are flags or counts.
    #[serde(default)]
    pub pages: IndexMap<String, Value>,
}

impl CanonicalKeyEntry {
    /// Whether this fragment appears on `page`.
    #[must_use]
    pub fn is_on_page(&self, page: &str) -> bool {
        self.pages.get(page).is_some_and(is_truthy)
    }

    /// Canonical text with surrounding whitespace removed.
    #[must_use]
    pub fn original_trimmed(&self) -> &str {
        self.original.trim()
    }
}

/// `false`, `0`, `null` and `""` mark a page as not referencing the key.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// The canonical key store (`base.json`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CanonicalKeyStore {
    #[serde(default)]
    pub keys: IndexMap<String, CanonicalKeyEntry>,
}

impl CanonicalKeyStore {
    /// Keys referenced by `page`, in store order.
    pub fn keys_for_page<'a>(
        &'a self,
        page: &'a str,
    ) -> impl Iterator<Item = (&'a String, &'a CanonicalKeyEntry)> + 'a {
        self.keys.iter().filter(move |(_, entry)| entry.is_on_page(page))
    }

    /// Every page referenced by any key, in first-seen order.
    #[must_use]
    pub fn referenced_pages(&self) -> Vec<String> {
        let pages: IndexSet<&String> = self
            .keys
            .values()
            .flat_map(|entry| entry.pages.iter().filter(|(_, v)| is_truthy(v)).map(|(p, _)| p))
            .collect();
        pages.into_iter().cloned().collect()
    }
}

/// The page inventory (`base.urls.json`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UrlIndex {
    #[serde(default)]
    pub keys: IndexMap<String, Value>,
}

impl UrlIndex {
    #[must_use]
    pub fn pages(&self) -> Vec<String> {
        self.keys.keys().cloned().collect()
    }
}

/// Previous run's per-key records for one locale (`locales/<locale>.json`).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct LocaleSnapshot {
    entries: IndexMap<String, Value>,
}

impl LocaleSnapshot {
    /// Canonical text recorded for `key` by the previous run, if any.
    #[must_use]
    pub fn previous_original(&self, key: &str) -> Option<&str> {
        self.entries
            .get(key)
            .and_then(|entry| entry.get("original"))
            .and_then(Value::as_str)
            .filter(|original| !original.is_empty())
    }
}

/// Canonical inputs shared read-only by every task of a batch.
#[derive(Debug, Clone, Default)]
pub struct CanonicalInputs {
    pub store: CanonicalKeyStore,
    /// Page inventory; falls back to the pages referenced by the store.
    pub pages: Vec<String>,
}

impl CanonicalInputs {
    #[must_use]
    pub fn new(store: CanonicalKeyStore, url_index: Option<UrlIndex>) -> Self {
        let pages = url_index.map_or_else(|| store.referenced_pages(), |index| index.pages());
        Self { store, pages }
    }
}
