//! Shape of the editable translation files (one per page and locale).

use indexmap::IndexMap;
use serde::{
    Deserialize,
    Serialize,
};
use serde_yaml::{
    Mapping,
    Value,
};

/// Top-level key holding the translated page URL.
pub const URL_TRANSLATION_KEY: &str = "urlTranslation";
/// Top-level key holding editor configuration.
pub const INPUTS_KEY: &str = "_inputs";

/// Whether `key` collides with a top-level field of the file itself.
#[must_use]
pub fn is_reserved_key(key: &str) -> bool {
    key == URL_TRANSLATION_KEY || key == INPUTS_KEY
}

/// A generated translation file, serialised in field order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslationFile {
    #[serde(rename = "urlTranslation")]
    pub url_translation: String,

    #[serde(rename = "_inputs")]
    pub inputs: InputsSection,

    /// Translated value per key; `""` means untranslated.
    #[serde(flatten)]
    pub values: IndexMap<String, String>,
}

impl TranslationFile {
    /// # Errors
    /// Returns an error if serialisation fails.
    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }

    /// Keys listed in the group at `index` of the page metadata.
    #[must_use]
    pub fn group_inputs(&self, index: usize) -> &[String] {
        self.inputs.page.options.groups.get(index).map_or(&[], |group| group.inputs.as_slice())
    }
}

/// The `_inputs` section: page metadata under `$`, then one entry per key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputsSection {
    #[serde(rename = "$")]
    pub page: PageMeta,

    #[serde(flatten)]
    pub inputs: IndexMap<String, InputConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMeta {
    #[serde(rename = "type")]
    pub kind: String,
    pub comment: String,
    pub options: PageOptions,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageOptions {
    pub place_groups_below: bool,
    pub groups: Vec<InputGroup>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputGroup {
    pub heading: String,
    pub comment: String,
    pub inputs: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputType {
    Text,
    Textarea,
    Markdown,
}

/// Editor configuration of one translation input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputConfig {
    pub label: String,
    pub hidden: bool,
    #[serde(rename = "type")]
    pub input_type: InputType,
    pub options: EditorOptions,
    pub comment: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<InputContext>,
}

/// Rich-text editor toolbar. Unset entries are omitted, so plain inputs
/// serialise as `{}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditorOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bold: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub italic: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub undo: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redo: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub removeformat: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub copyformatting: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bulletedlist: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub numberedlist: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blockquote: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub superscript: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscript: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub horizontalrule: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<bool>,
}

impl EditorOptions {
    /// Block formats offered by the rich editor.
    pub const RICH_FORMATS: &'static str = "p h1 h2 h3 h4";

    /// Full toolbar granted to markdown inputs.
    #[must_use]
    pub fn rich() -> Self {
        let on = Some(true);
        Self {
            bold: on,
            format: Some(Self::RICH_FORMATS.to_string()),
            italic: on,
            link: on,
            undo: on,
            redo: on,
            removeformat: on,
            copyformatting: on,
            bulletedlist: on,
            numberedlist: on,
            blockquote: on,
            superscript: on,
            subscript: on,
            code: on,
            horizontalrule: on,
            image: on,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Collapsed preview of the full source text, shown when the label is cut.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputContext {
    pub open: bool,
    pub title: String,
    pub icon: String,
    pub content: String,
}

impl InputContext {
    #[must_use]
    pub fn untranslated_text(content: String) -> Self {
        Self {
            open: false,
            title: "Untranslated Text".to_string(),
            icon: "translate".to_string(),
            content,
        }
    }
}

/// What survives from a translation file already on disk.
///
/// Parsing is lenient: editor configuration is regenerated anyway, so only
/// the URL translation and scalar values are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExistingRecord {
    pub url_translation: Option<String>,
    pub values: IndexMap<String, String>,
}

impl ExistingRecord {
    /// Parses a translation file. Empty documents yield an empty record.
    ///
    /// # Errors
    /// Returns an error for malformed YAML or a non-mapping document.
    pub fn from_yaml(text: &str) -> Result<Self, serde_yaml::Error> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        let mapping: Option<Mapping> = serde_yaml::from_str(text)?;
        Ok(mapping.map(Self::from_mapping).unwrap_or_default())
    }

    fn from_mapping(mapping: Mapping) -> Self {
        let mut record = Self::default();
        for (key, value) in mapping {
            let Value::String(key) = key else {
                continue;
            };
            let Some(text) = scalar_text(value) else {
                continue;
            };
            if key == URL_TRANSLATION_KEY {
                record.url_translation = Some(text).filter(|url| !url.is_empty());
            } else if key != INPUTS_KEY {
                record.values.insert(key, text);
            }
        }
        record
    }

    /// Stored value for `key`, including empty strings.
    #[must_use]
    pub fn value(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Stored value for `key` if a translator filled it in.
    #[must_use]
    pub fn translated(&self, key: &str) -> Option<&str> {
        self.value(key).filter(|value| !value.is_empty())
    }
}

/// Editors may leave numbers or booleans that YAML no longer reads as strings.
fn scalar_text(value: Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Tagged(tagged) => scalar_text(tagged.value),
        Value::Null | Value::Sequence(_) | Value::Mapping(_) => None,
    }
}
