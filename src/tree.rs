//! Search and rewrite of untyped content trees (maps, sequences, scalars).
//!
//! Content trees are `serde_yaml::Value`s taken from page front matter.

pub mod locate;
pub mod merge;

use std::fmt;

use serde_yaml::{
    Mapping,
    Value,
};

pub use locate::{
    Located,
    collect_locale_translations,
    find_by_key,
    locate,
    locate_value,
};
pub use merge::{
    LocaleTranslations,
    MergeError,
    MergeOutcome,
    merge,
};

/// Key of the field marking a translation record leaf.
pub const SELECTED_TRANSLATION_KEY: &str = "selected_translation";
/// Key holding the canonical text inside a translation record leaf.
pub const ORIGINAL_KEY: &str = "original";

/// Name of the per-locale field in a translation record leaf (`es` -> `es_translation`).
#[must_use]
pub fn locale_field(locale: &str) -> String {
    format!("{locale}_translation")
}

/// Whether a mapping is a translation record leaf.
#[must_use]
pub fn is_translation_record(mapping: &Mapping) -> bool {
    mapping.contains_key(SELECTED_TRANSLATION_KEY) && mapping.contains_key(ORIGINAL_KEY)
}

/// One step of a [`TreePath`].
#[derive(Debug, Clone, PartialEq)]
pub enum PathSegment {
    Key(Value),
    Index(usize),
}

/// Structural path from a tree root to a mapping entry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TreePath(Vec<PathSegment>);

impl TreePath {
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    pub fn push(&mut self, segment: PathSegment) {
        self.0.push(segment);
    }

    pub fn pop(&mut self) -> Option<PathSegment> {
        self.0.pop()
    }

    /// Splits into the path of the containing node and the final segment.
    #[must_use]
    pub fn split_last(&self) -> Option<(&PathSegment, &[PathSegment])> {
        self.0.split_last()
    }
}

impl From<Vec<PathSegment>> for TreePath {
    fn from(segments: Vec<PathSegment>) -> Self {
        Self(segments)
    }
}

impl fmt::Display for TreePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (position, segment) in self.0.iter().enumerate() {
            match segment {
                PathSegment::Index(index) => write!(f, "[{index}]")?,
                PathSegment::Key(key) => {
                    if position > 0 {
                        f.write_str(".")?;
                    }
                    match key {
                        Value::String(key) => f.write_str(key)?,
                        other => write!(f, "{other:?}")?,
                    }
                }
            }
        }
        Ok(())
    }
}

/// Looks through YAML tags to the tagged value.
fn untagged(node: &Value) -> &Value {
    match node {
        Value::Tagged(tagged) => untagged(&tagged.value),
        other => other,
    }
}

fn untagged_mut(node: &mut Value) -> &mut Value {
    match node {
        Value::Tagged(tagged) => untagged_mut(&mut tagged.value),
        other => other,
    }
}

/// Follows `segments` from `node`, returning `None` when the shape no longer matches.
fn resolve_mut<'a>(node: &'a mut Value, segments: &[PathSegment]) -> Option<&'a mut Value> {
    let Some((first, rest)) = segments.split_first() else {
        return Some(node);
    };
    let child = match (untagged_mut(node), first) {
        (Value::Mapping(mapping), PathSegment::Key(key)) => mapping.get_mut(key)?,
        (Value::Sequence(sequence), PathSegment::Index(index)) => sequence.get_mut(*index)?,
        _ => return None,
    };
    resolve_mut(child, rest)
}
