//! Depth-first search over content trees.

use indexmap::IndexMap;
use serde_yaml::{
    Mapping,
    Value,
};

use super::{
    ORIGINAL_KEY,
    PathSegment,
    TreePath,
    is_translation_record,
    locale_field,
    untagged,
};

/// A matched mapping entry: the mapping that holds it and the path to its key.
#[derive(Debug, Clone)]
pub struct Located<'a> {
    pub container: &'a Mapping,
    pub path: TreePath,
}

impl<'a> Located<'a> {
    /// Key of the matched entry.
    #[must_use]
    pub fn matched_key(&self) -> Option<&Value> {
        match self.path.split_last() {
            Some((PathSegment::Key(key), _)) => Some(key),
            _ => None,
        }
    }

    /// Value of the matched entry. May be an empty string or zero; it is still a match.
    #[must_use]
    pub fn matched_value(&self) -> Option<&'a Value> {
        let key = self.matched_key()?;
        self.container.get(key)
    }
}

/// How the walk treats translation record leaves.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Records {
    /// Records are ordinary mappings.
    Open,
    /// Only a record's `original` entry is tested; its other fields are never
    /// matched or descended into.
    OriginalOnly,
}

/// Finds the first mapping entry, in pre-order, for which `predicate(key, value)` holds.
///
/// Sequences are visited by ascending index and mappings in insertion order.
/// At each mapping every entry is tested before any child is descended into.
pub fn locate<'a, P>(tree: &'a Value, predicate: P) -> Option<Located<'a>>
where
    P: Fn(&Value, &Value) -> bool,
{
    locate_with(tree, &predicate, Records::Open)
}

fn locate_with<'a, P>(tree: &'a Value, predicate: &P, records: Records) -> Option<Located<'a>>
where
    P: Fn(&Value, &Value) -> bool,
{
    let mut path = TreePath::new();
    let container = walk(tree, predicate, records, &mut path)?;
    Some(Located { container, path })
}

fn walk<'a, P>(
    node: &'a Value,
    predicate: &P,
    records: Records,
    path: &mut TreePath,
) -> Option<&'a Mapping>
where
    P: Fn(&Value, &Value) -> bool,
{
    match untagged(node) {
        Value::Mapping(mapping)
            if records == Records::OriginalOnly && is_translation_record(mapping) =>
        {
            let (key, _) = mapping
                .iter()
                .find(|&(key, value)| key.as_str() == Some(ORIGINAL_KEY) && predicate(key, value))?;
            path.push(PathSegment::Key(key.clone()));
            Some(mapping)
        }
        Value::Mapping(mapping) => {
            if let Some((key, _)) = mapping.iter().find(|&(key, value)| predicate(key, value)) {
                path.push(PathSegment::Key(key.clone()));
                return Some(mapping);
            }
            for (key, value) in mapping {
                path.push(PathSegment::Key(key.clone()));
                if let Some(found) = walk(value, predicate, records, path) {
                    return Some(found);
                }
                path.pop();
            }
            None
        }
        Value::Sequence(sequence) => {
            for (index, value) in sequence.iter().enumerate() {
                path.push(PathSegment::Index(index));
                if let Some(found) = walk(value, predicate, records, path) {
                    return Some(found);
                }
                path.pop();
            }
            None
        }
        _ => None,
    }
}

/// Finds the first entry whose value is the string `text`.
///
/// Inside a translation record only `original` can match, so a translated
/// value that equals some other source text is never mistaken for it.
#[must_use]
pub fn locate_value<'a>(tree: &'a Value, text: &str) -> Option<Located<'a>> {
    locate_with(tree, &|_: &Value, value: &Value| value.as_str() == Some(text), Records::OriginalOnly)
}

/// Returns the value of the first entry named `key`.
///
/// A present but empty value is `Some`, never confused with absence.
#[must_use]
pub fn find_by_key<'a>(tree: &'a Value, key: &str) -> Option<&'a Value> {
    locate(tree, |candidate, _| candidate.as_str() == Some(key))?.matched_value()
}

/// Collects `original -> <locale>_translation` for every translation record leaf.
#[must_use]
pub fn collect_locale_translations(tree: &Value, locale: &str) -> IndexMap<String, String> {
    let field = locale_field(locale);
    let mut found = IndexMap::new();
    collect_into(tree, &field, &mut found);
    found
}

fn collect_into(node: &Value, field: &str, found: &mut IndexMap<String, String>) {
    match untagged(node) {
        Value::Mapping(mapping) => {
            if is_translation_record(mapping)
                && let Some(original) = mapping.get(ORIGINAL_KEY).and_then(Value::as_str)
                && let Some(translation) = mapping.get(field).and_then(Value::as_str)
            {
                found.entry(original.to_string()).or_insert_with(|| translation.to_string());
            }
            for value in mapping.values() {
                collect_into(value, field, found);
            }
        }
        Value::Sequence(sequence) => {
            for value in sequence {
                collect_into(value, field, found);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use googletest::prelude::*;
    use rstest::rstest;

    use super::*;

    fn yaml(text: &str) -> Value {
        serde_yaml::from_str(text).unwrap()
    }

    #[rstest]
    fn locate_value_returns_container_and_key_path() {
        let tree = yaml(
            r"
- _bookshop_name: hero
  title: Hello World
  subtitle: Welcome
",
        );

        let located = locate_value(&tree, "Welcome").unwrap();

        assert_that!(located.path.to_string(), eq("[0].subtitle"));
        assert_that!(located.matched_key().and_then(Value::as_str), some(eq("subtitle")));
        assert_that!(
            located.container.get("_bookshop_name").and_then(Value::as_str),
            some(eq("hero"))
        );
    }

    #[rstest]
    fn locate_prefers_preorder_over_depth() {
        // The nested match comes first in document order, the shallow one second.
        let tree = yaml(
            r"
a:
  deep:
    text: Target
b: Target
",
        );

        let located = locate_value(&tree, "Target").unwrap();

        // Entries of the root mapping are tested before descending.
        assert_that!(located.path.to_string(), eq("b"));
    }

    #[rstest]
    fn locate_first_match_in_sequence_order_wins() {
        let tree = yaml(
            r"
- items:
    - label: Same
- label: Same
",
        );

        let located = locate_value(&tree, "Same").unwrap();

        assert_that!(located.path.to_string(), eq("[0].items[0].label"));
    }

    #[rstest]
    fn locate_distinguishes_empty_value_from_absence() {
        let tree = yaml("title: ''\ncount: 0\n");

        let empty = locate_value(&tree, "").unwrap();
        let zero = locate(&tree, |_, value| value.as_u64() == Some(0)).unwrap();

        assert_that!(empty.matched_value().and_then(Value::as_str), some(eq("")));
        assert_that!(zero.path.to_string(), eq("count"));
        assert!(locate_value(&tree, "missing").is_none());
    }

    #[rstest]
    #[case::scalar_root("Hello World")]
    #[case::empty_sequence("[]")]
    #[case::null_root("~")]
    fn locate_never_matches_without_mappings(#[case] text: &str) {
        let tree = yaml(text);

        assert!(locate(&tree, |_, _| true).is_none());
    }

    #[rstest]
    fn locate_looks_through_tags() {
        let tree = yaml("block: !hero\n  title: Tagged\n");

        let located = locate_value(&tree, "Tagged").unwrap();

        assert_that!(located.path.to_string(), eq("block.title"));
    }

    #[rstest]
    fn locate_value_matches_only_original_of_records() {
        let tree = yaml(
            r"
title:
  selected_translation: None
  original: Hello
  es_translation: Hola
cta:
  label: Hola
",
        );

        let located = locate_value(&tree, "Hola").unwrap();
        let record = locate_value(&tree, "Hello").unwrap();

        assert_that!(located.path.to_string(), eq("cta.label"));
        assert_that!(record.path.to_string(), eq("title.original"));
        assert!(locate_value(&tree, "None").is_none());
    }

    #[rstest]
    fn find_by_key_returns_empty_values() {
        let tree = yaml(
            r"
- title: Hello
  es_translation: ''
",
        );

        assert_that!(find_by_key(&tree, "es_translation").and_then(Value::as_str), some(eq("")));
        assert!(find_by_key(&tree, "fr_translation").is_none());
    }

    #[rstest]
    fn collect_locale_translations_reads_record_leaves() {
        let tree = yaml(
            r"
- title:
    selected_translation: None
    original: Hello World
    es_translation: Hola Mundo
  body: Plain text
- cta:
    selected_translation: None
    original: Buy
    es_translation: ''
",
        );

        let found = collect_locale_translations(&tree, "es");

        assert_that!(found.len(), eq(2));
        assert_that!(found.get("Hello World"), some(eq(&"Hola Mundo".to_string())));
        assert_that!(found.get("Buy"), some(eq(&String::new())));
        assert_that!(collect_locale_translations(&tree, "fr").is_empty(), eq(true));
    }
}
