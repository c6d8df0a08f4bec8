//! Content documents: YAML front matter between `---` lines, then a body.

use serde_yaml::Value;
use thiserror::Error;

/// Line that opens and closes the front matter.
pub const FRONT_MATTER_DELIMITER: &str = "---";
/// Front matter key holding the page's content blocks.
pub const CONTENT_BLOCKS_KEY: &str = "content_blocks";

#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("Document does not start with a '---' line")]
    MissingFrontMatter,

    #[error("Front matter is not closed by a '---' line")]
    UnterminatedFrontMatter,

    #[error("Front matter is not a mapping")]
    NotAMapping,

    #[error("Invalid front matter: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// A parsed content document.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentDocument {
    pub front_matter: Value,
    /// Everything after the closing delimiter line, kept verbatim.
    pub body: String,
}

impl ContentDocument {
    pub fn parse(text: &str) -> Result<Self, DocumentError> {
        let (yaml, body) = split_front_matter(text.trim_start_matches('\u{feff}'))?;
        let front_matter: Value =
            if yaml.trim().is_empty() { Value::Null } else { serde_yaml::from_str(yaml)? };
        if !matches!(front_matter, Value::Mapping(_) | Value::Null) {
            return Err(DocumentError::NotAMapping);
        }
        Ok(Self { front_matter, body: body.to_string() })
    }

    /// Serialises the document back to `---\n<yaml>---\n<body>`.
    pub fn render(&self) -> Result<String, serde_yaml::Error> {
        let yaml = match &self.front_matter {
            Value::Null => String::new(),
            front_matter => serde_yaml::to_string(front_matter)?,
        };
        Ok(format!(
            "{FRONT_MATTER_DELIMITER}\n{yaml}{FRONT_MATTER_DELIMITER}\n{}",
            self.body
        ))
    }

    /// The `content_blocks` sequence, if the front matter has one.
    pub fn content_blocks_mut(&mut self) -> Option<&mut Vec<Value>> {
        self.front_matter.get_mut(CONTENT_BLOCKS_KEY).and_then(Value::as_sequence_mut)
    }

    #[must_use]
    pub fn content_blocks(&self) -> Option<&Vec<Value>> {
        self.front_matter.get(CONTENT_BLOCKS_KEY).and_then(Value::as_sequence)
    }
}

/// Returns the front matter text and the body following the closing line.
fn split_front_matter(text: &str) -> Result<(&str, &str), DocumentError> {
    let mut lines = text.split_inclusive('\n');
    let first = lines.next().ok_or(DocumentError::MissingFrontMatter)?;
    if first.trim_end() != FRONT_MATTER_DELIMITER {
        return Err(DocumentError::MissingFrontMatter);
    }

    let start = first.len();
    let mut offset = start;
    for line in lines {
        if line.trim_end() == FRONT_MATTER_DELIMITER {
            let yaml = text.get(start..offset).unwrap_or_default();
            let body = text.get(offset + line.len()..).unwrap_or_default();
            return Ok((yaml, body));
        }
        offset += line.len();
    }
    Err(DocumentError::UnterminatedFrontMatter)
}
