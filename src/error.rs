use std::path::{
    Path,
    PathBuf,
};

use thiserror::Error;

use crate::tree::MergeError;

/// Failure of one page or locale task, or of loading the canonical inputs.
#[derive(Error, Debug)]
pub enum SyncError {
    #[error("I/O error on '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in '{}': {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid YAML in '{}': {source}", path.display())]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Malformed document '{}': {message}", path.display())]
    Document { path: PathBuf, message: String },

    #[error("Invalid file pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    #[error("Pages {} all map to '{}'", pages.join(", "), path.display())]
    Collision { path: PathBuf, pages: Vec<String> },

    #[error(transparent)]
    Merge(#[from] MergeError),
}

impl SyncError {
    pub fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io { path: path.to_path_buf(), source }
    }

    pub fn json(path: &Path, source: serde_json::Error) -> Self {
        Self::Json { path: path.to_path_buf(), source }
    }

    pub fn yaml(path: &Path, source: serde_yaml::Error) -> Self {
        Self::Yaml { path: path.to_path_buf(), source }
    }

    pub fn document(path: &Path, message: impl Into<String>) -> Self {
        Self::Document { path: path.to_path_buf(), message: message.into() }
    }
}
