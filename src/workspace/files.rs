//! File system access for the batch passes. Missing files are `Ok(None)`.

use std::io::ErrorKind;
use std::path::{
    Path,
    PathBuf,
};

use globset::{
    Glob,
    GlobSet,
    GlobSetBuilder,
};
use ignore::WalkBuilder;
use serde::de::DeserializeOwned;

use crate::error::SyncError;

/// Result of [`write_if_changed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Written,
    Unchanged,
}

/// Reads a UTF-8 file, or `None` if it does not exist.
pub async fn read_optional(path: &Path) -> Result<Option<String>, SyncError> {
    match tokio::fs::read_to_string(path).await {
        Ok(content) => Ok(Some(content)),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
        Err(err) => Err(SyncError::io(path, err)),
    }
}

/// Reads and parses a JSON file, or `None` if it does not exist.
pub async fn read_json_optional<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, SyncError> {
    let Some(content) = read_optional(path).await? else {
        return Ok(None);
    };
    serde_json::from_str(&content).map(Some).map_err(|err| SyncError::json(path, err))
}

/// Writes `contents` unless the file already holds exactly these bytes.
///
/// Parent directories are created as needed.
pub async fn write_if_changed(path: &Path, contents: &str) -> Result<WriteOutcome, SyncError> {
    if read_optional(path).await?.as_deref() == Some(contents) {
        return Ok(WriteOutcome::Unchanged);
    }
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await.map_err(|err| SyncError::io(parent, err))?;
    }
    tokio::fs::write(path, contents).await.map_err(|err| SyncError::io(path, err))?;
    Ok(WriteOutcome::Written)
}

pub async fn remove_file(path: &Path) -> Result<(), SyncError> {
    tokio::fs::remove_file(path).await.map_err(|err| SyncError::io(path, err))
}

pub async fn ensure_dir(path: &Path) -> Result<(), SyncError> {
    tokio::fs::create_dir_all(path).await.map_err(|err| SyncError::io(path, err))
}

fn build_glob_set(pattern: &str) -> Result<GlobSet, SyncError> {
    let pattern_error =
        |source| SyncError::Pattern { pattern: pattern.to_string(), source };
    let glob = Glob::new(pattern).map_err(pattern_error)?;
    GlobSetBuilder::new().add(glob).build().map_err(pattern_error)
}

/// Files under `dir` whose path relative to `dir` matches `pattern`.
///
/// Returns relative paths, sorted. A missing directory has no files.
pub fn find_files(dir: &Path, pattern: &str) -> Result<Vec<PathBuf>, SyncError> {
    let glob_set = build_glob_set(pattern)?;
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut found = Vec::new();
    for result in WalkBuilder::new(dir).standard_filters(false).follow_links(false).build() {
        let entry = match result {
            Ok(entry) => entry,
            Err(err) => {
                tracing::debug!(?err, "Failed to read directory entry");
                continue;
            }
        };

        if !entry.file_type().is_some_and(|ft| ft.is_file()) {
            continue;
        }

        let Ok(relative_path) = entry.path().strip_prefix(dir) else {
            continue;
        };
        if glob_set.is_match(relative_path) {
            found.push(relative_path.to_path_buf());
        }
    }

    found.sort();
    Ok(found)
}
