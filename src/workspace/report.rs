//! Aggregated outcome of a batch of page tasks.

use std::fmt;
use std::path::PathBuf;

use crate::error::SyncError;

/// The page and/or locale a task worked on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskScope {
    pub page: Option<String>,
    pub locale: Option<String>,
}

impl TaskScope {
    #[must_use]
    pub fn page(page: impl Into<String>) -> Self {
        Self { page: Some(page.into()), locale: None }
    }

    #[must_use]
    pub fn locale(locale: impl Into<String>) -> Self {
        Self { page: None, locale: Some(locale.into()) }
    }

    #[must_use]
    pub fn page_in_locale(page: impl Into<String>, locale: impl Into<String>) -> Self {
        Self { page: Some(page.into()), locale: Some(locale.into()) }
    }
}

impl fmt::Display for TaskScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.page, &self.locale) {
            (Some(page), Some(locale)) => write!(f, "{page} ({locale})"),
            (Some(page), None) => f.write_str(page),
            (None, Some(locale)) => write!(f, "locale {locale}"),
            (None, None) => f.write_str("batch"),
        }
    }
}

/// A canonical key of a page whose text was not found in its content blocks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriftWarning {
    pub page: String,
    pub key: String,
}

#[derive(Debug)]
pub struct TaskFailure {
    pub scope: TaskScope,
    pub error: SyncError,
}

/// Files touched and problems met by one or more passes.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub written: Vec<PathBuf>,
    pub unchanged: Vec<PathBuf>,
    pub deleted: Vec<PathBuf>,
    pub drift: Vec<DriftWarning>,
    pub failures: Vec<TaskFailure>,
}

impl BatchReport {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_failure(&mut self, scope: TaskScope, error: SyncError) {
        tracing::debug!(scope = %scope, %error, "Task failed");
        self.failures.push(TaskFailure { scope, error });
    }

    pub fn record_drift(&mut self, page: &str, key: &str) {
        tracing::warn!(page, key, "Text no longer found in content blocks");
        self.drift.push(DriftWarning { page: page.to_string(), key: key.to_string() });
    }

    /// Appends everything `other` recorded.
    pub fn merge(&mut self, other: Self) {
        self.written.extend(other.written);
        self.unchanged.extend(other.unchanged);
        self.deleted.extend(other.deleted);
        self.drift.extend(other.drift);
        self.failures.extend(other.failures);
    }

    #[must_use]
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    /// One-line summary of the batch.
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "{} written, {} unchanged, {} deleted, {} drifted, {} failed",
            self.written.len(),
            self.unchanged.len(),
            self.deleted.len(),
            self.drift.len(),
            self.failures.len()
        )
    }
}
