use std::path::PathBuf;

use serde::{
    Deserialize,
    Serialize,
};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Configuration error in '{field_path}': {message}")]
pub struct ValidationError {
    /// JSON path to the field (e.g., "locales[0]")
    pub field_path: String,
    pub message: String,
}

impl ValidationError {
    #[must_use]
    pub fn new(field_path: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field_path: field_path.into(), message: message.into() }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration validation failed:\n{}", format_validation_errors(.0))]
    ValidationErrors(Vec<ValidationError>),

    #[error("Failed to load configuration file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),
}

fn format_validation_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .enumerate()
        .map(|(i, err)| format!("  {}. {} - {}", i + 1, err.field_path, err.message))
        .collect::<Vec<_>>()
        .join("\n")
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SyncSettings {
    /// Target locales, lowercase (e.g. `["es", "fr"]`).
    pub locales: Vec<String>,

    /// Prefix of every "See on page" link. Always ends with `/` once loaded.
    pub base_url: String,

    pub paths: PathsConfig,

    /// Glob (relative to a locale folder) selecting files that pruning may delete.
    pub translation_file_pattern: String,

    pub concurrency: ConcurrencyConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PathsConfig {
    /// Canonical key store written by the Rosey extraction step.
    pub base_file: PathBuf,
    /// Page inventory written next to the key store.
    pub base_urls_file: PathBuf,
    pub translations_dir: PathBuf,
    /// Previous per-locale snapshots, used as diff baselines.
    pub locales_dir: PathBuf,
    pub content_dir: PathBuf,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct ConcurrencyConfig {
    /// Number of page tasks in flight at once.
    /// Default: 80% of CPU cores (minimum 1).
    pub max_tasks: Option<usize>,
}

impl ConcurrencyConfig {
    #[must_use]
    pub fn effective_max_tasks(&self) -> usize {
        self.max_tasks.unwrap_or_else(|| (num_cpus::get() * 4 / 5).max(1))
    }
}

impl SyncSettings {
    /// # Errors
    /// - Empty locale list or malformed locale code
    /// - Base URL without an http(s) scheme
    /// - Empty path
    /// - Invalid glob pattern
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if self.locales.is_empty() {
            errors.push(ValidationError::new(
                "locales",
                "At least one locale is required. Example: [\"es\"]",
            ));
        }

        for (index, locale) in self.locales.iter().enumerate() {
            let valid = !locale.is_empty()
                && locale.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
            if !valid {
                errors.push(ValidationError::new(
                    format!("locales[{index}]"),
                    format!("Invalid locale code '{locale}'. Use letters, digits, '-' or '_'"),
                ));
            }
        }

        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            errors.push(ValidationError::new(
                "baseUrl",
                format!("'{}' must start with http:// or https://", self.base_url),
            ));
        }

        let paths = [
            ("paths.baseFile", &self.paths.base_file),
            ("paths.baseUrlsFile", &self.paths.base_urls_file),
            ("paths.translationsDir", &self.paths.translations_dir),
            ("paths.localesDir", &self.paths.locales_dir),
            ("paths.contentDir", &self.paths.content_dir),
        ];
        for (field, path) in paths {
            if path.as_os_str().is_empty() {
                errors.push(ValidationError::new(field, "The path cannot be empty"));
            }
        }

        if self.translation_file_pattern.is_empty() {
            errors.push(ValidationError::new(
                "translationFilePattern",
                "The pattern cannot be empty. Example: \"**/*.yaml\"",
            ));
        } else if let Err(e) = globset::Glob::new(&self.translation_file_pattern) {
            errors.push(ValidationError::new(
                "translationFilePattern",
                format!("Invalid glob pattern '{}': {e}", self.translation_file_pattern),
            ));
        }

        if self.concurrency.max_tasks == Some(0) {
            errors.push(ValidationError::new(
                "concurrency.maxTasks",
                "Must be at least 1, or removed to use the default",
            ));
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }

    /// Applies `LOCALES` / `BASEURL` style overrides.
    pub fn apply_overrides(&mut self, locales: Option<&str>, base_url: Option<&str>) {
        if let Some(locales) = locales {
            self.locales = locales
                .to_lowercase()
                .split(',')
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(str::to_string)
                .collect();
        }
        if let Some(base_url) = base_url {
            base_url.trim().clone_into(&mut self.base_url);
        }
    }

    /// Ensures the base URL ends with `/` so page paths can be appended directly.
    pub fn normalize(&mut self) {
        if !self.base_url.is_empty() && !self.base_url.ends_with('/') {
            self.base_url.push('/');
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            base_file: PathBuf::from("rosey/base.json"),
            base_urls_file: PathBuf::from("rosey/base.urls.json"),
            translations_dir: PathBuf::from("rosey/translations"),
            locales_dir: PathBuf::from("rosey/locales"),
            content_dir: PathBuf::from("src/content/pages"),
        }
    }
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            locales: vec!["es".to_string()],
            base_url: "http://localhost:4321/".to_string(),
            paths: PathsConfig::default(),
            translation_file_pattern: "**/*.yaml".to_string(),
            concurrency: ConcurrencyConfig::default(),
        }
    }
}
