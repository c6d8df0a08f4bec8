//! Batch passes over a project: translation file generation, pruning and
//! content resynchronisation.

pub mod files;
pub mod report;

use std::collections::HashSet;
use std::path::{
    Path,
    PathBuf,
};

use futures::stream::{
    self,
    StreamExt,
};
use indexmap::IndexMap;

pub use self::files::WriteOutcome;
pub use self::report::{
    BatchReport,
    DriftWarning,
    TaskFailure,
    TaskScope,
};
use crate::config::{
    ConfigManager,
    SyncSettings,
};
use crate::error::SyncError;
use crate::resync::{
    ContentDocument,
    PageTranslations,
    resynchronize_page,
};
use crate::store::{
    CanonicalInputs,
    CanonicalKeyStore,
    LocaleSnapshot,
    UrlIndex,
};
use crate::synthesis::{
    ExistingRecord,
    RecordTarget,
    record_file_name,
    synthesize_record,
};
use crate::text::{
    content_file_name,
    translation_file_stem,
};
use crate::tree::collect_locale_translations;

/// A project root together with its settings.
#[derive(Debug, Clone)]
pub struct Workspace {
    root: PathBuf,
    settings: SyncSettings,
}

impl Workspace {
    #[must_use]
    pub const fn new(root: PathBuf, settings: SyncSettings) -> Self {
        Self { root, settings }
    }

    #[must_use]
    pub fn from_config(config_manager: &ConfigManager) -> Self {
        Self::new(config_manager.project_root().to_path_buf(), config_manager.get_settings().clone())
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub const fn settings(&self) -> &SyncSettings {
        &self.settings
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        self.root.join(path)
    }

    fn locale_dir(&self, locale: &str) -> PathBuf {
        self.resolve(&self.settings.paths.translations_dir).join(locale)
    }

    /// Path of the translation file of `page` for `locale`.
    #[must_use]
    pub fn record_path(&self, locale: &str, page: &str) -> PathBuf {
        self.locale_dir(locale).join(record_file_name(page))
    }

    /// Path of the content document of `page`.
    #[must_use]
    pub fn content_path(&self, page: &str) -> PathBuf {
        self.resolve(&self.settings.paths.content_dir)
            .join(content_file_name(&translation_file_stem(page)))
    }

    /// Loads the canonical key store and the page inventory.
    ///
    /// # Errors
    /// The key store is required; the page inventory is optional.
    pub async fn load_inputs(&self) -> Result<CanonicalInputs, SyncError> {
        let base_path = self.resolve(&self.settings.paths.base_file);
        let store: CanonicalKeyStore = files::read_json_optional(&base_path).await?.ok_or_else(|| {
            SyncError::io(&base_path, std::io::Error::from(std::io::ErrorKind::NotFound))
        })?;

        let urls_path = self.resolve(&self.settings.paths.base_urls_file);
        let url_index: Option<UrlIndex> = files::read_json_optional(&urls_path).await?;
        if url_index.is_none() {
            tracing::debug!(path = %urls_path.display(), "No page inventory, using pages of the key store");
        }

        let inputs = CanonicalInputs::new(store, url_index);
        tracing::debug!(keys = inputs.store.keys.len(), pages = inputs.pages.len(), "Loaded canonical inputs");
        Ok(inputs)
    }

    /// Generates and prunes the translation files of every configured locale.
    pub async fn generate(&self, inputs: &CanonicalInputs) -> BatchReport {
        let mut report = BatchReport::new();
        for locale in &self.settings.locales {
            report.merge(self.generate_locale(inputs, locale).await);
        }
        report
    }

    /// Generates and prunes the translation files of one locale.
    pub async fn generate_locale(&self, inputs: &CanonicalInputs, locale: &str) -> BatchReport {
        let mut report = BatchReport::new();
        tracing::info!(locale, pages = inputs.pages.len(), "Generating translation files");

        let snapshot = match self.load_snapshot(locale).await {
            Ok(snapshot) => snapshot,
            Err(error) => {
                report.record_failure(TaskScope::locale(locale), error);
                return report;
            }
        };

        let locale_dir = self.locale_dir(locale);
        if let Err(error) = files::ensure_dir(&locale_dir).await {
            report.record_failure(TaskScope::locale(locale), error);
            return report;
        }

        self.prune_locale(&inputs.pages, locale, &mut report).await;

        let (pages, collisions) =
            partition_by_target(&inputs.pages, |page| self.record_path(locale, page));
        for (page, error) in collisions {
            report.record_failure(TaskScope::page_in_locale(page, locale), error);
        }

        let results: Vec<_> = stream::iter(pages)
            .map(|page| {
                let snapshot = &snapshot;
                async move { (page, self.generate_page(&inputs.store, snapshot, page, locale).await) }
            })
            .buffer_unordered(self.settings.concurrency.effective_max_tasks())
            .collect()
            .await;

        for (page, result) in results {
            match result {
                Ok((path, WriteOutcome::Written)) => report.written.push(path),
                Ok((path, WriteOutcome::Unchanged)) => report.unchanged.push(path),
                Err(error) => report.record_failure(TaskScope::page_in_locale(page, locale), error),
            }
        }
        report
    }

    async fn load_snapshot(&self, locale: &str) -> Result<LocaleSnapshot, SyncError> {
        let path = self.resolve(&self.settings.paths.locales_dir).join(format!("{locale}.json"));
        Ok(files::read_json_optional(&path).await?.unwrap_or_default())
    }

    async fn generate_page(
        &self,
        store: &CanonicalKeyStore,
        snapshot: &LocaleSnapshot,
        page: &str,
        locale: &str,
    ) -> Result<(PathBuf, WriteOutcome), SyncError> {
        let path = self.record_path(locale, page);
        let existing = read_record(&path).await?.unwrap_or_default();

        let target = RecordTarget { page, locale, base_url: &self.settings.base_url };
        let file = synthesize_record(store, snapshot, &existing, &target);
        let yaml = file.to_yaml().map_err(|err| SyncError::yaml(&path, err))?;

        let outcome = files::write_if_changed(&path, &yaml).await?;
        if outcome == WriteOutcome::Written {
            tracing::info!(path = %path.display(), "Translation file updated");
        }
        Ok((path, outcome))
    }

    /// Deletes translation files of a locale that belong to no current page.
    async fn prune_locale(&self, pages: &[String], locale: &str, report: &mut BatchReport) {
        let locale_dir = self.locale_dir(locale);
        let existing = match files::find_files(&locale_dir, &self.settings.translation_file_pattern) {
            Ok(existing) => existing,
            Err(error) => {
                report.record_failure(TaskScope::locale(locale), error);
                return;
            }
        };

        let expected: HashSet<PathBuf> =
            pages.iter().map(|page| PathBuf::from(record_file_name(page))).collect();

        for relative in existing.into_iter().filter(|relative| !expected.contains(relative)) {
            let path = locale_dir.join(&relative);
            match files::remove_file(&path).await {
                Ok(()) => {
                    tracing::info!(path = %path.display(), "Deleted translation file of removed page");
                    report.deleted.push(path);
                }
                Err(error) => report.record_failure(TaskScope::locale(locale), error),
            }
        }
    }

    /// Writes translated values back into every page's content blocks.
    pub async fn resync_content(&self, inputs: &CanonicalInputs) -> BatchReport {
        let mut report = BatchReport::new();
        tracing::info!(pages = inputs.pages.len(), "Resynchronising content");

        let (pages, collisions) = partition_by_target(&inputs.pages, |page| self.content_path(page));
        for (page, error) in collisions {
            report.record_failure(TaskScope::page(page), error);
        }

        let results: Vec<_> = stream::iter(pages)
            .map(|page| async move { (page, self.resync_page(&inputs.store, page).await) })
            .buffer_unordered(self.settings.concurrency.effective_max_tasks())
            .collect()
            .await;

        for (page, result) in results {
            match result {
                Ok(None) => {}
                Ok(Some(page_report)) => report.merge(page_report),
                Err(error) => report.record_failure(TaskScope::page(page), error),
            }
        }
        report
    }

    /// Returns `None` when the page has no content document.
    async fn resync_page(
        &self,
        store: &CanonicalKeyStore,
        page: &str,
    ) -> Result<Option<BatchReport>, SyncError> {
        let path = self.content_path(page);
        let Some(text) = files::read_optional(&path).await? else {
            tracing::debug!(page, "No content document, skipping");
            return Ok(None);
        };
        let mut document =
            ContentDocument::parse(&text).map_err(|err| SyncError::document(&path, err.to_string()))?;

        let mut report = BatchReport::new();
        let translations = self.load_page_translations(page, &mut report).await;
        let outcome =
            resynchronize_page(&mut document, store, &translations, page, &self.settings.locales)?;

        for key in &outcome.drifted {
            report.record_drift(page, key);
        }

        if !outcome.changed() {
            report.unchanged.push(path);
            return Ok(Some(report));
        }
        let rendered = document.render().map_err(|err| SyncError::yaml(&path, err))?;
        match files::write_if_changed(&path, &rendered).await? {
            WriteOutcome::Written => {
                tracing::info!(
                    path = %path.display(),
                    promoted = outcome.promoted,
                    updated = outcome.updated,
                    "Content document updated"
                );
                report.written.push(path);
            }
            WriteOutcome::Unchanged => report.unchanged.push(path),
        }
        Ok(Some(report))
    }

    /// Reads the page's translation file of every locale.
    ///
    /// A locale whose file cannot be read is recorded as a failure and left
    /// out; the other locales are still merged.
    async fn load_page_translations(&self, page: &str, report: &mut BatchReport) -> PageTranslations {
        let mut translations = IndexMap::new();
        for locale in &self.settings.locales {
            let path = self.record_path(locale, page);
            match read_record(&path).await {
                Ok(Some(record)) => {
                    translations.insert(locale.clone(), record);
                }
                Ok(None) => {}
                Err(error) => report.record_failure(TaskScope::page_in_locale(page, locale), error),
            }
        }
        translations
    }

    /// Translations already stored in a page's content blocks for `locale`,
    /// keyed by the original text.
    ///
    /// # Errors
    /// Returns an error if the content document is missing or malformed.
    pub async fn inspect(&self, page: &str, locale: &str) -> Result<IndexMap<String, String>, SyncError> {
        let path = self.content_path(page);
        let text = files::read_optional(&path).await?.ok_or_else(|| {
            SyncError::io(&path, std::io::Error::from(std::io::ErrorKind::NotFound))
        })?;
        let document =
            ContentDocument::parse(&text).map_err(|err| SyncError::document(&path, err.to_string()))?;

        let mut found = IndexMap::new();
        for block in document.content_blocks().into_iter().flatten() {
            for (original, translation) in collect_locale_translations(block, locale) {
                found.entry(original).or_insert(translation);
            }
        }
        for (original, translation) in &found {
            tracing::info!(page, locale, original = %original, translation = %translation, "Stored translation");
        }
        Ok(found)
    }
}

/// Splits pages into those owning their output file alone and those sharing
/// it with another page. Sharing pages are never processed.
#[allow(clippy::type_complexity)]
fn partition_by_target<'p, F>(
    pages: &'p [String],
    target: F,
) -> (Vec<&'p String>, Vec<(&'p String, SyncError)>)
where
    F: Fn(&str) -> PathBuf,
{
    let mut by_target: IndexMap<PathBuf, Vec<&'p String>> = IndexMap::new();
    for page in pages {
        by_target.entry(target(page)).or_default().push(page);
    }

    let mut unique = Vec::with_capacity(pages.len());
    let mut colliding = Vec::new();
    for (path, group) in by_target {
        if let [page] = group.as_slice() {
            unique.push(*page);
            continue;
        }
        let names: Vec<String> = group.iter().map(|page| (*page).clone()).collect();
        tracing::warn!(path = %path.display(), pages = ?names, "Pages share one output file");
        for page in group {
            colliding.push((page, SyncError::Collision { path: path.clone(), pages: names.clone() }));
        }
    }
    (unique, colliding)
}

/// Reads an existing translation file. A missing file is `None`.
async fn read_record(path: &Path) -> Result<Option<ExistingRecord>, SyncError> {
    let Some(text) = files::read_optional(path).await? else {
        return Ok(None);
    };
    ExistingRecord::from_yaml(&text).map(Some).map_err(|err| SyncError::yaml(path, err))
}
