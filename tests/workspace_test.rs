//! Generation and resynchronisation passes over a project on disk.

#![allow(clippy::unwrap_used)]
#![allow(clippy::indexing_slicing)]
#![allow(missing_docs)]

use std::fs;
use std::path::Path;

use pretty_assertions::assert_eq;
use rosey_sync::Workspace;
use rosey_sync::config::ConfigManager;
use rosey_sync::synthesis::{
    TRANSLATED_GROUP,
    TranslationFile,
    UNTRANSLATED_GROUP,
};
use serde_json::json;
use serde_yaml::Value;
use tempfile::TempDir;

fn write(root: &Path, relative: &str, contents: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

fn read(root: &Path, relative: &str) -> String {
    fs::read_to_string(root.join(relative)).unwrap()
}

fn write_base(root: &Path, keys: &serde_json::Value) {
    write(root, "rosey/base.json", &json!({ "keys": keys }).to_string());
}

fn workspace(root: &Path, locales: &str) -> Workspace {
    let mut config_manager = ConfigManager::new();
    config_manager.load_settings_with_overrides(root.to_path_buf(), Some(locales), None).unwrap();
    Workspace::from_config(&config_manager)
}

fn translation_file(root: &Path, relative: &str) -> TranslationFile {
    serde_yaml::from_str(&read(root, relative)).unwrap()
}

fn hello_world_project() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    write_base(
        temp_dir.path(),
        &json!({
            "static:heading": { "original": "Hello World", "pages": { "about.html": true } }
        }),
    );
    temp_dir
}

#[tokio::test]
async fn first_generation_lists_key_as_untranslated() {
    let temp_dir = hello_world_project();
    let root = temp_dir.path();
    let workspace = workspace(root, "es");

    let inputs = workspace.load_inputs().await.unwrap();
    let report = workspace.generate(&inputs).await;

    assert!(!report.has_failures());
    let file = translation_file(root, "rosey/translations/es/about.yaml");
    assert_eq!(file.url_translation, "about.html");
    assert_eq!(file.values.get("static:heading").map(String::as_str), Some(""));
    assert_eq!(file.group_inputs(UNTRANSLATED_GROUP), ["static:heading".to_string()]);
    assert!(file.group_inputs(TRANSLATED_GROUP).is_empty());
    assert_eq!(
        file.inputs.inputs["static:heading"].input_type,
        rosey_sync::synthesis::InputType::Markdown
    );
}

#[tokio::test]
async fn edited_value_survives_and_moves_to_translated() {
    let temp_dir = hello_world_project();
    let root = temp_dir.path();
    let workspace = workspace(root, "es");
    let inputs = workspace.load_inputs().await.unwrap();
    workspace.generate(&inputs).await;

    let path = "rosey/translations/es/about.yaml";
    let mut edited: Value = serde_yaml::from_str(&read(root, path)).unwrap();
    edited["static:heading"] = Value::from("Hola Mundo");
    write(root, path, &serde_yaml::to_string(&edited).unwrap());
    let report = workspace.generate(&inputs).await;

    assert!(!report.has_failures());
    let file = translation_file(root, path);
    assert_eq!(file.values.get("static:heading").map(String::as_str), Some("Hola Mundo"));
    assert_eq!(file.group_inputs(TRANSLATED_GROUP), ["static:heading".to_string()]);
    assert!(file.group_inputs(UNTRANSLATED_GROUP).is_empty());
}

#[tokio::test]
async fn second_generation_is_byte_identical() {
    let temp_dir = hello_world_project();
    let root = temp_dir.path();
    write(root, "rosey/locales/es.json", r#"{ "static:heading": { "original": "Hello" } }"#);
    let workspace = workspace(root, "es,fr");
    let inputs = workspace.load_inputs().await.unwrap();

    workspace.generate(&inputs).await;
    let first = read(root, "rosey/translations/es/about.yaml");
    let report = workspace.generate(&inputs).await;
    let second = read(root, "rosey/translations/es/about.yaml");

    assert_eq!(first, second);
    assert!(report.written.is_empty());
    assert_eq!(report.unchanged.len(), 2);
}

#[tokio::test]
async fn removed_keys_and_pages_are_pruned() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    write_base(
        root,
        &json!({
            "static:heading": { "original": "Hello World", "pages": { "about.html": true } },
            "old-key": { "original": "Old text", "pages": { "about.html": true } },
            "blog-title": { "original": "Blog", "pages": { "blog/index.html": true } }
        }),
    );
    let workspace = workspace(root, "es");
    let inputs = workspace.load_inputs().await.unwrap();
    workspace.generate(&inputs).await;
    write(root, "rosey/translations/es/notes.txt", "not a translation file");

    write_base(
        root,
        &json!({
            "static:heading": { "original": "Hello World", "pages": { "about.html": true } }
        }),
    );
    let inputs = workspace.load_inputs().await.unwrap();
    let report = workspace.generate(&inputs).await;

    assert!(!report.has_failures());
    assert_eq!(report.deleted, [root.join("rosey/translations/es/blog.yaml")]);
    assert!(!root.join("rosey/translations/es/blog.yaml").exists());
    assert!(root.join("rosey/translations/es/notes.txt").exists());
    let file = translation_file(root, "rosey/translations/es/about.yaml");
    assert!(!file.values.contains_key("old-key"));
    assert!(!file.inputs.inputs.contains_key("old-key"));
}

#[tokio::test]
async fn url_index_decides_the_page_inventory() {
    let temp_dir = hello_world_project();
    let root = temp_dir.path();
    write(root, "rosey/base.urls.json", r#"{ "keys": { "index.html": {}, "about.html": {} } }"#);
    let workspace = workspace(root, "es");

    let inputs = workspace.load_inputs().await.unwrap();
    workspace.generate(&inputs).await;

    let home = translation_file(root, "rosey/translations/es/home.yaml");
    assert!(home.values.is_empty());
    assert!(root.join("rosey/translations/es/about.yaml").exists());
}

#[tokio::test]
async fn malformed_translation_file_is_left_untouched() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    write_base(
        root,
        &json!({
            "a": { "original": "Alpha", "pages": { "about.html": true } },
            "b": { "original": "Beta", "pages": { "contact.html": true } }
        }),
    );
    write(root, "rosey/translations/es/about.yaml", "a: [broken\n");
    let workspace = workspace(root, "es");

    let inputs = workspace.load_inputs().await.unwrap();
    let report = workspace.generate(&inputs).await;

    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].scope.page.as_deref(), Some("about.html"));
    assert_eq!(read(root, "rosey/translations/es/about.yaml"), "a: [broken\n");
    assert!(root.join("rosey/translations/es/contact.yaml").exists());
}

#[tokio::test]
async fn pages_sharing_an_output_file_are_reported_and_skipped() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    write_base(
        root,
        &json!({
            "a": { "original": "Alpha", "pages": { "about.html": true } },
            "b": { "original": "Beta", "pages": { "about/index.html": true } },
            "c": { "original": "Gamma", "pages": { "contact.html": true } }
        }),
    );
    let about_document = "---\ncontent_blocks:\n  - title: Alpha\n---\n";
    write(root, "src/content/pages/about.md", about_document);
    let workspace = workspace(root, "es");

    let inputs = workspace.load_inputs().await.unwrap();
    let generated = workspace.generate(&inputs).await;
    let synced = workspace.resync_content(&inputs).await;

    let mut failed: Vec<_> =
        generated.failures.iter().filter_map(|failure| failure.scope.page.clone()).collect();
    failed.sort();
    assert_eq!(failed, ["about.html", "about/index.html"]);
    assert!(!root.join("rosey/translations/es/about.yaml").exists());
    assert!(root.join("rosey/translations/es/contact.yaml").exists());
    assert_eq!(synced.failures.len(), 2);
    assert_eq!(read(root, "src/content/pages/about.md"), about_document);
}

#[tokio::test]
async fn missing_key_store_is_an_error() {
    let temp_dir = TempDir::new().unwrap();
    let workspace = workspace(temp_dir.path(), "es");

    assert!(workspace.load_inputs().await.is_err());
}

#[tokio::test]
async fn sync_promotes_content_leaf() {
    let temp_dir = hello_world_project();
    let root = temp_dir.path();
    write(root, "rosey/translations/es/about.yaml", "static:heading: Hola Mundo\n");
    write(
        root,
        "src/content/pages/about.md",
        "---\ntitle: About\ncontent_blocks:\n  - _bookshop_name: hero\n    title: Hello World\n---\n\nBody text stays.\n",
    );
    let workspace = workspace(root, "es");

    let inputs = workspace.load_inputs().await.unwrap();
    let report = workspace.resync_content(&inputs).await;

    assert!(!report.has_failures());
    assert_eq!(report.written, [root.join("src/content/pages/about.md")]);
    let document = read(root, "src/content/pages/about.md");
    assert!(document.ends_with("---\n\nBody text stays.\n"));
    let front_matter: Value =
        serde_yaml::from_str(document.split("---\n").nth(1).unwrap()).unwrap();
    let expected: Value = serde_yaml::from_str(
        "selected_translation: None\noriginal: Hello World\nes_translation: Hola Mundo\n",
    )
    .unwrap();
    assert_eq!(front_matter["content_blocks"][0]["title"], expected);
    assert_eq!(front_matter["content_blocks"][0]["_bookshop_name"].as_str(), Some("hero"));
}

#[tokio::test]
async fn sync_is_stable_on_rerun() {
    let temp_dir = hello_world_project();
    let root = temp_dir.path();
    write(root, "rosey/translations/es/about.yaml", "static:heading: Hola Mundo\n");
    write(root, "src/content/pages/about.md", "---\ncontent_blocks:\n  - title: Hello World\n---\nBody\n");
    let workspace = workspace(root, "es");
    let inputs = workspace.load_inputs().await.unwrap();

    workspace.resync_content(&inputs).await;
    let first = read(root, "src/content/pages/about.md");
    let report = workspace.resync_content(&inputs).await;

    assert_eq!(read(root, "src/content/pages/about.md"), first);
    assert!(report.written.is_empty());
}

#[tokio::test]
async fn sync_reports_drift_and_skips_pages_without_content() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    write_base(
        root,
        &json!({
            "static:heading": { "original": "Hello World", "pages": { "about.html": true } },
            "contact-title": { "original": "Contact", "pages": { "contact.html": true } }
        }),
    );
    let original_document = "---\ncontent_blocks:\n  - title: Rewritten heading\n---\nBody\n";
    write(root, "src/content/pages/about.md", original_document);
    let workspace = workspace(root, "es");

    let inputs = workspace.load_inputs().await.unwrap();
    let report = workspace.resync_content(&inputs).await;

    assert!(!report.has_failures());
    assert_eq!(report.drift.len(), 1);
    assert_eq!(report.drift[0].page, "about.html");
    assert_eq!(report.drift[0].key, "static:heading");
    assert_eq!(read(root, "src/content/pages/about.md"), original_document);
}

#[tokio::test]
async fn malformed_content_document_fails_only_its_page() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    write_base(
        root,
        &json!({
            "a": { "original": "Alpha", "pages": { "about.html": true } },
            "b": { "original": "Beta", "pages": { "index.html": true } }
        }),
    );
    write(root, "rosey/translations/es/home.yaml", "b: Beta es\n");
    write(root, "src/content/pages/about.md", "no front matter here\n");
    write(root, "src/content/pages/index.md", "---\ncontent_blocks:\n  - text: Beta\n---\n");
    let workspace = workspace(root, "es");

    let inputs = workspace.load_inputs().await.unwrap();
    let report = workspace.resync_content(&inputs).await;

    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].scope.page.as_deref(), Some("about.html"));
    assert_eq!(report.written, [root.join("src/content/pages/index.md")]);
    assert_eq!(read(root, "src/content/pages/about.md"), "no front matter here\n");
}

#[tokio::test]
async fn malformed_translation_file_fails_only_its_locale_during_sync() {
    let temp_dir = hello_world_project();
    let root = temp_dir.path();
    write(root, "rosey/translations/es/about.yaml", "static:heading: [broken\n");
    write(root, "rosey/translations/fr/about.yaml", "static:heading: Bonjour le monde\n");
    write(root, "src/content/pages/about.md", "---\ncontent_blocks:\n  - title: Hello World\n---\nBody\n");
    let workspace = workspace(root, "es,fr");

    let inputs = workspace.load_inputs().await.unwrap();
    let report = workspace.resync_content(&inputs).await;

    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].scope.page.as_deref(), Some("about.html"));
    assert_eq!(report.failures[0].scope.locale.as_deref(), Some("es"));
    assert_eq!(report.written, [root.join("src/content/pages/about.md")]);
    let document = read(root, "src/content/pages/about.md");
    let front_matter: Value =
        serde_yaml::from_str(document.split("---\n").nth(1).unwrap()).unwrap();
    let record = &front_matter["content_blocks"][0]["title"];
    assert_eq!(record["fr_translation"].as_str(), Some("Bonjour le monde"));
    assert_eq!(record["original"].as_str(), Some("Hello World"));
    assert_eq!(read(root, "rosey/translations/es/about.yaml"), "static:heading: [broken\n");
}

#[tokio::test]
async fn inspect_lists_stored_translations() {
    let temp_dir = hello_world_project();
    let root = temp_dir.path();
    write(
        root,
        "src/content/pages/about.md",
        "---\ncontent_blocks:\n  - title:\n      selected_translation: None\n      original: Hello World\n      es_translation: Hola Mundo\n---\n",
    );
    let workspace = workspace(root, "es");

    let found = workspace.inspect("about.html", "es").await.unwrap();

    assert_eq!(found.get("Hello World").map(String::as_str), Some("Hola Mundo"));
    assert!(workspace.inspect("missing.html", "es").await.is_err());
}
