//! 設定ファイルと環境変数の読み込み関数

use std::path::Path;

use super::{
    ConfigError,
    SyncSettings,
};

/// Name of the settings file looked up at the project root.
pub(super) const SETTINGS_FILE_NAME: &str = ".rosey-sync.json";

/// プロジェクトルートから設定を読み込む
///
/// `.rosey-sync.json` ファイルを探して読み込む
///
/// # Returns
/// - `Ok(Some(settings))`: 設定ファイルが見つかり、読み込みに成功
/// - `Ok(None)`: 設定ファイルが見つからない
/// - `Err(ConfigError)`: ファイル読み込みまたはパースエラー
pub(super) fn load_from_project(project_root: &Path) -> Result<Option<SyncSettings>, ConfigError> {
    let config_path = project_root.join(SETTINGS_FILE_NAME);

    if !config_path.exists() {
        tracing::debug!("Configuration file not found: {:?}", config_path);
        return Ok(None);
    }

    tracing::debug!("Loading configuration from: {:?}", config_path);

    let content = std::fs::read_to_string(&config_path)?;
    let settings: SyncSettings = serde_json::from_str(&content)?;

    Ok(Some(settings))
}

/// `LOCALES` / `BASEURL` 環境変数を読み込む
pub(super) fn env_overrides() -> (Option<String>, Option<String>) {
    (std::env::var("LOCALES").ok(), std::env::var("BASEURL").ok())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::fs;

    use rstest::rstest;
    use tempfile::TempDir;

    use super::*;

    /// `load_from_project`: 設定ファイルが存在する場合
    #[rstest]
    fn test_load_from_project_with_valid_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_content = r#"{"locales": ["fr"]}"#;
        fs::write(temp_dir.path().join(SETTINGS_FILE_NAME), config_content).unwrap();

        let result = load_from_project(temp_dir.path());

        assert!(result.is_ok());
        let settings = result.unwrap();
        assert!(settings.is_some());
        assert_eq!(settings.unwrap().locales, vec!["fr".to_string()]);
    }

    /// `load_from_project`: 設定ファイルが存在しない場合
    #[rstest]
    fn test_load_from_project_no_config_file() {
        let temp_dir = TempDir::new().unwrap();

        let result = load_from_project(temp_dir.path());

        assert!(result.is_ok());
        assert!(result.unwrap().is_none());
    }

    /// `load_from_project`: JSON パースエラー
    #[rstest]
    fn test_load_from_project_invalid_json() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join(SETTINGS_FILE_NAME), "invalid json").unwrap();

        let result = load_from_project(temp_dir.path());

        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }
}
