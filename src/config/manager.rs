//! 設定管理を行うモジュール

use std::path::{
    Path,
    PathBuf,
};

use super::{
    ConfigError,
    SyncSettings,
    loader,
};

/// 設定管理を行う
#[derive(Default, Debug, Clone)]
pub struct ConfigManager {
    /// 現在の設定
    current_settings: SyncSettings,

    /// プロジェクトのルートパス
    project_root: PathBuf,
}

impl ConfigManager {
    /// 新しい設定マネージャーを作成
    #[must_use]
    pub fn new() -> Self {
        Self { current_settings: SyncSettings::default(), project_root: PathBuf::new() }
    }

    /// 設定を読み込む
    ///
    /// 設定ファイル → 環境変数 (`LOCALES`, `BASEURL`) → バリデーションの順に適用する
    ///
    /// # Errors
    /// - ファイル読み込みエラー
    /// - JSON パースエラー
    /// - バリデーションエラー
    pub fn load_settings(&mut self, project_root: PathBuf) -> Result<(), ConfigError> {
        let (locales, base_url) = loader::env_overrides();
        self.load_settings_with_overrides(project_root, locales.as_deref(), base_url.as_deref())
    }

    /// 設定を読み込む（環境変数の代わりに明示的な上書き値を使う）
    ///
    /// # Errors
    /// - ファイル読み込みエラー
    /// - JSON パースエラー
    /// - バリデーションエラー
    pub fn load_settings_with_overrides(
        &mut self,
        project_root: PathBuf,
        locales: Option<&str>,
        base_url: Option<&str>,
    ) -> Result<(), ConfigError> {
        tracing::debug!("Loading settings for project: {:?}", project_root);

        let mut settings = loader::load_from_project(&project_root)?.unwrap_or_else(|| {
            tracing::debug!("No settings file, using defaults");
            SyncSettings::default()
        });

        settings.apply_overrides(locales, base_url);

        // バリデーション
        settings.validate().map_err(ConfigError::ValidationErrors)?;
        settings.normalize();

        // 設定を保存
        self.current_settings = settings;
        self.project_root = project_root;
        tracing::debug!("Settings loaded successfully: {:?}", self.current_settings);

        Ok(())
    }

    /// 現在の設定を取得
    #[must_use]
    pub const fn get_settings(&self) -> &SyncSettings {
        &self.current_settings
    }

    /// プロジェクトルートを取得
    #[must_use]
    pub fn project_root(&self) -> &Path {
        &self.project_root
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::fs;

    use rstest::rstest;
    use tempfile::TempDir;

    use super::*;

    /// new: デフォルト値で作成される
    #[rstest]
    fn test_new_creates_default_settings() {
        let manager = ConfigManager::new();

        assert_eq!(manager.get_settings().locales, vec!["es".to_string()]);
        assert_eq!(manager.project_root(), Path::new(""));
    }

    /// load_settings: 設定ファイルがある場合
    #[rstest]
    fn test_load_settings_with_config_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_content = r#"{"locales": ["fr"], "baseUrl": "https://example.com"}"#;
        fs::write(temp_dir.path().join(".rosey-sync.json"), config_content).unwrap();

        let mut manager = ConfigManager::new();
        let result =
            manager.load_settings_with_overrides(temp_dir.path().to_path_buf(), None, None);

        assert!(result.is_ok());
        assert_eq!(manager.get_settings().locales, vec!["fr".to_string()]);
        // 末尾のスラッシュが補われる
        assert_eq!(manager.get_settings().base_url, "https://example.com/");
        assert_eq!(manager.project_root(), temp_dir.path());
    }

    /// load_settings: 上書き値がファイルより優先される
    #[rstest]
    fn test_load_settings_overrides_win() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join(".rosey-sync.json"), r#"{"locales": ["fr"]}"#).unwrap();

        let mut manager = ConfigManager::new();
        let result = manager.load_settings_with_overrides(
            temp_dir.path().to_path_buf(),
            Some("DE,it"),
            None,
        );

        assert!(result.is_ok());
        assert_eq!(manager.get_settings().locales, vec!["de".to_string(), "it".to_string()]);
    }

    /// load_settings: 設定ファイルがない場合はデフォルト値
    #[rstest]
    fn test_load_settings_without_config_file() {
        let temp_dir = TempDir::new().unwrap();

        let mut manager = ConfigManager::new();
        let result =
            manager.load_settings_with_overrides(temp_dir.path().to_path_buf(), None, None);

        assert!(result.is_ok());
        assert_eq!(manager.get_settings().base_url, "http://localhost:4321/");
    }

    /// load_settings: 無効な上書き値でエラー
    #[rstest]
    fn test_load_settings_invalid_override() {
        let temp_dir = TempDir::new().unwrap();

        let mut manager = ConfigManager::new();
        let result = manager.load_settings_with_overrides(
            temp_dir.path().to_path_buf(),
            None,
            Some("ftp://example.com"),
        );

        assert!(matches!(result, Err(ConfigError::ValidationErrors(_))));
    }
}
