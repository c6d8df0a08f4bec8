//! Settings for the sync passes: locales, base URL, project paths.
/// Settings file loader
mod loader;
/// Configuration manager
mod manager;
/// Configuration types and settings
mod types;

pub use manager::ConfigManager;
pub use types::{
    ConcurrencyConfig,
    ConfigError,
    PathsConfig,
    SyncSettings,
    ValidationError,
};
