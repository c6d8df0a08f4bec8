//! rosey-sync
//!
//! Rosey の翻訳ファイル生成と、コンテンツブロック (front matter) への翻訳の書き戻し

pub mod annotation;
pub mod config;
pub mod error;
pub mod resync;
pub mod store;
pub mod synthesis;
pub mod text;
pub mod tree;
pub mod workspace;

pub use error::SyncError;
pub use workspace::{
    BatchReport,
    Workspace,
};
