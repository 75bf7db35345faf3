//! 構成管理モジュール
//!
//! 構成の作成・削除と、複製・名前変更・インポートのような複数ステップの操作を提供する。

mod document;
mod manager;
mod rollback;

pub use document::{DocumentFormat, ProfileDocument};
pub use manager::{ImportOptions, ProfileManager};
