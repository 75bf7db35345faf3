//! レポート生成モジュール
//!
//! 構成の一覧・詳細を各種フォーマットで出力する機能を提供する。

mod formatter;

pub use formatter::{ListFormat, ReportGenerator, preview_fallback};
