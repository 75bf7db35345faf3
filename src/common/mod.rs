//! 共通モジュール
//!
//! エラーハンドリング、設定管理、出力ユーティリティなどの共通機能を提供する。

pub mod config;
pub mod error;
pub mod output;
