//! 設定管理モジュール
//!
//! 設定ファイルの読み込みと環境変数による上書きを行う。

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::common::error::{GcloudctxError, Result};

/// fzf をスキップして現在の構成を表示する（"1" で有効）
pub const ENV_IGNORE_FZF: &str = "GCLOUDCTX_IGNORE_FZF";
/// fzf ウィンドウの高さ
pub const ENV_FZF_HEIGHT: &str = "GCLOUDCTX_FZF_HEIGHT";
/// fzf プレビューウィンドウの位置とサイズ
pub const ENV_FZF_PREVIEW_WINDOW: &str = "GCLOUDCTX_FZF_PREVIEW_WINDOW";
/// プレビューを無効化する（"1" で有効）
pub const ENV_DISABLE_PREVIEW: &str = "GCLOUDCTX_DISABLE_PREVIEW";
/// fzf への追加オプション
pub const ENV_FZF_OPTIONS: &str = "GCLOUDCTX_FZF_OPTIONS";
/// gcloud 実行ファイルの上書き
pub const ENV_GCLOUD_BINARY: &str = "GCLOUDCTX_GCLOUD";
/// 色付き出力を無効化する（値は問わない）
pub const ENV_NO_COLOR: &str = "NO_COLOR";

/// アプリケーション設定
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// gcloud 設定
    #[serde(default)]
    pub gcloud: GcloudConfig,

    /// 対話選択（fzf）設定
    #[serde(default)]
    pub interactive: InteractiveConfig,

    /// 出力設定
    #[serde(default)]
    pub output: OutputConfig,
}

/// gcloud 設定
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GcloudConfig {
    /// 実行ファイル名またはパス
    #[serde(default = "default_binary")]
    pub binary: String,
}

impl Default for GcloudConfig {
    fn default() -> Self {
        Self {
            binary: default_binary(),
        }
    }
}

fn default_binary() -> String {
    "gcloud".to_string()
}

/// 対話選択設定
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InteractiveConfig {
    /// fzf ウィンドウの高さ
    #[serde(default = "default_height")]
    pub height: String,

    /// プレビューウィンドウ
    #[serde(default = "default_preview_window")]
    pub preview_window: String,

    /// プレビューを無効化
    #[serde(default)]
    pub disable_preview: bool,

    /// fzf への追加オプション（シェル風の引用が可能）
    #[serde(default)]
    pub options: String,

    /// 引数なし実行時に fzf を使わない
    #[serde(default)]
    pub ignore_fzf: bool,
}

impl Default for InteractiveConfig {
    fn default() -> Self {
        Self {
            height: default_height(),
            preview_window: default_preview_window(),
            disable_preview: false,
            options: String::new(),
            ignore_fzf: false,
        }
    }
}

fn default_height() -> String {
    "40%".to_string()
}

fn default_preview_window() -> String {
    "right:50%:wrap".to_string()
}

/// 出力設定
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct OutputConfig {
    /// 色付き出力を無効化
    #[serde(default)]
    pub no_color: bool,

    /// 一覧表示のデフォルト形式
    #[serde(default)]
    pub format: String,
}

impl Config {
    /// 設定ファイルを読み込み、環境変数で上書きする
    ///
    /// 優先順位:
    /// 1. 指定されたパス
    /// 2. <config_dir>/gcloudctx/config.toml
    /// 3. デフォルト設定
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = Self::load_file(path)?;
        config.apply_env();
        Ok(config)
    }

    fn load_file(path: Option<&Path>) -> Result<Self> {
        // 指定されたパスがあれば最優先
        if let Some(p) = path {
            return Self::load_from_path(p);
        }

        if let Some(default_path) = Self::default_path() {
            if default_path.exists() {
                return Self::load_from_path(&default_path);
            }
        }

        Ok(Self::default())
    }

    /// 指定されたパスから設定ファイルを読み込む
    fn load_from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            GcloudctxError::config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        toml::from_str(&content)
            .map_err(|e| GcloudctxError::config(format!("Failed to parse config file: {}", e)))
    }

    /// 環境変数で設定を上書きする
    pub fn apply_env(&mut self) {
        self.apply_env_with(|key| std::env::var(key).ok());
    }

    /// 任意の参照関数で設定を上書きする
    pub fn apply_env_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.is_empty());

        if let Some(binary) = non_empty(ENV_GCLOUD_BINARY) {
            self.gcloud.binary = binary;
        }
        if let Some(height) = non_empty(ENV_FZF_HEIGHT) {
            self.interactive.height = height;
        }
        if let Some(window) = non_empty(ENV_FZF_PREVIEW_WINDOW) {
            self.interactive.preview_window = window;
        }
        if let Some(options) = non_empty(ENV_FZF_OPTIONS) {
            self.interactive.options = options;
        }
        if let Some(value) = lookup(ENV_DISABLE_PREVIEW) {
            self.interactive.disable_preview = value == "1";
        }
        if let Some(value) = lookup(ENV_IGNORE_FZF) {
            self.interactive.ignore_fzf = value == "1";
        }
        if lookup(ENV_NO_COLOR).is_some() {
            self.output.no_color = true;
        }
    }

    /// 設定ディレクトリのパスを取得
    pub fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("gcloudctx"))
    }

    /// デフォルトの設定ファイルパスを取得
    pub fn default_path() -> Option<PathBuf> {
        Self::config_dir().map(|d| d.join("config.toml"))
    }
}
