//! エラーハンドリングモジュール
//!
//! カスタムエラー型と終了コードを定義する。

use std::process::ExitCode;
use thiserror::Error;

/// gcloudctx の終了コード
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitStatus {
    /// 正常終了
    Success = 0,
    /// 一般的なエラー
    GeneralError = 1,
    /// 引数エラー（名前の検証失敗など）
    ArgumentError = 2,
    /// 構成・履歴・ディレクトリ設定が見つからない
    NotFound = 3,
    /// 外部コマンド（gcloud / fzf）のエラー
    ExternalError = 4,
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        ExitCode::from(status as u8)
    }
}

/// gcloudctx のエラー型
#[derive(Error, Debug)]
pub enum GcloudctxError {
    /// 構成・履歴・ディレクトリ設定が存在しない
    #[error("{message}")]
    NotFound { message: String },

    /// 作成先の構成が既に存在する
    #[error("configuration {name:?} already exists")]
    AlreadyExists { name: String, hint: Option<String> },

    /// ディレクトリ設定ファイルが空
    #[error("{path} is empty")]
    EmptyBinding { path: String },

    /// 構成名が命名規則に違反している
    #[error("{message}")]
    InvalidName { message: String },

    /// アクティブな構成は削除できない
    #[error("cannot delete active configuration {name:?}")]
    ActiveProfileProtected { name: String },

    /// 外部コマンドが PATH 上に見つからない
    #[error("{tool} is not installed or not in PATH")]
    ExternalToolMissing { tool: String, hint: Option<String> },

    /// 外部コマンドが非ゼロで終了した
    #[error("failed to run {command}: {status}{}", format_output(.output))]
    ExternalOperationFailed {
        command: String,
        status: String,
        output: String,
    },

    /// 対話選択がユーザーによって中断された
    #[error("selection canceled")]
    SelectionCanceled,

    /// 複数ステップ操作の失敗後、後始末も失敗した
    #[error("{source} (cleanup also failed: {cleanup})")]
    CleanupFailed {
        #[source]
        source: Box<GcloudctxError>,
        cleanup: String,
    },

    /// 文脈を付加したエラー
    #[error("{message}: {source}")]
    Context {
        message: String,
        #[source]
        source: Box<GcloudctxError>,
    },

    /// 途中まで完了した操作
    #[error("{message}: {source}")]
    Incomplete {
        message: String,
        hint: Option<String>,
        #[source]
        source: Box<GcloudctxError>,
    },

    /// I/Oエラー
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// 設定エラー
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// シリアライズ・パースエラー
    #[error("{message}")]
    Serialization { message: String },

    /// その他のエラー
    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

fn format_output(output: &str) -> String {
    if output.is_empty() {
        String::new()
    } else {
        format!("\nOutput: {}", output)
    }
}

impl GcloudctxError {
    /// エラーに対応する終了コードを返す
    pub fn exit_status(&self) -> ExitStatus {
        match self {
            GcloudctxError::SelectionCanceled => ExitStatus::Success,
            GcloudctxError::InvalidName { .. } => ExitStatus::ArgumentError,
            GcloudctxError::NotFound { .. } | GcloudctxError::EmptyBinding { .. } => {
                ExitStatus::NotFound
            }
            GcloudctxError::ExternalToolMissing { .. }
            | GcloudctxError::ExternalOperationFailed { .. } => ExitStatus::ExternalError,
            GcloudctxError::CleanupFailed { source, .. }
            | GcloudctxError::Context { source, .. }
            | GcloudctxError::Incomplete { source, .. } => source.exit_status(),
            _ => ExitStatus::GeneralError,
        }
    }

    /// ヒントメッセージがあれば返す
    pub fn hint(&self) -> Option<&str> {
        match self {
            GcloudctxError::AlreadyExists { hint, .. }
            | GcloudctxError::ExternalToolMissing { hint, .. }
            | GcloudctxError::Incomplete { hint, .. } => hint.as_deref(),
            GcloudctxError::Context { source, .. } | GcloudctxError::CleanupFailed { source, .. } => {
                source.hint()
            }
            _ => None,
        }
    }

    /// NotFound エラーを生成するヘルパー
    pub fn not_found(message: impl Into<String>) -> Self {
        GcloudctxError::NotFound {
            message: message.into(),
        }
    }

    /// AlreadyExists エラーを生成するヘルパー
    pub fn already_exists(name: impl Into<String>) -> Self {
        GcloudctxError::AlreadyExists {
            name: name.into(),
            hint: None,
        }
    }

    /// AlreadyExists エラーを生成するヘルパー（ヒント付き）
    pub fn already_exists_with_hint(name: impl Into<String>, hint: impl Into<String>) -> Self {
        GcloudctxError::AlreadyExists {
            name: name.into(),
            hint: Some(hint.into()),
        }
    }

    /// 空のディレクトリ設定ファイルのエラーを生成するヘルパー
    pub fn empty_binding(path: impl Into<String>) -> Self {
        GcloudctxError::EmptyBinding { path: path.into() }
    }

    /// 名前検証エラーを生成するヘルパー
    pub fn invalid_name(message: impl Into<String>) -> Self {
        GcloudctxError::InvalidName {
            message: message.into(),
        }
    }

    /// アクティブ構成の削除エラーを生成するヘルパー
    pub fn active_protected(name: impl Into<String>) -> Self {
        GcloudctxError::ActiveProfileProtected { name: name.into() }
    }

    /// 外部コマンド未インストールのエラーを生成するヘルパー
    pub fn tool_missing(tool: impl Into<String>, hint: impl Into<String>) -> Self {
        GcloudctxError::ExternalToolMissing {
            tool: tool.into(),
            hint: Some(hint.into()),
        }
    }

    /// 外部コマンド失敗のエラーを生成するヘルパー
    pub fn external(
        command: impl Into<String>,
        status: impl Into<String>,
        output: impl Into<String>,
    ) -> Self {
        GcloudctxError::ExternalOperationFailed {
            command: command.into(),
            status: status.into(),
            output: output.into(),
        }
    }

    /// 後始末失敗を元のエラーに付加する
    pub fn with_cleanup_failure(self, cleanup: impl Into<String>) -> Self {
        GcloudctxError::CleanupFailed {
            source: Box::new(self),
            cleanup: cleanup.into(),
        }
    }

    /// エラーに文脈を付加する
    pub fn context(self, message: impl Into<String>) -> Self {
        GcloudctxError::Context {
            message: message.into(),
            source: Box::new(self),
        }
    }

    /// その他のエラーを生成するヘルパー
    pub fn other(message: impl Into<String>) -> Self {
        GcloudctxError::Other(anyhow::anyhow!(message.into()))
    }

    /// 途中まで完了した操作のエラーを生成するヘルパー
    pub fn incomplete(
        message: impl Into<String>,
        hint: impl Into<String>,
        source: GcloudctxError,
    ) -> Self {
        GcloudctxError::Incomplete {
            message: message.into(),
            hint: Some(hint.into()),
            source: Box::new(source),
        }
    }

    /// 設定エラーを生成するヘルパー
    pub fn config(message: impl Into<String>) -> Self {
        GcloudctxError::Config {
            message: message.into(),
        }
    }

    /// シリアライズエラーを生成するヘルパー
    pub fn serialization(message: impl Into<String>) -> Self {
        GcloudctxError::Serialization {
            message: message.into(),
        }
    }

    /// NotFound 系のエラーかどうか（文脈付きも含む）
    pub fn is_not_found(&self) -> bool {
        match self {
            GcloudctxError::NotFound { .. } => true,
            GcloudctxError::Context { source, .. } => source.is_not_found(),
            _ => false,
        }
    }

    /// ユーザーによる選択中断かどうか
    pub fn is_canceled(&self) -> bool {
        matches!(self, GcloudctxError::SelectionCanceled)
    }
}

/// gcloudctx の結果型
pub type Result<T> = std::result::Result<T, GcloudctxError>;

/// エラーメッセージをフォーマットして表示
pub fn format_error(error: &GcloudctxError) -> String {
    let mut output = format!("Error: {}", error);

    if let Some(hint) = error.hint() {
        output.push_str(&format!("\nHint: {}", hint));
    }

    output
}
