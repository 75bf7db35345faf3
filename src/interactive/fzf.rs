//! fzf による構成の対話選択

use std::io::{ErrorKind, Write};
use std::process::{Command, Stdio};
use tracing::debug;

use crate::common::config::InteractiveConfig;
use crate::common::error::{GcloudctxError, Result};
use crate::gcloud::Profile;
use crate::interactive::parse::{format_line, parse_profile_name};

/// fzf の実行ファイル名
pub const FZF_BINARY: &str = "fzf";

/// プレビュー用の内部サブコマンド
pub const PREVIEW_COMMAND: &str = "__preview";

/// ユーザーが Esc / Ctrl-C で中断したときの終了コード
const FZF_CANCELED: i32 = 130;

/// fzf のオプション
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FzfOptions {
    pub height: String,
    pub preview_window: String,
    pub disable_preview: bool,
    /// 末尾に追加するオプション
    pub extra: Vec<String>,
}

impl FzfOptions {
    /// 設定から作成（追加オプションはシェル風に分割する）
    pub fn from_config(config: &InteractiveConfig) -> Result<Self> {
        let extra = shell_words::split(&config.options).map_err(|e| {
            GcloudctxError::config(format!("invalid fzf options {:?}: {}", config.options, e))
        })?;
        Ok(Self {
            height: config.height.clone(),
            preview_window: config.preview_window.clone(),
            disable_preview: config.disable_preview,
            extra,
        })
    }

    /// fzf の引数を組み立てる
    pub fn build_args(&self, self_cmd: &str) -> Vec<String> {
        let mut args: Vec<String> = vec![
            "--ansi".into(),
            "--height".into(),
            self.height.clone(),
            "--reverse".into(),
            "--border".into(),
            "--header".into(),
            "Select a configuration:".into(),
            "--prompt".into(),
            "gcloud> ".into(),
        ];

        if !self.disable_preview {
            args.push("--preview".into());
            args.push(format!(
                "{} {} {{}}",
                shell_words::quote(self_cmd),
                PREVIEW_COMMAND
            ));
            args.push("--preview-window".into());
            args.push(self.preview_window.clone());
        }

        args.extend(self.extra.iter().cloned());
        args
    }
}

impl Default for FzfOptions {
    fn default() -> Self {
        let config = InteractiveConfig::default();
        Self {
            height: config.height,
            preview_window: config.preview_window,
            disable_preview: config.disable_preview,
            extra: Vec::new(),
        }
    }
}

/// fzf が PATH 上にあるか
pub fn is_available() -> bool {
    which::which(FZF_BINARY).is_ok()
}

/// プレビューから呼び出す自分自身のパス
fn self_command() -> String {
    std::env::current_exe()
        .and_then(std::fs::canonicalize)
        .map(|p| p.display().to_string())
        .unwrap_or_else(|_| env!("CARGO_PKG_NAME").to_string())
}

/// fzf に一覧を書き込む
///
/// 読み終わる前に fzf が終了した場合のパイプ切断は無視し、終了コードで判定する。
fn feed<W: Write>(stdin: &mut W, input: &str) -> Result<()> {
    match stdin.write_all(input.as_bytes()) {
        Err(e) if e.kind() == ErrorKind::BrokenPipe => {
            debug!("fzf closed its input early");
            Ok(())
        }
        result => Ok(result?),
    }
}

/// fzf で構成を選択し、選ばれた構成名を返す
pub fn select(profiles: &[Profile], options: &FzfOptions) -> Result<String> {
    let fzf = which::which(FZF_BINARY).map_err(|_| {
        GcloudctxError::tool_missing(FZF_BINARY, "Install fzf: https://github.com/junegunn/fzf")
    })?;
    if profiles.is_empty() {
        return Err(GcloudctxError::not_found("no configurations found"));
    }

    let input: String = profiles
        .iter()
        .map(|p| format_line(p) + "\n")
        .collect();
    let args = options.build_args(&self_command());
    debug!("Running fzf with {:?}", args);

    let mut child = Command::new(fzf)
        .args(&args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::inherit())
        .spawn()?;

    if let Some(mut stdin) = child.stdin.take() {
        feed(&mut stdin, &input)?;
    }
    let output = child.wait_with_output()?;

    if output.status.code() == Some(FZF_CANCELED) {
        return Err(GcloudctxError::SelectionCanceled);
    }
    if !output.status.success() {
        return Err(GcloudctxError::external(
            FZF_BINARY,
            output.status.to_string(),
            "",
        ));
    }

    let selected = String::from_utf8_lossy(&output.stdout);
    let selected = selected.trim();
    if selected.is_empty() {
        return Err(GcloudctxError::SelectionCanceled);
    }
    parse_profile_name(selected)
}
