//! gcloud コマンドの実行

use std::ffi::OsStr;
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};
use tracing::debug;

use crate::common::error::{GcloudctxError, Result};

/// 外部コマンドの実行器
#[derive(Debug, Clone)]
pub struct Runner {
    /// 実行ファイル名またはパス
    binary: String,
}

impl Runner {
    /// 新しい実行器を作成
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// 実行ファイルを PATH から解決する
    pub fn resolve(&self) -> Result<PathBuf> {
        which::which(&self.binary).map_err(|_| {
            GcloudctxError::tool_missing(
                self.binary.clone(),
                "Install the Google Cloud SDK: https://cloud.google.com/sdk/docs/install",
            )
        })
    }

    /// コマンドを実行し、トリムした標準出力を返す
    pub fn run<I, S>(&self, args: I) -> Result<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let program = self.resolve()?;
        let args: Vec<String> = args
            .into_iter()
            .map(|a| a.as_ref().to_string_lossy().into_owned())
            .collect();
        let shown = self.display(&args);
        debug!("Running: {}", shown);

        let output = Command::new(&program)
            .args(&args)
            .stdin(Stdio::null())
            .output()?;

        check_output(&shown, &output)?;
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    /// 標準入出力を引き継いで対話的に実行する
    pub fn run_interactive<I, S>(&self, args: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let program = self.resolve()?;
        let args: Vec<String> = args
            .into_iter()
            .map(|a| a.as_ref().to_string_lossy().into_owned())
            .collect();
        let shown = self.display(&args);
        debug!("Running interactively: {}", shown);

        let status = Command::new(&program).args(&args).status()?;
        if !status.success() {
            return Err(GcloudctxError::external(shown, status.to_string(), ""));
        }
        Ok(())
    }

    fn display(&self, args: &[String]) -> String {
        let mut parts = Vec::with_capacity(args.len() + 1);
        parts.push(self.binary.clone());
        parts.extend(args.iter().cloned());
        shell_words::join(parts)
    }
}

/// 終了ステータスを検査し、失敗時は標準出力と標準エラーを添えたエラーにする
fn check_output(display: &str, output: &Output) -> Result<()> {
    if output.status.success() {
        return Ok(());
    }

    let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
    combined.push_str(&String::from_utf8_lossy(&output.stderr));
    Err(GcloudctxError::external(
        display,
        output.status.to_string(),
        combined.trim(),
    ))
}
