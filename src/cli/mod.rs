//! CLI引数パーサーモジュール
//!
//! clapを使用したコマンドライン引数の解析を行う。

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

pub mod local;
pub mod profile;

/// gcloudctx - gcloud の構成を素早く切り替える
///
/// 引数なしで実行すると fzf で構成を選択する（fzf がなければ現在の構成を表示）。
/// `gcloudctx NAME` で切り替え、`gcloudctx -` で直前の構成に戻る。
#[derive(Parser, Debug)]
#[command(name = "gcloudctx")]
#[command(version, about, long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// 切り替え先の構成名（`-` で直前の構成）
    #[arg(value_name = "CONFIGURATION")]
    pub target: Option<String>,

    /// 構成の一覧を表示
    #[arg(short, long, conflicts_with_all = ["current", "interactive", "target"])]
    pub list: bool,

    /// 現在の構成を表示
    #[arg(short, long, conflicts_with_all = ["interactive", "target"])]
    pub current: bool,

    /// 現在の構成の詳細を表示（--current と併用）
    #[arg(long, requires = "current")]
    pub info: bool,

    /// fzf で対話的に選択
    #[arg(short, long, conflicts_with = "target")]
    pub interactive: bool,

    /// 一覧の出力形式 (default, json, yaml, wide, name)
    #[arg(short, long, value_name = "FORMAT")]
    pub output: Option<String>,

    /// 切り替え後に Application Default Credentials を同期
    #[arg(long)]
    pub sync_adc: bool,

    /// ADC 同期時に借用するサービスアカウント
    #[arg(long, value_name = "SERVICE_ACCOUNT", requires = "sync_adc")]
    pub impersonate_service_account: Option<String>,

    /// 色付き出力を無効化
    #[arg(long, global = true)]
    pub no_color: bool,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// 設定ファイルを指定
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

/// 利用可能なコマンド
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// 新しい構成を作成
    Create(profile::CreateArgs),

    /// 構成を削除
    Delete(profile::DeleteArgs),

    /// 構成の名前を変更
    Rename(profile::RenameArgs),

    /// 構成を複製
    Clone(profile::CloneArgs),

    /// 構成を YAML / JSON でエクスポート
    Export(profile::ExportArgs),

    /// YAML / JSON ファイルから構成をインポート
    Import(profile::ImportArgs),

    /// カレントディレクトリで使う構成を設定・表示
    Use(local::UseArgs),

    /// ディレクトリ設定に従って構成を切り替える
    Auto,

    /// シェル補完スクリプトを生成
    Completion(CompletionArgs),

    /// fzf のプレビュー用（内部コマンド）
    #[command(name = "__preview", hide = true)]
    Preview(PreviewArgs),
}

/// 補完スクリプト生成の引数
#[derive(Args, Debug)]
pub struct CompletionArgs {
    /// 対象のシェル
    #[arg(value_enum)]
    pub shell: Shell,
}

/// プレビューの引数
#[derive(Args, Debug)]
pub struct PreviewArgs {
    /// fzf の選択行
    #[arg(allow_hyphen_values = true)]
    pub line: String,
}
