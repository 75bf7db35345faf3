//! 構成管理サブコマンドの定義

use clap::Args;
use std::path::PathBuf;

/// 構成作成の引数
#[derive(Args, Debug)]
pub struct CreateArgs {
    /// 構成名
    pub name: String,

    /// 作成後にアクティブにする
    #[arg(long)]
    pub activate: bool,
}

/// 構成削除の引数
#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// 構成名
    pub name: String,

    /// 確認なしで削除
    #[arg(short, long)]
    pub force: bool,
}

/// 名前変更の引数
#[derive(Args, Debug)]
pub struct RenameArgs {
    /// 現在の構成名
    pub old: String,

    /// 新しい構成名
    pub new: String,
}

/// 複製の引数
#[derive(Args, Debug)]
pub struct CloneArgs {
    /// 複製元の構成名
    pub source: String,

    /// 複製先の構成名
    pub target: String,

    /// 複製後にアクティブにする
    #[arg(long)]
    pub activate: bool,
}

/// エクスポートの引数
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// 構成名（省略時はアクティブな構成）
    pub name: Option<String>,

    /// 出力形式 (yaml, json)
    #[arg(short, long, default_value = "yaml")]
    pub format: String,

    /// 出力ファイル（省略時は標準出力）
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

/// インポートの引数
#[derive(Args, Debug)]
pub struct ImportArgs {
    /// インポートするファイル
    pub file: PathBuf,

    /// インポート後にアクティブにする
    #[arg(long)]
    pub activate: bool,

    /// 既存の構成を置き換える
    #[arg(long)]
    pub overwrite: bool,

    /// ファイル内の名前の代わりに使う構成名
    #[arg(long)]
    pub name: Option<String>,
}
