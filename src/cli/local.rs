//! ディレクトリ設定サブコマンドの定義

use clap::Args;

/// `use` の引数
#[derive(Args, Debug)]
pub struct UseArgs {
    /// カレントディレクトリで使う構成名（省略時は現在の設定を表示）
    pub name: Option<String>,

    /// カレントディレクトリの .gcloudctx を削除
    #[arg(long, conflicts_with_all = ["name", "switch"])]
    pub unset: bool,

    /// 設定後にその構成へ切り替える
    #[arg(long, requires = "name")]
    pub switch: bool,
}
