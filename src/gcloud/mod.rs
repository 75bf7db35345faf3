//! gcloud 連携モジュール
//!
//! gcloud CLI をサブプロセスとして呼び出し、構成（configuration）の
//! 一覧・切り替え・作成・削除・プロパティ設定を行う。

mod exec;
mod name;
mod store;
#[cfg(test)]
pub mod testing;
mod types;

pub use exec::Runner;
pub use name::validate_name;
pub use store::{GcloudStore, ProfileStore};
pub use types::{Profile, Properties, PropertyKey, active_in, find_in};
