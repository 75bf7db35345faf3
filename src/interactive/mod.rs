//! 対話選択モジュール
//!
//! fzf に構成の一覧を渡し、選ばれた行から構成名を取り出す。

mod fzf;
mod parse;

pub use fzf::{FzfOptions, is_available, select};
pub use parse::parse_profile_name;
