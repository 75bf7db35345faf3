//! 選択行の生成と解析

use crate::common::error::{GcloudctxError, Result};
use crate::gcloud::Profile;

/// アクティブな構成を示すマーカー
pub const ACTIVE_MARKER: &str = "*";

/// 選択行を生成する: `"* name (account) [project]"`
pub fn format_line(profile: &Profile) -> String {
    let marker = if profile.is_active { ACTIVE_MARKER } else { " " };
    let mut line = format!("{} {}", marker, profile.name);
    if let Some(account) = profile.account() {
        line.push_str(&format!(" ({})", account));
    }
    if let Some(project) = profile.project() {
        line.push_str(&format!(" [{}]", project));
    }
    line
}

/// 選択行から構成名を取り出す
///
/// マーカーと `(` / `[` で始まるフィールドを読み飛ばし、最初のフィールドを返す。
pub fn parse_profile_name(line: &str) -> Result<String> {
    let line = line.trim();
    if line.is_empty() {
        return Err(GcloudctxError::invalid_name("empty selection line"));
    }

    line.split_whitespace()
        .find(|field| {
            *field != ACTIVE_MARKER && !field.starts_with('(') && !field.starts_with('[')
        })
        .map(str::to_string)
        .ok_or_else(|| {
            GcloudctxError::invalid_name(format!(
                "could not extract configuration name from {:?}",
                line
            ))
        })
}
