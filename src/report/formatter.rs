//! 構成一覧・詳細のフォーマッター
//!
//! 標準, wide, name, JSON, YAML 形式での一覧出力と、現在の構成・詳細・プレビューの表示を行う。

use colored::Colorize;
use serde::Serialize;
use std::fmt::Write as _;
use std::str::FromStr;

use crate::common::error::{GcloudctxError, Result};
use crate::gcloud::Profile;

/// wide 形式の列幅（NAME, ACCOUNT, PROJECT, REGION）
const WIDE_WIDTHS: [usize; 4] = [20, 30, 25, 15];

/// プレビューの罫線
const RULE: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━";

/// 一覧の出力形式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListFormat {
    /// `* name (account) [project]`
    #[default]
    Default,
    /// 表形式
    Wide,
    /// 名前のみ
    Name,
    /// JSON形式
    Json,
    /// YAML形式
    Yaml,
}

impl FromStr for ListFormat {
    type Err = GcloudctxError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "" | "default" => Ok(ListFormat::Default),
            "wide" => Ok(ListFormat::Wide),
            "name" => Ok(ListFormat::Name),
            "json" => Ok(ListFormat::Json),
            "yaml" | "yml" => Ok(ListFormat::Yaml),
            _ => Err(GcloudctxError::config(format!(
                "Unknown output format: {}. Valid formats: default, json, yaml, wide, name",
                s
            ))),
        }
    }
}

/// JSON / YAML 出力用の構成
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileSummary<'a> {
    pub name: &'a str,
    pub is_active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zone: Option<&'a str>,
}

impl<'a> From<&'a Profile> for ProfileSummary<'a> {
    fn from(profile: &'a Profile) -> Self {
        Self {
            name: &profile.name,
            is_active: profile.is_active,
            account: profile.account(),
            project: profile.project(),
            region: profile.region(),
            zone: profile.zone(),
        }
    }
}

/// レポートジェネレーター
#[derive(Debug, Clone, Copy)]
pub struct ReportGenerator {
    color: bool,
}

impl ReportGenerator {
    /// 新しいレポートジェネレーターを作成
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    /// 一覧を指定形式で生成（末尾に改行を含む）
    pub fn list(&self, profiles: &[Profile], format: ListFormat) -> Result<String> {
        match format {
            ListFormat::Default => Ok(self.to_lines(profiles)),
            ListFormat::Wide => Ok(self.to_wide(profiles)),
            ListFormat::Name => Ok(profiles.iter().map(|p| format!("{}\n", p.name)).collect()),
            ListFormat::Json => to_json(profiles),
            ListFormat::Yaml => to_yaml(profiles),
        }
    }

    /// 標準形式
    fn to_lines(&self, profiles: &[Profile]) -> String {
        let mut out = String::new();
        for profile in profiles {
            let marker = if profile.is_active { "*" } else { " " };
            let mut line = format!("{} {}", marker, self.name(profile, &profile.name));
            if let Some(account) = profile.account() {
                line.push(' ');
                line.push_str(&self.dim(&format!("({})", account)));
            }
            if let Some(project) = profile.project() {
                line.push(' ');
                line.push_str(&self.dim(&format!("[{}]", project)));
            }
            out.push_str(&line);
            out.push('\n');
        }
        out
    }

    /// wide 形式
    fn to_wide(&self, profiles: &[Profile]) -> String {
        let mut out = String::new();
        let header = format!(
            "   {:<20}  {:<30}  {:<25}  {:<15}  {}",
            "NAME", "ACCOUNT", "PROJECT", "REGION", "ZONE"
        );
        out.push_str(&self.bold(&header));
        out.push('\n');

        for profile in profiles {
            let marker = if profile.is_active { "*" } else { " " };
            let cells = [
                profile.name.as_str(),
                profile.account().unwrap_or(""),
                profile.project().unwrap_or(""),
                profile.region().unwrap_or(""),
            ];
            let mut line = format!("{}  ", marker);
            for (i, (cell, width)) in cells.iter().zip(WIDE_WIDTHS).enumerate() {
                // 色付けの前に幅を揃える
                let padded = format!("{:<width$}", self.cell(cell, width), width = width);
                let painted = if i == 0 {
                    self.name(profile, &padded)
                } else if cell.is_empty() {
                    self.dim(&padded)
                } else {
                    padded
                };
                line.push_str(&painted);
                line.push_str("  ");
            }
            let zone = profile.zone().unwrap_or("");
            line.push_str(&if zone.is_empty() {
                self.dim("-")
            } else {
                zone.to_string()
            });
            out.push_str(&line);
            out.push('\n');
        }
        out
    }

    fn cell(&self, value: &str, width: usize) -> String {
        if value.is_empty() {
            "-".to_string()
        } else {
            truncate(value, width)
        }
    }

    /// 現在の構成名
    pub fn current(&self, profile: &Profile) -> String {
        if self.color {
            profile.name.yellow().bold().to_string()
        } else {
            profile.name.clone()
        }
    }

    /// 構成の詳細
    pub fn details(&self, profile: &Profile) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "{}: {}",
            self.label("Configuration"),
            self.current(profile)
        );
        let status = if profile.is_active {
            self.highlight("active")
        } else {
            "inactive".to_string()
        };
        let _ = writeln!(out, "{}: {}", self.label("Status"), status);
        for (label, value) in [
            ("Account", profile.account()),
            ("Project", profile.project()),
            ("Region", profile.region()),
            ("Zone", profile.zone()),
        ] {
            if let Some(value) = value {
                let _ = writeln!(out, "{}: {}", self.label(label), value);
            }
        }
        out
    }

    /// fzf のプレビュー
    pub fn preview(&self, profile: &Profile) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{}", RULE);
        let _ = writeln!(out, "  Configuration: {}", profile.name);
        let _ = writeln!(out, "{}\n", RULE);
        if profile.is_active {
            let _ = writeln!(out, "  Status:  {}", self.highlight("✓ Active"));
        } else {
            let _ = writeln!(out, "  Status:  Inactive");
        }
        for (label, value) in [
            ("Account:", profile.account()),
            ("Project:", profile.project()),
            ("Region: ", profile.region()),
            ("Zone:   ", profile.zone()),
        ] {
            if let Some(value) = value {
                let _ = writeln!(out, "  {} {}", label, value);
            }
        }
        let _ = writeln!(out, "\n{}", RULE);
        out
    }

    fn name(&self, profile: &Profile, text: &str) -> String {
        match (self.color, profile.is_active) {
            (false, _) => text.to_string(),
            (true, true) => text.yellow().bold().to_string(),
            (true, false) => text.cyan().to_string(),
        }
    }

    fn label(&self, text: &str) -> String {
        if self.color {
            text.cyan().to_string()
        } else {
            text.to_string()
        }
    }

    fn highlight(&self, text: &str) -> String {
        if self.color {
            text.yellow().bold().to_string()
        } else {
            text.to_string()
        }
    }

    fn dim(&self, text: &str) -> String {
        if self.color {
            text.bright_black().to_string()
        } else {
            text.to_string()
        }
    }

    fn bold(&self, text: &str) -> String {
        if self.color {
            text.bold().to_string()
        } else {
            text.to_string()
        }
    }
}

/// 構成を取得できなかったときのプレビュー
pub fn preview_fallback(subject: &str, reason: &str) -> String {
    format!("Configuration: {}\n\n({})\n", subject, reason)
}

/// 文字数が `max` を超える場合は末尾を `...` にして切り詰める
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    if max <= 3 {
        return s.chars().take(max).collect();
    }
    let mut out: String = s.chars().take(max - 3).collect();
    out.push_str("...");
    out
}

fn summaries(profiles: &[Profile]) -> Vec<ProfileSummary<'_>> {
    profiles.iter().map(ProfileSummary::from).collect()
}

fn to_json(profiles: &[Profile]) -> Result<String> {
    serde_json::to_string_pretty(&summaries(profiles))
        .map(|s| s + "\n")
        .map_err(|e| GcloudctxError::serialization(format!("Failed to serialize to JSON: {}", e)))
}

fn to_yaml(profiles: &[Profile]) -> Result<String> {
    serde_yaml_ng::to_string(&summaries(profiles))
        .map_err(|e| GcloudctxError::serialization(format!("Failed to serialize to YAML: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gcloud::PropertyKey;

    fn profiles() -> Vec<Profile> {
        let mut default = Profile::new("default");
        default.is_active = true;
        default.properties.set(PropertyKey::Account, "me@example.com");
        default.properties.set(PropertyKey::Project, "my-project");

        let mut production = Profile::new("production");
        production
            .properties
            .set(PropertyKey::Account, "a-very-long-service-account@prod-project.iam.gserviceaccount.com");
        production.properties.set(PropertyKey::Region, "us-central1");
        production.properties.set(PropertyKey::Zone, "us-central1-a");

        vec![default, production, Profile::new("staging")]
    }

    fn plain() -> ReportGenerator {
        ReportGenerator::new(false)
    }

    #[test]
    fn test_list_format_from_str() {
        assert_eq!("".parse::<ListFormat>().unwrap(), ListFormat::Default);
        assert_eq!("WIDE".parse::<ListFormat>().unwrap(), ListFormat::Wide);
        assert_eq!("yml".parse::<ListFormat>().unwrap(), ListFormat::Yaml);
        let err = "csv".parse::<ListFormat>().unwrap_err();
        assert!(err.to_string().contains("Valid formats"));
    }

    #[test]
    fn test_default_list() {
        let out = plain().list(&profiles(), ListFormat::Default).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "* default (me@example.com) [my-project]");
        assert!(lines[1].starts_with("  production ("));
        assert_eq!(lines[2], "  staging");
    }

    #[test]
    fn test_name_list() {
        let out = plain().list(&profiles(), ListFormat::Name).unwrap();
        assert_eq!(out, "default\nproduction\nstaging\n");
    }

    #[test]
    fn test_wide_list() {
        let out = plain().list(&profiles(), ListFormat::Wide).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert!(lines[0].contains("NAME"));
        assert!(lines[0].trim_end().ends_with("ZONE"));

        // 長いアカウントは30文字に切り詰める
        assert!(lines[2].contains("a-very-long-service-account..."));
        assert!(lines[2].ends_with("us-central1-a"));

        // 空の値は "-"
        let staging: Vec<&str> = lines[3].split_whitespace().collect();
        assert_eq!(staging, vec!["staging", "-", "-", "-", "-"]);
        assert!(lines[1].starts_with("*  default"));
    }

    #[test]
    fn test_json_list_omits_empty_properties() {
        let out = plain().list(&profiles(), ListFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value[0]["name"], "default");
        assert_eq!(value[0]["is_active"], true);
        assert!(value[0].get("region").is_none());
        assert_eq!(value[2]["is_active"], false);
        assert!(value[2].get("account").is_none());
    }

    #[test]
    fn test_yaml_list() {
        let out = plain().list(&profiles(), ListFormat::Yaml).unwrap();
        assert!(out.contains("- name: default"));
        assert!(out.contains("is_active: true"));
        assert!(out.contains("zone: us-central1-a"));
    }

    #[test]
    fn test_details() {
        let list = profiles();
        let out = plain().details(&list[1]);
        assert!(out.starts_with("Configuration: production\n"));
        assert!(out.contains("Status: inactive\n"));
        assert!(out.contains("Region: us-central1\n"));
        assert!(!out.contains("Project:"));
    }

    #[test]
    fn test_preview() {
        let list = profiles();
        let out = plain().preview(&list[0]);
        assert!(out.contains("  Configuration: default\n"));
        assert!(out.contains("Status:  ✓ Active"));
        assert!(out.contains("  Project: my-project\n"));
        assert!(!out.contains("Zone:"));
    }

    #[test]
    fn test_current_without_color() {
        assert_eq!(plain().current(&profiles()[0]), "default");
    }

    #[test]
    fn test_preview_fallback() {
        assert_eq!(
            preview_fallback("* ???", "Could not parse configuration name"),
            "Configuration: * ???\n\n(Could not parse configuration name)\n"
        );
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("exactly-10", 10), "exactly-10");
        assert_eq!(truncate("longer-than-ten", 10), "longer-...");
        assert_eq!(truncate("abcdef", 3), "abc");
        assert_eq!(truncate("日本語のテキスト", 5), "日本...");
    }
}
