//! 構成のエクスポート/インポート形式
//!
//! YAML と JSON のどちらでも表現でき、空のプロパティは出力しない。

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::common::error::{GcloudctxError, Result};
use crate::gcloud::{Profile, Properties, PropertyKey};

/// ファイル形式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DocumentFormat {
    #[default]
    Yaml,
    Json,
}

impl DocumentFormat {
    /// 拡張子から形式を判定（判定できなければ None）
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "yaml" | "yml" => Some(DocumentFormat::Yaml),
            "json" => Some(DocumentFormat::Json),
            _ => None,
        }
    }
}

impl FromStr for DocumentFormat {
    type Err = GcloudctxError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "yaml" | "yml" => Ok(DocumentFormat::Yaml),
            "json" => Ok(DocumentFormat::Json),
            _ => Err(GcloudctxError::config(format!(
                "unsupported format: {} (use yaml or json)",
                s
            ))),
        }
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentFormat::Yaml => write!(f, "yaml"),
            DocumentFormat::Json => write!(f, "json"),
        }
    }
}

/// エクスポートされた構成
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileDocument {
    /// 構成名（インポート時は `--name` で上書き可能）
    #[serde(default)]
    pub name: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub account: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub project: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub region: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub zone: String,
}

impl ProfileDocument {
    /// 構成から作成
    pub fn from_profile(profile: &Profile) -> Self {
        let props = &profile.properties;
        Self {
            name: profile.name.clone(),
            account: props.core.account.clone(),
            project: props.core.project.clone(),
            region: props.compute.region.clone(),
            zone: props.compute.zone.clone(),
        }
    }

    /// プロパティ集合に変換
    pub fn properties(&self) -> Properties {
        let mut props = Properties::default();
        props.set(PropertyKey::Account, self.account.as_str());
        props.set(PropertyKey::Project, self.project.as_str());
        props.set(PropertyKey::Region, self.region.as_str());
        props.set(PropertyKey::Zone, self.zone.as_str());
        props
    }

    /// 文字列から読み込む
    ///
    /// 形式が不明な場合は YAML、JSON の順に試す。
    pub fn parse(content: &str, format: Option<DocumentFormat>) -> Result<Self> {
        match format {
            Some(DocumentFormat::Yaml) => parse_yaml(content),
            Some(DocumentFormat::Json) => parse_json(content),
            None => parse_yaml(content).or_else(|_| parse_json(content)),
        }
    }

    /// ファイルから読み込む（形式は拡張子から判定）
    pub fn read(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            GcloudctxError::config(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::parse(&content, DocumentFormat::from_path(path))
    }

    /// 指定形式で文字列化する
    pub fn render(&self, format: DocumentFormat) -> Result<String> {
        match format {
            DocumentFormat::Yaml => serde_yaml_ng::to_string(self).map_err(|e| {
                GcloudctxError::serialization(format!("failed to marshal configuration: {}", e))
            }),
            DocumentFormat::Json => serde_json::to_string_pretty(self)
                .map(|s| s + "\n")
                .map_err(|e| {
                    GcloudctxError::serialization(format!(
                        "failed to marshal configuration: {}",
                        e
                    ))
                }),
        }
    }
}

fn parse_yaml(content: &str) -> Result<ProfileDocument> {
    serde_yaml_ng::from_str(content)
        .map_err(|e| GcloudctxError::serialization(format!("failed to parse file: {}", e)))
}

fn parse_json(content: &str) -> Result<ProfileDocument> {
    serde_json::from_str(content)
        .map_err(|e| GcloudctxError::serialization(format!("failed to parse file: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample() -> ProfileDocument {
        ProfileDocument {
            name: "production".to_string(),
            account: "admin@example.com".to_string(),
            project: "prod-project".to_string(),
            region: String::new(),
            zone: "us-central1-a".to_string(),
        }
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(
            DocumentFormat::from_path(Path::new("a.YML")),
            Some(DocumentFormat::Yaml)
        );
        assert_eq!(
            DocumentFormat::from_path(Path::new("dir/a.json")),
            Some(DocumentFormat::Json)
        );
        assert_eq!(DocumentFormat::from_path(Path::new("a.txt")), None);
        assert_eq!(DocumentFormat::from_path(Path::new("noext")), None);
    }

    #[test]
    fn test_format_from_str() {
        assert_eq!("json".parse::<DocumentFormat>().unwrap(), DocumentFormat::Json);
        assert_eq!("yml".parse::<DocumentFormat>().unwrap(), DocumentFormat::Yaml);
        let err = "toml".parse::<DocumentFormat>().unwrap_err();
        assert!(err.to_string().contains("use yaml or json"));
    }

    #[test]
    fn test_render_json_omits_empty_fields() {
        let json = sample().render(DocumentFormat::Json).unwrap();
        assert!(json.ends_with("}\n"));
        assert!(json.contains("\"zone\": \"us-central1-a\""));
        assert!(!json.contains("region"));
    }

    #[test]
    fn test_render_yaml() {
        let yaml = sample().render(DocumentFormat::Yaml).unwrap();
        assert!(yaml.contains("name: production"));
        assert!(yaml.contains("project: prod-project"));
        assert!(!yaml.contains("region"));
    }

    #[test]
    fn test_parse_without_format_accepts_yaml_and_json() {
        let from_yaml = ProfileDocument::parse("name: dev\nproject: p1\n", None).unwrap();
        assert_eq!(from_yaml.name, "dev");
        assert_eq!(from_yaml.project, "p1");

        let from_json =
            ProfileDocument::parse(r#"{"name": "dev", "zone": "asia-northeast1-a"}"#, None)
                .unwrap();
        assert_eq!(from_json.zone, "asia-northeast1-a");
    }

    #[test]
    fn test_parse_without_name() {
        let doc = ProfileDocument::parse("account: me@example.com\n", None).unwrap();
        assert!(doc.name.is_empty());
        assert_eq!(doc.account, "me@example.com");
    }

    #[test]
    fn test_parse_invalid_content() {
        let err = ProfileDocument::parse("{ not json", Some(DocumentFormat::Json)).unwrap_err();
        assert!(err.to_string().contains("failed to parse file"));
    }

    #[test]
    fn test_read_uses_extension() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("prod.json");
        std::fs::write(&path, sample().render(DocumentFormat::Json).unwrap()).unwrap();
        assert_eq!(ProfileDocument::read(&path).unwrap(), sample());
    }

    #[test]
    fn test_from_profile_and_properties() {
        let mut profile = Profile::new("dev");
        profile.properties.set(PropertyKey::Account, "me@example.com");
        profile.properties.set(PropertyKey::Region, "us-east1");

        let doc = ProfileDocument::from_profile(&profile);
        assert_eq!(doc.name, "dev");
        assert_eq!(doc.region, "us-east1");
        assert_eq!(doc.properties(), profile.properties);
    }
}
