//! gcloud 構成の型定義

use serde::{Deserialize, Serialize};
use std::fmt;

/// gcloud 構成（configuration）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// 構成名
    pub name: String,

    /// アクティブかどうか
    #[serde(default)]
    pub is_active: bool,

    /// プロパティ
    #[serde(default)]
    pub properties: Properties,
}

/// 構成のプロパティ
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Properties {
    #[serde(default)]
    pub core: CoreProperties,

    #[serde(default)]
    pub compute: ComputeProperties,
}

/// core セクション
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoreProperties {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub account: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub project: String,
}

/// compute セクション
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComputeProperties {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub region: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub zone: String,
}

/// 構成間でコピー・インポートされるプロパティのキー
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyKey {
    Account,
    Project,
    Region,
    Zone,
}

impl PropertyKey {
    /// コピー順
    pub const ALL: [PropertyKey; 4] = [
        PropertyKey::Account,
        PropertyKey::Project,
        PropertyKey::Region,
        PropertyKey::Zone,
    ];

    /// `gcloud config set` に渡すキー
    pub fn gcloud_key(&self) -> &'static str {
        match self {
            PropertyKey::Account => "account",
            PropertyKey::Project => "project",
            PropertyKey::Region => "compute/region",
            PropertyKey::Zone => "compute/zone",
        }
    }

    /// 表示用のラベル
    pub fn label(&self) -> &'static str {
        match self {
            PropertyKey::Account => "account",
            PropertyKey::Project => "project",
            PropertyKey::Region => "region",
            PropertyKey::Zone => "zone",
        }
    }
}

impl fmt::Display for PropertyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Properties {
    /// プロパティ値を取得（空文字列は None）
    pub fn get(&self, key: PropertyKey) -> Option<&str> {
        let value = match key {
            PropertyKey::Account => &self.core.account,
            PropertyKey::Project => &self.core.project,
            PropertyKey::Region => &self.compute.region,
            PropertyKey::Zone => &self.compute.zone,
        };
        if value.is_empty() {
            None
        } else {
            Some(value.as_str())
        }
    }

    /// プロパティ値を設定
    pub fn set(&mut self, key: PropertyKey, value: impl Into<String>) {
        let slot = match key {
            PropertyKey::Account => &mut self.core.account,
            PropertyKey::Project => &mut self.core.project,
            PropertyKey::Region => &mut self.compute.region,
            PropertyKey::Zone => &mut self.compute.zone,
        };
        *slot = value.into();
    }

    /// 空でないプロパティをコピー順に列挙
    pub fn non_empty(&self) -> impl Iterator<Item = (PropertyKey, &str)> {
        PropertyKey::ALL
            .into_iter()
            .filter_map(move |key| self.get(key).map(|value| (key, value)))
    }
}

impl Profile {
    /// 名前だけを持つ構成を作成
    #[cfg(test)]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// アカウント
    pub fn account(&self) -> Option<&str> {
        self.properties.get(PropertyKey::Account)
    }

    /// プロジェクト
    pub fn project(&self) -> Option<&str> {
        self.properties.get(PropertyKey::Project)
    }

    /// リージョン
    pub fn region(&self) -> Option<&str> {
        self.properties.get(PropertyKey::Region)
    }

    /// ゾーン
    pub fn zone(&self) -> Option<&str> {
        self.properties.get(PropertyKey::Zone)
    }
}

/// 一覧からアクティブな構成を探す
pub fn active_in(profiles: &[Profile]) -> Option<&Profile> {
    profiles.iter().find(|p| p.is_active)
}

/// 一覧から名前で構成を探す
pub fn find_in<'a>(profiles: &'a [Profile], name: &str) -> Option<&'a Profile> {
    profiles.iter().find(|p| p.name == name)
}
