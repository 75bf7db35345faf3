//! 構成ストア
//!
//! gcloud の構成一覧・切り替え・作成・削除・プロパティ設定を抽象化する。
//! 切り替えや複数ステップ操作はこのトレイト越しにのみストアへ触れる。

use tracing::debug;

use crate::common::error::{GcloudctxError, Result};
use crate::gcloud::exec::Runner;
use crate::gcloud::types::{Profile, PropertyKey, active_in, find_in};

/// 構成ストア
pub trait ProfileStore {
    /// 全構成を取得
    fn list(&self) -> Result<Vec<Profile>>;

    /// 構成をアクティブにする
    fn activate(&self, name: &str) -> Result<()>;

    /// 空の構成を作成する（既存なら AlreadyExists）
    fn create(&self, name: &str) -> Result<()>;

    /// 構成を削除する（存在しなければ NotFound、アクティブなら ActiveProfileProtected）
    fn delete(&self, name: &str) -> Result<()>;

    /// 構成のプロパティを設定する
    fn set_property(&self, name: &str, key: PropertyKey, value: &str) -> Result<()>;

    /// Application Default Credentials を同期する
    fn sync_credentials(&self, impersonate: Option<&str>) -> Result<()>;

    /// アクティブな構成を取得
    fn get_active(&self) -> Result<Profile> {
        let profiles = self.list()?;
        active_in(&profiles)
            .cloned()
            .ok_or_else(|| GcloudctxError::not_found("no active configuration found"))
    }

    /// 名前で構成を取得
    fn get(&self, name: &str) -> Result<Profile> {
        let profiles = self.list()?;
        find_in(&profiles, name)
            .cloned()
            .ok_or_else(|| GcloudctxError::not_found(format!("configuration {:?} not found", name)))
    }

    /// 構成が存在するか
    fn exists(&self, name: &str) -> Result<bool> {
        let profiles = self.list()?;
        Ok(find_in(&profiles, name).is_some())
    }
}

/// gcloud CLI をバックエンドとするストア
#[derive(Debug, Clone)]
pub struct GcloudStore {
    runner: Runner,
}

impl GcloudStore {
    /// 新しいストアを作成
    pub fn new(runner: Runner) -> Self {
        Self { runner }
    }
}

impl ProfileStore for GcloudStore {
    fn list(&self) -> Result<Vec<Profile>> {
        let output = self
            .runner
            .run(["config", "configurations", "list", "--format=json"])?;
        serde_json::from_str(&output).map_err(|e| {
            GcloudctxError::serialization(format!("failed to parse configurations: {}", e))
        })
    }

    fn activate(&self, name: &str) -> Result<()> {
        debug!("Activating configuration {:?}", name);
        self.runner
            .run(["config", "configurations", "activate", name])?;
        Ok(())
    }

    fn create(&self, name: &str) -> Result<()> {
        if self.exists(name)? {
            return Err(GcloudctxError::already_exists(name));
        }
        debug!("Creating configuration {:?}", name);
        // create は作成した構成をアクティブにしない
        self.runner.run([
            "config",
            "configurations",
            "create",
            name,
            "--no-activate",
        ])?;
        Ok(())
    }

    fn delete(&self, name: &str) -> Result<()> {
        let profiles = self.list()?;
        let target = find_in(&profiles, name).ok_or_else(|| {
            GcloudctxError::not_found(format!("configuration {:?} does not exist", name))
        })?;
        if target.is_active {
            return Err(GcloudctxError::active_protected(name));
        }
        debug!("Deleting configuration {:?}", name);
        self.runner
            .run(["config", "configurations", "delete", name, "--quiet"])?;
        Ok(())
    }

    fn set_property(&self, name: &str, key: PropertyKey, value: &str) -> Result<()> {
        debug!("Setting {} on {:?}", key.gcloud_key(), name);
        self.runner.run([
            "config",
            "set",
            key.gcloud_key(),
            value,
            "--configuration",
            name,
        ])?;
        Ok(())
    }

    fn sync_credentials(&self, impersonate: Option<&str>) -> Result<()> {
        let mut args = vec!["auth", "application-default", "login"];
        if let Some(account) = impersonate.filter(|a| !a.is_empty()) {
            args.push("--impersonate-service-account");
            args.push(account);
        }
        self.runner.run_interactive(args)
    }
}
