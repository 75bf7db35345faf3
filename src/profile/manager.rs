//! 構成マネージャー
//!
//! 構成の作成、削除、複製、名前変更、エクスポート/インポートを行う。
//! 複数ステップの操作は [`Transaction`] で実行し、途中で失敗したら作成した構成を削除する。

use tracing::{debug, info};

use crate::common::error::{GcloudctxError, Result};
use crate::gcloud::{Profile, ProfileStore, Properties, find_in, validate_name};
use crate::profile::document::ProfileDocument;
use crate::profile::rollback::{Step, Transaction};

/// インポートのオプション
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportOptions {
    /// ファイル内の名前の代わりに使う構成名
    pub name: Option<String>,
    /// 既存の構成を置き換える
    pub overwrite: bool,
    /// インポート後にアクティブにする
    pub activate: bool,
}

/// 構成マネージャー
pub struct ProfileManager<'a, S: ProfileStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: ProfileStore + ?Sized> ProfileManager<'a, S> {
    /// 新しい構成マネージャーを作成
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// 空の構成を作成
    pub fn create(&self, name: &str, activate: bool) -> Result<()> {
        validate_name(name)?;
        self.store.create(name)?;
        info!("Created configuration {:?}", name);
        if activate {
            self.store.activate(name)?;
        }
        Ok(())
    }

    /// 構成を削除
    pub fn delete(&self, name: &str) -> Result<()> {
        self.store.delete(name)?;
        info!("Deleted configuration {:?}", name);
        Ok(())
    }

    /// 構成を複製する（複製元は変更しない）
    pub fn clone_profile(&self, source: &str, target: &str, activate: bool) -> Result<()> {
        validate_name(target)?;
        let profiles = self.store.list()?;
        let source = find_in(&profiles, source).ok_or_else(|| {
            GcloudctxError::not_found(format!("source configuration {:?} not found", source))
        })?;
        if find_in(&profiles, target).is_some() {
            return Err(GcloudctxError::already_exists(target));
        }

        Transaction::new(self.store)
            .run_all(copy_steps(source, target))
            .map_err(|failure| failure.into_error())?;
        info!("Cloned configuration {:?} -> {:?}", source.name, target);

        if activate {
            self.store.activate(target)?;
        }
        Ok(())
    }

    /// 構成の名前を変更する
    ///
    /// 新しい構成を作ってプロパティを移し、旧構成がアクティブなら新しい構成を
    /// アクティブにしてから旧構成を削除する。最後の削除に失敗した場合は
    /// 両方の構成が残り、`Incomplete` を返す。
    pub fn rename(&self, old: &str, new: &str) -> Result<()> {
        validate_name(new)?;
        let profiles = self.store.list()?;
        let snapshot = find_in(&profiles, old)
            .cloned()
            .ok_or_else(|| GcloudctxError::not_found(format!("configuration {:?} not found", old)))?;
        if find_in(&profiles, new).is_some() {
            return Err(GcloudctxError::already_exists(new));
        }

        let mut steps = copy_steps(&snapshot, new);
        if snapshot.is_active {
            steps.push(Step::Activate(new.to_string()));
        }
        Transaction::new(self.store)
            .run_all(steps)
            .map_err(|failure| failure.into_error())?;

        debug!("Deleting old configuration {:?}", old);
        self.store.delete(old).map_err(|e| {
            GcloudctxError::incomplete(
                format!("created {:?} but failed to delete {:?}", new, old),
                format!("remove it manually with `gcloudctx delete {}`", old),
                e,
            )
        })?;
        info!("Renamed configuration {:?} -> {:?}", old, new);
        Ok(())
    }

    /// 構成をエクスポート用の形式で取得（名前を省略するとアクティブな構成）
    pub fn export(&self, name: Option<&str>) -> Result<ProfileDocument> {
        let profile = match name {
            Some(name) => self.store.get(name)?,
            None => self.store.get_active()?,
        };
        Ok(ProfileDocument::from_profile(&profile))
    }

    /// 構成をインポートし、作成した構成名を返す
    pub fn import(&self, document: &ProfileDocument, options: &ImportOptions) -> Result<String> {
        let name = options
            .name
            .as_deref()
            .filter(|n| !n.is_empty())
            .unwrap_or(document.name.as_str())
            .to_string();
        if name.is_empty() {
            return Err(GcloudctxError::invalid_name(
                "configuration name is required (use --name or include 'name' in the file)",
            ));
        }
        validate_name(&name)?;

        if self.store.exists(&name)? {
            if !options.overwrite {
                return Err(GcloudctxError::already_exists_with_hint(
                    &name,
                    "use --overwrite to replace",
                ));
            }
            debug!("Overwriting existing configuration {:?}", name);
            self.store
                .delete(&name)
                .map_err(|e| e.context("failed to delete existing configuration"))?;
        }

        let mut steps = vec![Step::Create(name.clone())];
        steps.extend(property_steps(&document.properties(), &name));
        Transaction::new(self.store)
            .run_all(steps)
            .map_err(|failure| failure.into_original())?;
        info!("Imported configuration {:?}", name);

        if options.activate {
            self.store.activate(&name)?;
        }
        Ok(name)
    }
}

/// 作成と、空でないプロパティのコピーのステップ列
fn copy_steps(source: &Profile, target: &str) -> Vec<Step> {
    let mut steps = vec![Step::Create(target.to_string())];
    steps.extend(property_steps(&source.properties, target));
    steps
}

fn property_steps(properties: &Properties, target: &str) -> Vec<Step> {
    properties
        .non_empty()
        .map(|(key, value)| Step::SetProperty {
            profile: target.to_string(),
            key,
            value: value.to_string(),
        })
        .collect()
}
