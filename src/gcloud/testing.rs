//! テスト用のインメモリ構成ストア
//!
//! 変更系の呼び出しを記録し、任意の呼び出しを失敗させられる。

use std::cell::RefCell;

use crate::common::error::{GcloudctxError, Result};
use crate::gcloud::store::ProfileStore;
use crate::gcloud::types::{Profile, PropertyKey, find_in};

/// 記録される呼び出し
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Activate(String),
    Create(String),
    Delete(String),
    SetProperty(String, PropertyKey, String),
    SyncCredentials(Option<String>),
}

/// 失敗を注入する対象
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fail {
    Activate(String),
    Create(String),
    Delete(String),
    SetProperty(String, PropertyKey),
    SyncCredentials,
    List,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    profiles: RefCell<Vec<Profile>>,
    calls: RefCell<Vec<Call>>,
    failures: RefCell<Vec<Fail>>,
}

impl MemoryStore {
    /// 構成名の一覧から作成（先頭をアクティブにする）
    pub fn with_names(names: &[&str]) -> Self {
        let profiles = names
            .iter()
            .enumerate()
            .map(|(i, name)| Profile {
                is_active: i == 0,
                ..Profile::new(*name)
            })
            .collect();
        Self::with_profiles(profiles)
    }

    pub fn with_profiles(profiles: Vec<Profile>) -> Self {
        Self {
            profiles: RefCell::new(profiles),
            ..Default::default()
        }
    }

    pub fn fail_on(&self, fail: Fail) {
        self.failures.borrow_mut().push(fail);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn profiles(&self) -> Vec<Profile> {
        self.profiles.borrow().clone()
    }

    pub fn active_name(&self) -> Option<String> {
        self.profiles
            .borrow()
            .iter()
            .find(|p| p.is_active)
            .map(|p| p.name.clone())
    }

    pub fn names(&self) -> Vec<String> {
        self.profiles
            .borrow()
            .iter()
            .map(|p| p.name.clone())
            .collect()
    }

    fn check(&self, fail: Fail) -> Result<()> {
        if self.failures.borrow().contains(&fail) {
            return Err(GcloudctxError::external(
                format!("gcloud {:?}", fail),
                "exit status: 1",
                "injected failure",
            ));
        }
        Ok(())
    }
}

impl ProfileStore for MemoryStore {
    fn list(&self) -> Result<Vec<Profile>> {
        self.check(Fail::List)?;
        Ok(self.profiles.borrow().clone())
    }

    fn activate(&self, name: &str) -> Result<()> {
        self.calls.borrow_mut().push(Call::Activate(name.to_string()));
        self.check(Fail::Activate(name.to_string()))?;
        let mut profiles = self.profiles.borrow_mut();
        if find_in(&profiles, name).is_none() {
            return Err(GcloudctxError::not_found(format!(
                "configuration {:?} not found",
                name
            )));
        }
        for profile in profiles.iter_mut() {
            profile.is_active = profile.name == name;
        }
        Ok(())
    }

    fn create(&self, name: &str) -> Result<()> {
        self.calls.borrow_mut().push(Call::Create(name.to_string()));
        self.check(Fail::Create(name.to_string()))?;
        let mut profiles = self.profiles.borrow_mut();
        if find_in(&profiles, name).is_some() {
            return Err(GcloudctxError::already_exists(name));
        }
        profiles.push(Profile::new(name));
        Ok(())
    }

    fn delete(&self, name: &str) -> Result<()> {
        self.calls.borrow_mut().push(Call::Delete(name.to_string()));
        self.check(Fail::Delete(name.to_string()))?;
        let mut profiles = self.profiles.borrow_mut();
        let target = find_in(&profiles, name).ok_or_else(|| {
            GcloudctxError::not_found(format!("configuration {:?} does not exist", name))
        })?;
        if target.is_active {
            return Err(GcloudctxError::active_protected(name));
        }
        profiles.retain(|p| p.name != name);
        Ok(())
    }

    fn set_property(&self, name: &str, key: PropertyKey, value: &str) -> Result<()> {
        self.calls.borrow_mut().push(Call::SetProperty(
            name.to_string(),
            key,
            value.to_string(),
        ));
        self.check(Fail::SetProperty(name.to_string(), key))?;
        let mut profiles = self.profiles.borrow_mut();
        let profile = profiles
            .iter_mut()
            .find(|p| p.name == name)
            .ok_or_else(|| GcloudctxError::not_found(format!("configuration {:?} not found", name)))?;
        profile.properties.set(key, value);
        Ok(())
    }

    fn sync_credentials(&self, impersonate: Option<&str>) -> Result<()> {
        self.calls
            .borrow_mut()
            .push(Call::SyncCredentials(impersonate.map(str::to_string)));
        self.check(Fail::SyncCredentials)
    }
}
