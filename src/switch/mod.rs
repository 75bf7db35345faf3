//! 構成切り替えモジュール
//!
//! 切り替えは以下の順で1回ずつ実行する（リトライはしない）:
//!
//! 1. 対象の解決（名前 / `-` による直前の構成）
//! 2. 対象の存在確認（なければ何も変更せず `NotFound`）
//! 3. 既にアクティブなら終了（履歴も書かず、activate も呼ばない）
//! 4. 履歴の保存（失敗は警告として結果に含め、切り替えは続行）
//! 5. activate（失敗はエラー）
//! 6. 認証情報の同期（要求時のみ。失敗しても切り替えは取り消さない）

use tracing::{debug, info};

use crate::common::error::{GcloudctxError, Result};
use crate::gcloud::{ProfileStore, active_in, find_in};
use crate::history::History;

/// 直前の構成を表す引数
pub const PREVIOUS_TARGET: &str = "-";

/// 切り替え対象
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// 名前で指定
    Named(String),
    /// 直前の構成
    Previous,
}

impl Target {
    /// コマンドライン引数から対象を解釈
    pub fn parse(arg: &str) -> Self {
        if arg == PREVIOUS_TARGET {
            Target::Previous
        } else {
            Target::Named(arg.to_string())
        }
    }
}

/// 切り替えオプション
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SwitchOptions {
    /// 切り替え後に Application Default Credentials を同期する
    pub sync_credentials: bool,
    /// 同期時に借用するサービスアカウント
    pub impersonate: Option<String>,
}

/// 認証情報同期の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// 要求されなかった
    Skipped,
    /// 成功
    Synced,
    /// 失敗（切り替え自体は完了している）
    Failed(String),
}

/// 切り替えの結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwitchOutcome {
    /// 既に対象がアクティブだった
    AlreadyActive { name: String },
    /// 切り替えた
    Switched {
        from: String,
        to: String,
        /// 履歴の保存に失敗した場合の理由（切り替え自体は続行する）
        history_error: Option<String>,
        sync: SyncOutcome,
    },
}

#[cfg(test)]
impl SwitchOutcome {
    /// 切り替え後にアクティブな構成名
    pub fn active_name(&self) -> &str {
        match self {
            SwitchOutcome::AlreadyActive { name } => name,
            SwitchOutcome::Switched { to, .. } => to,
        }
    }
}

/// 構成の切り替えを行う
pub struct Switcher<'a, S: ProfileStore + ?Sized> {
    store: &'a S,
    history: &'a History,
}

impl<'a, S: ProfileStore + ?Sized> Switcher<'a, S> {
    /// 新しい切り替え器を作成
    pub fn new(store: &'a S, history: &'a History) -> Self {
        Self { store, history }
    }

    /// 対象を構成名に解決する
    ///
    /// `Previous` は履歴から読み出す。履歴がなければ何もせずエラーを返す。
    pub fn resolve(&self, target: &Target) -> Result<String> {
        match target {
            Target::Named(name) => Ok(name.clone()),
            Target::Previous => self.history.get_previous(),
        }
    }

    /// 対象に切り替える
    pub fn switch(&self, target: &Target, options: &SwitchOptions) -> Result<SwitchOutcome> {
        let name = self.resolve(target)?;
        self.switch_to(&name, options)
    }

    /// 名前で指定した構成に切り替える
    pub fn switch_to(&self, name: &str, options: &SwitchOptions) -> Result<SwitchOutcome> {
        let profiles = self.store.list()?;

        if find_in(&profiles, name).is_none() {
            return Err(GcloudctxError::not_found(format!(
                "configuration {:?} not found",
                name
            )));
        }

        let current = active_in(&profiles)
            .ok_or_else(|| GcloudctxError::not_found("no active configuration found"))?;

        if current.name == name {
            debug!("Already on configuration {:?}", name);
            return Ok(SwitchOutcome::AlreadyActive {
                name: name.to_string(),
            });
        }

        // activate が失敗しても手動で戻れるよう、先に履歴を書く
        let history_error = match self.history.save_previous(&current.name) {
            Ok(()) => None,
            Err(e) => {
                debug!("Failed to save history before switching to {:?}: {}", name, e);
                Some(e.to_string())
            }
        };

        self.store.activate(name)?;
        info!("Switched configuration {:?} -> {:?}", current.name, name);

        let sync = if options.sync_credentials {
            match self.store.sync_credentials(options.impersonate.as_deref()) {
                Ok(()) => SyncOutcome::Synced,
                Err(e) => {
                    debug!("ADC sync failed after switching to {:?}: {}", name, e);
                    SyncOutcome::Failed(e.to_string())
                }
            }
        } else {
            SyncOutcome::Skipped
        };

        Ok(SwitchOutcome::Switched {
            from: current.name.clone(),
            to: name.to_string(),
            history_error,
            sync,
        })
    }
}
