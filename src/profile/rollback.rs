//! 複数ステップ操作の実行と補償処理
//!
//! 各ステップは成功時に補償処理（取り消し操作）を登録する。途中のステップが
//! 失敗した場合は、登録済みの補償処理を逆順に1回ずつ実行する。

use tracing::{debug, warn};

use crate::common::error::{GcloudctxError, Result};
use crate::gcloud::{ProfileStore, PropertyKey};

/// ストアに対する1ステップ
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// 空の構成を作成
    Create(String),
    /// プロパティを設定
    SetProperty {
        profile: String,
        key: PropertyKey,
        value: String,
    },
    /// 構成をアクティブにする
    Activate(String),
}

/// 補償処理
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Compensation {
    /// 作成した構成を削除
    Delete(String),
}

impl Step {
    /// ステップ成功後に登録する補償処理
    ///
    /// プロパティは構成ごと削除されるため個別の取り消しは不要。
    /// activate は直後のステップがないため取り消さない。
    pub fn compensation(&self) -> Option<Compensation> {
        match self {
            Step::Create(name) => Some(Compensation::Delete(name.clone())),
            Step::SetProperty { .. } | Step::Activate(_) => None,
        }
    }

    fn apply<S: ProfileStore + ?Sized>(&self, store: &S) -> Result<()> {
        match self {
            Step::Create(name) => store.create(name),
            Step::SetProperty {
                profile,
                key,
                value,
            } => store
                .set_property(profile, *key, value)
                .map_err(|e| e.context(format!("failed to set {} property", key))),
            Step::Activate(name) => store.activate(name),
        }
    }
}

impl Compensation {
    fn apply<S: ProfileStore + ?Sized>(&self, store: &S) -> Result<()> {
        match self {
            Compensation::Delete(name) => store.delete(name).map_err(|e| {
                GcloudctxError::other(format!("failed to cleanup configuration {:?}: {}", name, e))
            }),
        }
    }
}

/// ステップ失敗の情報
#[derive(Debug)]
pub struct StepFailure {
    /// 失敗したステップのエラー
    pub error: GcloudctxError,
    /// 失敗した補償処理のメッセージ
    pub cleanup_errors: Vec<String>,
}

impl StepFailure {
    /// 補償処理の失敗を付加したエラーに変換
    pub fn into_error(self) -> GcloudctxError {
        if self.cleanup_errors.is_empty() {
            self.error
        } else {
            self.error
                .with_cleanup_failure(self.cleanup_errors.join("; "))
        }
    }

    /// 補償処理の失敗は警告ログに留め、元のエラーを返す
    pub fn into_original(self) -> GcloudctxError {
        for cleanup in &self.cleanup_errors {
            warn!("{}", cleanup);
        }
        self.error
    }
}

/// 補償処理付きでステップを順に実行するトランザクション
pub struct Transaction<'a, S: ProfileStore + ?Sized> {
    store: &'a S,
    undo: Vec<Compensation>,
}

impl<'a, S: ProfileStore + ?Sized> Transaction<'a, S> {
    /// 新しいトランザクションを開始
    pub fn new(store: &'a S) -> Self {
        Self {
            store,
            undo: Vec::new(),
        }
    }

    /// 1ステップ実行し、成功したら補償処理を登録する
    pub fn run(&mut self, step: Step) -> Result<()> {
        debug!("Applying step {:?}", step);
        step.apply(self.store)?;
        if let Some(compensation) = step.compensation() {
            self.undo.push(compensation);
        }
        Ok(())
    }

    /// ステップを順に実行し、失敗したら補償処理を行う
    pub fn run_all(
        mut self,
        steps: impl IntoIterator<Item = Step>,
    ) -> std::result::Result<(), StepFailure> {
        for step in steps {
            if let Err(error) = self.run(step) {
                let cleanup_errors = self.rollback();
                return Err(StepFailure {
                    error,
                    cleanup_errors,
                });
            }
        }
        Ok(())
    }

    /// 登録済みの補償処理を逆順に実行し、失敗したもののメッセージを返す
    pub fn rollback(self) -> Vec<String> {
        let mut failures = Vec::new();
        for compensation in self.undo.into_iter().rev() {
            debug!("Compensating with {:?}", compensation);
            if let Err(e) = compensation.apply(self.store) {
                failures.push(e.to_string());
            }
        }
        failures
    }

    /// 登録済みの補償処理
    #[cfg(test)]
    pub fn pending(&self) -> &[Compensation] {
        &self.undo
    }
}
