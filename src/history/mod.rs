//! 履歴モジュール
//!
//! 直前にアクティブだった構成名を保存し、`-` による切り戻しを可能にする。
//! 値はホームディレクトリ直下の固定ファイルに1行で保存される。
//! ロックは行わず、最後に書いたプロセスが勝つ。

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::common::error::{GcloudctxError, Result};

/// 履歴ファイル名
pub const HISTORY_FILE_NAME: &str = ".gcloudctx_previous";

/// 履歴トラッカー
#[derive(Debug, Clone)]
pub struct History {
    path: PathBuf,
}

impl History {
    /// ホームディレクトリの履歴ファイルを使うトラッカーを作成
    pub fn new() -> Result<Self> {
        let home = dirs::home_dir()
            .ok_or_else(|| GcloudctxError::config("Could not determine home directory"))?;
        Ok(Self::with_path(home.join(HISTORY_FILE_NAME)))
    }

    /// 任意のパスを使うトラッカーを作成
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// 履歴ファイルのパス
    #[cfg(test)]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 直前の構成名を保存する（既存の内容は切り詰める）
    pub fn save_previous(&self, name: &str) -> Result<()> {
        debug!("Saving previous configuration {:?} to {:?}", name, self.path);
        let mut file = open_private(&self.path)?;
        file.write_all(name.as_bytes())?;
        Ok(())
    }

    /// 直前の構成名を取得する
    ///
    /// ファイルがない場合も、トリム後に空の場合も `NotFound` になる。
    pub fn get_previous(&self) -> Result<String> {
        let data = match fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(GcloudctxError::not_found("no previous configuration found"));
            }
            Err(e) => return Err(e.into()),
        };

        let name = data.trim();
        if name.is_empty() {
            return Err(GcloudctxError::not_found("no previous configuration found"));
        }
        Ok(name.to_string())
    }

    /// 履歴を削除する（存在しなければ何もしない）
    pub fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// 履歴が `name` を指していれば削除する
    ///
    /// 削除した場合は true。履歴がない場合や別の構成を指す場合は何もしない。
    pub fn forget(&self, name: &str) -> Result<bool> {
        match self.get_previous() {
            Ok(previous) if previous == name => {
                debug!("Forgetting previous configuration {:?}", name);
                self.clear()?;
                Ok(true)
            }
            Ok(_) => Ok(false),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(e),
        }
    }
}

/// 所有者のみ読み書きできるファイルを切り詰めて開く
#[cfg(unix)]
fn open_private(path: &Path) -> Result<fs::File> {
    use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

    let file = fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?;
    // 既存ファイルは mode が適用されない
    file.set_permissions(fs::Permissions::from_mode(0o600))?;
    Ok(file)
}

#[cfg(not(unix))]
fn open_private(path: &Path) -> Result<fs::File> {
    Ok(fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)?)
}
