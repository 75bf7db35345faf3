//! ディレクトリ単位の構成設定
//!
//! ディレクトリに `.gcloudctx` ファイルを置くことで、そのディレクトリ以下で
//! 使う構成を指定する。最も近い祖先ディレクトリのファイルが優先される。

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::common::error::{GcloudctxError, Result};

/// ディレクトリ設定ファイル名
pub const BINDING_FILE_NAME: &str = ".gcloudctx";

/// 見つかったディレクトリ設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    /// 構成名
    pub name: String,
    /// 設定ファイルが見つかったディレクトリ
    pub dir: PathBuf,
}

impl Binding {
    /// 設定ファイルのパス
    pub fn file(&self) -> PathBuf {
        binding_path(&self.dir)
    }
}

/// ディレクトリ内の設定ファイルのパス
pub fn binding_path(dir: &Path) -> PathBuf {
    dir.join(BINDING_FILE_NAME)
}

/// `start_dir` から親方向にたどって設定ファイルを探す
///
/// ルートまで見つからなければ `NotFound`、最も近いファイルが空なら `EmptyBinding`。
pub fn find_binding(start_dir: &Path) -> Result<Binding> {
    for dir in start_dir.ancestors() {
        let path = binding_path(dir);
        let data = match fs::read_to_string(&path) {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => continue,
            Err(e) if path.is_dir() => {
                debug!("Skipping {:?}: {}", path, e);
                continue;
            }
            Err(e) => {
                return Err(GcloudctxError::config(format!(
                    "failed to read {}: {}",
                    path.display(),
                    e
                )));
            }
        };

        let name = data.trim();
        if name.is_empty() {
            return Err(GcloudctxError::empty_binding(path.display().to_string()));
        }
        debug!("Found binding {:?} in {:?}", name, dir);
        return Ok(Binding {
            name: name.to_string(),
            dir: dir.to_path_buf(),
        });
    }

    Err(GcloudctxError::not_found(format!(
        "no {} file found",
        BINDING_FILE_NAME
    )))
}

/// 設定ファイルを探し、見つからなければ `None` を返す
///
/// 設定ファイルがないことはエラーではない。空ファイルなどの不正な設定はエラーのまま返す。
pub fn resolve_binding(start_dir: &Path) -> Result<Option<Binding>> {
    match find_binding(start_dir) {
        Ok(binding) => Ok(Some(binding)),
        Err(e) if e.is_not_found() => Ok(None),
        Err(e) => Err(e),
    }
}

/// ディレクトリに設定ファイルを書き込む（既存の内容は上書き）
pub fn write_binding(dir: &Path, name: &str) -> Result<()> {
    let path = binding_path(dir);
    fs::write(&path, format!("{}\n", name)).map_err(|e| {
        GcloudctxError::config(format!("failed to write {}: {}", path.display(), e))
    })
}

/// ディレクトリの設定ファイルを削除する（存在しなければ何もしない）
pub fn remove_binding(dir: &Path) -> Result<()> {
    let path = binding_path(dir);
    match fs::remove_file(&path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(GcloudctxError::config(format!(
            "failed to remove {}: {}",
            path.display(),
            e
        ))),
    }
}

/// ディレクトリに設定ファイルがあるか
pub fn binding_exists(dir: &Path) -> bool {
    binding_path(dir).is_file()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn nested(root: &Path) -> PathBuf {
        let deep = root.join("x").join("y").join("z");
        fs::create_dir_all(&deep).unwrap();
        deep
    }

    #[test]
    fn test_find_binding_in_start_dir() {
        let root = TempDir::new().unwrap();
        write_binding(root.path(), "dev").unwrap();

        let binding = find_binding(root.path()).unwrap();
        assert_eq!(binding.name, "dev");
        assert_eq!(binding.dir, root.path());
    }

    #[test]
    fn test_find_binding_from_descendants() {
        let root = TempDir::new().unwrap();
        let deep = nested(root.path());
        write_binding(root.path(), "production").unwrap();

        for dir in [deep.clone(), deep.parent().unwrap().to_path_buf()] {
            let binding = find_binding(&dir).unwrap();
            assert_eq!(binding.name, "production");
            assert_eq!(binding.dir, root.path());
        }
    }

    #[test]
    fn test_nearest_binding_shadows_ancestor() {
        let root = TempDir::new().unwrap();
        let deep = nested(root.path());
        write_binding(root.path(), "production").unwrap();
        write_binding(&root.path().join("x"), "staging").unwrap();

        let binding = find_binding(&deep).unwrap();
        assert_eq!(binding.name, "staging");
        assert_eq!(binding.dir, root.path().join("x"));
    }

    #[test]
    fn test_disjoint_tree_is_not_found() {
        let root = TempDir::new().unwrap();
        let bound = root.path().join("bound");
        let other = nested(&root.path().join("other"));
        fs::create_dir_all(&bound).unwrap();
        write_binding(&bound, "dev").unwrap();

        // 祖先に設定ファイルがない限り NotFound（テンポラリ領域の外側にはない前提）
        match find_binding(&other) {
            Err(e) => assert!(e.is_not_found(), "unexpected error: {e:?}"),
            Ok(binding) => assert!(
                !binding.dir.starts_with(root.path()),
                "must not pick up a sibling binding"
            ),
        }
    }

    #[test]
    fn test_empty_binding_is_distinct_from_not_found() {
        let root = TempDir::new().unwrap();
        let deep = nested(root.path());
        write_binding(root.path(), "production").unwrap();
        fs::write(binding_path(&root.path().join("x")), "  \n").unwrap();

        let err = find_binding(&deep).unwrap_err();
        assert!(matches!(err, GcloudctxError::EmptyBinding { .. }));
        assert!(!err.is_not_found());

        // resolve_binding も空ファイルを握りつぶさない
        assert!(resolve_binding(&deep).is_err());
    }

    #[test]
    fn test_binding_content_is_trimmed() {
        let root = TempDir::new().unwrap();
        fs::write(binding_path(root.path()), "\n  my-config \n").unwrap();
        assert_eq!(find_binding(root.path()).unwrap().name, "my-config");
    }

    #[test]
    fn test_write_binding_adds_newline_and_overwrites() {
        let root = TempDir::new().unwrap();
        write_binding(root.path(), "first").unwrap();
        write_binding(root.path(), "second").unwrap();
        assert_eq!(
            fs::read_to_string(binding_path(root.path())).unwrap(),
            "second\n"
        );
    }

    #[test]
    fn test_remove_binding() {
        let root = TempDir::new().unwrap();
        write_binding(root.path(), "dev").unwrap();
        assert!(binding_exists(root.path()));

        remove_binding(root.path()).unwrap();
        assert!(!binding_exists(root.path()));

        // 存在しなくても成功する
        remove_binding(root.path()).unwrap();
    }

    #[test]
    fn test_directory_named_like_binding_is_skipped() {
        let root = TempDir::new().unwrap();
        let child = root.path().join("child");
        fs::create_dir_all(binding_path(&child)).unwrap();
        write_binding(root.path(), "outer").unwrap();

        assert_eq!(find_binding(&child).unwrap().name, "outer");
    }
}
