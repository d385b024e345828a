use crate::core::ACCEPTED_EXTENSIONS;
use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use std::collections::HashSet;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

pub mod local;

/// ディレクトリ直下のエントリを表す構造体
#[derive(Debug, Clone, PartialEq)]
pub struct StorageItem {
    /// エントリのフルパス
    pub path: PathBuf,
    /// ファイル名（表示用、UTF-8 でない部分は置換文字になる）
    pub name: String,
    /// ディレクトリかどうか
    pub is_directory: bool,
    /// 拡張子（あれば）
    pub extension: Option<String>,
}

impl StorageItem {
    /// 実際のファイル名（パスの最終要素）
    pub fn os_name(&self) -> &OsStr {
        self.path
            .file_name()
            .unwrap_or_else(|| OsStr::new(&self.name))
    }
}

/// ファイルシステム境界のトレイト
#[automock]
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// ディレクトリ直下のエントリを列挙する（再帰しない）
    async fn list_items(&self, directory: &Path) -> Result<Vec<StorageItem>>;

    /// ディレクトリ直下のファイル名集合を取得する
    async fn list_names(&self, directory: &Path) -> Result<HashSet<String>>;

    /// ディレクトリが無ければ作成する
    async fn ensure_directory(&self, directory: &Path) -> Result<()>;

    /// 補正対象の画像ファイルかどうかを判定
    fn is_image_file(&self, item: &StorageItem) -> bool {
        if item.is_directory {
            return false;
        }

        item.extension
            .as_deref()
            .map(|ext| ACCEPTED_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
            .unwrap_or(false)
    }
}

#[async_trait]
impl StorageBackend for Box<dyn StorageBackend> {
    async fn list_items(&self, directory: &Path) -> Result<Vec<StorageItem>> {
        self.as_ref().list_items(directory).await
    }

    async fn list_names(&self, directory: &Path) -> Result<HashSet<String>> {
        self.as_ref().list_names(directory).await
    }

    async fn ensure_directory(&self, directory: &Path) -> Result<()> {
        self.as_ref().ensure_directory(directory).await
    }

    fn is_image_file(&self, item: &StorageItem) -> bool {
        self.as_ref().is_image_file(item)
    }
}
