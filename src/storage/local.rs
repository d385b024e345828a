use super::{StorageBackend, StorageItem};
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::warn;
use walkdir::WalkDir;

/// ローカルファイルシステム用のストレージバックエンド
#[derive(Clone, Debug, Default)]
pub struct LocalStorageBackend;

impl LocalStorageBackend {
    pub fn new() -> Self {
        Self
    }

    /// 直下のエントリを同期的に列挙（名前順）
    fn scan_entries(directory: &Path) -> Result<Vec<StorageItem>> {
        if !directory.is_dir() {
            anyhow::bail!("Not a readable directory: {}", directory.display());
        }

        let mut items = Vec::new();
        let walker = WalkDir::new(directory)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name();

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(error) if error.depth() == 0 => {
                    return Err(error)
                        .with_context(|| format!("Failed to read directory: {}", directory.display()));
                }
                Err(error) => {
                    warn!(directory = %directory.display(), %error, "skipping unreadable entry");
                    continue;
                }
            };

            let is_directory = entry.file_type().is_dir();
            let path = entry.path().to_path_buf();
            let extension = if is_directory {
                None
            } else {
                path.extension()
                    .and_then(|e| e.to_str())
                    .map(|e| e.to_string())
            };

            items.push(StorageItem {
                name: entry.file_name().to_string_lossy().to_string(),
                path,
                is_directory,
                extension,
            });
        }

        Ok(items)
    }
}

#[async_trait]
impl StorageBackend for LocalStorageBackend {
    async fn list_items(&self, directory: &Path) -> Result<Vec<StorageItem>> {
        let directory: PathBuf = directory.to_path_buf();
        tokio::task::spawn_blocking(move || Self::scan_entries(&directory))
            .await
            .context("Failed to spawn blocking task for directory listing")?
    }

    async fn list_names(&self, directory: &Path) -> Result<HashSet<String>> {
        let items = self.list_items(directory).await?;
        Ok(items.into_iter().map(|item| item.name).collect())
    }

    async fn ensure_directory(&self, directory: &Path) -> Result<()> {
        tokio::fs::create_dir_all(directory)
            .await
            .with_context(|| format!("Failed to create directory: {}", directory.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_list_items_is_flat_and_sorted() {
        let temp_dir = tempdir().unwrap();
        let temp_path = temp_dir.path();

        std::fs::write(temp_path.join("b.png"), b"dummy").unwrap();
        std::fs::write(temp_path.join("a.jpg"), b"dummy").unwrap();
        std::fs::write(temp_path.join("c.txt"), b"dummy").unwrap();
        let sub_dir = temp_path.join("nested");
        std::fs::create_dir(&sub_dir).unwrap();
        std::fs::write(sub_dir.join("deep.png"), b"dummy").unwrap();

        let backend = LocalStorageBackend::new();
        let items = backend.list_items(temp_path).await.unwrap();

        let names: Vec<_> = items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["a.jpg", "b.png", "c.txt", "nested"]);
        assert!(items.iter().any(|i| i.name == "nested" && i.is_directory));

        let images: Vec<_> = items.iter().filter(|i| backend.is_image_file(i)).collect();
        assert_eq!(images.len(), 2);
    }

    #[tokio::test]
    async fn test_list_items_missing_directory() {
        let backend = LocalStorageBackend::new();
        let result = backend.list_items(Path::new("/nonexistent/source")).await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_list_names() {
        let temp_dir = tempdir().unwrap();
        std::fs::write(temp_dir.path().join("x.png"), b"dummy").unwrap();
        std::fs::write(temp_dir.path().join("y.gif"), b"dummy").unwrap();

        let names = LocalStorageBackend::new()
            .list_names(temp_dir.path())
            .await
            .unwrap();

        assert_eq!(names.len(), 2);
        assert!(names.contains("x.png"));
        assert!(names.contains("y.gif"));
    }

    #[tokio::test]
    async fn test_ensure_directory() {
        let temp_dir = tempdir().unwrap();
        let output = temp_dir.path().join("out").join("nested");

        let backend = LocalStorageBackend::new();
        backend.ensure_directory(&output).await.unwrap();
        assert!(output.is_dir());

        // 既存ディレクトリでも成功する
        backend.ensure_directory(&output).await.unwrap();
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_list_items_keeps_non_utf8_name() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let temp_dir = tempdir().unwrap();
        let raw = OsStr::from_bytes(b"caf\xe9.png");
        std::fs::write(temp_dir.path().join(raw), b"dummy").unwrap();

        let backend = LocalStorageBackend::new();
        let items = backend.list_items(temp_dir.path()).await.unwrap();

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].os_name(), raw);
        assert_eq!(items[0].name, "caf\u{FFFD}.png");
        assert!(backend.is_image_file(&items[0]));
    }
}
