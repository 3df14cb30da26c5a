//! Local filesystem storage implementation.

use async_trait::async_trait;
use std::path::{Component, Path, PathBuf};
use tokio::fs;

use super::{Storage, StorageError, StorageResult};

/// Local filesystem storage rooted at a base directory.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    /// Base directory for storage.
    base_path: PathBuf,
}

impl LocalStorage {
    /// Create a new local storage instance.
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    /// Resolve a storage path against the base directory.
    ///
    /// Rejects absolute paths and any `..` component so a caller-supplied
    /// name cannot escape the base directory.
    fn full_path(&self, path: &str) -> StorageResult<PathBuf> {
        let relative = Path::new(path.trim_start_matches('/'));

        for component in relative.components() {
            match component {
                Component::Normal(_) => {}
                _ => return Err(StorageError::InvalidPath(path.to_string())),
            }
        }

        Ok(self.base_path.join(relative))
    }
}

#[async_trait]
impl Storage for LocalStorage {
    async fn exists(&self, path: &str) -> StorageResult<bool> {
        let full_path = self.full_path(path)?;
        Ok(full_path.exists())
    }

    async fn read(&self, path: &str) -> StorageResult<Vec<u8>> {
        let full_path = self.full_path(path)?;
        fs::read(&full_path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                StorageError::NotFound(path.to_string())
            } else {
                StorageError::Io(e)
            }
        })
    }

    async fn write(&self, path: &str, data: &[u8]) -> StorageResult<()> {
        let full_path = self.full_path(path)?;
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&full_path, data).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_write_read_roundtrip() {
        let temp = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp.path());

        storage.write("images/photo.png", b"bytes").await.unwrap();
        assert!(storage.exists("images/photo.png").await.unwrap());
        assert_eq!(storage.read("images/photo.png").await.unwrap(), b"bytes");
    }

    #[tokio::test]
    async fn test_read_missing_file() {
        let temp = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp.path());

        assert!(matches!(
            storage.read("nope.png").await,
            Err(StorageError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_rejects_path_traversal() {
        let temp = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp.path());

        assert!(matches!(
            storage.write("../escape.png", b"x").await,
            Err(StorageError::InvalidPath(_))
        ));
    }
}
