//! Storage trait definition.

use async_trait::async_trait;

use super::StorageResult;

/// Storage trait for media file operations.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Check if a path exists.
    async fn exists(&self, path: &str) -> StorageResult<bool>;

    /// Read a file's contents.
    async fn read(&self, path: &str) -> StorageResult<Vec<u8>>;

    /// Write data to a file, creating parent directories as needed.
    async fn write(&self, path: &str, data: &[u8]) -> StorageResult<()>;
}
