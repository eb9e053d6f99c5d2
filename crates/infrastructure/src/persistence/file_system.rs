//! Real file system implementation.

use std::path::Path;

use apiforge_application::ports::{FileSystem, FileSystemError};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::fs;

/// Real file system implementation using `tokio::fs`.
#[derive(Debug, Clone, Default)]
pub struct TokioFileSystem;

impl TokioFileSystem {
    /// Creates a new `TokioFileSystem`.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

fn map_io_error(path: &Path, e: std::io::Error) -> FileSystemError {
    match e.kind() {
        std::io::ErrorKind::NotFound => FileSystemError::NotFound(path.to_path_buf()),
        std::io::ErrorKind::PermissionDenied => {
            FileSystemError::PermissionDenied(path.to_path_buf())
        }
        _ => FileSystemError::Io(e),
    }
}

#[async_trait]
impl FileSystem for TokioFileSystem {
    async fn read_file(&self, path: &Path) -> Result<Vec<u8>, FileSystemError> {
        fs::read(path).await.map_err(|e| map_io_error(path, e))
    }

    async fn write_file(&self, path: &Path, contents: &[u8]) -> Result<(), FileSystemError> {
        fs::write(path, contents)
            .await
            .map_err(|e| map_io_error(path, e))
    }

    async fn create_dir_all(&self, path: &Path) -> Result<(), FileSystemError> {
        fs::create_dir_all(path).await.map_err(FileSystemError::Io)
    }

    async fn exists(&self, path: &Path) -> bool {
        fs::metadata(path).await.is_ok()
    }

    async fn is_file(&self, path: &Path) -> bool {
        fs::metadata(path).await.is_ok_and(|m| m.is_file())
    }

    async fn is_writable(&self, path: &Path) -> bool {
        fs::metadata(path)
            .await
            .is_ok_and(|m| m.is_file() && !m.permissions().readonly())
    }

    async fn modified(&self, path: &Path) -> Result<DateTime<Utc>, FileSystemError> {
        let metadata = fs::metadata(path)
            .await
            .map_err(|e| map_io_error(path, e))?;
        if !metadata.is_file() {
            return Err(FileSystemError::NotAFile(path.to_path_buf()));
        }
        Ok(DateTime::<Utc>::from(metadata.modified()?))
    }

    async fn copy_file(&self, from: &Path, to: &Path) -> Result<(), FileSystemError> {
        fs::copy(from, to).await.map_err(|e| map_io_error(from, e))?;
        Ok(())
    }

    async fn rename(&self, from: &Path, to: &Path) -> Result<(), FileSystemError> {
        fs::rename(from, to).await.map_err(FileSystemError::Io)
    }

    async fn remove_file(&self, path: &Path) -> Result<(), FileSystemError> {
        fs::remove_file(path).await.map_err(FileSystemError::Io)
    }
}
