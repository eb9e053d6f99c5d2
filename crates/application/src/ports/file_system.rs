//! File system abstraction port.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Error type for file system operations.
#[derive(Debug, thiserror::Error)]
pub enum FileSystemError {
    /// File not found.
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    /// Permission denied.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// Path is not a file.
    #[error("Path is not a file: {0}")]
    NotAFile(PathBuf),

    /// Invalid path.
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Abstraction over the file operations used to persist projects.
///
/// This trait allows mocking file system access in tests.
#[async_trait]
pub trait FileSystem: Send + Sync {
    /// Reads a file's contents as bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read.
    async fn read_file(&self, path: &Path) -> Result<Vec<u8>, FileSystemError>;

    /// Writes bytes to a file, creating it if necessary.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    async fn write_file(&self, path: &Path, contents: &[u8]) -> Result<(), FileSystemError>;

    /// Creates a directory and all parent directories.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    async fn create_dir_all(&self, path: &Path) -> Result<(), FileSystemError>;

    /// Checks if a path exists.
    async fn exists(&self, path: &Path) -> bool;

    /// Checks if a path is a file.
    async fn is_file(&self, path: &Path) -> bool;

    /// Checks if an existing file may be overwritten.
    async fn is_writable(&self, path: &Path) -> bool;

    /// Returns the last modification time of a file.
    ///
    /// # Errors
    ///
    /// Returns an error if the metadata cannot be read.
    async fn modified(&self, path: &Path) -> Result<DateTime<Utc>, FileSystemError>;

    /// Copies a file from source to destination, replacing the destination.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be copied.
    async fn copy_file(&self, from: &Path, to: &Path) -> Result<(), FileSystemError>;

    /// Renames a file, replacing the destination.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be renamed.
    async fn rename(&self, from: &Path, to: &Path) -> Result<(), FileSystemError>;

    /// Removes a file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be removed.
    async fn remove_file(&self, path: &Path) -> Result<(), FileSystemError>;
}
