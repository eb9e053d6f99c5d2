//! Document loader port.
//!
//! Fetches the raw bytes of a project document from a local file or a
//! remote URL.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use url::Url;

use super::FileSystemError;

/// Where a project document comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectSource {
    /// A file on the local file system.
    Local(PathBuf),
    /// A document served over HTTP(S).
    Remote(Url),
}

impl ProjectSource {
    /// Classifies a path-or-URL string.
    ///
    /// `http`/`https` URLs are remote, `file` URLs and everything else is
    /// treated as a local path. Returns `None` for blank input.
    #[must_use]
    pub fn parse(source: &str) -> Option<Self> {
        let source = source.trim();
        if source.is_empty() {
            return None;
        }

        match Url::parse(source) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => Some(Self::Remote(url)),
            Ok(url) if url.scheme() == "file" => url.to_file_path().ok().map(Self::Local),
            _ => Some(Self::Local(PathBuf::from(source))),
        }
    }

    /// Returns true for remote sources.
    #[must_use]
    pub const fn is_remote(&self) -> bool {
        matches!(self, Self::Remote(_))
    }

    /// Returns the local path, if any.
    #[must_use]
    pub fn local_path(&self) -> Option<&Path> {
        match self {
            Self::Local(path) => Some(path),
            Self::Remote(_) => None,
        }
    }

    /// Returns the last path segment, used as a fallback project name.
    #[must_use]
    pub fn file_name(&self) -> String {
        match self {
            Self::Local(path) => path
                .file_name()
                .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned()),
            Self::Remote(url) => url
                .path_segments()
                .and_then(|mut segments| segments.next_back().map(str::to_string))
                .filter(|segment| !segment.is_empty())
                .unwrap_or_else(|| url.to_string()),
        }
    }
}

impl std::fmt::Display for ProjectSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Local(path) => write!(f, "{}", path.display()),
            Self::Remote(url) => write!(f, "{url}"),
        }
    }
}

/// Errors that can occur while fetching a document.
#[derive(Debug, thiserror::Error)]
pub enum LoaderError {
    /// Local file access failed.
    #[error(transparent)]
    FileSystem(#[from] FileSystemError),

    /// The remote request failed.
    #[error("failed to fetch {url}: {message}")]
    Transport {
        /// Requested URL.
        url: String,
        /// Transport error message.
        message: String,
    },

    /// The server answered with a non-success status.
    #[error("server returned HTTP {status} for {url}")]
    Status {
        /// Requested URL.
        url: String,
        /// HTTP status code.
        status: u16,
    },
}

/// Fetches raw document bytes. No caching.
#[async_trait]
pub trait DocumentLoader: Send + Sync {
    /// Fetches the bytes behind `source`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or the request fails.
    async fn fetch(&self, source: &ProjectSource) -> Result<Vec<u8>, LoaderError>;
}
