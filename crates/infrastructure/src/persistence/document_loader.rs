//! Document loader for local files and HTTP(S) URLs.

use std::sync::Arc;

use apiforge_application::ports::{DocumentLoader, FileSystem, LoaderError, ProjectSource};
use async_trait::async_trait;

/// Loads documents through the file system port or `reqwest`.
#[derive(Clone)]
pub struct FileDocumentLoader {
    file_system: Arc<dyn FileSystem>,
    client: reqwest::Client,
}

impl FileDocumentLoader {
    /// Creates a loader reading local files through `file_system`.
    #[must_use]
    pub fn new(file_system: Arc<dyn FileSystem>) -> Self {
        Self {
            file_system,
            client: reqwest::Client::new(),
        }
    }

    /// Uses a preconfigured HTTP client, e.g. with timeouts or a proxy.
    #[must_use]
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    async fn fetch_remote(&self, url: &url::Url) -> Result<Vec<u8>, LoaderError> {
        let transport = |e: reqwest::Error| LoaderError::Transport {
            url: url.to_string(),
            message: e.to_string(),
        };

        let response = self
            .client
            .get(url.as_str())
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(LoaderError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(transport)?;
        Ok(body.to_vec())
    }
}

#[async_trait]
impl DocumentLoader for FileDocumentLoader {
    async fn fetch(&self, source: &ProjectSource) -> Result<Vec<u8>, LoaderError> {
        match source {
            ProjectSource::Local(path) => Ok(self.file_system.read_file(path).await?),
            ProjectSource::Remote(url) => {
                tracing::debug!(url = %url, "Fetching remote project");
                self.fetch_remote(url).await
            }
        }
    }
}

impl std::fmt::Debug for FileDocumentLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileDocumentLoader").finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::persistence::TokioFileSystem;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_reads_local_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("demo-project.json");
        std::fs::write(&path, br#"{"name":"demo"}"#).unwrap();

        let loader = FileDocumentLoader::new(Arc::new(TokioFileSystem::new()));
        let bytes = loader.fetch(&ProjectSource::Local(path)).await.unwrap();
        assert_eq!(bytes, br#"{"name":"demo"}"#);
    }

    #[tokio::test]
    async fn test_missing_local_file() {
        let dir = TempDir::new().unwrap();
        let loader = FileDocumentLoader::new(Arc::new(TokioFileSystem::new()));
        let result = loader
            .fetch(&ProjectSource::Local(dir.path().join("missing.json")))
            .await;
        assert!(matches!(result, Err(LoaderError::FileSystem(_))));
    }
}
