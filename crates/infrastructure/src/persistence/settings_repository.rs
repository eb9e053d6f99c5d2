//! Persistence preferences storage.
//!
//! Stores the tool-wide persistence settings in the platform-specific config
//! directory:
//! - Linux/macOS: ~/.config/apiforge/settings.json
//! - Windows: %APPDATA%/apiforge/settings.json

use std::path::{Path, PathBuf};

use apiforge_domain::PersistenceSettings;
use tokio::fs;

use crate::serialization::{SerializationError, from_json_bytes, to_json_stable_bytes};

/// Error type for settings operations.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// IO error during file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] SerializationError),

    /// Could not determine config directory.
    #[error("Could not determine config directory")]
    NoConfigDir,
}

/// Repository for persistence settings.
#[derive(Debug, Clone, Default)]
pub struct SettingsRepository {
    config_dir: Option<PathBuf>,
}

impl SettingsRepository {
    /// Creates a repository backed by the user's config directory.
    #[must_use]
    pub fn new() -> Self {
        Self {
            config_dir: dirs::config_dir().map(|p| p.join("apiforge")),
        }
    }

    /// Creates a repository storing settings under `dir`.
    #[must_use]
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            config_dir: Some(dir.into()),
        }
    }

    /// Returns the path where settings are stored, if available.
    #[must_use]
    pub fn settings_path(&self) -> Option<PathBuf> {
        self.config_dir.as_deref().map(settings_file)
    }

    /// Loads the settings.
    ///
    /// Returns default settings if the file doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub async fn load(&self) -> Result<PersistenceSettings, SettingsError> {
        let Some(path) = self.settings_path() else {
            return Ok(PersistenceSettings::default());
        };

        if !fs::try_exists(&path).await? {
            tracing::debug!(path = %path.display(), "No settings file, using defaults");
            return Ok(PersistenceSettings::default());
        }

        let content = fs::read(&path).await?;
        Ok(from_json_bytes(&content)?)
    }

    /// Saves the settings.
    ///
    /// # Errors
    ///
    /// Returns an error if there is no config directory or the write fails.
    pub async fn save(&self, settings: &PersistenceSettings) -> Result<(), SettingsError> {
        let Some(config_dir) = self.config_dir.as_deref() else {
            return Err(SettingsError::NoConfigDir);
        };

        fs::create_dir_all(config_dir).await?;

        let content = to_json_stable_bytes(settings)?;
        fs::write(settings_file(config_dir), content).await?;
        Ok(())
    }
}

fn settings_file(dir: &Path) -> PathBuf {
    dir.join("settings.json")
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn settings_path_is_valid() {
        if let Some(p) = SettingsRepository::new().settings_path() {
            assert!(p.ends_with("apiforge/settings.json"));
        }
    }

    #[tokio::test]
    async fn load_returns_default_when_no_file() {
        let dir = TempDir::new().unwrap();
        let repo = SettingsRepository::in_dir(dir.path());
        assert_eq!(repo.load().await.unwrap(), PersistenceSettings::default());
    }

    #[tokio::test]
    async fn save_then_load() {
        let dir = TempDir::new().unwrap();
        let repo = SettingsRepository::in_dir(dir.path().join("nested"));
        let settings = PersistenceSettings::default()
            .with_backups("backups")
            .with_cache_definitions(false);

        repo.save(&settings).await.unwrap();
        assert_eq!(repo.load().await.unwrap(), settings);
    }

    #[tokio::test]
    async fn missing_fields_fall_back_to_defaults() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("settings.json"), br#"{"create_backup":true}"#).unwrap();

        let settings = SettingsRepository::in_dir(dir.path()).load().await.unwrap();
        assert!(settings.create_backup);
        assert!(settings.cache_definitions);
        assert!(settings.pretty_print);
    }
}
