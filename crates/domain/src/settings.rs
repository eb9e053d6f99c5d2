//! Persistence settings.
//!
//! Defines the tool-wide preferences that shape how projects are saved and
//! loaded, and the per-project settings held in memory only.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Tool-wide persistence preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistenceSettings {
    /// Keep cached external definitions inside project files.
    #[serde(default = "default_true")]
    pub cache_definitions: bool,

    /// Copy the previous project file aside before overwriting it.
    #[serde(default)]
    pub create_backup: bool,

    /// Backup folder. Relative folders resolve against the project file's directory.
    #[serde(default)]
    pub backup_folder: String,

    /// Write indented project files.
    #[serde(default = "default_true")]
    pub pretty_print: bool,
}

const fn default_true() -> bool {
    true
}

impl Default for PersistenceSettings {
    fn default() -> Self {
        Self {
            cache_definitions: true,
            create_backup: false,
            backup_folder: String::new(),
            pretty_print: true,
        }
    }
}

impl PersistenceSettings {
    /// Enables backups into the given folder.
    #[must_use]
    pub fn with_backups(mut self, folder: impl Into<String>) -> Self {
        self.create_backup = true;
        self.backup_folder = folder.into();
        self
    }

    /// Sets whether definition caches are kept.
    #[must_use]
    pub const fn with_cache_definitions(mut self, cache: bool) -> Self {
        self.cache_definitions = cache;
        self
    }

    /// Returns the backup file for a project file:
    /// `<backupFolder>/<fileName>.backup`.
    #[must_use]
    pub fn backup_path_for(&self, project_file: &Path) -> PathBuf {
        let folder = Path::new(&self.backup_folder);
        let folder = if folder.is_absolute() {
            folder.to_path_buf()
        } else {
            project_file
                .parent()
                .map_or_else(|| folder.to_path_buf(), |parent| parent.join(folder))
        };

        let file_name = project_file
            .file_name()
            .map_or_else(String::new, |n| n.to_string_lossy().into_owned());
        folder.join(format!("{file_name}.backup"))
    }
}

/// Settings of one open project. Never written to the document in cleartext.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ProjectSettings {
    /// Secret used to encrypt request credentials on save.
    pub shadow_password: Option<String>,
    /// Directory containing the project file.
    pub project_root: Option<PathBuf>,
}

impl ProjectSettings {
    /// Returns the shadow password if it is long enough to enable encryption.
    #[must_use]
    pub fn encryption_password(&self) -> Option<&str> {
        self.shadow_password
            .as_deref()
            .filter(|password| password.chars().count() > 1)
    }
}

impl std::fmt::Debug for ProjectSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProjectSettings")
            .field(
                "shadow_password",
                &self.shadow_password.as_ref().map(|_| "<redacted>"),
            )
            .field("project_root", &self.project_root)
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = PersistenceSettings::default();
        assert!(settings.cache_definitions);
        assert!(!settings.create_backup);
        assert!(settings.pretty_print);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let settings: PersistenceSettings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings, PersistenceSettings::default());
    }

    #[test]
    fn test_relative_backup_folder() {
        let settings = PersistenceSettings::default().with_backups("backup");
        let path = settings.backup_path_for(Path::new("/work/demo-project.json"));
        assert_eq!(path, PathBuf::from("/work/backup/demo-project.json.backup"));
    }

    #[test]
    fn test_empty_backup_folder_is_project_directory() {
        let settings = PersistenceSettings::default().with_backups("");
        let path = settings.backup_path_for(Path::new("/work/demo-project.json"));
        assert_eq!(path, PathBuf::from("/work/demo-project.json.backup"));
    }

    #[test]
    fn test_absolute_backup_folder() {
        let settings = PersistenceSettings::default().with_backups("/var/backups");
        let path = settings.backup_path_for(Path::new("/work/demo-project.json"));
        assert_eq!(path, PathBuf::from("/var/backups/demo-project.json.backup"));
    }

    #[test]
    fn test_single_character_password_disables_encryption() {
        let mut settings = ProjectSettings::default();
        assert!(settings.encryption_password().is_none());
        settings.shadow_password = Some("x".to_string());
        assert!(settings.encryption_password().is_none());
        settings.shadow_password = Some("xy".to_string());
        assert_eq!(settings.encryption_password(), Some("xy"));
    }

    #[test]
    fn test_debug_redacts_password() {
        let settings = ProjectSettings {
            shadow_password: Some("hunter2".to_string()),
            project_root: None,
        };
        assert!(!format!("{settings:?}").contains("hunter2"));
    }
}
