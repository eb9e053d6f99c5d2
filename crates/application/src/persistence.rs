//! Load and save pipelines.
//!
//! Loading is committed only when every step succeeded. Saving seals a copy
//! of the document, serializes it into a buffer, and only then replaces the
//! destination through a temporary file, so the previous file survives any
//! failure.

use std::path::{Path, PathBuf};

use apiforge_domain::persistence::ProjectDocument;
use apiforge_domain::PersistenceSettings;
use chrono::{DateTime, Utc};

use crate::credentials;
use crate::error::{AbortReason, LoadError, SaveError};
use crate::ports::{FileSystemError, ProjectSource};
use crate::services::ProjectServices;

/// Version stamped into every saved document.
pub const TOOL_VERSION: &str = env!("CARGO_PKG_VERSION");

/// A document that was fetched, parsed, and decrypted.
#[derive(Debug)]
pub struct LoadedDocument {
    /// Cleartext document.
    pub document: ProjectDocument,
    /// Shadow password recovered from the document.
    pub shadow_password: Option<String>,
    /// Modification time of the local file.
    pub last_modified: Option<DateTime<Utc>>,
}

/// Where a save should go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveTarget {
    /// The project's current file, asking the caller when there is none.
    Current(Option<PathBuf>),
    /// A path picked by the caller.
    Explicit(PathBuf),
}

/// Inputs of one save.
#[derive(Debug)]
pub struct SaveRequest<'a> {
    /// In-memory cleartext document. Never modified.
    pub document: &'a ProjectDocument,
    /// Shadow password used to seal credentials.
    pub shadow_password: Option<&'a str>,
    /// Destination selection.
    pub target: SaveTarget,
    /// Modification time recorded at the last load or save.
    pub last_modified: Option<DateTime<Utc>>,
}

/// Result of a save that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteResult {
    /// The file was replaced.
    Written {
        /// File that was written.
        path: PathBuf,
        /// Number of bytes written.
        bytes: usize,
        /// Modification time of the new file.
        modified: Option<DateTime<Utc>>,
    },
    /// The caller declined to continue.
    Aborted(AbortReason),
}

/// Orchestrates loading and saving of project documents.
#[derive(Debug, Clone)]
pub struct PersistenceController {
    services: ProjectServices,
}

impl PersistenceController {
    /// Creates a controller over the given services.
    #[must_use]
    pub const fn new(services: ProjectServices) -> Self {
        Self { services }
    }

    /// Returns the services.
    #[must_use]
    pub const fn services(&self) -> &ProjectServices {
        &self.services
    }

    /// Returns the persistence settings.
    #[must_use]
    pub const fn settings(&self) -> &PersistenceSettings {
        &self.services.settings
    }

    /// Returns the persistence settings for modification.
    pub fn settings_mut(&mut self) -> &mut PersistenceSettings {
        &mut self.services.settings
    }

    /// Fetches, parses and decrypts a document.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::InvalidSource`] for missing local files,
    /// [`LoadError::Io`] if fetching fails, [`LoadError::Parse`] for
    /// malformed documents and [`LoadError::Decrypt`] if any credential
    /// cannot be decrypted.
    pub async fn load(&self, source: &ProjectSource) -> Result<LoadedDocument, LoadError> {
        let fs = &self.services.file_system;

        if let ProjectSource::Local(path) = source
            && !fs.is_file(path).await
        {
            return Err(LoadError::InvalidSource(path.display().to_string()));
        }

        let bytes = self.services.loader.fetch(source).await?;
        let document = self.services.codec.parse(&bytes)?;

        let (mut document, shadow_password) =
            credentials::unseal(document, self.services.cipher.as_ref()).map_err(|err| {
                tracing::error!(
                    source = %source,
                    error = %err,
                    "Failed to decrypt project credentials"
                );
                LoadError::Decrypt(err)
            })?;

        if !self.services.settings.cache_definitions {
            for interface in document.strip_definition_caches() {
                tracing::info!(interface = %interface, "Removed definition cache");
            }
        }

        let last_modified = match source.local_path() {
            Some(path) => fs.modified(path).await.ok(),
            None => None,
        };

        tracing::info!(
            project = %document.name,
            source = %source,
            bytes = bytes.len(),
            "Loaded project"
        );

        Ok(LoadedDocument {
            document,
            shadow_password,
            last_modified,
        })
    }

    /// Seals, serializes and writes a document.
    ///
    /// # Errors
    ///
    /// Returns [`SaveError::Encrypt`] or [`SaveError::Serialize`] before any
    /// file is touched, and [`SaveError::Io`] if a backup or write fails.
    pub async fn save(&self, request: SaveRequest<'_>) -> Result<WriteResult, SaveError> {
        let fs = &self.services.file_system;
        let interaction = &self.services.interaction;

        let sealed = credentials::seal(
            request.document,
            request.shadow_password,
            self.services.cipher.as_ref(),
        )
        .map_err(|err| {
            tracing::error!(
                project = %request.document.name,
                error = %err,
                "Credentials encrypting error"
            );
            SaveError::Encrypt(err)
        })?;

        let destination = match request.target {
            SaveTarget::Current(Some(path)) | SaveTarget::Explicit(path) => path,
            SaveTarget::Current(None) => match self.choose_destination(&request.document.name).await
            {
                Some(path) => path,
                None => return Ok(WriteResult::Aborted(AbortReason::NoDestination)),
            },
        };

        let Some(destination) = self.ensure_writable(destination).await else {
            return Ok(WriteResult::Aborted(AbortReason::NotWritable));
        };

        if let Some(last_modified) = request.last_modified
            && fs.exists(&destination).await
        {
            let on_disk = fs.modified(&destination).await?;
            if on_disk > last_modified {
                tracing::warn!(
                    path = %destination.display(),
                    "Project file has been modified externally"
                );
                if !interaction.confirm_external_modification(&destination) {
                    return Ok(WriteResult::Aborted(AbortReason::ExternalModification));
                }
            }
        }

        if self.services.settings.create_backup && fs.exists(&destination).await {
            self.backup(&destination).await?;
        }

        let buffer = self.serialize(sealed)?;
        self.write_atomically(&destination, &buffer).await?;

        let modified = fs.modified(&destination).await.ok();
        tracing::info!(
            project = %request.document.name,
            path = %destination.display(),
            bytes = buffer.len(),
            "Saved project"
        );

        Ok(WriteResult::Written {
            path: destination,
            bytes: buffer.len(),
            modified,
        })
    }

    /// Writes the sealed document to the backup location of `current`, or of
    /// `<name>-project.json` when the project was never saved.
    ///
    /// # Errors
    ///
    /// Returns an error if sealing, serialization or the write fails.
    pub async fn save_backup(
        &self,
        document: &ProjectDocument,
        shadow_password: Option<&str>,
        current: Option<&Path>,
    ) -> Result<(PathBuf, usize), SaveError> {
        let project_file = current.map_or_else(
            || PathBuf::from(suggested_file_name(&document.name)),
            Path::to_path_buf,
        );
        let backup = self.services.settings.backup_path_for(&project_file);

        let sealed = credentials::seal(document, shadow_password, self.services.cipher.as_ref())
            .map_err(SaveError::Encrypt)?;
        let buffer = self.serialize(sealed)?;

        self.create_parent(&backup).await?;
        self.write_atomically(&backup, &buffer).await?;

        tracing::info!(
            project = %document.name,
            path = %backup.display(),
            bytes = buffer.len(),
            "Saved project backup"
        );
        Ok((backup, buffer.len()))
    }

    async fn choose_destination(&self, name: &str) -> Option<PathBuf> {
        let suggested = suggested_file_name(name);
        loop {
            let candidate = self.services.interaction.choose_destination(&suggested)?;
            if !self.services.file_system.exists(&candidate).await
                || self.services.interaction.confirm_overwrite(&candidate)
            {
                return Some(candidate);
            }
        }
    }

    async fn ensure_writable(&self, mut destination: PathBuf) -> Option<PathBuf> {
        let fs = &self.services.file_system;
        while fs.exists(&destination).await && !fs.is_writable(&destination).await {
            tracing::warn!(path = %destination.display(), "Project file is not writable");
            destination = self
                .services
                .interaction
                .choose_writable_destination(&destination)?;
        }
        Some(destination)
    }

    async fn backup(&self, destination: &Path) -> Result<PathBuf, SaveError> {
        let backup = self.services.settings.backup_path_for(destination);
        self.create_parent(&backup).await?;
        self.services
            .file_system
            .copy_file(destination, &backup)
            .await?;
        tracing::info!(
            path = %destination.display(),
            backup = %backup.display(),
            "Backed up project file"
        );
        Ok(backup)
    }

    fn serialize(&self, mut sealed: ProjectDocument) -> Result<Vec<u8>, SaveError> {
        sealed.tool_version = Some(TOOL_VERSION.to_string());
        if !self.services.settings.cache_definitions {
            sealed.strip_definition_caches();
        }
        self.services
            .codec
            .serialize(&sealed, self.services.settings.pretty_print)
            .map_err(|err| SaveError::Serialize(err.to_string()))
    }

    async fn create_parent(&self, path: &Path) -> Result<(), FileSystemError> {
        match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => {
                self.services.file_system.create_dir_all(parent).await
            }
            _ => Ok(()),
        }
    }

    async fn write_atomically(&self, destination: &Path, contents: &[u8]) -> Result<(), SaveError> {
        let fs = &self.services.file_system;
        let temporary = temporary_path(destination)?;

        self.create_parent(destination).await?;
        fs.write_file(&temporary, contents).await?;
        if let Err(err) = fs.rename(&temporary, destination).await {
            let _ = fs.remove_file(&temporary).await;
            return Err(err.into());
        }
        Ok(())
    }
}

/// File name suggested for a project that was never saved.
#[must_use]
pub fn suggested_file_name(project_name: &str) -> String {
    format!("{project_name}-project.json")
}

fn temporary_path(destination: &Path) -> Result<PathBuf, FileSystemError> {
    let mut name = destination
        .file_name()
        .ok_or_else(|| FileSystemError::InvalidPath(destination.display().to_string()))?
        .to_os_string();
    name.push(".tmp");
    Ok(destination.with_file_name(name))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn test_suggested_file_name() {
        assert_eq!(suggested_file_name("Petstore"), "Petstore-project.json");
    }

    #[test]
    fn test_temporary_path_is_a_sibling() {
        let path = temporary_path(Path::new("/work/demo-project.json")).unwrap();
        assert_eq!(path, PathBuf::from("/work/demo-project.json.tmp"));
    }

    #[test]
    fn test_temporary_path_needs_a_file_name() {
        assert!(temporary_path(Path::new("/")).is_err());
    }
}
