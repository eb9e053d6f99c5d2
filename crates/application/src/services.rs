//! Collaborators a project is built with.

use std::sync::Arc;

use apiforge_domain::PersistenceSettings;

use crate::ports::{
    CredentialCipher, DocumentCodec, DocumentLoader, FileSystem, NonInteractive, SaveInteraction,
    ScriptEngineFactory, ScriptLog,
};

/// Adapters and settings shared by the projects of one session.
#[derive(Clone)]
pub struct ProjectServices {
    /// Local file access.
    pub file_system: Arc<dyn FileSystem>,
    /// Fetches document bytes from files and URLs.
    pub loader: Arc<dyn DocumentLoader>,
    /// Parses and serializes documents.
    pub codec: Arc<dyn DocumentCodec>,
    /// Credential cipher.
    pub cipher: Arc<dyn CredentialCipher>,
    /// Creates hook script engines.
    pub script_engines: Arc<dyn ScriptEngineFactory>,
    /// Sink for hook log lines.
    pub script_log: Arc<dyn ScriptLog>,
    /// Answers questions raised while saving.
    pub interaction: Arc<dyn SaveInteraction>,
    /// Persistence preferences.
    pub settings: PersistenceSettings,
}

impl ProjectServices {
    /// Bundles the given adapters with default settings and a
    /// non-interactive caller.
    #[must_use]
    pub fn new(
        file_system: Arc<dyn FileSystem>,
        loader: Arc<dyn DocumentLoader>,
        codec: Arc<dyn DocumentCodec>,
        cipher: Arc<dyn CredentialCipher>,
        script_engines: Arc<dyn ScriptEngineFactory>,
        script_log: Arc<dyn ScriptLog>,
    ) -> Self {
        Self {
            file_system,
            loader,
            codec,
            cipher,
            script_engines,
            script_log,
            interaction: Arc::new(NonInteractive),
            settings: PersistenceSettings::default(),
        }
    }

    /// Replaces the save interaction.
    #[must_use]
    pub fn with_interaction(mut self, interaction: Arc<dyn SaveInteraction>) -> Self {
        self.interaction = interaction;
        self
    }

    /// Replaces the persistence settings.
    #[must_use]
    pub fn with_settings(mut self, settings: PersistenceSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Replaces the document codec.
    #[must_use]
    pub fn with_codec(mut self, codec: Arc<dyn DocumentCodec>) -> Self {
        self.codec = codec;
        self
    }
}

impl std::fmt::Debug for ProjectServices {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProjectServices")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}
