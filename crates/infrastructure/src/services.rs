//! Default adapter wiring.

use std::sync::Arc;

use apiforge_application::ProjectServices;
use apiforge_application::ports::FileSystem;
use apiforge_domain::PersistenceSettings;

use crate::crypto::TripleDesCipher;
use crate::logging::TracingScriptLog;
use crate::persistence::{FileDocumentLoader, TokioFileSystem};
use crate::scripting::HookScriptEngineFactory;
use crate::serialization::JsonDocumentCodec;

/// Builds services backed by the local file system, `reqwest`, JSON files,
/// the triple-DES cipher and the default hook language.
#[must_use]
pub fn default_services(settings: PersistenceSettings) -> ProjectServices {
    let file_system: Arc<dyn FileSystem> = Arc::new(TokioFileSystem::new());
    ProjectServices::new(
        Arc::clone(&file_system),
        Arc::new(FileDocumentLoader::new(file_system)),
        Arc::new(JsonDocumentCodec::new()),
        Arc::new(TripleDesCipher::new()),
        Arc::new(HookScriptEngineFactory::new()),
        Arc::new(TracingScriptLog),
    )
    .with_settings(settings)
}
