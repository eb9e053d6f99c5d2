//! Port definitions (interfaces)
//!
//! Ports define the boundaries between the project engine and external systems.
//! Each port is a trait that can be implemented by adapters in the infrastructure layer.

mod credential_cipher;
mod document_codec;
mod document_loader;
mod file_system;
mod save_interaction;
mod script_engine;

pub use credential_cipher::{CipherError, CipherOutput, CredentialCipher, TRIPLE_DES};
pub use document_codec::{CodecError, DocumentCodec};
pub use document_loader::{DocumentLoader, LoaderError, ProjectSource};
pub use file_system::{FileSystem, FileSystemError};
pub use save_interaction::{NonInteractive, SaveInteraction};
pub use script_engine::{
    ScriptBindings, ScriptContext, ScriptEngine, ScriptEngineFactory, ScriptLog,
};
