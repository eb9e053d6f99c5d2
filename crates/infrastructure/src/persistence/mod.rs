//! File system persistence adapters.

mod document_loader;
mod file_system;
mod settings_repository;

pub use document_loader::FileDocumentLoader;
pub use file_system::TokioFileSystem;
pub use settings_repository::{SettingsError, SettingsRepository};
