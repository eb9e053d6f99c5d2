//! Apiforge Infrastructure - Adapters and implementations
//!
//! This crate provides concrete implementations of the ports
//! defined in the application layer.

pub mod crypto;
pub mod logging;
pub mod persistence;
pub mod scripting;
pub mod serialization;
mod services;

pub use crypto::TripleDesCipher;
pub use logging::{TracingScriptLog, init_tracing};
pub use persistence::{FileDocumentLoader, SettingsError, SettingsRepository, TokioFileSystem};
pub use scripting::{HookScriptEngine, HookScriptEngineFactory, ParseError, parse_script};
pub use serialization::{
    JsonDocumentCodec, SerializationError, from_json_bytes, to_json_compact_bytes, to_json_stable,
    to_json_stable_bytes,
};
pub use services::default_services;
