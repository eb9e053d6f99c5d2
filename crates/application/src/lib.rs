//! `ApiForge` Application - Project engine and ports
//!
//! This crate defines the application layer with:
//! - Port traits (interfaces for file access, loading, codecs, ciphers, scripts)
//! - The listener registry and lifecycle hook host
//! - The persistence controller and the `Project` aggregate
//! - Application-level error handling

pub mod credentials;
pub mod error;
pub mod lifecycle;
pub mod listener;
pub mod persistence;
pub mod ports;
pub mod project;
pub mod services;

pub use error::{
    AbortReason, ListenerError, LoadError, LoadFailure, ProjectError, ProjectResult, SaveError,
    SaveOutcome, ScriptError,
};
pub use lifecycle::LifecycleScriptHost;
pub use listener::{ListenerId, ListenerRegistry, ProjectEvent, ProjectListener};
pub use persistence::{PersistenceController, TOOL_VERSION, suggested_file_name};
pub use project::{HasInterfaces, HasMockServices, HasTestSuites, ListenerSource, Project};
pub use services::ProjectServices;
