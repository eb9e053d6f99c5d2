//! `ApiForge` Domain - Project model types
//!
//! This crate defines the persisted project document, the live entity
//! handles built from it, and the small value types shared by the
//! persistence engine. All types here are pure Rust with no I/O dependencies.

pub mod error;
pub mod exchange;
pub mod id;
pub mod model;
pub mod persistence;
pub mod scripting;
pub mod settings;

pub use error::{DomainError, DomainResult, validate_id, validate_name};
pub use exchange::{
    Attachment, CapturedResponse, ExchangeSource, Headers, MessageExchangeRecord, RequestItem,
};
pub use id::generate_id;
pub use model::{Interface, InterfaceKind, MockService, ModelItem, TestSuite};
pub use scripting::{HookCommand, LifecycleHook, ProjectView, ScriptOutcome};
pub use settings::{PersistenceSettings, ProjectSettings};
