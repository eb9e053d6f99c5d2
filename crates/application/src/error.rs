//! Application error types

use std::path::PathBuf;

use apiforge_domain::DomainError;
use thiserror::Error;

use crate::ports::{CipherError, CodecError, FileSystemError, LoaderError};

/// Why loading a project failed.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The source is neither an existing local file nor a usable URL.
    #[error("invalid project source: {0}")]
    InvalidSource(String),

    /// Fetching the document bytes failed.
    #[error("failed to read project: {0}")]
    Io(#[from] LoaderError),

    /// The document is malformed.
    #[error("malformed project document at line {line}, column {column}: {message}")]
    Parse {
        /// 1-based line, 0 when unknown.
        line: usize,
        /// 1-based column, 0 when unknown.
        column: usize,
        /// Parser message.
        message: String,
    },

    /// The shadow password or a credential field could not be decrypted.
    #[error("failed to decrypt credentials: {0}")]
    Decrypt(#[source] CipherError),
}

impl From<CodecError> for LoadError {
    fn from(err: CodecError) -> Self {
        match err {
            CodecError::Parse {
                line,
                column,
                message,
            } => Self::Parse {
                line,
                column,
                message,
            },
            CodecError::Serialize(message) => Self::Parse {
                line: 0,
                column: 0,
                message,
            },
        }
    }
}

/// A failed load.
///
/// The project still exists so callers can inspect its path and name; it is
/// disabled, closed, and has no children.
#[derive(Debug, Error)]
#[error("failed to load project [{}]: {error}", .project.name())]
pub struct LoadFailure {
    /// The disabled project.
    pub project: Box<crate::project::Project>,
    /// What went wrong.
    #[source]
    pub error: LoadError,
}

/// Why saving a project failed.
#[derive(Debug, Error)]
pub enum SaveError {
    /// Sealing the credentials failed. No file was touched.
    #[error("failed to encrypt credentials: {0}")]
    Encrypt(#[source] CipherError),

    /// Writing the destination or backup failed.
    #[error("I/O error while saving: {0}")]
    Io(#[from] FileSystemError),

    /// The document could not be serialized. No file was touched.
    #[error("failed to serialize project: {0}")]
    Serialize(String),
}

/// Why a save stopped without writing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbortReason {
    /// No destination was chosen.
    NoDestination,
    /// The destination is read-only and no alternative was chosen.
    NotWritable,
    /// The destination changed on disk and overwriting was declined.
    ExternalModification,
    /// The project is closed or disabled.
    NotOpen,
}

impl std::fmt::Display for AbortReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::NoDestination => "no destination chosen",
            Self::NotWritable => "destination is not writable",
            Self::ExternalModification => "project file was modified externally",
            Self::NotOpen => "project is not open",
        })
    }
}

/// Result of a save that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// The document was written.
    Saved {
        /// File that was written.
        path: PathBuf,
        /// Number of bytes written.
        bytes: usize,
    },
    /// Nothing to do: closed, disabled or remote project.
    Skipped,
    /// The caller declined to continue.
    Aborted(AbortReason),
}

impl SaveOutcome {
    /// Returns true for `Saved` and `Skipped`.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Saved { .. } | Self::Skipped)
    }
}

/// A listener callback failed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("listener failed: {0}")]
pub struct ListenerError(pub String);

impl ListenerError {
    /// Creates a listener error with the given message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Errors of structural project mutations.
#[derive(Debug, Error)]
pub enum ProjectError {
    /// A sibling with the same name exists.
    #[error("{kind} named [{name}] already exists")]
    DuplicateName {
        /// Entity kind.
        kind: &'static str,
        /// Conflicting name.
        name: String,
    },

    /// The interface type has no factory.
    #[error("unknown interface type: {0}")]
    UnknownInterfaceType(String),

    /// A name or identifier failed validation.
    #[error(transparent)]
    Invalid(#[from] DomainError),

    /// The entity is not part of this project.
    #[error("{kind} [{name}] not found in project")]
    NotFound {
        /// Entity kind.
        kind: &'static str,
        /// Entity name.
        name: String,
    },

    /// The project is disabled or closed.
    #[error("project [{0}] is not open")]
    Disabled(String),

    /// A listener failed while being notified.
    #[error(transparent)]
    Listener(#[from] ListenerError),
}

/// Errors raised by a hook script engine. Logged, never propagated.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ScriptError {
    /// A line could not be parsed.
    #[error("line {line}: {message}")]
    Parse {
        /// 1-based line number.
        line: usize,
        /// What is wrong with it.
        message: String,
    },

    /// An `assert` did not hold.
    #[error("assertion failed: {0}")]
    Assertion(String),

    /// The engine was released.
    #[error("script engine has been released")]
    Released,
}

/// Result type alias for structural mutations.
pub type ProjectResult<T> = Result<T, ProjectError>;
