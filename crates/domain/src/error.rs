//! Domain error types

use thiserror::Error;

/// Domain-level errors raised while validating project content.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The interface `type` label has no registered factory.
    #[error("unsupported interface type: {0}")]
    UnsupportedInterfaceType(String),

    /// An entity name is empty.
    #[error("invalid name: {0}")]
    InvalidName(String),

    /// An identifier is invalid or empty.
    #[error("invalid identifier: {0}")]
    InvalidIdentifier(String),
}

/// Result type alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;

/// Rejects blank entity names.
///
/// # Errors
///
/// Returns [`DomainError::InvalidName`] if `name` is empty or whitespace.
pub fn validate_name(name: &str) -> DomainResult<&str> {
    if name.trim().is_empty() {
        return Err(DomainError::InvalidName(name.to_string()));
    }
    Ok(name)
}

/// Rejects blank identifiers.
///
/// # Errors
///
/// Returns [`DomainError::InvalidIdentifier`] if `id` is empty or whitespace.
pub fn validate_id(id: &str) -> DomainResult<&str> {
    if id.trim().is_empty() {
        return Err(DomainError::InvalidIdentifier(id.to_string()));
    }
    Ok(id)
}
