//! Document codec port.

use apiforge_domain::persistence::ProjectDocument;

/// Errors raised while parsing or serializing a document.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum CodecError {
    /// The input is not a valid project document.
    #[error("line {line}, column {column}: {message}")]
    Parse {
        /// 1-based line, 0 when unknown.
        line: usize,
        /// 1-based column, 0 when unknown.
        column: usize,
        /// Parser message.
        message: String,
    },

    /// The document could not be serialized.
    #[error("serialization failed: {0}")]
    Serialize(String),
}

/// Parses and serializes project documents.
pub trait DocumentCodec: Send + Sync {
    /// Parses raw bytes into a document.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Parse`] with the error position if available.
    fn parse(&self, bytes: &[u8]) -> Result<ProjectDocument, CodecError>;

    /// Serializes a document into an in-memory buffer.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Serialize`] if serialization fails.
    fn serialize(&self, document: &ProjectDocument, pretty: bool) -> Result<Vec<u8>, CodecError>;
}
