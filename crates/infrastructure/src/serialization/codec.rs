//! JSON codec for project documents.

use apiforge_application::ports::{CodecError, DocumentCodec};
use apiforge_domain::persistence::ProjectDocument;

use super::json::{SerializationError, from_json_bytes, to_json_compact_bytes, to_json_stable_bytes};

/// Reads and writes project documents as JSON.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonDocumentCodec;

impl JsonDocumentCodec {
    /// Creates a new codec.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl DocumentCodec for JsonDocumentCodec {
    fn parse(&self, bytes: &[u8]) -> Result<ProjectDocument, CodecError> {
        let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
        from_json_bytes(bytes).map_err(|err| match err {
            SerializationError::Deserialize(e) | SerializationError::Serialize(e) => {
                CodecError::Parse {
                    line: e.line(),
                    column: e.column(),
                    message: e.to_string(),
                }
            }
            SerializationError::Utf8(e) => CodecError::Parse {
                line: 0,
                column: 0,
                message: e.to_string(),
            },
        })
    }

    fn serialize(&self, document: &ProjectDocument, pretty: bool) -> Result<Vec<u8>, CodecError> {
        let bytes = if pretty {
            to_json_stable_bytes(document)
        } else {
            to_json_compact_bytes(document)
        };
        bytes.map_err(|e| CodecError::Serialize(e.to_string()))
    }
}
