//! At-rest credential encoding of a project document.
//!
//! The `encryptedContent` field doubles as the signal for how every
//! credential field in the same document is stored. Instead of an implicit
//! "blob present means ciphertext" convention the document carries an
//! explicit tagged union.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// The shadow password encrypted with the project name as passphrase.
///
/// Holds the base64 text exactly as stored in the document. Decoding is
/// deferred to the decryption step so a bad encoding surfaces as a
/// decryption failure rather than a parse failure.
#[derive(Clone, PartialEq, Eq)]
pub struct EncryptedBlob(String);

impl EncryptedBlob {
    /// Wraps raw ciphertext bytes.
    #[must_use]
    pub fn new(bytes: impl AsRef<[u8]>) -> Self {
        Self(STANDARD.encode(bytes))
    }

    /// Wraps base64 text read from a document. Whitespace is dropped.
    #[must_use]
    pub fn from_encoded(encoded: &str) -> Self {
        Self(encoded.split_whitespace().collect())
    }

    /// Returns the stored base64 text.
    #[must_use]
    pub fn encoded(&self) -> &str {
        &self.0
    }

    /// Returns true if the blob holds no text.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Decodes the raw ciphertext.
    ///
    /// # Errors
    ///
    /// Returns the base64 error if the stored text is not valid base64.
    pub fn decode(&self) -> Result<Vec<u8>, base64::DecodeError> {
        STANDARD.decode(&self.0)
    }
}

impl std::fmt::Debug for EncryptedBlob {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "EncryptedBlob({} chars)", self.0.len())
    }
}

/// How credential fields of a document are stored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CredentialEncoding {
    /// Username/password fields are plain text.
    #[default]
    Cleartext,
    /// Username/password fields are ciphertext keyed by the shadow password
    /// held (encrypted) in the blob.
    Ciphertext(EncryptedBlob),
}

impl CredentialEncoding {
    /// Returns true for [`CredentialEncoding::Cleartext`].
    #[must_use]
    pub const fn is_cleartext(&self) -> bool {
        matches!(self, Self::Cleartext)
    }

    /// Returns the blob when credentials are ciphertext.
    #[must_use]
    pub const fn blob(&self) -> Option<&EncryptedBlob> {
        match self {
            Self::Cleartext => None,
            Self::Ciphertext(blob) => Some(blob),
        }
    }
}

impl Serialize for CredentialEncoding {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Cleartext => serializer.serialize_none(),
            Self::Ciphertext(blob) => serializer.serialize_some(blob.encoded()),
        }
    }
}

impl<'de> Deserialize<'de> for CredentialEncoding {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let encoded = Option::<String>::deserialize(deserializer)?;
        let Some(encoded) = encoded.filter(|s| !s.trim().is_empty()) else {
            return Ok(Self::Cleartext);
        };

        Ok(Self::Ciphertext(EncryptedBlob::from_encoded(&encoded)))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    struct Holder {
        #[serde(default, skip_serializing_if = "CredentialEncoding::is_cleartext")]
        encrypted: CredentialEncoding,
    }

    #[test]
    fn test_missing_field_is_cleartext() {
        let holder: Holder = serde_json::from_str("{}").unwrap();
        assert!(holder.encrypted.is_cleartext());
    }

    #[test]
    fn test_empty_string_is_cleartext() {
        let holder: Holder = serde_json::from_str(r#"{"encrypted": ""}"#).unwrap();
        assert!(holder.encrypted.is_cleartext());
    }

    #[test]
    fn test_base64_blob_becomes_ciphertext() {
        let holder: Holder = serde_json::from_str(r#"{"encrypted": "U2Fs\ndGVk"}"#).unwrap();
        let blob = holder.encrypted.blob().expect("should be ciphertext");
        assert_eq!(blob.encoded(), "U2FsdGVk");
        assert_eq!(blob.decode().unwrap(), b"Salted");
    }

    #[test]
    fn test_invalid_base64_is_kept_for_decryption() {
        let holder: Holder = serde_json::from_str(r#"{"encrypted": "***"}"#).unwrap();
        let blob = holder.encrypted.blob().expect("should be ciphertext");
        assert!(blob.decode().is_err());
    }

    #[test]
    fn test_cleartext_is_not_written() {
        let json = serde_json::to_string(&Holder {
            encrypted: CredentialEncoding::Cleartext,
        })
        .unwrap();
        assert_eq!(json, "{}");
    }

    #[test]
    fn test_blob_debug_hides_bytes() {
        let blob = EncryptedBlob::new(vec![1, 2, 3]);
        assert_eq!(format!("{blob:?}"), "EncryptedBlob(4 chars)");
    }
}
