//! Credential cipher port.

/// Algorithm label of the triple-DES cipher used for credentials.
pub const TRIPLE_DES: &str = "des3";

/// Output form of an encryption.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CipherOutput {
    /// Raw framed bytes.
    Raw,
    /// Base64 text of the framed bytes.
    Base64,
}

/// Errors raised by a cipher.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum CipherError {
    /// The algorithm label is not supported.
    #[error("unsupported cipher algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// The ciphertext is not correctly framed or encoded.
    #[error("malformed ciphertext: {0}")]
    Malformed(String),

    /// Decryption produced invalid padding: wrong passphrase or corrupt data.
    #[error("bad passphrase or corrupt ciphertext")]
    BadDecrypt,

    /// The plaintext is not valid UTF-8.
    #[error("decrypted content is not valid UTF-8")]
    InvalidUtf8,
}

/// Symmetric passphrase-keyed cipher.
pub trait CredentialCipher: Send + Sync {
    /// Encrypts `plaintext` with `passphrase`.
    ///
    /// # Errors
    ///
    /// Returns an error if the algorithm is unsupported.
    fn encrypt(
        &self,
        algorithm: &str,
        passphrase: &str,
        plaintext: &[u8],
        output: CipherOutput,
    ) -> Result<Vec<u8>, CipherError>;

    /// Decrypts raw framed bytes or base64 text of them.
    ///
    /// # Errors
    ///
    /// Returns an error for unsupported algorithms, malformed input, or a
    /// wrong passphrase.
    fn decrypt(
        &self,
        algorithm: &str,
        passphrase: &str,
        ciphertext: &[u8],
    ) -> Result<Vec<u8>, CipherError>;
}
