//! OpenSSL-compatible triple-DES credential cipher.
//!
//! Ciphertext layout is the one written by `openssl enc -des3`:
//!
//! ```text
//! "Salted__" | salt (8 bytes) | DES-EDE3-CBC(PKCS#7(plaintext))
//! ```
//!
//! Key and IV are derived from the passphrase and salt with
//! `EVP_BytesToKey` over MD5 and a single iteration.

use apiforge_application::ports::{CipherError, CipherOutput, CredentialCipher, TRIPLE_DES};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use cbc::cipher::block_padding::Pkcs7;
use cbc::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use des::TdesEde3;
use md5::{Digest, Md5};

type Encryptor = cbc::Encryptor<TdesEde3>;
type Decryptor = cbc::Decryptor<TdesEde3>;

const MAGIC: &[u8; 8] = b"Salted__";
const SALT_LEN: usize = 8;
const KEY_LEN: usize = 24;
const IV_LEN: usize = 8;
const BLOCK_LEN: usize = 8;

/// Triple-DES cipher producing OpenSSL "salted" envelopes.
#[derive(Debug, Clone, Copy, Default)]
pub struct TripleDesCipher;

impl TripleDesCipher {
    /// Creates a new cipher.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn encrypt_with_salt(passphrase: &str, salt: [u8; SALT_LEN], plaintext: &[u8]) -> Vec<u8> {
        let (key, iv) = derive_key_iv(passphrase.as_bytes(), &salt);
        let body =
            Encryptor::new(&key.into(), &iv.into()).encrypt_padded_vec_mut::<Pkcs7>(plaintext);

        let mut framed = Vec::with_capacity(MAGIC.len() + SALT_LEN + body.len());
        framed.extend_from_slice(MAGIC);
        framed.extend_from_slice(&salt);
        framed.extend_from_slice(&body);
        framed
    }
}

impl CredentialCipher for TripleDesCipher {
    fn encrypt(
        &self,
        algorithm: &str,
        passphrase: &str,
        plaintext: &[u8],
        output: CipherOutput,
    ) -> Result<Vec<u8>, CipherError> {
        ensure_supported(algorithm)?;

        let mut salt = [0u8; SALT_LEN];
        rand::RngCore::fill_bytes(&mut rand::rng(), &mut salt);
        let framed = Self::encrypt_with_salt(passphrase, salt, plaintext);

        Ok(match output {
            CipherOutput::Raw => framed,
            CipherOutput::Base64 => STANDARD.encode(framed).into_bytes(),
        })
    }

    fn decrypt(
        &self,
        algorithm: &str,
        passphrase: &str,
        ciphertext: &[u8],
    ) -> Result<Vec<u8>, CipherError> {
        ensure_supported(algorithm)?;

        let framed = unframe_input(ciphertext)?;
        if framed.len() < MAGIC.len() + SALT_LEN || !framed.starts_with(MAGIC) {
            return Err(CipherError::Malformed("missing salt header".to_string()));
        }

        let (salt, body) = framed[MAGIC.len()..].split_at(SALT_LEN);
        if body.is_empty() || body.len() % BLOCK_LEN != 0 {
            return Err(CipherError::Malformed(format!(
                "ciphertext length {} is not a multiple of the block size",
                body.len()
            )));
        }

        let (key, iv) = derive_key_iv(passphrase.as_bytes(), salt);
        Decryptor::new(&key.into(), &iv.into())
            .decrypt_padded_vec_mut::<Pkcs7>(body)
            .map_err(|_| CipherError::BadDecrypt)
    }
}

fn ensure_supported(algorithm: &str) -> Result<(), CipherError> {
    if algorithm.eq_ignore_ascii_case(TRIPLE_DES) {
        Ok(())
    } else {
        Err(CipherError::UnsupportedAlgorithm(algorithm.to_string()))
    }
}

/// Accepts raw envelopes or base64 text of them.
fn unframe_input(input: &[u8]) -> Result<Vec<u8>, CipherError> {
    if input.starts_with(MAGIC) {
        return Ok(input.to_vec());
    }

    let text: Vec<u8> = input
        .iter()
        .copied()
        .filter(|b| !b.is_ascii_whitespace())
        .collect();
    STANDARD
        .decode(text)
        .map_err(|e| CipherError::Malformed(e.to_string()))
}

/// `EVP_BytesToKey(des-ede3-cbc, md5, salt, passphrase, count = 1)`.
fn derive_key_iv(passphrase: &[u8], salt: &[u8]) -> ([u8; KEY_LEN], [u8; IV_LEN]) {
    let mut material = Vec::with_capacity(KEY_LEN + IV_LEN + 16);
    let mut previous: Vec<u8> = Vec::new();

    while material.len() < KEY_LEN + IV_LEN {
        let mut hasher = Md5::new();
        hasher.update(&previous);
        hasher.update(passphrase);
        hasher.update(salt);
        previous = hasher.finalize().to_vec();
        material.extend_from_slice(&previous);
    }

    let mut key = [0u8; KEY_LEN];
    let mut iv = [0u8; IV_LEN];
    key.copy_from_slice(&material[..KEY_LEN]);
    iv.copy_from_slice(&material[KEY_LEN..KEY_LEN + IV_LEN]);
    (key, iv)
}
