//! Two-level credential encryption.
//!
//! At rest, request credentials are encrypted with the project's shadow
//! password, and the shadow password itself is encrypted with the project
//! name. In memory, documents are always cleartext.

use apiforge_domain::persistence::{CredentialEncoding, EncryptedBlob, ProjectDocument};

use crate::ports::{CipherError, CipherOutput, CredentialCipher, TRIPLE_DES};

/// Returns a copy of `document` ready to be written.
///
/// With a shadow password longer than one character every complete
/// credential is encrypted with it and the document carries the encrypted
/// shadow password. Otherwise the copy is cleartext. `document` itself is
/// never modified.
///
/// # Errors
///
/// Returns the first cipher error; no partial copy escapes.
pub fn seal(
    document: &ProjectDocument,
    shadow_password: Option<&str>,
    cipher: &dyn CredentialCipher,
) -> Result<ProjectDocument, CipherError> {
    let mut sealed = document.clone();

    let Some(shadow) = shadow_password.filter(|p| p.chars().count() > 1) else {
        sealed.credential_encoding = CredentialEncoding::Cleartext;
        return Ok(sealed);
    };

    for credentials in sealed.credentials_mut() {
        if let (Some(username), Some(password)) =
            (credentials.username.as_mut(), credentials.password.as_mut())
        {
            *username = encrypt_field(cipher, shadow, username)?;
            *password = encrypt_field(cipher, shadow, password)?;
        }
    }

    let blob = cipher.encrypt(
        TRIPLE_DES,
        &document.name,
        shadow.as_bytes(),
        CipherOutput::Raw,
    )?;
    sealed.credential_encoding = CredentialEncoding::Ciphertext(EncryptedBlob::new(&blob));
    Ok(sealed)
}

/// Decrypts a document read from disk.
///
/// Returns the cleartext document and the recovered shadow password, if the
/// document was encrypted.
///
/// # Errors
///
/// Fails on the first field that cannot be decrypted. The input is consumed
/// so a partially decrypted document is never observable.
pub fn unseal(
    mut document: ProjectDocument,
    cipher: &dyn CredentialCipher,
) -> Result<(ProjectDocument, Option<String>), CipherError> {
    let blob = match std::mem::take(&mut document.credential_encoding) {
        CredentialEncoding::Cleartext => return Ok((document, None)),
        CredentialEncoding::Ciphertext(blob) if blob.is_empty() => return Ok((document, None)),
        CredentialEncoding::Ciphertext(blob) => blob,
    };

    let raw = blob
        .decode()
        .map_err(|e| CipherError::Malformed(format!("encryptedContent: {e}")))?;
    if raw.is_empty() {
        return Ok((document, None));
    }

    let shadow = decrypt_text(cipher, &document.name, &raw)?;

    for credentials in document.credentials_mut() {
        if let (Some(username), Some(password)) =
            (credentials.username.as_mut(), credentials.password.as_mut())
        {
            *username = decrypt_text(cipher, &shadow, username.as_bytes())?;
            *password = decrypt_text(cipher, &shadow, password.as_bytes())?;
        }
    }

    Ok((document, Some(shadow)))
}

fn encrypt_field(
    cipher: &dyn CredentialCipher,
    passphrase: &str,
    value: &str,
) -> Result<String, CipherError> {
    let encoded = cipher.encrypt(TRIPLE_DES, passphrase, value.as_bytes(), CipherOutput::Base64)?;
    String::from_utf8(encoded).map_err(|_| CipherError::InvalidUtf8)
}

fn decrypt_text(
    cipher: &dyn CredentialCipher,
    passphrase: &str,
    ciphertext: &[u8],
) -> Result<String, CipherError> {
    let plain = cipher.decrypt(TRIPLE_DES, passphrase, ciphertext)?;
    String::from_utf8(plain).map_err(|_| CipherError::InvalidUtf8)
}
