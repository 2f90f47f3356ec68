//! XChaCha20-Poly1305 backend.
//!
//! Artifact layout: `version || nonce (24) || ciphertext || tag (16)`.
//! The version byte is bound as associated data.

use chacha20poly1305::aead::{Aead, AeadCore, KeyInit, OsRng, Payload};
use chacha20poly1305::{Key, XChaCha20Poly1305, XNonce};
use tracing::trace;
use zeroize::Zeroizing;

use super::Cipher;
use crate::error::{CipherError, KeyError, Result};

/// Symmetric key length in bytes.
pub const KEY_LEN: usize = 32;

const VERSION: u8 = 0x01;
const NONCE_LEN: usize = 24;
const TAG_LEN: usize = 16;

/// 32-byte symmetric key, zeroized on drop.
#[derive(Clone)]
pub struct SymmetricKey(Zeroizing<[u8; KEY_LEN]>);

impl SymmetricKey {
    /// Build a key from raw bytes.
    ///
    /// # Errors
    ///
    /// Returns `KeyError::InvalidFormat` unless exactly `KEY_LEN` bytes are given.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != KEY_LEN {
            return Err(KeyError::InvalidFormat(format!(
                "expected {} key bytes, got {}",
                KEY_LEN,
                bytes.len()
            ))
            .into());
        }
        let mut key = Zeroizing::new([0u8; KEY_LEN]);
        key.copy_from_slice(bytes);
        Ok(Self(key))
    }

    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }
}

impl std::fmt::Debug for SymmetricKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SymmetricKey(<redacted>)")
    }
}

/// XChaCha20-Poly1305 authenticated encryption.
pub struct XChaCha;

impl Cipher for XChaCha {
    type Key = SymmetricKey;

    fn name(&self) -> &'static str {
        "xchacha20poly1305"
    }

    fn generate_key(&self) -> SymmetricKey {
        let generated = XChaCha20Poly1305::generate_key(&mut OsRng);
        let mut key = Zeroizing::new([0u8; KEY_LEN]);
        key.copy_from_slice(&generated);
        SymmetricKey(key)
    }

    fn seal(&self, plaintext: &[u8], key: &SymmetricKey) -> Result<Vec<u8>> {
        trace!(plaintext_len = plaintext.len(), "sealing");

        let cipher = XChaCha20Poly1305::new(Key::from_slice(key.as_bytes()));
        let nonce = XChaCha20Poly1305::generate_nonce(&mut OsRng);
        let ciphertext = cipher
            .encrypt(
                &nonce,
                Payload {
                    msg: plaintext,
                    aad: &[VERSION],
                },
            )
            .map_err(|e| CipherError::Encryption(format!("{}", e)))?;

        let mut sealed = Vec::with_capacity(1 + NONCE_LEN + ciphertext.len());
        sealed.push(VERSION);
        sealed.extend_from_slice(&nonce);
        sealed.extend_from_slice(&ciphertext);

        trace!(sealed_len = sealed.len(), "sealed");
        Ok(sealed)
    }

    fn open(&self, sealed: &[u8], key: &SymmetricKey) -> Result<Vec<u8>> {
        trace!(sealed_len = sealed.len(), "opening");

        if sealed.len() < 1 + NONCE_LEN + TAG_LEN {
            return Err(CipherError::Decryption("artifact is truncated".to_string()).into());
        }
        let (version, rest) = sealed.split_at(1);
        if version[0] != VERSION {
            return Err(CipherError::Decryption(format!(
                "unsupported artifact version {:#04x}",
                version[0]
            ))
            .into());
        }
        let (nonce, ciphertext) = rest.split_at(NONCE_LEN);

        let cipher = XChaCha20Poly1305::new(Key::from_slice(key.as_bytes()));
        let plaintext = cipher
            .decrypt(
                XNonce::from_slice(nonce),
                Payload {
                    msg: ciphertext,
                    aad: &[VERSION],
                },
            )
            .map_err(|_| {
                CipherError::Decryption(
                    "authentication failed (wrong key or corrupted artifact)".to_string(),
                )
            })?;

        trace!(plaintext_len = plaintext.len(), "opened");
        Ok(plaintext)
    }
}
