//! Encryption envelope for the persisted registry.
//!
//! The registry is sealed with authenticated encryption so any corruption,
//! truncation or wrong key makes `open` fail instead of returning garbage.
//!
//! ## Backends
//!
//! - **XChaCha20-Poly1305** (default): 32-byte symmetric key, random
//!   24-byte nonce per seal.
//! - **age**: X25519 identity; the registry is encrypted to the identity's
//!   own recipient and stored ASCII-armored.
//!
//! The envelope keeps no key state. Every call is handed the key it needs.

use tracing::debug;

use crate::error::Result;

mod age;
mod key;
mod xchacha;

pub use self::age::Age;
pub use key::{CipherKind, EncryptionKey};
pub use xchacha::{SymmetricKey, XChaCha, KEY_LEN};

/// Authenticated encryption backend.
pub trait Cipher {
    /// Key material this backend seals and opens with.
    type Key;

    /// Backend name for display/config.
    fn name(&self) -> &'static str;

    /// Generate a fresh, independent key.
    fn generate_key(&self) -> Self::Key;

    /// Encrypt `plaintext` under `key`.
    ///
    /// # Errors
    ///
    /// Returns `CipherError::Encryption` if the backend fails.
    fn seal(&self, plaintext: &[u8], key: &Self::Key) -> Result<Vec<u8>>;

    /// Decrypt and authenticate `sealed` under `key`.
    ///
    /// # Errors
    ///
    /// Returns `CipherError::Decryption` for a wrong key, a corrupted or
    /// truncated artifact, or anything that is not an artifact at all.
    /// No plaintext is returned in that case.
    fn open(&self, sealed: &[u8], key: &Self::Key) -> Result<Vec<u8>>;
}

/// Generate a new key of the given kind.
pub fn generate_key(kind: CipherKind) -> EncryptionKey {
    match kind {
        CipherKind::XChaCha20Poly1305 => EncryptionKey::XChaCha(XChaCha.generate_key()),
        CipherKind::Age => EncryptionKey::Age(Box::new(Age.generate_key())),
    }
}

/// Seal `plaintext` with the backend matching `key`.
///
/// # Errors
///
/// Returns `CipherError::Encryption` if encryption fails.
pub fn seal(plaintext: &[u8], key: &EncryptionKey) -> Result<Vec<u8>> {
    match key {
        EncryptionKey::XChaCha(k) => {
            debug!(cipher = XChaCha.name(), "sealing registry");
            XChaCha.seal(plaintext, k)
        }
        EncryptionKey::Age(identity) => {
            debug!(cipher = Age.name(), "sealing registry");
            Age.seal(plaintext, identity)
        }
    }
}

/// Open an artifact sealed with `key`.
///
/// # Errors
///
/// Returns `CipherError::Decryption` on any authentication failure.
pub fn open(sealed: &[u8], key: &EncryptionKey) -> Result<Vec<u8>> {
    match key {
        EncryptionKey::XChaCha(k) => {
            debug!(cipher = XChaCha.name(), "opening registry");
            XChaCha.open(sealed, k)
        }
        EncryptionKey::Age(identity) => {
            debug!(cipher = Age.name(), "opening registry");
            Age.open(sealed, identity)
        }
    }
}
