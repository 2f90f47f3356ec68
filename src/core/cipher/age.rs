//! age backend.
//!
//! The key is an X25519 identity. Sealing encrypts to that identity's own
//! recipient and ASCII-armors the result.

use std::io::{Read, Write};

use ::age::x25519;
use tracing::trace;

use super::Cipher;
use crate::error::{CipherError, Result};

/// age encryption keyed by a single X25519 identity.
pub struct Age;

impl Cipher for Age {
    type Key = x25519::Identity;

    fn name(&self) -> &'static str {
        "age"
    }

    fn generate_key(&self) -> x25519::Identity {
        x25519::Identity::generate()
    }

    fn seal(&self, plaintext: &[u8], identity: &x25519::Identity) -> Result<Vec<u8>> {
        trace!(plaintext_len = plaintext.len(), "encrypting");

        let recipient = identity.to_public();
        let encryptor =
            age::Encryptor::with_recipients(std::iter::once(&recipient as &dyn age::Recipient))
                .map_err(|e| CipherError::Encryption(format!("{}", e)))?;

        let mut encrypted = Vec::new();
        let mut writer = encryptor
            .wrap_output(age::armor::ArmoredWriter::wrap_output(
                &mut encrypted,
                age::armor::Format::AsciiArmor,
            )?)
            .map_err(|e| CipherError::Encryption(format!("{}", e)))?;

        writer.write_all(plaintext)?;
        let armored = writer
            .finish()
            .map_err(|e| CipherError::Encryption(format!("{}", e)))?;
        armored
            .finish()
            .map_err(|e| CipherError::Encryption(format!("armor: {}", e)))?;

        trace!(ciphertext_len = encrypted.len(), "encrypted");
        Ok(encrypted)
    }

    fn open(&self, sealed: &[u8], identity: &x25519::Identity) -> Result<Vec<u8>> {
        trace!(ciphertext_len = sealed.len(), "decrypting");

        let reader = age::armor::ArmoredReader::new(sealed);
        let decryptor = age::Decryptor::new(reader)
            .map_err(|e| CipherError::Decryption(format!("{}", e)))?;

        let mut reader = decryptor
            .decrypt(std::iter::once(identity as &dyn age::Identity))
            .map_err(|e| CipherError::Decryption(format!("{}", e)))?;

        let mut decrypted = Vec::new();
        reader
            .read_to_end(&mut decrypted)
            .map_err(|e| CipherError::Decryption(format!("{}", e)))?;

        trace!(plaintext_len = decrypted.len(), "decrypted");
        Ok(decrypted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_encrypt_decrypt_roundtrip() {
        let identity = Age.generate_key();
        let plaintext = b"api_key: xyz\n";

        let sealed = Age.seal(plaintext, &identity).unwrap();
        let armored = String::from_utf8(sealed.clone()).unwrap();
        assert!(armored.contains("-----BEGIN AGE ENCRYPTED FILE-----"));

        assert_eq!(Age.open(&sealed, &identity).unwrap(), plaintext);
    }

    #[test]
    fn test_encrypt_decrypt_large_payload() {
        let identity = Age.generate_key();
        let plaintext = "A".repeat(100_000);

        let sealed = Age.seal(plaintext.as_bytes(), &identity).unwrap();
        let opened = Age.open(&sealed, &identity).unwrap();
        assert_eq!(opened.len(), 100_000);
    }

    #[test]
    fn test_wrong_identity_fails() {
        let sealed = Age.seal(b"secret", &Age.generate_key()).unwrap();
        let err = Age.open(&sealed, &Age.generate_key()).unwrap_err();
        assert!(matches!(err, Error::Cipher(CipherError::Decryption(_))));
    }

    #[test]
    fn test_truncated_armor_fails() {
        let identity = Age.generate_key();
        let sealed = Age.seal(b"secret", &identity).unwrap();
        let truncated = &sealed[..sealed.len() / 2];
        assert!(Age.open(truncated, &identity).is_err());
    }
}
