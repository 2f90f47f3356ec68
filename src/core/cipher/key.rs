//! Key kinds and their text form.

use std::fmt;
use std::str::FromStr;

use ::age::secrecy::ExposeSecret;
use ::age::x25519;
use base64::engine::general_purpose::URL_SAFE;
use base64::Engine;
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use super::xchacha::SymmetricKey;
use crate::error::{KeyError, Result};

const AGE_PREFIX: &str = "AGE-SECRET-KEY-";

/// Which backend a key belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CipherKind {
    #[default]
    #[serde(rename = "xchacha20poly1305")]
    XChaCha20Poly1305,
    #[serde(rename = "age")]
    Age,
}

impl CipherKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::XChaCha20Poly1305 => "xchacha20poly1305",
            Self::Age => "age",
        }
    }
}

impl fmt::Display for CipherKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CipherKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "xchacha20poly1305" | "xchacha" => Ok(Self::XChaCha20Poly1305),
            "age" => Ok(Self::Age),
            other => Err(format!(
                "unknown cipher '{}' (expected xchacha20poly1305 or age)",
                other
            )),
        }
    }
}

/// Key material for one of the backends.
pub enum EncryptionKey {
    XChaCha(SymmetricKey),
    Age(Box<x25519::Identity>),
}

impl EncryptionKey {
    pub fn kind(&self) -> CipherKind {
        match self {
            Self::XChaCha(_) => CipherKind::XChaCha20Poly1305,
            Self::Age(_) => CipherKind::Age,
        }
    }

    /// Text stored in the key file.
    ///
    /// Symmetric keys are URL-safe base64 of the raw 32 bytes; age keys use
    /// the `AGE-SECRET-KEY-` encoding.
    pub fn to_text(&self) -> Zeroizing<String> {
        match self {
            Self::XChaCha(key) => Zeroizing::new(URL_SAFE.encode(key.as_bytes())),
            Self::Age(identity) => Zeroizing::new(identity.to_string().expose_secret().to_string()),
        }
    }

    /// Parse key file text, detecting the kind from its shape.
    ///
    /// # Errors
    ///
    /// Returns `KeyError::InvalidFormat` when the text is neither form.
    pub fn from_text(text: &str) -> Result<Self> {
        let text = text.trim();
        if text.starts_with(AGE_PREFIX) {
            let identity: x25519::Identity = text
                .parse()
                .map_err(|e: &str| KeyError::InvalidFormat(e.to_string()))?;
            return Ok(Self::Age(Box::new(identity)));
        }

        let bytes = Zeroizing::new(
            URL_SAFE
                .decode(text)
                .map_err(|e| KeyError::InvalidFormat(format!("not base64: {}", e)))?,
        );
        Ok(Self::XChaCha(SymmetricKey::from_bytes(&bytes)?))
    }
}

impl fmt::Debug for EncryptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EncryptionKey({}, <redacted>)", self.kind())
    }
}
