//! Error types.
//!
//! Each core module has its own error enum; `Error` wraps them so callers
//! can use a single `Result` alias and still match on the specific cause.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error for all secreg operations.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Format(#[from] FormatError),

    #[error(transparent)]
    Cipher(#[from] CipherError),

    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Key(#[from] KeyError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("secret not found: {0}")]
    SecretNotFound(String),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// The registry text could not be produced or read back.
#[derive(Error, Debug)]
pub enum FormatError {
    #[error("line {line}: missing ':' delimiter in {content:?}")]
    MissingDelimiter { line: usize, content: String },

    #[error("registry is not valid UTF-8")]
    NotUtf8,

    #[error("value for '{key}' spans multiple lines")]
    MultilineValue { key: String },

    #[error("invalid registry key {key:?}: keys must be non-empty single-line text without ':'")]
    InvalidKey { key: String },
}

/// Sealing or opening the registry failed.
#[derive(Error, Debug)]
pub enum CipherError {
    #[error("decryption failed: {0}")]
    Decryption(String),

    #[error("encryption failed: {0}")]
    Encryption(String),
}

/// A source document could not be read or turned into a mapping.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {reason}", path.display())]
    Parse { path: PathBuf, reason: String },

    #[error("{} does not contain a top-level mapping", path.display())]
    NotAMapping { path: PathBuf },

    #[error("unsupported source format: {}", path.display())]
    Unsupported { path: PathBuf },
}

/// Key file problems.
#[derive(Error, Debug)]
pub enum KeyError {
    #[error("no encryption key at {}", .0.display())]
    NotFound(PathBuf),

    #[error("encryption key already exists at {}", .0.display())]
    AlreadyExists(PathBuf),

    #[error("invalid key format: {0}")]
    InvalidFormat(String),

    #[error("failed to read key file: {0}")]
    Read(#[source] std::io::Error),

    #[error("failed to write key file: {0}")]
    Write(#[source] std::io::Error),
}

/// Configuration loading and validation errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Read(#[source] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

pub type Result<T> = std::result::Result<T, Error>;
