//! secreg - collects secrets from config files into one encrypted registry.
//!
//! # Architecture
//!
//! ```text
//! src/
//! ├── cli/              # Command-line interface
//! │   ├── build         # Scan, merge, seal, write
//! │   ├── keygen        # Create a key file
//! │   ├── show          # Read an artifact back
//! │   ├── completions   # Shell completions
//! │   ├── logging       # Subscriber setup and log rotation
//! │   └── output        # Terminal styling helpers
//! └── core/             # Core library components
//!     ├── value         # SecretValue and ordered Mapping
//!     ├── codec/        # Single-line value encoding
//!     ├── merge         # Source merge with environment lookup
//!     ├── registry      # `key: value` text format
//!     ├── cipher/       # Encryption backends
//!     │   ├── mod       # Cipher trait and dispatch
//!     │   ├── xchacha   # XChaCha20-Poly1305 (default)
//!     │   └── age       # age x25519
//!     ├── source/       # Discovery and YAML/JSON/TOML/INI loading
//!     ├── keyfile       # Key persistence
//!     ├── artifact      # Atomic artifact writes
//!     ├── config        # .secreg.toml and .gitignore upkeep
//!     └── pipeline      # build / read
//! ```
//!
//! # Example
//!
//! ```
//! use secreg::core::merge::{merge, NoEnv, Source};
//! use secreg::core::value::{Mapping, SecretValue};
//!
//! let first: Mapping = [("X", SecretValue::Integer(1))].into_iter().collect();
//! let second: Mapping = [("X", SecretValue::Null)].into_iter().collect();
//!
//! let registry = merge(
//!     vec![Source::new("a.yaml", first), Source::new("b.yaml", second)],
//!     &NoEnv,
//! );
//! assert!(registry.is_empty());
//! ```

pub mod cli;
pub mod core;
pub mod error;
