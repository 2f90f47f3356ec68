//! The line-oriented registry format.
//!
//! One entry per line, `<key>: <encoded value>`. Reading splits each line
//! on its first colon, so values may contain colons (URLs, nested
//! literals). A non-empty line without a colon is an error.

use tracing::debug;

use crate::core::codec;
use crate::core::value::{Mapping, SecretValue};
use crate::error::{FormatError, Result};

/// Merged secrets of one run, in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Registry {
    entries: Mapping,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&SecretValue> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: SecretValue) -> Option<SecretValue> {
        self.entries.insert(key, value)
    }

    pub fn remove(&mut self, key: &str) -> Option<SecretValue> {
        self.entries.remove(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SecretValue)> {
        self.entries.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys()
    }

    /// Borrow the entries as a plain mapping.
    pub fn as_mapping(&self) -> &Mapping {
        &self.entries
    }

    pub fn into_mapping(self) -> Mapping {
        self.entries
    }

    /// Render the registry as `key: value` lines.
    ///
    /// # Errors
    ///
    /// Returns `FormatError::InvalidKey` for keys that would not survive a
    /// read back (empty, containing `:` or a line break) and
    /// `FormatError::MultilineValue` for text values spanning lines.
    pub fn render(&self) -> Result<Vec<u8>> {
        let mut out = String::new();
        for (key, value) in self.entries.iter() {
            if key.trim().is_empty() || key.trim() != key || key.contains([':', '\n', '\r']) {
                return Err(FormatError::InvalidKey {
                    key: key.to_string(),
                }
                .into());
            }
            let encoded = codec::encode(value);
            if encoded.contains(['\n', '\r']) {
                return Err(FormatError::MultilineValue {
                    key: key.to_string(),
                }
                .into());
            }
            out.push_str(key);
            out.push_str(": ");
            out.push_str(&encoded);
            out.push('\n');
        }
        debug!(entries = self.entries.len(), bytes = out.len(), "rendered registry");
        Ok(out.into_bytes())
    }

    /// Parse registry text back into values.
    ///
    /// Blank lines are skipped. Keys and raw values are trimmed and each
    /// value goes through `codec::decode`.
    ///
    /// # Errors
    ///
    /// Returns `FormatError::NotUtf8` for non-UTF-8 input and
    /// `FormatError::MissingDelimiter` for a line without a colon.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let text = std::str::from_utf8(bytes).map_err(|_| FormatError::NotUtf8)?;
        let mut registry = Self::new();

        for (i, line) in text.lines().enumerate() {
            if line.is_empty() {
                continue;
            }
            let (key, raw) = line
                .split_once(':')
                .ok_or_else(|| FormatError::MissingDelimiter {
                    line: i + 1,
                    content: line.to_string(),
                })?;
            registry.insert(key.trim(), codec::decode(raw.trim()));
        }

        debug!(entries = registry.len(), "parsed registry");
        Ok(registry)
    }
}

impl From<Mapping> for Registry {
    fn from(entries: Mapping) -> Self {
        Self { entries }
    }
}

impl<K: Into<String>> FromIterator<(K, SecretValue)> for Registry {
    fn from_iter<I: IntoIterator<Item = (K, SecretValue)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl serde::Serialize for Registry {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.entries.serialize(serializer)
    }
}
