//! Source discovery and loading.
//!
//! A source is a YAML, JSON, TOML or INI document in the target directory
//! whose name marks it as holding secrets. Each one must parse to a
//! top-level mapping.

mod ini;

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::core::codec;
use crate::core::config::ScanConfig;
use crate::core::merge::Source;
use crate::core::value::{Mapping, SecretValue};
use crate::error::{Result, SourceError};

/// Document formats the loader understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Yaml,
    Json,
    Toml,
    Ini,
}

impl Format {
    /// Pick the format from the file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "yaml" | "yml" => Some(Self::Yaml),
            "json" => Some(Self::Json),
            "toml" => Some(Self::Toml),
            "ini" => Some(Self::Ini),
            _ => None,
        }
    }
}

/// Find source files directly inside `dir`.
///
/// Results are sorted by file name.
///
/// # Errors
///
/// Returns `SourceError::Read` if the directory cannot be listed.
pub fn discover(dir: &Path, scan: &ScanConfig) -> Result<Vec<PathBuf>> {
    let read_err = |source: std::io::Error| SourceError::Read {
        path: dir.to_path_buf(),
        source,
    };

    let mut found = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(read_err)? {
        let entry = entry.map_err(read_err)?;
        if !entry.file_type().map_err(read_err)?.is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().to_string();
        if is_source_name(&name, scan) {
            found.push(entry.path());
        }
    }

    found.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    debug!(count = found.len(), dir = %dir.display(), "discovered sources");
    Ok(found)
}

fn is_source_name(name: &str, scan: &ScanConfig) -> bool {
    let lower = name.to_lowercase();
    scan.keywords.iter().any(|k| lower.contains(&k.to_lowercase()))
        && scan.extensions.iter().any(|ext| name.ends_with(ext.as_str()))
}

/// Read and parse one source file.
///
/// The source id is the file name.
///
/// # Errors
///
/// Returns `SourceError::Unsupported` for an unknown extension,
/// `SourceError::Read` or `SourceError::Parse` when the file cannot be
/// read or parsed, and `SourceError::NotAMapping` when the document is
/// not a mapping at the top level.
pub fn load(path: &Path) -> Result<Source> {
    let format = Format::from_path(path).ok_or_else(|| SourceError::Unsupported {
        path: path.to_path_buf(),
    })?;
    let text = std::fs::read_to_string(path).map_err(|source| SourceError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let entries = parse(&text, format, path)?;
    let id = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string());

    debug!(source = %id, ?format, entries = entries.len(), "loaded source");
    Ok(Source::new(id, entries))
}

/// Parse document text in the given format.
///
/// `path` is only used in error messages.
///
/// # Errors
///
/// Returns `SourceError::Parse` or `SourceError::NotAMapping`.
pub fn parse(text: &str, format: Format, path: &Path) -> Result<Mapping> {
    let parse_err = |reason: String| SourceError::Parse {
        path: path.to_path_buf(),
        reason,
    };

    let value = match format {
        Format::Yaml => {
            let doc: serde_yaml::Value =
                serde_yaml::from_str(text).map_err(|e| parse_err(e.to_string()))?;
            from_yaml(doc)
        }
        Format::Json => {
            let doc: serde_json::Value =
                serde_json::from_str(text).map_err(|e| parse_err(e.to_string()))?;
            SecretValue::from(doc)
        }
        Format::Toml => {
            let doc: toml::Table = toml::from_str(text).map_err(|e| parse_err(e.to_string()))?;
            from_toml(toml::Value::Table(doc))
        }
        Format::Ini => {
            let doc = ini::parse(text)
                .map_err(|(line, reason)| parse_err(format!("line {}: {}", line, reason)))?;
            SecretValue::Mapping(doc)
        }
    };

    match value {
        SecretValue::Mapping(m) => Ok(m),
        SecretValue::Null => {
            warn!(path = %path.display(), "source is empty");
            Ok(Mapping::new())
        }
        _ => Err(SourceError::NotAMapping {
            path: path.to_path_buf(),
        }
        .into()),
    }
}

fn from_yaml(value: serde_yaml::Value) -> SecretValue {
    use serde_yaml::Value;

    match value {
        Value::Null => SecretValue::Null,
        Value::Bool(b) => SecretValue::Bool(b),
        Value::Number(n) => match (n.as_i64(), n.as_f64()) {
            (Some(i), _) => SecretValue::Integer(i),
            (None, Some(f)) if n.is_f64() => SecretValue::Float(f),
            _ => SecretValue::Text(n.to_string()),
        },
        Value::String(s) => SecretValue::Text(s),
        Value::Sequence(items) => SecretValue::List(items.into_iter().map(from_yaml).collect()),
        Value::Mapping(map) => SecretValue::Mapping(
            map.into_iter()
                .map(|(k, v)| (yaml_key(k), from_yaml(v)))
                .collect(),
        ),
        Value::Tagged(tagged) => from_yaml(tagged.value),
    }
}

// Non-string keys use the same text form the registry would write.
fn yaml_key(key: serde_yaml::Value) -> String {
    match from_yaml(key) {
        SecretValue::Text(s) => s,
        other => codec::encode(&other),
    }
}

fn from_toml(value: toml::Value) -> SecretValue {
    use toml::Value;

    match value {
        Value::String(s) => SecretValue::Text(s),
        Value::Integer(i) => SecretValue::Integer(i),
        Value::Float(f) => SecretValue::Float(f),
        Value::Boolean(b) => SecretValue::Bool(b),
        Value::Datetime(dt) => SecretValue::Text(dt.to_string()),
        Value::Array(items) => SecretValue::List(items.into_iter().map(from_toml).collect()),
        Value::Table(table) => SecretValue::Mapping(
            table
                .into_iter()
                .map(|(k, v)| (k, from_toml(v)))
                .collect(),
        ),
    }
}
