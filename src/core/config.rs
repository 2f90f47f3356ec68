//! Configuration file management.
//!
//! Reads the optional `.secreg.toml` in the target directory. Every field
//! has a default, so a missing file is the same as an empty one.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::core::cipher::CipherKind;
use crate::core::constants;
use crate::error::{ConfigError, Result};

/// Settings loaded from `.secreg.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub registry: RegistryConfig,
    pub scan: ScanConfig,
    pub logging: LoggingConfig,
}

/// Where and how the registry artifact is written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RegistryConfig {
    pub output: PathBuf,
    pub encrypt: bool,
    pub cipher: CipherKind,
    pub key_file: PathBuf,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            output: PathBuf::from(constants::REGISTRY_FILE),
            encrypt: true,
            cipher: CipherKind::default(),
            key_file: PathBuf::from(constants::KEY_FILE),
        }
    }
}

/// Which files in the target directory count as sources.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScanConfig {
    pub keywords: Vec<String>,
    pub extensions: Vec<String>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            keywords: constants::SCAN_KEYWORDS.iter().map(|s| s.to_string()).collect(),
            extensions: constants::SCAN_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl ScanConfig {
    /// Narrow the scan to a single extension.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if `ext` does not start with a dot.
    pub fn restrict_to(&mut self, ext: &str) -> Result<()> {
        check_extension("file_type", ext)?;
        self.extensions = vec![ext.to_string()];
        Ok(())
    }
}

/// Process log file settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    pub enabled: bool,
    pub file: PathBuf,
    pub max_bytes: u64,
    pub backups: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            file: PathBuf::from(constants::LOG_FILE),
            max_bytes: constants::LOG_MAX_BYTES,
            backups: constants::LOG_BACKUPS,
        }
    }
}

impl Config {
    /// Path of the config file inside `dir`.
    pub fn config_path(dir: &Path) -> PathBuf {
        dir.join(constants::CONFIG_FILE)
    }

    /// Load `.secreg.toml` from `dir`, falling back to defaults.
    ///
    /// Relative paths in the file are resolved against `dir`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Read` or `ConfigError::Parse` for an unreadable
    /// or malformed file, and `ConfigError::InvalidValue` if validation fails.
    pub fn load(dir: &Path) -> Result<Self> {
        let path = Self::config_path(dir);
        let mut config = if path.is_file() {
            debug!(path = %path.display(), "loading config");
            let contents = std::fs::read_to_string(&path).map_err(ConfigError::Read)?;
            toml::from_str(&contents).map_err(ConfigError::Parse)?
        } else {
            debug!("no config file, using defaults");
            Self::default()
        };

        config.resolve_paths(dir);
        config.validate()?;
        Ok(config)
    }

    /// Make relative paths absolute against `dir`.
    pub fn resolve_paths(&mut self, dir: &Path) {
        for path in [
            &mut self.registry.output,
            &mut self.registry.key_file,
            &mut self.logging.file,
        ] {
            if path.is_relative() {
                *path = dir.join(&*path);
            }
        }
    }

    /// Check the loaded values make sense.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` naming the offending field.
    pub fn validate(&self) -> Result<()> {
        if self.registry.output.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "registry.output",
                reason: "must not be empty".to_string(),
            }
            .into());
        }
        if self.scan.extensions.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "scan.extensions",
                reason: "at least one extension is required".to_string(),
            }
            .into());
        }
        for ext in &self.scan.extensions {
            check_extension("scan.extensions", ext)?;
        }
        Ok(())
    }
}

fn check_extension(field: &'static str, ext: &str) -> Result<()> {
    if !ext.starts_with('.') || ext.len() < 2 {
        return Err(ConfigError::InvalidValue {
            field,
            reason: format!("'{}' should start with a dot (.)", ext),
        }
        .into());
    }
    Ok(())
}

/// Add `entries` to `dir/.gitignore` when `dir` is a git repository.
///
/// Entries already present as a full line are left alone. Returns whether
/// the file was touched; outside a git repository nothing happens.
///
/// # Errors
///
/// Returns an I/O error if `.gitignore` cannot be read or appended to.
pub fn ensure_gitignore(dir: &Path, entries: &[String]) -> Result<bool> {
    if !dir.join(".git").is_dir() {
        warn!("Not a git repository. Skipping git clean up.");
        return Ok(false);
    }

    let path = dir.join(".gitignore");
    let existing = if path.is_file() {
        info!("Found .gitignore...");
        std::fs::read_to_string(&path)?
    } else {
        info!(".gitignore not found, creating one...");
        String::new()
    };

    let missing: Vec<&String> = entries
        .iter()
        .filter(|entry| !existing.lines().any(|line| line.trim() == entry.as_str()))
        .collect();
    if missing.is_empty() {
        debug!(".gitignore already up to date");
        return Ok(false);
    }

    let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
    if !existing.is_empty() && !existing.ends_with('\n') {
        writeln!(file)?;
    }
    for entry in missing {
        writeln!(file, "{}", entry)?;
    }

    info!(".gitignore file updated");
    Ok(true)
}
