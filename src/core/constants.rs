//! Constants used throughout secreg.
//!
//! Centralizes file names and scan defaults.

/// Optional per-directory configuration file.
pub const CONFIG_FILE: &str = ".secreg.toml";

/// Default registry artifact name.
pub const REGISTRY_FILE: &str = "secrets_registry.log";

/// Default key file name.
pub const KEY_FILE: &str = "encryption_key.txt";

/// Default process log file name.
pub const LOG_FILE: &str = "load_config_process.log";

/// Rotate the process log once it grows past this many bytes.
pub const LOG_MAX_BYTES: u64 = 1_048_576;

/// Rotated process log copies to keep.
pub const LOG_BACKUPS: usize = 3;

/// A file is a source when its lower-cased name contains one of these.
pub const SCAN_KEYWORDS: &[&str] = &["secrets", "keys"];

/// Source file extensions recognised by the loader.
pub const SCAN_EXTENSIONS: &[&str] = &[".yaml", ".yml", ".json", ".ini", ".toml"];

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "SECREG_LOG";
