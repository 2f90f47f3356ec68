//! Tracing subscriber setup.
//!
//! Two layers: a compact stderr layer filtered by `SECREG_LOG` (or
//! `--verbose`), and an optional process log file at `info` that is
//! rotated by size before it is opened.

use std::ffi::OsString;
use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::core::config::LoggingConfig;
use crate::core::constants;
use crate::error::Result;

/// Install the global subscriber.
///
/// # Errors
///
/// Returns an I/O error if the log file cannot be rotated or opened.
pub fn init(verbose: bool, config: &LoggingConfig) -> Result<()> {
    let stderr_filter = EnvFilter::try_from_env(constants::LOG_ENV).unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("secreg=debug")
        } else {
            EnvFilter::new("secreg=warn")
        }
    });
    let stderr_layer = fmt::layer()
        .with_writer(io::stderr)
        .with_target(false)
        .without_time()
        .with_filter(stderr_filter);

    let file_layer = if config.enabled {
        rotate(&config.file, config.max_bytes, config.backups)?;
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&config.file)?;
        Some(
            fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_target(false)
                .with_filter(EnvFilter::new("secreg=info")),
        )
    } else {
        None
    };

    let _ = tracing_subscriber::registry()
        .with(stderr_layer)
        .with(file_layer)
        .try_init();
    Ok(())
}

/// Rotate `path` when it is larger than `max_bytes`.
///
/// `path` becomes `path.1`, `path.1` becomes `path.2` and so on, keeping
/// at most `backups` copies. With no backups the file is simply removed.
/// A `max_bytes` of zero disables rotation.
pub fn rotate(path: &Path, max_bytes: u64, backups: usize) -> io::Result<()> {
    if max_bytes == 0 {
        return Ok(());
    }
    let size = match fs::metadata(path) {
        Ok(meta) => meta.len(),
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(e),
    };
    if size <= max_bytes {
        return Ok(());
    }

    if backups == 0 {
        return fs::remove_file(path);
    }

    let oldest = backup_path(path, backups);
    if oldest.exists() {
        fs::remove_file(&oldest)?;
    }
    for i in (1..backups).rev() {
        let from = backup_path(path, i);
        if from.exists() {
            fs::rename(&from, backup_path(path, i + 1))?;
        }
    }
    fs::rename(path, backup_path(path, 1))
}

fn backup_path(path: &Path, n: usize) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(format!(".{}", n));
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_small_file_not_rotated() {
        let dir = TempDir::new().unwrap();
        let log = dir.path().join("p.log");
        fs::write(&log, "short").unwrap();

        rotate(&log, 100, 3).unwrap();
        assert!(log.exists());
        assert!(!backup_path(&log, 1).exists());
    }

    #[test]
    fn test_rotation_shifts_backups() {
        let dir = TempDir::new().unwrap();
        let log = dir.path().join("p.log");
        fs::write(&log, "current-too-big").unwrap();
        fs::write(backup_path(&log, 1), "one").unwrap();
        fs::write(backup_path(&log, 2), "two").unwrap();

        rotate(&log, 4, 2).unwrap();

        assert!(!log.exists());
        assert_eq!(fs::read_to_string(backup_path(&log, 1)).unwrap(), "current-too-big");
        assert_eq!(fs::read_to_string(backup_path(&log, 2)).unwrap(), "one");
        assert!(!backup_path(&log, 3).exists());
    }

    #[test]
    fn test_zero_backups_removes_file() {
        let dir = TempDir::new().unwrap();
        let log = dir.path().join("p.log");
        fs::write(&log, "0123456789").unwrap();

        rotate(&log, 5, 0).unwrap();
        assert!(!log.exists());
    }

    #[test]
    fn test_missing_file_is_fine() {
        let dir = TempDir::new().unwrap();
        rotate(&dir.path().join("absent.log"), 1, 3).unwrap();
    }

    #[test]
    fn test_backup_path_appends_number() {
        assert_eq!(
            backup_path(Path::new("/x/load.log"), 2),
            PathBuf::from("/x/load.log.2")
        );
    }
}
