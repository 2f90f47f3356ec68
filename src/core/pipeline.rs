//! End-to-end build and read of the registry artifact.
//!
//! `build` runs discovery, loading, merge, rendering, sealing and the
//! atomic write in that order. Every source is loaded before anything is
//! written, so a bad source leaves the previous artifact in place.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::core::cipher::{self, CipherKind};
use crate::core::config::{self, Config, ScanConfig};
use crate::core::merge::{EnvLookup, MergeStats, Merger};
use crate::core::registry::Registry;
use crate::core::{artifact, keyfile, source};
use crate::error::Result;

/// Inputs for one build.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Directory scanned for sources.
    pub dir: PathBuf,
    pub scan: ScanConfig,
    pub output: PathBuf,
    pub encrypt: bool,
    pub cipher: CipherKind,
    pub key_file: PathBuf,
    /// Process log, listed in `.gitignore` alongside the artifact.
    pub log_file: Option<PathBuf>,
}

impl BuildOptions {
    /// Options for `dir` taken from a loaded config.
    pub fn from_config(dir: &Path, config: &Config) -> Self {
        Self {
            dir: dir.to_path_buf(),
            scan: config.scan.clone(),
            output: config.registry.output.clone(),
            encrypt: config.registry.encrypt,
            cipher: config.registry.cipher,
            key_file: config.registry.key_file.clone(),
            log_file: config
                .logging
                .enabled
                .then(|| config.logging.file.clone()),
        }
    }
}

/// What a build did.
#[derive(Debug, Clone)]
pub struct BuildReport {
    /// Source file names in merge order.
    pub sources: Vec<String>,
    pub stats: MergeStats,
    /// Keys in the written registry.
    pub entries: usize,
    pub output: PathBuf,
    pub encrypted: bool,
    pub key_created: bool,
    pub key_fingerprint: Option<String>,
    pub gitignore_updated: bool,
}

/// Build the registry artifact.
///
/// # Errors
///
/// Fails on the first source that cannot be read or parsed, on a registry
/// that cannot be rendered, and on key, encryption or write errors.
pub fn build(options: &BuildOptions, env: &dyn EnvLookup) -> Result<BuildReport> {
    let paths = source::discover(&options.dir, &options.scan)?;
    if paths.is_empty() {
        warn!(dir = %options.dir.display(), "no secrets files found");
    }

    let mut loaded = Vec::with_capacity(paths.len());
    for path in &paths {
        loaded.push(source::load(path)?);
    }
    let names: Vec<String> = loaded.iter().map(|s| s.id.clone()).collect();

    let mut merger = Merger::new(env);
    for s in loaded {
        merger.apply(s);
    }
    let (registry, stats) = merger.finish();
    debug!(?stats, entries = registry.len(), "merge complete");

    let plaintext = registry.render()?;

    let (bytes, key_created, key_fingerprint) = if options.encrypt {
        let (key, created) = keyfile::load_or_generate(&options.key_file, options.cipher)?;
        let sealed = cipher::seal(&plaintext, &key)?;
        (sealed, created, Some(keyfile::fingerprint(&key)))
    } else {
        warn!(
            "Secrets will be stored without encryption. This is NOT recommended. \
             Please delete the {} after reading to avoid a security lapse.",
            file_name(&options.output)
        );
        (plaintext, false, None)
    };

    artifact::write_atomic(&options.output, &bytes)?;
    if options.encrypt {
        info!(
            "Secrets registry encrypted and written to {}",
            file_name(&options.output)
        );
    } else {
        info!("Secrets registry written to {}", file_name(&options.output));
    }

    let gitignore_updated = config::ensure_gitignore(&options.dir, &ignore_entries(options))?;

    Ok(BuildReport {
        sources: names,
        stats,
        entries: registry.len(),
        output: options.output.clone(),
        encrypted: options.encrypt,
        key_created,
        key_fingerprint,
        gitignore_updated,
    })
}

/// Files produced by a build that live inside the scanned directory.
fn ignore_entries(options: &BuildOptions) -> Vec<String> {
    let mut candidates = vec![&options.output];
    if let Some(log) = &options.log_file {
        candidates.push(log);
    }
    if options.encrypt {
        candidates.push(&options.key_file);
    }

    candidates
        .into_iter()
        .filter_map(|p| relative_entry(&options.dir, p))
        .collect()
}

fn relative_entry(dir: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(dir).ok()?;
    let parts: Vec<String> = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy().to_string())
        .collect();
    (!parts.is_empty()).then(|| parts.join("/"))
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

/// Inputs for reading an artifact back.
#[derive(Debug, Clone)]
pub struct ReadOptions {
    pub output: PathBuf,
    pub encrypted: bool,
    pub key_file: PathBuf,
}

impl ReadOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            output: config.registry.output.clone(),
            encrypted: config.registry.encrypt,
            key_file: config.registry.key_file.clone(),
        }
    }
}

/// Read, open and parse an artifact.
///
/// # Errors
///
/// Returns an I/O error for a missing artifact, key errors, a
/// `CipherError::Decryption` for a wrong key or damaged artifact, and
/// format errors from the registry parser.
pub fn read(options: &ReadOptions) -> Result<Registry> {
    let bytes = artifact::read(&options.output)?;
    let plaintext = if options.encrypted {
        let key = keyfile::load(&options.key_file)?;
        cipher::open(&bytes, &key)?
    } else {
        bytes
    };
    Registry::parse(&plaintext)
}
