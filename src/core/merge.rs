//! Registry merge.
//!
//! Sources are folded in the order they are supplied. A concrete value
//! overwrites whatever an earlier source set for the same key. A null
//! value asks the environment: if the variable is set it becomes the
//! value, otherwise the key is dropped from the registry.

use std::collections::{BTreeMap, HashMap};

use tracing::{debug, info};

use crate::core::registry::Registry;
use crate::core::value::{Mapping, SecretValue};

/// Resolves keys whose source value is null.
pub trait EnvLookup {
    /// Value for `key`, or `None` when it is not set.
    fn lookup(&self, key: &str) -> Option<String>;
}

/// Lookup backed by the process environment.
///
/// Empty variables count as unset.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvLookup for ProcessEnv {
    fn lookup(&self, key: &str) -> Option<String> {
        std::env::var(key).ok().filter(|v| !v.is_empty())
    }
}

/// Lookup that never finds anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoEnv;

impl EnvLookup for NoEnv {
    fn lookup(&self, _key: &str) -> Option<String> {
        None
    }
}

impl EnvLookup for HashMap<String, String> {
    fn lookup(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

impl EnvLookup for BTreeMap<String, String> {
    fn lookup(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

/// Adapts a closure into a lookup.
pub struct LookupFn<F>(pub F);

impl<F> EnvLookup for LookupFn<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn lookup(&self, key: &str) -> Option<String> {
        (self.0)(key)
    }
}

/// One parsed secrets document.
#[derive(Debug, Clone, PartialEq)]
pub struct Source {
    /// Where the entries came from, usually the file name.
    pub id: String,
    pub entries: Mapping,
}

impl Source {
    pub fn new(id: impl Into<String>, entries: Mapping) -> Self {
        Self {
            id: id.into(),
            entries,
        }
    }
}

/// Counts of merge decisions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeStats {
    pub sources: usize,
    pub from_files: usize,
    pub from_env: usize,
    pub dropped: usize,
}

/// Incremental merger.
///
/// Owns the registry while sources are applied; `finish` hands it over.
pub struct Merger<'e, E: EnvLookup + ?Sized> {
    registry: Registry,
    env: &'e E,
    stats: MergeStats,
}

impl<'e, E: EnvLookup + ?Sized> Merger<'e, E> {
    pub fn new(env: &'e E) -> Self {
        Self {
            registry: Registry::new(),
            env,
            stats: MergeStats::default(),
        }
    }

    /// Fold one source into the registry.
    pub fn apply(&mut self, source: Source) {
        debug!(source = %source.id, entries = source.entries.len(), "merging source");
        self.stats.sources += 1;

        for (key, value) in source.entries {
            if !value.is_null() {
                info!("Added secret '{}' from '{}'", key, source.id);
                self.registry.insert(key, value);
                self.stats.from_files += 1;
                continue;
            }

            match self.env.lookup(&key) {
                Some(env_value) => {
                    info!("Added secret '{}' from environment variables", key);
                    self.registry.insert(key, SecretValue::Text(env_value));
                    self.stats.from_env += 1;
                }
                None => {
                    if self.registry.remove(&key).is_some() {
                        self.stats.dropped += 1;
                    }
                    info!("Dropped secret '{}' from registry", key);
                }
            }
        }
    }

    pub fn stats(&self) -> MergeStats {
        self.stats
    }

    pub fn finish(self) -> (Registry, MergeStats) {
        (self.registry, self.stats)
    }
}

/// Merge `sources` in order into a fresh registry.
pub fn merge<I, E>(sources: I, env: &E) -> Registry
where
    I: IntoIterator<Item = Source>,
    E: EnvLookup + ?Sized,
{
    let mut merger = Merger::new(env);
    for source in sources {
        merger.apply(source);
    }
    merger.finish().0
}
