//! Test support utilities for secreg integration tests.

#![allow(dead_code)]

pub mod assertions;
pub mod commands;
pub mod fixtures;

#[allow(unused_imports)]
pub use assertions::*;
#[allow(unused_imports)]
pub use fixtures::*;

use std::path::PathBuf;

use tempfile::TempDir;

/// Test environment with an isolated target directory.
///
/// Child commands run with `.current_dir()` set to the directory, so
/// tests never touch process-global state and can run in parallel.
pub struct Test {
    pub dir: TempDir,
}

impl Test {
    /// Create an empty target directory.
    pub fn new() -> Self {
        let dir = TempDir::new().expect("failed to create temp dir");
        Self { dir }
    }

    /// Create a target directory holding the given files.
    pub fn with_files(files: &[(&str, &str)]) -> Self {
        let t = Self::new();
        for (name, contents) in files {
            t.write(name, contents);
        }
        t
    }

    /// Make the target directory look like a git checkout.
    pub fn git(self) -> Self {
        std::fs::create_dir(self.dir.path().join(".git")).expect("failed to create .git");
        self
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    pub fn write(&self, name: &str, contents: &str) {
        std::fs::write(self.path(name), contents).expect("failed to write fixture");
    }

    pub fn read(&self, name: &str) -> String {
        std::fs::read_to_string(self.path(name)).expect("failed to read file")
    }

    pub fn read_bytes(&self, name: &str) -> Vec<u8> {
        std::fs::read(self.path(name)).expect("failed to read file")
    }

    pub fn exists(&self, name: &str) -> bool {
        self.path(name).exists()
    }
}
