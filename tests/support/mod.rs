//! Test support utilities for signet integration tests.
//!
//! Provides an isolated release directory, artifact fixtures, a recording
//! runner for library-level tests and helpers for driving the binary.

#![allow(dead_code)]

pub mod assertions;
pub mod commands;
pub mod fixtures;
pub mod runner;
pub mod skip;

#[allow(unused_imports)]
pub use assertions::*;
#[allow(unused_imports)]
pub use fixtures::*;
#[allow(unused_imports)]
pub use runner::*;

use std::path::{Path, PathBuf};
use tempfile::TempDir;

use signet::core::Artifacts;

/// Test environment with an isolated project directory.
///
/// No process-global state is mutated; child processes use `.current_dir()`
/// so tests can safely run in parallel.
pub struct Test {
    /// Temporary project directory. Artifacts live under `dist/`.
    pub dir: TempDir,
}

impl Test {
    /// Create an empty test project with a `dist/` directory.
    pub fn new() -> Self {
        let dir = TempDir::new().expect("failed to create temp dir");
        std::fs::create_dir_all(dir.path().join("dist")).expect("failed to create dist");
        Self { dir }
    }

    /// Create a project whose manifest lists the standard release artifacts.
    pub fn with_release() -> Self {
        let t = Self::new();
        let artifacts = release_artifacts(&t.dist());
        t.write_manifest(&artifacts);
        t
    }

    /// The `dist/` directory.
    pub fn dist(&self) -> PathBuf {
        self.dir.path().join("dist")
    }

    /// Path relative to the project root.
    pub fn path(&self, rel: &str) -> PathBuf {
        self.dir.path().join(rel)
    }

    /// Write `signet.toml`.
    pub fn write_config(&self, contents: &str) {
        std::fs::write(self.path("signet.toml"), contents).expect("failed to write config");
    }

    /// Write `dist/artifacts.json`.
    pub fn write_manifest(&self, artifacts: &Artifacts) {
        artifacts
            .save(&self.manifest_path())
            .expect("failed to write manifest");
    }

    /// Read `dist/artifacts.json` back.
    pub fn read_manifest(&self) -> Artifacts {
        Artifacts::load(&self.manifest_path()).expect("failed to read manifest")
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.dist().join("artifacts.json")
    }

    /// All files under `dist/`, relative to it, sorted.
    pub fn dist_files(&self) -> Vec<String> {
        let mut files = Vec::new();
        collect_files(&self.dist(), &self.dist(), &mut files);
        files.sort();
        files
    }
}

fn collect_files(root: &Path, dir: &Path, out: &mut Vec<String>) {
    for entry in std::fs::read_dir(dir).expect("failed to read dir") {
        let path = entry.expect("failed to read entry").path();
        if path.is_dir() {
            collect_files(root, &path, out);
        } else {
            let rel = path.strip_prefix(root).expect("path outside root");
            out.push(rel.to_string_lossy().replace('\\', "/"));
        }
    }
}
