//! Test-only helpers for building workspaces and evaluators.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tempfile::TempDir;

use crate::core::candidates::SixDigitFilter;
use crate::core::evaluator::Evaluator;
use crate::core::probe::Probe;
use crate::io::config::{SieveConfig, write_config};
use crate::io::paths::{InitOptions, SievePaths, init_workspace};

/// Evaluator loaded with `lines` through the default six-digit filter.
pub fn loaded_evaluator<P: Probe>(probe: P, lines: &[&str]) -> Evaluator<P> {
    let mut evaluator = Evaluator::new(probe);
    evaluator
        .load(lines.iter().copied(), &SixDigitFilter)
        .expect("load candidates");
    evaluator
}

/// Temporary project root with an initialized `.sieve/` directory.
pub struct TestWorkspace {
    dir: TempDir,
}

impl TestWorkspace {
    pub fn new() -> Result<Self> {
        let dir = tempfile::tempdir().context("create tempdir")?;
        init_workspace(dir.path(), &InitOptions { force: false })?;
        Ok(Self { dir })
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn paths(&self) -> SievePaths {
        SievePaths::new(self.root())
    }

    /// Overwrite the workspace config.
    pub fn write_config(&self, cfg: &SieveConfig) -> Result<()> {
        write_config(&self.paths().config_path, cfg)
    }

    /// Write a wordlist outside `.sieve/` and return its path.
    pub fn write_wordlist(&self, name: &str, lines: &[&str]) -> Result<PathBuf> {
        let path = self.root().join(name);
        let mut contents = lines.join("\n");
        contents.push('\n');
        fs::write(&path, contents).with_context(|| format!("write {}", path.display()))?;
        Ok(path)
    }
}
