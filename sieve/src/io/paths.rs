//! Layout of the `.sieve/` workspace directory.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use tracing::debug;

use super::config::{SieveConfig, write_config};

/// All canonical paths within `.sieve/` for a project root.
#[derive(Debug, Clone)]
pub struct SievePaths {
    pub root: PathBuf,
    pub sieve_dir: PathBuf,
    pub state_dir: PathBuf,
    pub wordlists_dir: PathBuf,
    pub config_path: PathBuf,
    pub session_path: PathBuf,
}

impl SievePaths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let sieve_dir = root.join(".sieve");
        let state_dir = sieve_dir.join("state");
        Self {
            root: root.clone(),
            sieve_dir: sieve_dir.clone(),
            state_dir: state_dir.clone(),
            wordlists_dir: sieve_dir.join("wordlists"),
            config_path: sieve_dir.join("config.toml"),
            session_path: state_dir.join("session.json"),
        }
    }
}

/// Options for `init_workspace`.
#[derive(Debug, Clone)]
pub struct InitOptions {
    /// If true, overwrite an existing config with defaults.
    pub force: bool,
}

/// Create `.sieve/` scaffolding in `root` with a default config.
///
/// Fails if the config already exists unless `options.force` is set.
pub fn init_workspace(root: &Path, options: &InitOptions) -> Result<SievePaths> {
    let paths = SievePaths::new(root);
    if paths.sieve_dir.exists() && !paths.sieve_dir.is_dir() {
        return Err(anyhow!("sieve init: .sieve exists but is not a directory"));
    }
    if paths.config_path.exists() && !options.force {
        return Err(anyhow!(
            "sieve init: {} already exists (use --force to overwrite)",
            paths.config_path.display()
        ));
    }

    for dir in [&paths.sieve_dir, &paths.state_dir, &paths.wordlists_dir] {
        fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    }
    write_config(&paths.config_path, &SieveConfig::default())?;
    debug!(root = %root.display(), "initialized sieve workspace");
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::config::load_config;

    #[test]
    fn init_creates_layout_with_default_config() {
        let temp = tempfile::tempdir().expect("tempdir");
        let paths = init_workspace(temp.path(), &InitOptions { force: false }).expect("init");
        assert!(paths.state_dir.is_dir());
        assert!(paths.wordlists_dir.is_dir());
        assert_eq!(
            load_config(&paths.config_path).expect("config"),
            SieveConfig::default()
        );
    }

    #[test]
    fn init_refuses_to_overwrite_without_force() {
        let temp = tempfile::tempdir().expect("tempdir");
        init_workspace(temp.path(), &InitOptions { force: false }).expect("init");
        assert!(init_workspace(temp.path(), &InitOptions { force: false }).is_err());
        init_workspace(temp.path(), &InitOptions { force: true }).expect("force init");
    }
}
