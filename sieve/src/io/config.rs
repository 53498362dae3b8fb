//! Sieve configuration stored under `.sieve/config.toml`.

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::core::candidates::{CandidateFilter, PatternFilter, SixDigitFilter};
use crate::core::probe::{Probe, RejectAll, RejectSuffix};

/// Shortest allowed tick interval (at most five candidates per second).
pub const MIN_TICK_INTERVAL_MS: u64 = 200;

/// Sieve configuration (TOML).
///
/// Missing fields default to the values the tool has always used.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SieveConfig {
    /// Delay between two evaluation steps, in milliseconds.
    pub tick_interval_ms: u64,

    pub candidates: CandidateConfig,

    pub probe: ProbeConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CandidateConfig {
    /// Regex every kept line must match. Unset means exactly six digits.
    pub pattern: Option<String>,
}

/// Built-in probe selection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ProbeConfig {
    RejectSuffix { suffix: String },
    RejectAll,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        ProbeConfig::RejectSuffix {
            suffix: "123".to_string(),
        }
    }
}

impl Default for SieveConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 1000,
            candidates: CandidateConfig::default(),
            probe: ProbeConfig::default(),
        }
    }
}

impl SieveConfig {
    pub fn validate(&self) -> Result<()> {
        if self.tick_interval_ms < MIN_TICK_INTERVAL_MS {
            return Err(anyhow!(
                "tick_interval_ms must be >= {MIN_TICK_INTERVAL_MS}"
            ));
        }
        if let Some(pattern) = &self.candidates.pattern {
            PatternFilter::new(pattern)
                .with_context(|| format!("candidates.pattern is not a valid regex: {pattern}"))?;
        }
        if let ProbeConfig::RejectSuffix { suffix } = &self.probe {
            if suffix.is_empty() {
                return Err(anyhow!("probe.suffix must be non-empty"));
            }
        }
        Ok(())
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// Build the configured load filter.
    pub fn filter(&self) -> Result<Box<dyn CandidateFilter + Send + Sync>> {
        match &self.candidates.pattern {
            Some(pattern) => {
                let filter = PatternFilter::new(pattern)
                    .with_context(|| format!("compile candidates.pattern {pattern}"))?;
                Ok(Box::new(filter))
            }
            None => Ok(Box::new(SixDigitFilter)),
        }
    }

    /// Build the configured probe.
    pub fn probe(&self) -> Box<dyn Probe + Send> {
        match &self.probe {
            ProbeConfig::RejectSuffix { suffix } => Box::new(RejectSuffix::new(suffix.clone())),
            ProbeConfig::RejectAll => Box::new(RejectAll),
        }
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `SieveConfig::default()`.
pub fn load_config(path: &Path) -> Result<SieveConfig> {
    if !path.exists() {
        let cfg = SieveConfig::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: SieveConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()
        .with_context(|| format!("invalid config {}", path.display()))?;
    Ok(cfg)
}

/// Atomically write config to disk (temp file + rename).
pub fn write_config(path: &Path, cfg: &SieveConfig) -> Result<()> {
    cfg.validate()?;
    let mut buf = toml::to_string_pretty(cfg).context("serialize config toml")?;
    buf.push('\n');
    super::write_atomic(path, &buf)
}
