//! Session snapshot storage (`.sieve/state/session.json`).

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::evaluator::Snapshot;

/// Persisted load cycle: where the candidates came from and how far testing got.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionFile {
    /// Stored wordlist the candidates were loaded from.
    pub source: Option<PathBuf>,
    #[serde(flatten)]
    pub snapshot: Snapshot,
}

/// Load the saved session, if any.
pub fn load_session(path: &Path) -> Result<Option<SessionFile>> {
    if !path.exists() {
        debug!(path = %path.display(), "no saved session");
        return Ok(None);
    }
    let contents =
        fs::read_to_string(path).with_context(|| format!("read session {}", path.display()))?;
    let session: SessionFile = serde_json::from_str(&contents)
        .with_context(|| format!("parse session {}", path.display()))?;
    debug!(
        path = %path.display(),
        cursor = session.snapshot.cursor,
        total = session.snapshot.candidates.len(),
        "session loaded"
    );
    Ok(Some(session))
}

/// Atomically write the session to disk (temp file + rename).
pub fn write_session(path: &Path, session: &SessionFile) -> Result<()> {
    debug!(
        path = %path.display(),
        cursor = session.snapshot.cursor,
        "writing session"
    );
    let mut buf = serde_json::to_string_pretty(session).context("serialize session")?;
    buf.push('\n');
    super::write_atomic(path, &buf)
}
