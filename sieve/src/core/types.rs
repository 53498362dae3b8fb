//! Shared deterministic types for the evaluation core.
//!
//! These types define stable contracts between core components and the
//! orchestration layers built on top of them.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Lifecycle state of an evaluator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EvalState {
    /// No candidates, nothing started yet, or the cursor reached the end.
    Idle,
    /// Candidates advance one step per tick.
    Running,
    /// Advancement was stopped before the end; resumable from the cursor.
    Paused,
}

/// Classification of a single candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Accepted,
    Rejected,
}

impl From<bool> for Verdict {
    fn from(accepted: bool) -> Self {
        if accepted {
            Verdict::Accepted
        } else {
            Verdict::Rejected
        }
    }
}

/// Failure to load a candidate list.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    /// No input line satisfied the candidate filter.
    #[error("no valid candidates in input ({dropped} lines dropped)")]
    EmptyAfterFilter { dropped: usize },
}

/// Rejected `start()` request. Neither variant changes evaluator state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StartError {
    #[error("no candidates to test")]
    NothingToTest,
    #[error("already running")]
    AlreadyRunning,
}

/// Failure reported by a probe instead of a verdict.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProbeError {
    /// The evaluation target went away; the run halts without consuming the candidate.
    #[error("target unavailable: {0}")]
    Unavailable(String),
}

/// Snapshot rejected by [`crate::core::evaluator::Evaluator::restore`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SnapshotError {
    #[error("cursor {cursor} exceeds candidate count {total}")]
    CursorOutOfRange { cursor: usize, total: usize },
    #[error("partition holds {classified} candidates but cursor is {cursor}")]
    PartitionSize { classified: usize, cursor: usize },
    #[error("partition does not match visited candidates at cursor {cursor}")]
    PartitionMismatch { cursor: usize },
}
