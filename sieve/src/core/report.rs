//! Read-only view of an evaluator for display.

use std::fmt;

use serde::Serialize;

use crate::core::types::EvalState;

/// Human-facing progress of a load cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    /// Nothing loaded.
    Empty,
    /// Loaded, no step taken yet.
    Ready { total: usize },
    /// `cursor` is the index of the next candidate.
    Testing { cursor: usize, total: usize },
    Paused,
    Complete,
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Progress::Empty => f.write_str("No candidates to test."),
            Progress::Ready { total } => write!(f, "Loaded {total} candidates."),
            Progress::Testing { cursor, total } => {
                write!(f, "Testing candidate {}/{}", cursor + 1, total)
            }
            Progress::Paused => f.write_str("Testing paused."),
            Progress::Complete => f.write_str("Testing complete."),
        }
    }
}

/// Point-in-time copy of evaluator bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    pub state: EvalState,
    pub total: usize,
    pub cursor: usize,
    pub accepted: Vec<String>,
    pub rejected: Vec<String>,
}

impl Report {
    pub fn progress(&self) -> Progress {
        match self.state {
            EvalState::Running => Progress::Testing {
                cursor: self.cursor,
                total: self.total,
            },
            EvalState::Paused => Progress::Paused,
            EvalState::Idle if self.total == 0 => Progress::Empty,
            EvalState::Idle if self.cursor >= self.total => Progress::Complete,
            EvalState::Idle => Progress::Ready { total: self.total },
        }
    }

    /// One-line summary: how many were tested and how many landed in the bin.
    pub fn stats_line(&self) -> String {
        format!(
            "Tested {} candidates. Invalid: {}",
            self.cursor,
            self.rejected.len()
        )
    }

    /// Rejected candidates, one per line.
    pub fn bin(&self) -> String {
        let mut out = String::new();
        for candidate in &self.rejected {
            out.push_str(candidate);
            out.push('\n');
        }
        out
    }
}
