//! Sequential candidate evaluation with pause/resume.
//!
//! The evaluator owns the loaded candidates, a cursor over them and the
//! accepted/rejected partition of everything the cursor has passed. It never
//! schedules itself: something else (see `crate::driver`) calls [`Evaluator::step`]
//! once per tick while the state is [`EvalState::Running`].
//!
//! Invariants maintained by every operation:
//! - `accepted.len() + rejected.len() == cursor`
//! - the partition, in visit order, is exactly `candidates[..cursor]`
//! - `cursor` never decreases within a load cycle
//! - `Running` implies `cursor < candidates.len()`

use serde::{Deserialize, Serialize};

use crate::core::candidates::{CandidateFilter, CandidateList, load_candidates};
use crate::core::probe::Probe;
use crate::core::report::Report;
use crate::core::types::{EvalState, LoadError, ProbeError, SnapshotError, StartError, Verdict};

/// Result of one call to [`Evaluator::step`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// A candidate was classified and the cursor advanced.
    Classified {
        index: usize,
        candidate: String,
        verdict: Verdict,
        /// True when this step consumed the last candidate.
        complete: bool,
    },
    /// The probe failed. Nothing was classified and the evaluator is now paused.
    Halted { index: usize, error: ProbeError },
    /// The evaluator was not running; nothing happened.
    NotRunning,
}

/// Serializable copy of one load cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub candidates: Vec<String>,
    pub cursor: usize,
    pub accepted: Vec<String>,
    pub rejected: Vec<String>,
}

pub struct Evaluator<P> {
    probe: P,
    candidates: CandidateList,
    cursor: usize,
    accepted: Vec<String>,
    rejected: Vec<String>,
    state: EvalState,
}

impl<P: Probe> Evaluator<P> {
    pub fn new(probe: P) -> Self {
        Self {
            probe,
            candidates: CandidateList::default(),
            cursor: 0,
            accepted: Vec::new(),
            rejected: Vec::new(),
            state: EvalState::Idle,
        }
    }

    /// Replace the candidate list with the lines accepted by `filter`.
    ///
    /// On success the cursor and partition reset and the state becomes `Idle`,
    /// even if a run was in progress. On failure nothing changes.
    pub fn load<I, S, F>(&mut self, raw_lines: I, filter: &F) -> Result<usize, LoadError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        F: CandidateFilter + ?Sized,
    {
        let candidates = load_candidates(raw_lines, filter)?;
        let total = candidates.len();
        self.replace(candidates);
        Ok(total)
    }

    fn replace(&mut self, candidates: CandidateList) {
        self.candidates = candidates;
        self.cursor = 0;
        self.accepted.clear();
        self.rejected.clear();
        self.state = EvalState::Idle;
    }

    /// Begin or resume advancing from the current cursor.
    pub fn start(&mut self) -> Result<(), StartError> {
        if self.state == EvalState::Running {
            return Err(StartError::AlreadyRunning);
        }
        if self.cursor >= self.candidates.len() {
            return Err(StartError::NothingToTest);
        }
        self.state = EvalState::Running;
        Ok(())
    }

    /// Stop advancing. Cursor and partition are kept. Returns false if not running.
    pub fn pause(&mut self) -> bool {
        if self.state != EvalState::Running {
            return false;
        }
        self.state = EvalState::Paused;
        true
    }

    /// Same transition as [`Evaluator::pause`].
    pub fn stop(&mut self) -> bool {
        self.pause()
    }

    /// Classify the candidate under the cursor and advance.
    pub fn step(&mut self) -> StepOutcome {
        if self.state != EvalState::Running {
            return StepOutcome::NotRunning;
        }
        let index = self.cursor;
        let Some(candidate) = self.candidates.get(index) else {
            // Unreachable while the Running invariant holds.
            self.state = EvalState::Idle;
            return StepOutcome::NotRunning;
        };
        let verdict = match self.probe.evaluate(candidate) {
            Ok(verdict) => verdict,
            Err(error) => {
                self.state = EvalState::Paused;
                return StepOutcome::Halted { index, error };
            }
        };
        let candidate = candidate.to_string();
        match verdict {
            Verdict::Accepted => self.accepted.push(candidate.clone()),
            Verdict::Rejected => self.rejected.push(candidate.clone()),
        }
        self.cursor += 1;
        let complete = self.cursor == self.candidates.len();
        if complete {
            self.state = EvalState::Idle;
        }
        StepOutcome::Classified {
            index,
            candidate,
            verdict,
            complete,
        }
    }

    pub fn state(&self) -> EvalState {
        self.state
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn total(&self) -> usize {
        self.candidates.len()
    }

    pub fn candidates(&self) -> &CandidateList {
        &self.candidates
    }

    pub fn accepted(&self) -> &[String] {
        &self.accepted
    }

    pub fn rejected(&self) -> &[String] {
        &self.rejected
    }

    pub fn report(&self) -> Report {
        Report {
            state: self.state,
            total: self.candidates.len(),
            cursor: self.cursor,
            accepted: self.accepted.clone(),
            rejected: self.rejected.clone(),
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            candidates: self.candidates.as_slice().to_vec(),
            cursor: self.cursor,
            accepted: self.accepted.clone(),
            rejected: self.rejected.clone(),
        }
    }

    /// Replace the current cycle with a saved one.
    ///
    /// The partition is checked against the candidates it claims to cover.
    /// The probe is not re-run. A snapshot in the middle of the list is
    /// restored as `Paused`, anything else as `Idle`.
    pub fn restore(&mut self, snapshot: Snapshot) -> Result<(), SnapshotError> {
        let total = snapshot.candidates.len();
        let cursor = snapshot.cursor;
        if cursor > total {
            return Err(SnapshotError::CursorOutOfRange { cursor, total });
        }
        let classified = snapshot.accepted.len() + snapshot.rejected.len();
        if classified != cursor {
            return Err(SnapshotError::PartitionSize { classified, cursor });
        }
        if !is_order_preserving_split(
            &snapshot.candidates[..cursor],
            &snapshot.accepted,
            &snapshot.rejected,
        ) {
            return Err(SnapshotError::PartitionMismatch { cursor });
        }

        self.candidates = CandidateList::from_validated(snapshot.candidates);
        self.cursor = cursor;
        self.accepted = snapshot.accepted;
        self.rejected = snapshot.rejected;
        self.state = if cursor > 0 && cursor < total {
            EvalState::Paused
        } else {
            EvalState::Idle
        };
        Ok(())
    }
}

/// True if `visited` can be produced by interleaving `accepted` and `rejected`
/// without reordering either.
fn is_order_preserving_split(visited: &[String], accepted: &[String], rejected: &[String]) -> bool {
    // Accepted-indices reachable after each visited item. Only equal heads on
    // both sides fork the match, so this stays tiny for real wordlists.
    let mut reachable = vec![0usize];
    let mut next = Vec::new();
    for (pos, item) in visited.iter().enumerate() {
        next.clear();
        for &a in &reachable {
            if accepted.get(a) == Some(item) {
                next.push(a + 1);
            }
            if rejected.get(pos - a) == Some(item) {
                next.push(a);
            }
        }
        if next.is_empty() {
            return false;
        }
        next.sort_unstable();
        next.dedup();
        std::mem::swap(&mut reachable, &mut next);
    }
    reachable.contains(&accepted.len())
}
