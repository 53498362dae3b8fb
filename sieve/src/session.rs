//! Orchestration for `sieve load`, `sieve run`, `sieve stats` and `sieve bin`.
//!
//! Coordinates the pure evaluator with configuration, wordlist storage and the
//! session snapshot on disk.

use std::future::Future;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info, warn};

use crate::core::candidates::load_candidates;
use crate::core::evaluator::{Evaluator, Snapshot};
use crate::core::report::Report;
use crate::core::types::StartError;
use crate::driver::{DriverError, DriverEvent, TickDriver};
use crate::io::config::{MIN_TICK_INTERVAL_MS, load_config};
use crate::io::paths::SievePaths;
use crate::io::session_store::{SessionFile, load_session, write_session};
use crate::io::wordlist::{import_wordlist, read_lines};

/// Outcome of `sieve load`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadOutcome {
    /// Copy of the wordlist inside `.sieve/wordlists/`.
    pub stored: PathBuf,
    pub total: usize,
}

/// Validate `source`, import it into storage and start a fresh session.
///
/// Nothing is imported and the saved session is untouched if no line passes
/// the configured filter. The returned error then downcasts to
/// [`crate::core::types::LoadError`].
pub fn load_wordlist(root: &Path, source: &Path) -> Result<LoadOutcome> {
    let paths = SievePaths::new(root);
    let cfg = load_config(&paths.config_path)?;
    let filter = cfg.filter()?;

    let lines = read_lines(source)?;
    let candidates = load_candidates(&lines, filter.as_ref())
        .with_context(|| format!("load candidates from {}", source.display()))?;
    let total = candidates.len();

    let stored = import_wordlist(source, &paths.wordlists_dir)?;
    let session = SessionFile {
        source: Some(stored.clone()),
        snapshot: Snapshot {
            candidates: candidates.as_slice().to_vec(),
            cursor: 0,
            accepted: Vec::new(),
            rejected: Vec::new(),
        },
    };
    write_session(&paths.session_path, &session)?;
    info!(source = %source.display(), total, dropped = lines.len() - total, "wordlist loaded");
    Ok(LoadOutcome { stored, total })
}

/// Options for `sieve run`.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Load this wordlist first, discarding the saved session.
    pub source: Option<PathBuf>,
    /// Pause after this many steps.
    pub pause_after: Option<NonZeroUsize>,
    /// Override the configured tick interval.
    pub interval: Option<Duration>,
}

/// Reason why `run_session` returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunStop {
    Complete,
    Paused,
    /// The probe reported the target unavailable.
    Halted { reason: String },
    NothingToTest,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutcome {
    pub stop: RunStop,
    pub report: Report,
}

/// Drive the saved (or freshly loaded) session until it completes, pauses or
/// `shutdown` resolves. The snapshot is written back before returning.
pub async fn run_session<S, F>(
    root: &Path,
    options: &RunOptions,
    shutdown: S,
    mut on_event: F,
) -> Result<RunOutcome>
where
    S: Future<Output = ()>,
    F: FnMut(&DriverEvent),
{
    let paths = SievePaths::new(root);
    let cfg = load_config(&paths.config_path)?;
    let interval = options.interval.unwrap_or_else(|| cfg.tick_interval());
    if interval < Duration::from_millis(MIN_TICK_INTERVAL_MS) {
        return Err(anyhow!(
            "tick interval must be >= {MIN_TICK_INTERVAL_MS} ms"
        ));
    }

    if let Some(source) = &options.source {
        load_wordlist(root, source)?;
    }
    let session = load_session(&paths.session_path)?;
    let source = session.as_ref().and_then(|s| s.source.clone());

    let mut driver = TickDriver::new(Evaluator::new(cfg.probe()), interval)?;
    if let Some(session) = session {
        driver
            .restore(session.snapshot)
            .with_context(|| format!("restore session {}", paths.session_path.display()))?;
    }
    driver.set_step_budget(options.pause_after);

    let mut events = driver.subscribe();
    match driver.start() {
        Ok(()) => {}
        Err(DriverError::Start(StartError::NothingToTest)) => {
            debug!("nothing to test");
            return Ok(RunOutcome {
                stop: RunStop::NothingToTest,
                report: driver.report(),
            });
        }
        Err(err) => return Err(err.into()),
    }

    tokio::pin!(shutdown);
    let stop = loop {
        tokio::select! {
            biased;
            () = &mut shutdown => {
                info!("shutdown requested, pausing");
                driver.pause();
                break RunStop::Paused;
            }
            event = events.recv() => match event {
                Ok(event) => {
                    on_event(&event);
                    match event {
                        DriverEvent::Completed { .. } => break RunStop::Complete,
                        DriverEvent::Paused { .. } => break RunStop::Paused,
                        DriverEvent::Halted { reason, .. } => break RunStop::Halted { reason },
                        _ => {}
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "event receiver lagged");
                }
                Err(RecvError::Closed) => break RunStop::Paused,
            }
        }
    };

    let snapshot = driver.snapshot();
    let report = driver.shutdown().await;
    write_session(&paths.session_path, &SessionFile { source, snapshot })?;
    Ok(RunOutcome { stop, report })
}

/// Report for the saved session, or an empty report if there is none.
pub fn session_report(root: &Path) -> Result<Report> {
    let paths = SievePaths::new(root);
    let cfg = load_config(&paths.config_path)?;
    let mut evaluator = Evaluator::new(cfg.probe());
    if let Some(session) = load_session(&paths.session_path)? {
        evaluator
            .restore(session.snapshot)
            .with_context(|| format!("restore session {}", paths.session_path.display()))?;
    }
    Ok(evaluator.report())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::core::types::{EvalState, LoadError};
    use crate::io::config::{SieveConfig, write_config};

    fn fast_config(root: &Path) {
        let paths = SievePaths::new(root);
        write_config(
            &paths.config_path,
            &SieveConfig {
                tick_interval_ms: MIN_TICK_INTERVAL_MS,
                ..SieveConfig::default()
            },
        )
        .expect("write config");
    }

    #[test]
    fn load_writes_fresh_session() {
        let temp = tempfile::tempdir().expect("tempdir");
        let source = temp.path().join("pins.txt");
        fs::write(&source, "123123\n000000\nabc\n").expect("write");

        let outcome = load_wordlist(temp.path(), &source).expect("load");
        assert_eq!(outcome.total, 2);
        assert!(outcome.stored.starts_with(temp.path().join(".sieve/wordlists")));

        let report = session_report(temp.path()).expect("report");
        assert_eq!(report.total, 2);
        assert_eq!(report.progress().to_string(), "Loaded 2 candidates.");
    }

    #[test]
    fn empty_wordlist_keeps_previous_session() {
        let temp = tempfile::tempdir().expect("tempdir");
        let good = temp.path().join("good.txt");
        fs::write(&good, "111111\n").expect("write");
        load_wordlist(temp.path(), &good).expect("load");

        let bad = temp.path().join("bad.txt");
        fs::write(&bad, "nope\n").expect("write");
        let err = load_wordlist(temp.path(), &bad).unwrap_err();
        assert_eq!(
            err.downcast_ref::<LoadError>(),
            Some(&LoadError::EmptyAfterFilter { dropped: 1 })
        );
        assert!(!temp.path().join(".sieve/wordlists/bad.txt").exists());
        assert_eq!(session_report(temp.path()).expect("report").total, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn run_without_session_is_nothing_to_test() {
        let temp = tempfile::tempdir().expect("tempdir");
        let outcome = run_session(
            temp.path(),
            &RunOptions::default(),
            std::future::pending(),
            |_| {},
        )
        .await
        .expect("run");
        assert_eq!(outcome.stop, RunStop::NothingToTest);
        assert_eq!(outcome.report.progress().to_string(), "No candidates to test.");
    }

    #[tokio::test(start_paused = true)]
    async fn run_pauses_then_resumes_from_saved_cursor() {
        let temp = tempfile::tempdir().expect("tempdir");
        fast_config(temp.path());
        let source = temp.path().join("pins.txt");
        fs::write(&source, "123123\n000000\n999123\n").expect("write");

        let first = run_session(
            temp.path(),
            &RunOptions {
                source: Some(source),
                pause_after: NonZeroUsize::new(1),
                interval: None,
            },
            std::future::pending(),
            |_| {},
        )
        .await
        .expect("first run");
        assert_eq!(first.stop, RunStop::Paused);
        assert_eq!(first.report.cursor, 1);
        assert_eq!(first.report.state, EvalState::Paused);

        let mut first_index = None;
        let second = run_session(
            temp.path(),
            &RunOptions::default(),
            std::future::pending(),
            |event| {
                if let DriverEvent::Stepped { index, .. } = event {
                    first_index.get_or_insert(*index);
                }
            },
        )
        .await
        .expect("second run");
        assert_eq!(first_index, Some(1));
        assert_eq!(second.stop, RunStop::Complete);
        assert_eq!(second.report.rejected, ["123123", "999123"]);
        assert_eq!(second.report.accepted, ["000000"]);

        let saved = session_report(temp.path()).expect("report");
        assert_eq!(saved.progress().to_string(), "Testing complete.");
        assert_eq!(saved.stats_line(), "Tested 3 candidates. Invalid: 2");
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_signal_pauses_and_saves() {
        let temp = tempfile::tempdir().expect("tempdir");
        fast_config(temp.path());
        let source = temp.path().join("pins.txt");
        fs::write(&source, "111111\n222222\n333333\n").expect("write");

        let outcome = run_session(
            temp.path(),
            &RunOptions {
                source: Some(source),
                ..RunOptions::default()
            },
            tokio::time::sleep(Duration::from_millis(500)),
            |_| {},
        )
        .await
        .expect("run");
        assert_eq!(outcome.stop, RunStop::Paused);
        assert_eq!(outcome.report.cursor, 2);
        assert_eq!(session_report(temp.path()).expect("report").cursor, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn interval_below_cap_is_rejected() {
        let temp = tempfile::tempdir().expect("tempdir");
        let err = run_session(
            temp.path(),
            &RunOptions {
                interval: Some(Duration::from_millis(50)),
                ..RunOptions::default()
            },
            std::future::pending(),
            |_| {},
        )
        .await
        .unwrap_err();
        assert!(err.to_string().contains("tick interval"));
    }
}
