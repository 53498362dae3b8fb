//! Tick source that drives an [`Evaluator`] on a fixed interval.
//!
//! One tokio task per driver calls [`Evaluator::step`] once per tick. Each
//! spawned task is tagged with an epoch; `pause`, `stop`, `load`, `restore` and
//! `shutdown` bump the epoch so a task that already woke up for a tick sees it
//! is stale and exits without stepping. Steps run entirely under the lock with
//! no `.await`, so readers never see a half-applied step and aborting the task
//! cannot cut a classification short.

use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use thiserror::Error;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::core::candidates::CandidateFilter;
use crate::core::evaluator::{Evaluator, Snapshot, StepOutcome};
use crate::core::probe::Probe;
use crate::core::report::Report;
use crate::core::types::{EvalState, LoadError, SnapshotError, StartError, Verdict};

/// Progress notifications broadcast to subscribers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DriverEvent {
    Started {
        cursor: usize,
        total: usize,
    },
    Stepped {
        index: usize,
        total: usize,
        candidate: String,
        verdict: Verdict,
    },
    Paused {
        cursor: usize,
        total: usize,
    },
    /// The probe failed; the run paused before classifying `index`.
    Halted {
        index: usize,
        reason: String,
    },
    Completed {
        accepted: usize,
        rejected: usize,
    },
}

#[derive(Debug, Error)]
pub enum DriverError {
    #[error(transparent)]
    Start(#[from] StartError),
    #[error("cannot change the tick interval while running")]
    Running,
    #[error("tick interval must be non-zero")]
    ZeroInterval,
}

struct Inner<P> {
    evaluator: Evaluator<P>,
    epoch: u64,
}

struct Shared<P> {
    inner: Mutex<Inner<P>>,
    events: broadcast::Sender<DriverEvent>,
}

impl<P> Shared<P> {
    fn lock(&self) -> MutexGuard<'_, Inner<P>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn emit(&self, event: DriverEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }
}

pub struct TickDriver<P> {
    shared: Arc<Shared<P>>,
    interval: Duration,
    step_budget: Option<NonZeroUsize>,
    task: Option<JoinHandle<()>>,
}

impl<P> TickDriver<P>
where
    P: Probe + Send + 'static,
{
    pub fn new(evaluator: Evaluator<P>, interval: Duration) -> Result<Self, DriverError> {
        if interval.is_zero() {
            return Err(DriverError::ZeroInterval);
        }
        let (events, _) = broadcast::channel(64);
        Ok(Self {
            shared: Arc::new(Shared {
                inner: Mutex::new(Inner {
                    evaluator,
                    epoch: 0,
                }),
                events,
            }),
            interval,
            step_budget: None,
            task: None,
        })
    }

    pub fn subscribe(&self) -> broadcast::Receiver<DriverEvent> {
        self.shared.events.subscribe()
    }

    /// Change the tick interval. Only allowed while no run is active.
    pub fn set_interval(&mut self, interval: Duration) -> Result<(), DriverError> {
        if interval.is_zero() {
            return Err(DriverError::ZeroInterval);
        }
        if self.state() == EvalState::Running {
            return Err(DriverError::Running);
        }
        self.interval = interval;
        Ok(())
    }

    /// Pause automatically after `budget` steps of every run started later.
    pub fn set_step_budget(&mut self, budget: Option<NonZeroUsize>) {
        self.step_budget = budget;
    }

    /// Start or resume the run and spawn the tick task.
    ///
    /// Must be called from within a tokio runtime. A second call while running
    /// fails with [`StartError::AlreadyRunning`] and spawns nothing.
    pub fn start(&mut self) -> Result<(), DriverError> {
        let epoch = {
            let mut inner = self.shared.lock();
            inner.evaluator.start()?;
            inner.epoch += 1;
            self.shared.emit(DriverEvent::Started {
                cursor: inner.evaluator.cursor(),
                total: inner.evaluator.total(),
            });
            inner.epoch
        };
        self.cancel_task();
        info!(epoch, interval_ms = self.interval.as_millis() as u64, "evaluation started");
        self.task = Some(tokio::spawn(run_ticks(
            Arc::clone(&self.shared),
            epoch,
            self.interval,
            self.step_budget,
        )));
        Ok(())
    }

    /// Pause the run. Returns false if it was not running.
    pub fn pause(&mut self) -> bool {
        let paused = {
            let mut inner = self.shared.lock();
            inner.epoch += 1;
            let paused = inner.evaluator.pause();
            if paused {
                self.shared.emit(DriverEvent::Paused {
                    cursor: inner.evaluator.cursor(),
                    total: inner.evaluator.total(),
                });
            }
            paused
        };
        self.cancel_task();
        if paused {
            info!("evaluation paused");
        }
        paused
    }

    /// Same as [`TickDriver::pause`].
    pub fn stop(&mut self) -> bool {
        self.pause()
    }

    /// Replace the candidate list. A failed load leaves the current run alone.
    pub fn load<I, S, F>(&mut self, raw_lines: I, filter: &F) -> Result<usize, LoadError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        F: CandidateFilter + ?Sized,
    {
        let total = {
            let mut inner = self.shared.lock();
            let total = inner.evaluator.load(raw_lines, filter)?;
            inner.epoch += 1;
            total
        };
        self.cancel_task();
        debug!(total, "candidates loaded");
        Ok(total)
    }

    /// Replace the current cycle with a saved one. Stops any active run.
    pub fn restore(&mut self, snapshot: Snapshot) -> Result<(), SnapshotError> {
        {
            let mut inner = self.shared.lock();
            inner.evaluator.restore(snapshot)?;
            inner.epoch += 1;
        }
        self.cancel_task();
        Ok(())
    }

    pub fn state(&self) -> EvalState {
        self.shared.lock().evaluator.state()
    }

    pub fn report(&self) -> Report {
        self.shared.lock().evaluator.report()
    }

    pub fn snapshot(&self) -> Snapshot {
        self.shared.lock().evaluator.snapshot()
    }

    /// True while a tick task exists and has not finished.
    pub fn is_active(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Pause, wait for the tick task to end and return the final report.
    pub async fn shutdown(mut self) -> Report {
        let task = self.task.take();
        self.pause();
        if let Some(task) = task {
            task.abort();
            if let Err(err) = task.await {
                if !err.is_cancelled() {
                    warn!(error = %err, "tick task failed");
                }
            }
        }
        self.report()
    }

    fn cancel_task(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

async fn run_ticks<P: Probe>(
    shared: Arc<Shared<P>>,
    epoch: u64,
    period: Duration,
    budget: Option<NonZeroUsize>,
) {
    let mut ticker = time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut steps = 0usize;

    loop {
        ticker.tick().await;
        let keep_going = {
            let mut inner = shared.lock();
            if inner.epoch != epoch {
                debug!(epoch, current = inner.epoch, "stale tick task exiting");
                return;
            }
            let total = inner.evaluator.total();
            match inner.evaluator.step() {
                StepOutcome::Classified {
                    index,
                    candidate,
                    verdict,
                    complete,
                } => {
                    debug!(index, total, ?verdict, "candidate classified");
                    shared.emit(DriverEvent::Stepped {
                        index,
                        total,
                        candidate,
                        verdict,
                    });
                    if complete {
                        let accepted = inner.evaluator.accepted().len();
                        let rejected = inner.evaluator.rejected().len();
                        info!(accepted, rejected, "evaluation complete");
                        shared.emit(DriverEvent::Completed { accepted, rejected });
                        return;
                    }
                    steps += 1;
                    if budget.is_some_and(|limit| steps >= limit.get()) {
                        inner.evaluator.pause();
                        info!(steps, "step budget reached, pausing");
                        shared.emit(DriverEvent::Paused {
                            cursor: inner.evaluator.cursor(),
                            total,
                        });
                        return;
                    }
                    true
                }
                StepOutcome::Halted { index, error } => {
                    warn!(index, error = %error, "evaluation halted");
                    shared.emit(DriverEvent::Halted {
                        index,
                        reason: error.to_string(),
                    });
                    false
                }
                StepOutcome::NotRunning => false,
            }
        };
        if !keep_going {
            return;
        }
    }
}
