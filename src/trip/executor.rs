//! Trip executor: drives the navigation backend through a shopping list.
//!
//! For each item in list order the executor resolves a shelf pose, issues a
//! goal, and waits cooperatively for the backend to settle - polling status
//! at a bounded interval so an external cancel request is observed within
//! sub-second latency. Unresolved items are skipped and failed goals are
//! non-fatal; the trip always ends with a mandatory return-to-base goal
//! whose outcome is recorded separately.
//!
//! Every goal issuance, feedback sample, and outcome transition is emitted
//! as a [`TripEvent`] on an optional channel, independent of the final
//! [`TripReport`].

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossbeam_channel::Sender;
use tracing::{error, info, warn};

use crate::catalog::{GoalPose, LocationCatalog};
use crate::config::TripConfig;
use crate::error::{CartError, Result};
use crate::list::ShoppingList;
use crate::nav::{GoalStatus, NavBackend};
use crate::trip::{TaskOutcome, TripReport, TripTask};

/// Progress event emitted while a trip executes.
#[derive(Debug, Clone)]
pub enum TripEvent {
    /// A navigation goal was issued for the task at `index`.
    GoalIssued { index: usize, pose: GoalPose },
    /// Best-effort remaining distance for the task at `index`.
    Feedback { index: usize, remaining_m: f32 },
    /// The task at `index` reached a terminal outcome.
    TaskFinished { index: usize, outcome: TaskOutcome },
    /// The mandatory return-to-base goal was issued.
    BaseGoalIssued { pose: GoalPose },
    /// The whole trip finished, base outcome included.
    TripFinished { report: TripReport },
    /// A submission could not start (backend unavailable); surfaced, never
    /// silently dropped.
    SubmissionFailed { generation: u64, reason: String },
}

/// What the wait loop observed for one goal.
enum GoalResult {
    Succeeded,
    Failed,
    Cancelled,
}

/// Executes trips against a navigation backend.
///
/// Owned by the single trip worker; the only component allowed to issue
/// goals.
pub struct TripExecutor {
    config: TripConfig,
    catalog: Arc<LocationCatalog>,
    cancel: Arc<AtomicBool>,
    events: Option<Sender<TripEvent>>,
}

impl TripExecutor {
    pub fn new(
        config: TripConfig,
        catalog: Arc<LocationCatalog>,
        cancel: Arc<AtomicBool>,
        events: Option<Sender<TripEvent>>,
    ) -> Self {
        Self {
            config,
            catalog,
            cancel,
            events,
        }
    }

    /// Block until the backend reports ready, bounded by the configured
    /// readiness timeout.
    pub fn wait_until_ready(&self, backend: &mut dyn NavBackend) -> Result<()> {
        let deadline =
            Instant::now() + Duration::from_secs_f32(self.config.readiness_timeout_secs);
        while !backend.is_ready() {
            if Instant::now() >= deadline {
                return Err(CartError::BackendUnavailable(format!(
                    "backend not ready after {:.0}s",
                    self.config.readiness_timeout_secs
                )));
            }
            std::thread::sleep(Duration::from_millis(self.config.poll_interval_ms));
        }
        Ok(())
    }

    /// Execute one trip end to end and return the full report.
    ///
    /// Never fails: resolution and navigation failures are recorded per
    /// task and the return-to-base outcome is always produced.
    pub fn execute_trip(&self, backend: &mut dyn NavBackend, list: &ShoppingList) -> TripReport {
        info!(
            "starting trip generation {} with {} items",
            list.generation,
            list.len()
        );

        let mut tasks: Vec<TripTask> = list.items.iter().map(TripTask::new).collect();
        let mut cancelled = false;

        for index in 0..tasks.len() {
            if cancelled {
                tasks[index].finish(TaskOutcome::Skipped);
                self.emit_finished(index, &tasks[index]);
                continue;
            }

            let Some(pose) = self.resolve_task(index, &mut tasks[index]) else {
                self.emit_finished(index, &tasks[index]);
                continue;
            };

            self.emit(TripEvent::GoalIssued { index, pose });
            match self.navigate(backend, Some(index), pose) {
                GoalResult::Succeeded => {
                    tasks[index].finish(TaskOutcome::Succeeded);
                    info!(
                        "arrived at '{}', picking up",
                        tasks[index].item.canonical
                    );
                    // Dwell models the physical pick-up; cancel cuts it short.
                    if !self.dwell() {
                        cancelled = true;
                    }
                }
                GoalResult::Failed => {
                    error!("failed to reach '{}'", tasks[index].item.canonical);
                    tasks[index].finish(TaskOutcome::Failed);
                }
                GoalResult::Cancelled => {
                    warn!(
                        "goal for '{}' cancelled, heading back to base",
                        tasks[index].item.canonical
                    );
                    tasks[index].finish(TaskOutcome::Failed);
                    cancelled = true;
                }
            }
            self.emit_finished(index, &tasks[index]);
        }

        // Mandatory return to base, cancelled or not. A cancel observed
        // above was consumed; clear the flag so the base goal can run.
        self.cancel.store(false, Ordering::Relaxed);
        let base = self.catalog.base();
        info!("returning to base at ({:.2}, {:.2})", base.x, base.y);
        self.emit(TripEvent::BaseGoalIssued { pose: base });
        let return_to_base = match self.navigate(backend, None, base) {
            GoalResult::Succeeded => TaskOutcome::Succeeded,
            GoalResult::Failed | GoalResult::Cancelled => TaskOutcome::Failed,
        };

        let report = TripReport {
            generation: list.generation,
            tasks,
            return_to_base,
        };
        self.emit(TripEvent::TripFinished {
            report: report.clone(),
        });
        info!(
            "trip generation {} done: {} succeeded, {} failed, {} skipped, base {}",
            report.generation,
            report.count(TaskOutcome::Succeeded),
            report.count(TaskOutcome::Failed),
            report.count(TaskOutcome::Skipped),
            report.return_to_base.as_str()
        );
        report
    }

    /// Resolve one task's shelf pose; records `Skipped` on failure.
    fn resolve_task(&self, index: usize, task: &mut TripTask) -> Option<GoalPose> {
        match self.catalog.resolve(&task.item.canonical) {
            Some(entry) => {
                info!(
                    "item {} '{}' resolved to '{}' at ({:.2}, {:.2})",
                    index, task.item.canonical, entry.key, entry.pose.x, entry.pose.y
                );
                task.resolved = Some(entry.pose);
                Some(entry.pose)
            }
            None => {
                warn!(
                    "item {} '{}' not found in catalog, skipping",
                    index, task.item.canonical
                );
                task.finish(TaskOutcome::Skipped);
                None
            }
        }
    }

    /// Issue one goal and wait cooperatively for a terminal status.
    ///
    /// `index` is `Some` for list items and `None` for the base goal.
    fn navigate(
        &self,
        backend: &mut dyn NavBackend,
        index: Option<usize>,
        pose: GoalPose,
    ) -> GoalResult {
        let handle = match backend.submit_goal(pose) {
            Ok(h) => h,
            Err(e) => {
                error!("goal submission failed: {}", e);
                return GoalResult::Failed;
            }
        };

        let interval = Duration::from_millis(self.config.poll_interval_ms);
        let mut cancel_requested = false;
        let mut polls: u32 = 0;

        loop {
            let status = backend.poll_status(handle);
            if status.is_terminal() {
                return match status {
                    GoalStatus::Succeeded => GoalResult::Succeeded,
                    GoalStatus::Cancelled => GoalResult::Cancelled,
                    _ => GoalResult::Failed,
                };
            }

            // Forward an external cancel request once, then keep polling so
            // the goal still settles with completion accounting.
            if !cancel_requested && self.cancel.load(Ordering::Relaxed) {
                cancel_requested = true;
                if let Err(e) = backend.cancel_goal(handle) {
                    error!("cancel request failed: {}", e);
                }
            }

            polls += 1;
            if polls % self.config.feedback_log_every.max(1) == 0 {
                if let Some(remaining) = backend.progress_feedback(handle) {
                    info!("distance remaining: {:.2}m", remaining);
                    if let Some(index) = index {
                        self.emit(TripEvent::Feedback {
                            index,
                            remaining_m: remaining,
                        });
                    }
                }
            }

            std::thread::sleep(interval);
        }
    }

    /// Hold position for the configured pick-up dwell.
    ///
    /// Returns `false` if a cancel request arrived during the dwell.
    fn dwell(&self) -> bool {
        let deadline = Instant::now() + Duration::from_secs_f32(self.config.dwell_secs);
        let slice = Duration::from_millis(self.config.poll_interval_ms);
        while Instant::now() < deadline {
            if self.cancel.load(Ordering::Relaxed) {
                return false;
            }
            std::thread::sleep(slice.min(deadline.saturating_duration_since(Instant::now())));
        }
        !self.cancel.load(Ordering::Relaxed)
    }

    fn emit(&self, event: TripEvent) {
        if let Some(tx) = &self.events {
            tx.send(event).ok();
        }
    }

    fn emit_finished(&self, index: usize, task: &TripTask) {
        self.emit(TripEvent::TaskFinished {
            index,
            outcome: task.outcome(),
        });
    }
}
