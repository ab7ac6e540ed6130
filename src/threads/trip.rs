//! Trip worker thread.
//!
//! Drains shopping-list submissions from the bridge, waits for backend
//! readiness, and runs one trip at a time. Submissions arriving while a
//! trip executes wait in the channel; on pickup the worker keeps only the
//! latest pending one.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};
use tracing::{error, info};

use crate::bridge::take_latest;
use crate::catalog::LocationCatalog;
use crate::config::TripConfig;
use crate::list::ShoppingList;
use crate::nav::NavBackend;
use crate::trip::{TripEvent, TripExecutor};

/// Handle to the spawned trip worker.
pub struct TripWorker {
    handle: JoinHandle<()>,
    cancel: Arc<AtomicBool>,
    shutdown: Arc<AtomicBool>,
}

impl TripWorker {
    /// Spawn the worker.
    ///
    /// The worker takes sole ownership of the backend; no other component
    /// may issue goals.
    pub fn spawn(
        config: TripConfig,
        catalog: Arc<LocationCatalog>,
        mut backend: Box<dyn NavBackend>,
        list_rx: Receiver<ShoppingList>,
        events: Sender<TripEvent>,
    ) -> Self {
        let cancel = Arc::new(AtomicBool::new(false));
        let shutdown = Arc::new(AtomicBool::new(false));

        let worker_cancel = Arc::clone(&cancel);
        let worker_shutdown = Arc::clone(&shutdown);

        let handle = thread::Builder::new()
            .name("trip".into())
            .spawn(move || {
                let executor = TripExecutor::new(
                    config,
                    catalog,
                    worker_cancel,
                    Some(events.clone()),
                );
                run(&executor, &mut *backend, &list_rx, &events, &worker_shutdown);
            })
            .expect("Failed to spawn trip thread");

        Self {
            handle,
            cancel,
            shutdown,
        }
    }

    /// Request cancellation of the currently navigating goal. The trip
    /// proceeds to its return-to-base step.
    pub fn cancel_current(&self) {
        self.cancel.store(true, Ordering::Relaxed);
    }

    /// Signal shutdown and wait for the worker to drain.
    pub fn shutdown(self) {
        self.shutdown.store(true, Ordering::Relaxed);
        if self.handle.join().is_err() {
            error!("trip thread panicked");
        }
    }
}

fn run(
    executor: &TripExecutor,
    backend: &mut dyn NavBackend,
    list_rx: &Receiver<ShoppingList>,
    events: &Sender<TripEvent>,
    shutdown: &AtomicBool,
) {
    info!("trip worker started");

    loop {
        if shutdown.load(Ordering::Relaxed) {
            info!("trip worker shutting down");
            break;
        }

        let list = match list_rx.recv_timeout(Duration::from_millis(200)) {
            Ok(first) => take_latest(list_rx, first),
            Err(RecvTimeoutError::Timeout) => continue,
            Err(RecvTimeoutError::Disconnected) => {
                info!("submission channel closed, trip worker exiting");
                break;
            }
        };

        if let Err(e) = executor.wait_until_ready(backend) {
            error!("generation {} not started: {}", list.generation, e);
            events
                .send(TripEvent::SubmissionFailed {
                    generation: list.generation,
                    reason: e.to_string(),
                })
                .ok();
            continue;
        }

        executor.execute_trip(backend, &list);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CatalogEntry, GoalPose};
    use crate::config::SimConfig;
    use crate::error::Result;
    use crate::nav::{GoalHandle, GoalStatus, SimBackend};
    use crate::trip::TaskOutcome;

    fn catalog() -> Arc<LocationCatalog> {
        Arc::new(LocationCatalog::new(
            vec![CatalogEntry {
                key: "onion".to_string(),
                pose: GoalPose::new(1.0, 0.0, 0.0),
            }],
            GoalPose::new(0.0, 0.0, 0.0),
        ))
    }

    fn fast_config() -> TripConfig {
        TripConfig {
            poll_interval_ms: 1,
            dwell_secs: 0.0,
            feedback_log_every: 10,
            readiness_timeout_secs: 0.05,
        }
    }

    #[test]
    fn test_worker_runs_trip_and_shuts_down() {
        let backend = SimBackend::new(
            SimConfig {
                speed_mps: 1000.0,
                ..Default::default()
            },
            GoalPose::new(0.0, 0.0, 0.0),
        );
        let (list_tx, list_rx) = crossbeam_channel::unbounded();
        let (event_tx, event_rx) = crossbeam_channel::unbounded();

        let worker = TripWorker::spawn(
            fast_config(),
            catalog(),
            Box::new(backend),
            list_rx,
            event_tx,
        );

        list_tx
            .send(ShoppingList::new(
                vec![crate::list::ShoppingItem::monolingual("onion")],
                1,
            ))
            .unwrap();

        // The trip finishes and reports through the event channel.
        let report = loop {
            match event_rx.recv_timeout(Duration::from_secs(5)).unwrap() {
                TripEvent::TripFinished { report } => break report,
                _ => continue,
            }
        };
        assert_eq!(report.tasks.len(), 1);
        assert_eq!(report.tasks[0].outcome(), TaskOutcome::Succeeded);
        assert_eq!(report.return_to_base, TaskOutcome::Succeeded);

        worker.shutdown();
    }

    #[test]
    fn test_worker_surfaces_backend_unavailable() {
        struct NeverReady;
        impl NavBackend for NeverReady {
            fn is_ready(&self) -> bool {
                false
            }
            fn submit_goal(&mut self, _pose: GoalPose) -> Result<GoalHandle> {
                unreachable!("not-ready backend must never receive goals")
            }
            fn poll_status(&mut self, _handle: GoalHandle) -> GoalStatus {
                GoalStatus::Pending
            }
            fn progress_feedback(&mut self, _handle: GoalHandle) -> Option<f32> {
                None
            }
            fn cancel_goal(&mut self, _handle: GoalHandle) -> Result<()> {
                Ok(())
            }
        }

        let (list_tx, list_rx) = crossbeam_channel::unbounded();
        let (event_tx, event_rx) = crossbeam_channel::unbounded();
        let worker = TripWorker::spawn(
            fast_config(),
            catalog(),
            Box::new(NeverReady),
            list_rx,
            event_tx,
        );

        list_tx
            .send(ShoppingList::new(
                vec![crate::list::ShoppingItem::monolingual("onion")],
                7,
            ))
            .unwrap();

        match event_rx.recv_timeout(Duration::from_secs(5)).unwrap() {
            TripEvent::SubmissionFailed { generation, .. } => assert_eq!(generation, 7),
            other => panic!("expected SubmissionFailed, got {:?}", other),
        }

        worker.shutdown();
    }
}
