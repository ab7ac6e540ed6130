//! Shared helpers for integration tests.

use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::Receiver;
use vipani_cart::catalog::{CatalogEntry, GoalPose, LocationCatalog};
use vipani_cart::config::TripConfig;
use vipani_cart::trip::{TripEvent, TripReport};

/// Supermarket catalog used across scenarios: three shelves plus a base.
pub fn make_catalog() -> Arc<LocationCatalog> {
    Arc::new(LocationCatalog::new(
        vec![
            CatalogEntry {
                key: "curry roux".to_string(),
                pose: GoalPose::new(6.5, 7.9, 1.57),
            },
            CatalogEntry {
                key: "onion".to_string(),
                pose: GoalPose::new(8.4, -1.2, 1.57),
            },
            CatalogEntry {
                key: "carrot".to_string(),
                pose: GoalPose::new(10.8, -1.3, 1.57),
            },
        ],
        GoalPose::new(4.3, -1.6, -1.57),
    ))
}

/// Trip tuning that keeps scenarios fast: tight polling, no dwell.
pub fn fast_trip_config() -> TripConfig {
    TripConfig {
        poll_interval_ms: 1,
        dwell_secs: 0.0,
        feedback_log_every: 1000,
        readiness_timeout_secs: 1.0,
    }
}

/// Block until the next `TripFinished` event and return its report.
pub fn wait_for_report(events: &Receiver<TripEvent>) -> TripReport {
    let deadline = Duration::from_secs(10);
    loop {
        match events.recv_timeout(deadline).expect("trip never finished") {
            TripEvent::TripFinished { report } => return report,
            _ => continue,
        }
    }
}
