//! End-to-end trip scenarios: bridge submission through the trip worker to
//! the final report, against the simulated navigation backend.

mod common;

use common::{fast_trip_config, make_catalog, wait_for_report};

use vipani_cart::bridge::ListBridge;
use vipani_cart::config::SimConfig;
use vipani_cart::error::CartError;
use vipani_cart::nav::SimBackend;
use vipani_cart::threads::TripWorker;
use vipani_cart::trip::TaskOutcome;

fn fast_sim() -> SimConfig {
    SimConfig {
        speed_mps: 10_000.0,
        ..Default::default()
    }
}

#[test]
fn test_full_trip_all_items_succeed() {
    let catalog = make_catalog();
    let backend = SimBackend::new(fast_sim(), catalog.base());
    let (bridge, list_rx) = ListBridge::new();
    let (event_tx, event_rx) = crossbeam_channel::unbounded();
    let worker = TripWorker::spawn(
        fast_trip_config(),
        catalog,
        Box::new(backend),
        list_rx,
        event_tx,
    );

    bridge.submit(r#"["curry roux", "onion", "carrot"]"#).unwrap();

    let report = wait_for_report(&event_rx);
    assert_eq!(report.tasks.len(), 3);
    assert_eq!(report.count(TaskOutcome::Succeeded), 3);
    assert_eq!(report.return_to_base, TaskOutcome::Succeeded);
    assert!(report.tasks.iter().all(|t| t.outcome().is_terminal()));

    worker.shutdown();
}

#[test]
fn test_unknown_item_skipped_rest_of_trip_runs() {
    let catalog = make_catalog();
    let backend = SimBackend::new(fast_sim(), catalog.base());
    let (bridge, list_rx) = ListBridge::new();
    let (event_tx, event_rx) = crossbeam_channel::unbounded();
    let worker = TripWorker::spawn(
        fast_trip_config(),
        catalog,
        Box::new(backend),
        list_rx,
        event_tx,
    );

    bridge.submit(r#"["unknown_item", "onion"]"#).unwrap();

    let report = wait_for_report(&event_rx);
    assert_eq!(report.tasks[0].outcome(), TaskOutcome::Skipped);
    assert_eq!(report.tasks[1].outcome(), TaskOutcome::Succeeded);
    assert_eq!(report.return_to_base, TaskOutcome::Succeeded);

    worker.shutdown();
}

#[test]
fn test_unreachable_shelf_fails_but_trip_continues() {
    let catalog = make_catalog();
    // Block the carrot shelf; everything else is reachable.
    let sim = SimConfig {
        speed_mps: 10_000.0,
        blocked: vec![[10.8, -1.3]],
        blocked_radius: 0.5,
        ..Default::default()
    };
    let backend = SimBackend::new(sim, catalog.base());
    let (bridge, list_rx) = ListBridge::new();
    let (event_tx, event_rx) = crossbeam_channel::unbounded();
    let worker = TripWorker::spawn(
        fast_trip_config(),
        catalog,
        Box::new(backend),
        list_rx,
        event_tx,
    );

    bridge.submit(r#"["carrot", "onion"]"#).unwrap();

    let report = wait_for_report(&event_rx);
    assert_eq!(report.tasks[0].outcome(), TaskOutcome::Failed);
    assert_eq!(report.tasks[1].outcome(), TaskOutcome::Succeeded);
    assert_eq!(report.return_to_base, TaskOutcome::Succeeded);

    worker.shutdown();
}

#[test]
fn test_latest_submission_wins_when_trip_pending() {
    let catalog = make_catalog();
    let backend = SimBackend::new(fast_sim(), catalog.base());
    let (bridge, list_rx) = ListBridge::new();

    // Two submissions queued before the worker starts: the newer list
    // supersedes the older pending one.
    bridge.submit(r#"["onion"]"#).unwrap();
    bridge.submit(r#"["carrot", "curry roux"]"#).unwrap();

    let (event_tx, event_rx) = crossbeam_channel::unbounded();
    let worker = TripWorker::spawn(
        fast_trip_config(),
        catalog,
        Box::new(backend),
        list_rx,
        event_tx,
    );

    let report = wait_for_report(&event_rx);
    assert_eq!(report.generation, 2);
    assert_eq!(report.tasks.len(), 2);
    assert_eq!(report.tasks[0].item.canonical, "carrot");

    worker.shutdown();
}

#[test]
fn test_malformed_submission_starts_no_trip() {
    let (bridge, list_rx) = ListBridge::new();

    let err = bridge.submit(r#"{"items": "not an array"}"#).unwrap_err();
    assert!(matches!(err, CartError::MalformedList(_)));
    assert!(list_rx.try_recv().is_err());
    assert_eq!(bridge.current_generation(), 0);
}

#[test]
fn test_cancel_mid_trip_still_returns_to_base() {
    let catalog = make_catalog();
    // Slow travel so the cancel lands while the first goal is in flight.
    let sim = SimConfig {
        speed_mps: 0.5,
        ..Default::default()
    };
    let backend = SimBackend::new(sim, catalog.base());
    let (bridge, list_rx) = ListBridge::new();
    let (event_tx, event_rx) = crossbeam_channel::unbounded();
    let worker = TripWorker::spawn(
        fast_trip_config(),
        catalog,
        Box::new(backend),
        list_rx,
        event_tx,
    );

    bridge.submit(r#"["onion", "carrot"]"#).unwrap();
    std::thread::sleep(std::time::Duration::from_millis(100));
    worker.cancel_current();

    let report = wait_for_report(&event_rx);
    assert_eq!(report.tasks[0].outcome(), TaskOutcome::Failed);
    assert_eq!(report.tasks[1].outcome(), TaskOutcome::Skipped);
    // Return-to-base is still attempted and completes: the cancelled goal
    // left the robot short of the shelf, and the sim drives it home.
    assert_eq!(report.return_to_base, TaskOutcome::Succeeded);

    worker.shutdown();
}
