//! VipaniCart - cart-assist robot orchestrator.
//!
//! Wires the trip worker to a simulated navigation backend and drives the
//! session from a line protocol on stdin:
//!
//! ```text
//! list ["curry roux","onion","carrot"]   submit a shopping list (JSON)
//! scan 4902102000186                     ingest a barcode
//! cancel                                 cancel the current goal
//! pay                                    confirm checkout
//! quit                                   shut down
//! ```
//!
//! Trip progress and cart updates are reported through tracing output.

use std::io::BufRead;
use std::path::Path;
use std::sync::Arc;

use tracing::{error, info, warn};

use vipani_cart::bridge::{ListBridge, PaymentMsg};
use vipani_cart::catalog::LocationCatalog;
use vipani_cart::config::CartConfig;
use vipani_cart::error::Result;
use vipani_cart::nav::SimBackend;
use vipani_cart::scanner::{Ingest, Scanner};
use vipani_cart::session::SharedSession;
use vipani_cart::threads::TripWorker;
use vipani_cart::trip::TripEvent;

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("vipani_cart=info".parse().unwrap()),
        )
        .init();

    // Parse command line arguments
    let args: Vec<String> = std::env::args().collect();
    let config = if args.len() > 1 {
        let config_path = Path::new(&args[1]);
        info!("Loading configuration from {:?}", config_path);
        CartConfig::load(config_path)?
    } else if Path::new("vipani.toml").exists() {
        info!("Loading configuration from vipani.toml");
        CartConfig::load(Path::new("vipani.toml"))?
    } else {
        info!("Using default configuration");
        CartConfig::default()
    };

    let catalog = Arc::new(LocationCatalog::from_config(&config.catalog));
    if catalog.is_empty() {
        warn!("catalog has no shelf entries; every item will be skipped");
    }
    info!(
        "catalog loaded: {} shelf entries, base at ({:.2}, {:.2})",
        catalog.len(),
        catalog.base().x,
        catalog.base().y
    );

    let session = SharedSession::new();
    let mut scanner = Scanner::from_config(&config.scanner);

    // Simulated backend starting parked at the base/cashier pose.
    let backend = SimBackend::new(config.sim.clone(), catalog.base());

    let (bridge, list_rx) = ListBridge::new();
    let (event_tx, event_rx) = crossbeam_channel::unbounded();
    let worker = TripWorker::spawn(
        config.trip.clone(),
        Arc::clone(&catalog),
        Box::new(backend),
        list_rx,
        event_tx,
    );

    // Progress reporter: turns trip events into log lines.
    let reporter = std::thread::Builder::new()
        .name("reporter".into())
        .spawn(move || {
            for event in event_rx {
                match event {
                    TripEvent::GoalIssued { index, pose } => {
                        info!("goal {} issued at ({:.2}, {:.2})", index, pose.x, pose.y);
                    }
                    TripEvent::Feedback { index, remaining_m } => {
                        info!("goal {}: {:.2}m remaining", index, remaining_m);
                    }
                    TripEvent::TaskFinished { index, outcome } => {
                        info!("task {} finished: {}", index, outcome.as_str());
                    }
                    TripEvent::BaseGoalIssued { pose } => {
                        info!("returning to base at ({:.2}, {:.2})", pose.x, pose.y);
                    }
                    TripEvent::TripFinished { report } => match serde_json::to_string(&report) {
                        Ok(json) => info!("trip report: {}", json),
                        Err(e) => error!("failed to serialize trip report: {}", e),
                    },
                    TripEvent::SubmissionFailed { generation, reason } => {
                        error!("submission generation {} failed: {}", generation, reason);
                    }
                }
            }
        })
        .expect("Failed to spawn reporter thread");

    info!("ready; type 'list [..]', 'scan <code>', 'cancel', 'pay' or 'quit'");

    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        let line = line.trim();

        if let Some(payload) = line.strip_prefix("list ") {
            match bridge.submit(payload) {
                Ok(list) => session.accept_list(&list),
                Err(e) => error!("submission rejected: {}", e),
            }
        } else if let Some(code) = line.strip_prefix("scan ") {
            match scanner.ingest(code.trim()) {
                Ingest::Accepted(event) => {
                    let outcome = session.on_scan(&event);
                    match serde_json::to_string(&outcome.cart_update) {
                        Ok(json) => info!("cart update: {}", json),
                        Err(e) => error!("failed to serialize cart update: {}", e),
                    }
                    match outcome.matched {
                        Some(target) => info!(
                            "checklist: '{}' found ({}/{})",
                            target, outcome.progress.0, outcome.progress.1
                        ),
                        None => info!("scan matched no checklist entry"),
                    }
                }
                Ingest::Suppressed => info!("duplicate scan suppressed"),
                Ingest::Unknown(code) => warn!("unregistered barcode: {}", code),
            }
        } else if line == "cancel" {
            warn!("cancel requested");
            worker.cancel_current();
        } else if line == "pay" {
            let total = session.complete_payment();
            match serde_json::to_string(&PaymentMsg::new(total)) {
                Ok(json) => info!("payment: {}", json),
                Err(e) => error!("failed to serialize payment message: {}", e),
            }
        } else if line == "quit" {
            break;
        } else if !line.is_empty() {
            warn!("unknown command: {}", line);
        }
    }

    info!("shutting down");
    worker.shutdown();
    drop(bridge);
    reporter.join().ok();
    Ok(())
}
