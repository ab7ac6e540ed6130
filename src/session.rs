//! Shared shopping-session state.
//!
//! One explicit [`Session`] object owns the cart and the checklist for the
//! active list generation, passed by handle into the components that need
//! it instead of living in ambient process-wide state. Scan reconciliation
//! is the only writer of both structures; the trip worker never touches
//! them, so one mutex around the pair is all the locking discipline needed.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::info;

use crate::bridge::CartUpdateMsg;
use crate::checklist::Checklist;
use crate::list::ShoppingList;
use crate::scanner::{CartState, ScanEvent};

/// Result of reconciling one scan against the session.
#[derive(Debug, Clone)]
pub struct ScanOutcome {
    /// Checklist target the scan satisfied, if any.
    pub matched: Option<String>,
    /// Cart notification reflecting the scan.
    pub cart_update: CartUpdateMsg,
    /// (checked, total) checklist progress after the scan.
    pub progress: (usize, usize),
}

/// Cart + checklist for one shopping session.
#[derive(Debug, Default)]
pub struct Session {
    cart: CartState,
    checklist: Checklist,
}

/// Thread-safe handle to the session.
#[derive(Clone, Default)]
pub struct SharedSession {
    inner: Arc<Mutex<Session>>,
}

impl SharedSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept a new shopping-list generation: rebuild the checklist with
    /// every entry unchecked.
    pub fn accept_list(&self, list: &ShoppingList) {
        let mut session = self.inner.lock();
        session
            .checklist
            .replace(&list.display_names(), list.generation);
        info!(
            "checklist rebuilt for generation {} ({} entries)",
            list.generation,
            list.len()
        );
    }

    /// Reconcile one scan: accumulate into the cart and update the
    /// checklist. The two are separate concerns sharing the event; a scan
    /// matching no checklist entry still lands in the cart.
    pub fn on_scan(&self, event: &ScanEvent) -> ScanOutcome {
        let mut session = self.inner.lock();
        session.cart.add(event);
        let matched = session.checklist.apply_scan(&event.name);
        ScanOutcome {
            matched,
            cart_update: CartUpdateMsg::from_cart(&event.name, &session.cart),
            progress: session.checklist.progress(),
        }
    }

    /// Cart total in whole yen.
    pub fn cart_total(&self) -> u32 {
        self.inner.lock().cart.total_price()
    }

    /// Checkout confirmed: returns the final total and clears the cart.
    pub fn complete_payment(&self) -> u32 {
        let mut session = self.inner.lock();
        let total = session.cart.total_price();
        session.cart.clear();
        total
    }

    /// Explicit cart-clear; the checklist survives (only list replacement
    /// resets checked state).
    pub fn clear_cart(&self) {
        self.inner.lock().cart.clear();
    }

    /// Snapshot of (checked, total) checklist progress.
    pub fn checklist_progress(&self) -> (usize, usize) {
        self.inner.lock().checklist.progress()
    }
}
