//! Message bridge: carries shopping lists into the trip worker.
//!
//! The bridge validates a submission synchronously (malformed payloads are
//! rejected before anything is queued), stamps it with a fresh generation,
//! and hands it to the worker over a channel with at-most-once delivery per
//! submission. While a trip is executing, newer submissions supersede older
//! pending ones: the worker drains the channel on pickup and keeps only the
//! latest (a fresh submission replaces, never merges).

pub mod messages;

pub use messages::{
    parse_intake, parse_shopping_list, CartUpdateMsg, IntakeMessage, PaymentMsg,
};

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crossbeam_channel::{Receiver, Sender};
use tracing::info;

use crate::error::{CartError, Result};
use crate::list::ShoppingList;

/// Submission side of the bridge. Clone freely; all clones feed the same
/// worker and share the generation counter.
#[derive(Clone)]
pub struct ListBridge {
    tx: Sender<ShoppingList>,
    generation: Arc<AtomicU64>,
}

impl ListBridge {
    /// Create the bridge and the worker-side receiver.
    pub fn new() -> (Self, Receiver<ShoppingList>) {
        let (tx, rx) = crossbeam_channel::unbounded();
        (
            Self {
                tx,
                generation: Arc::new(AtomicU64::new(0)),
            },
            rx,
        )
    }

    /// Validate and submit a shopping-list payload.
    ///
    /// Returns the accepted list (with its new generation) so the caller
    /// can rebuild the checklist; rejects malformed payloads synchronously
    /// without starting a trip.
    pub fn submit(&self, payload: &str) -> Result<ShoppingList> {
        let items = messages::parse_shopping_list(payload)?;
        let generation = self.generation.fetch_add(1, Ordering::Relaxed) + 1;
        let list = ShoppingList::new(items, generation);

        self.tx
            .send(list.clone())
            .map_err(|_| CartError::ChannelClosed("trip worker gone".to_string()))?;
        info!(
            "accepted shopping list generation {} ({} items)",
            generation,
            list.len()
        );
        Ok(list)
    }

    /// Generation of the most recently accepted submission.
    pub fn current_generation(&self) -> u64 {
        self.generation.load(Ordering::Relaxed)
    }
}

/// Worker-side pickup: blockingly receive one submission, then drain any
/// newer ones so the latest pending list wins.
pub fn take_latest(rx: &Receiver<ShoppingList>, first: ShoppingList) -> ShoppingList {
    let mut latest = first;
    for newer in rx.try_iter() {
        info!(
            "shopping list generation {} superseded by {}",
            latest.generation, newer.generation
        );
        latest = newer;
    }
    latest
}
