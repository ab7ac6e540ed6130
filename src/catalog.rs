//! Store catalog and item location resolution.
//!
//! The [`LocationCatalog`] holds the static shelf map: canonical item keys
//! with their poses in the shared map frame, plus the base/cashier pose.
//! [`LocationCatalog::resolve`] implements the item-name lookup used by both
//! the trip executor and the checklist engine:
//!
//! - the input is lowercased,
//! - keys are scanned in declared order,
//! - a key matches if it contains the input or the input contains the key,
//! - the first match wins (no scoring, no longest-match preference).
//!
//! The lookup is a pure function of the input string and the static catalog,
//! so it is safe to call concurrently from any thread.

use crate::config::CatalogConfig;
use serde::{Deserialize, Serialize};

/// A navigation goal pose in the shared map frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GoalPose {
    pub x: f32,
    pub y: f32,
    /// Heading in radians (0 = +X axis).
    pub heading: f32,
}

impl GoalPose {
    pub fn new(x: f32, y: f32, heading: f32) -> Self {
        Self { x, y, heading }
    }

    /// Straight-line distance to another pose, ignoring heading.
    pub fn distance_to(&self, other: &GoalPose) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }
}

impl From<[f32; 3]> for GoalPose {
    fn from(p: [f32; 3]) -> Self {
        Self::new(p[0], p[1], p[2])
    }
}

/// One shelf entry: canonical key and its pose.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogEntry {
    pub key: String,
    pub pose: GoalPose,
}

/// Static shelf catalog. Read-only after construction.
#[derive(Debug, Clone)]
pub struct LocationCatalog {
    entries: Vec<CatalogEntry>,
    base: GoalPose,
}

impl LocationCatalog {
    /// Build a catalog from explicit entries and a base pose.
    ///
    /// Entry order is preserved and determines resolution priority.
    pub fn new(entries: Vec<CatalogEntry>, base: GoalPose) -> Self {
        Self { entries, base }
    }

    /// Build a catalog from the `[catalog]` config section.
    pub fn from_config(config: &CatalogConfig) -> Self {
        let entries = config
            .items
            .iter()
            .map(|item| CatalogEntry {
                key: item.key.clone(),
                pose: item.position.into(),
            })
            .collect();

        Self {
            entries,
            base: config.base.into(),
        }
    }

    /// Resolve a free-text item name to a catalog entry.
    ///
    /// Returns `None` if no key has a substring relation with the
    /// (lowercased) input. The base pose is never a candidate.
    pub fn resolve(&self, item_name: &str) -> Option<&CatalogEntry> {
        let needle = item_name.to_lowercase();
        self.entries
            .iter()
            .find(|entry| entry.key.contains(&needle) || needle.contains(&entry.key))
    }

    /// The base/cashier pose the robot returns to after every trip.
    pub fn base(&self) -> GoalPose {
        self.base
    }

    /// Number of shelf entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over entries in declared order.
    pub fn entries(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.iter()
    }
}
