//! Checklist reconciliation engine.
//!
//! Maintains the per-item found/unfound state shown during checkout,
//! entirely decoupled from trip execution. Within one shopping-list
//! generation `checked` only ever flips false→true; accepting a new list
//! starts a new generation with every entry unchecked.
//!
//! Matching applies the catalog's bidirectional substring containment
//! between the scanned product's display name and each unchecked entry's
//! target, in stored order, first match wins. Retail display names carry
//! brand and size decoration ("バーモントカレー 中辛" for a "カレールー"
//! list entry), so containment is backed by a common-substring fallback:
//! names sharing a run of at least [`MIN_COMMON_CHARS`] characters match.

use serde::Serialize;

/// Minimum shared character run for the common-substring fallback.
pub const MIN_COMMON_CHARS: usize = 3;

/// One checklist line: target item name and whether a scan satisfied it.
#[derive(Debug, Clone, Serialize)]
pub struct ChecklistEntry {
    pub target: String,
    pub checked: bool,
}

/// The live checklist for the active shopping-list generation.
#[derive(Debug, Clone, Default)]
pub struct Checklist {
    entries: Vec<ChecklistEntry>,
    generation: u64,
}

impl Checklist {
    /// Replace the checklist with a new generation built from the given
    /// display names. All entries start unchecked.
    pub fn replace(&mut self, targets: &[String], generation: u64) {
        self.entries = targets
            .iter()
            .map(|t| ChecklistEntry {
                target: t.clone(),
                checked: false,
            })
            .collect();
        self.generation = generation;
    }

    /// Reconcile one scanned product name against the checklist.
    ///
    /// Flips the first unchecked entry matching the scanned name, and
    /// returns its target. Already-checked entries are skipped, so
    /// repeated scans of a satisfied item are no-ops. A scan matching
    /// nothing leaves the checklist untouched.
    pub fn apply_scan(&mut self, product_name: &str) -> Option<String> {
        for entry in self.entries.iter_mut().filter(|e| !e.checked) {
            if names_match(product_name, &entry.target) {
                entry.checked = true;
                return Some(entry.target.clone());
            }
        }
        None
    }

    /// Current generation number.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// (checked, total) counts for progress display.
    pub fn progress(&self) -> (usize, usize) {
        let checked = self.entries.iter().filter(|e| e.checked).count();
        (checked, self.entries.len())
    }

    pub fn entries(&self) -> &[ChecklistEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Whether a scanned display name satisfies a checklist target.
///
/// Containment either way wins immediately; otherwise the two names must
/// share a common substring of at least [`MIN_COMMON_CHARS`] characters.
pub fn names_match(scanned: &str, target: &str) -> bool {
    let scanned = scanned.to_lowercase();
    let target = target.to_lowercase();

    if scanned.contains(&target) || target.contains(&scanned) {
        return true;
    }

    longest_common_run(&scanned, &target) >= MIN_COMMON_CHARS
}

/// Longest common substring length, counted in characters.
fn longest_common_run(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() || b.is_empty() {
        return 0;
    }

    let mut best = 0;
    let mut prev = vec![0usize; b.len() + 1];
    for &ca in &a {
        let mut row = vec![0usize; b.len() + 1];
        for (j, &cb) in b.iter().enumerate() {
            if ca == cb {
                row[j + 1] = prev[j] + 1;
                best = best.max(row[j + 1]);
            }
        }
        prev = row;
    }
    best
}
