//! Trip task types.
//!
//! A [`TripTask`] is the unit of work for navigating to and collecting one
//! shopping-list item. Its outcome is write-once per trip attempt: once a
//! terminal outcome is recorded it is never overwritten, so the report the
//! executor hands back is an append-only account of what happened.

use crate::catalog::GoalPose;
use crate::list::ShoppingItem;
use serde::Serialize;
use tracing::warn;

/// Terminal (and initial) outcome of one trip task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskOutcome {
    /// Not yet attempted.
    #[default]
    Pending,
    /// Robot reached the shelf and dwelled for pick-up.
    Succeeded,
    /// Backend reported failed or cancelled for this goal.
    Failed,
    /// Item did not resolve to a catalog entry, or the trip was cancelled
    /// before this item was attempted.
    Skipped,
}

impl TaskOutcome {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, TaskOutcome::Pending)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskOutcome::Pending => "pending",
            TaskOutcome::Succeeded => "succeeded",
            TaskOutcome::Failed => "failed",
            TaskOutcome::Skipped => "skipped",
        }
    }
}

/// One shopping-list item's navigation work for the current trip.
#[derive(Debug, Clone, Serialize)]
pub struct TripTask {
    pub item: ShoppingItem,
    /// Resolved shelf pose, `None` when resolution failed.
    pub resolved: Option<GoalPose>,
    outcome: TaskOutcome,
}

impl TripTask {
    pub fn new(item: &ShoppingItem) -> Self {
        Self {
            item: item.clone(),
            resolved: None,
            outcome: TaskOutcome::Pending,
        }
    }

    pub fn outcome(&self) -> TaskOutcome {
        self.outcome
    }

    /// Record the terminal outcome. Write-once: a second terminal write is
    /// ignored and logged, never applied.
    pub fn finish(&mut self, outcome: TaskOutcome) {
        if self.outcome.is_terminal() {
            warn!(
                "ignoring outcome {} for '{}': already {}",
                outcome.as_str(),
                self.item.canonical,
                self.outcome.as_str()
            );
            return;
        }
        self.outcome = outcome;
    }
}

/// Final account of one trip: every task in terminal state plus exactly one
/// return-to-base outcome.
#[derive(Debug, Clone, Serialize)]
pub struct TripReport {
    pub generation: u64,
    pub tasks: Vec<TripTask>,
    pub return_to_base: TaskOutcome,
}

impl TripReport {
    /// Count of tasks with the given outcome.
    pub fn count(&self, outcome: TaskOutcome) -> usize {
        self.tasks.iter().filter(|t| t.outcome() == outcome).count()
    }
}
