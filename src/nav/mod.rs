//! Navigation backend abstraction.
//!
//! The low-level navigation stack (path planning, localization, motor
//! control) is an external collaborator. It accepts one goal at a time and
//! reports terminal status; only the trip executor is allowed to talk to it.
//! [`NavBackend`] is the seam: the trip worker drives a real stack through
//! it in production and a [`sim::SimBackend`] or scripted test double
//! elsewhere.

pub mod sim;

pub use sim::SimBackend;

use crate::catalog::GoalPose;
use crate::error::Result;

/// Opaque handle for a submitted goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GoalHandle(pub u64);

/// Terminal and in-flight status of a submitted goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GoalStatus {
    /// Goal accepted, robot still traveling.
    Pending,
    /// Robot reached the goal pose.
    Succeeded,
    /// Goal was cancelled before completion.
    Cancelled,
    /// Backend gave up (unreachable, blocked, lost).
    Failed,
}

impl GoalStatus {
    /// Whether the backend is done with this goal.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, GoalStatus::Pending)
    }
}

/// Contract consumed from the navigation stack.
///
/// One goal may be in flight at a time; submitting while a goal is active
/// is a caller bug and backends may reject it.
pub trait NavBackend: Send {
    /// Whether the stack is localized and accepting goals.
    fn is_ready(&self) -> bool;

    /// Issue a navigation goal at the given pose.
    fn submit_goal(&mut self, pose: GoalPose) -> Result<GoalHandle>;

    /// Current status of a previously submitted goal.
    fn poll_status(&mut self, handle: GoalHandle) -> GoalStatus;

    /// Best-effort remaining distance to the goal in meters.
    fn progress_feedback(&mut self, handle: GoalHandle) -> Option<f32>;

    /// Request cancellation of an in-flight goal.
    ///
    /// The goal still settles through [`NavBackend::poll_status`]; callers
    /// keep polling until a terminal status so completion accounting is
    /// never skipped.
    fn cancel_goal(&mut self, handle: GoalHandle) -> Result<()>;
}
