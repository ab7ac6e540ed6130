//! Hardware-free simulated navigation backend.
//!
//! Models travel as straight-line motion at a constant speed: a submitted
//! goal stays `Pending` for `distance / (speed_mps * speed_factor)` seconds
//! and then settles `Succeeded`, updating the simulated robot pose. Goals
//! inside a configured blocked region travel the full time and then settle
//! `Failed`, which exercises the executor's failure handling end to end.

use std::time::{Duration, Instant};

use tracing::debug;

use crate::catalog::GoalPose;
use crate::config::SimConfig;
use crate::error::{CartError, Result};
use crate::nav::{GoalHandle, GoalStatus, NavBackend};

struct ActiveGoal {
    handle: GoalHandle,
    target: GoalPose,
    total_distance: f32,
    started: Instant,
    travel_time: Duration,
    cancelled: bool,
    blocked: bool,
}

/// Simulated backend for running the binary without a robot.
pub struct SimBackend {
    config: SimConfig,
    pose: GoalPose,
    active: Option<ActiveGoal>,
    next_handle: u64,
}

impl SimBackend {
    /// Create a simulator starting at the given pose.
    pub fn new(config: SimConfig, start: GoalPose) -> Self {
        Self {
            config,
            pose: start,
            active: None,
            next_handle: 1,
        }
    }

    /// Current simulated robot pose.
    pub fn pose(&self) -> GoalPose {
        self.pose
    }

    fn is_blocked(&self, target: &GoalPose) -> bool {
        self.config.blocked.iter().any(|p| {
            let dx = target.x - p[0];
            let dy = target.y - p[1];
            (dx * dx + dy * dy).sqrt() <= self.config.blocked_radius
        })
    }

    fn settle(&mut self) {
        let Some(goal) = &self.active else {
            return;
        };

        if goal.cancelled {
            return;
        }

        if goal.started.elapsed() >= goal.travel_time && !goal.blocked {
            // Arrived: robot is now at the target.
            self.pose = goal.target;
        }
    }
}

impl NavBackend for SimBackend {
    fn is_ready(&self) -> bool {
        true
    }

    fn submit_goal(&mut self, target: GoalPose) -> Result<GoalHandle> {
        if self
            .active
            .as_ref()
            .is_some_and(|g| !g.cancelled && g.started.elapsed() < g.travel_time)
        {
            return Err(CartError::Backend(
                "goal already in flight".to_string(),
            ));
        }

        let distance = self.pose.distance_to(&target);
        let speed = (self.config.speed_mps * self.config.speed_factor).max(0.01);
        let travel_time = Duration::from_secs_f32(distance / speed);
        let handle = GoalHandle(self.next_handle);
        self.next_handle += 1;

        debug!(
            "sim goal {:?}: {:.2}m in {:.2}s to ({:.2}, {:.2})",
            handle,
            distance,
            travel_time.as_secs_f32(),
            target.x,
            target.y
        );

        self.active = Some(ActiveGoal {
            handle,
            target,
            total_distance: distance,
            started: Instant::now(),
            travel_time,
            cancelled: false,
            blocked: self.is_blocked(&target),
        });

        Ok(handle)
    }

    fn poll_status(&mut self, handle: GoalHandle) -> GoalStatus {
        self.settle();
        let Some(goal) = &self.active else {
            return GoalStatus::Failed;
        };
        if goal.handle != handle {
            return GoalStatus::Failed;
        }

        if goal.cancelled {
            GoalStatus::Cancelled
        } else if goal.started.elapsed() < goal.travel_time {
            GoalStatus::Pending
        } else if goal.blocked {
            GoalStatus::Failed
        } else {
            GoalStatus::Succeeded
        }
    }

    fn progress_feedback(&mut self, handle: GoalHandle) -> Option<f32> {
        let goal = self.active.as_ref()?;
        if goal.handle != handle || goal.cancelled {
            return None;
        }

        let total = goal.travel_time.as_secs_f32();
        if total <= f32::EPSILON {
            return Some(0.0);
        }
        let fraction = (goal.started.elapsed().as_secs_f32() / total).min(1.0);
        Some(goal.total_distance * (1.0 - fraction))
    }

    fn cancel_goal(&mut self, handle: GoalHandle) -> Result<()> {
        match &mut self.active {
            Some(goal) if goal.handle == handle => {
                goal.cancelled = true;
                Ok(())
            }
            _ => Err(CartError::Backend("no such goal".to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast_sim() -> SimBackend {
        SimBackend::new(
            SimConfig {
                speed_mps: 1000.0,
                speed_factor: 1.0,
                blocked: vec![[50.0, 50.0]],
                blocked_radius: 0.5,
            },
            GoalPose::new(0.0, 0.0, 0.0),
        )
    }

    fn poll_until_terminal(sim: &mut SimBackend, handle: GoalHandle) -> GoalStatus {
        for _ in 0..1000 {
            let status = sim.poll_status(handle);
            if status.is_terminal() {
                return status;
            }
            std::thread::sleep(Duration::from_millis(1));
        }
        panic!("goal never settled");
    }

    #[test]
    fn test_goal_succeeds_and_moves_pose() {
        let mut sim = fast_sim();
        let handle = sim.submit_goal(GoalPose::new(3.0, 4.0, 1.0)).unwrap();

        assert_eq!(poll_until_terminal(&mut sim, handle), GoalStatus::Succeeded);
        assert_eq!(sim.pose(), GoalPose::new(3.0, 4.0, 1.0));
    }

    #[test]
    fn test_blocked_goal_fails_without_moving_pose() {
        let mut sim = fast_sim();
        let handle = sim.submit_goal(GoalPose::new(50.0, 50.0, 0.0)).unwrap();

        assert_eq!(poll_until_terminal(&mut sim, handle), GoalStatus::Failed);
        assert_eq!(sim.pose(), GoalPose::new(0.0, 0.0, 0.0));
    }

    #[test]
    fn test_cancel_settles_cancelled() {
        let mut sim = SimBackend::new(
            SimConfig {
                speed_mps: 0.1,
                ..Default::default()
            },
            GoalPose::new(0.0, 0.0, 0.0),
        );
        let handle = sim.submit_goal(GoalPose::new(100.0, 0.0, 0.0)).unwrap();

        assert_eq!(sim.poll_status(handle), GoalStatus::Pending);
        sim.cancel_goal(handle).unwrap();
        assert_eq!(sim.poll_status(handle), GoalStatus::Cancelled);
    }

    #[test]
    fn test_feedback_shrinks_toward_zero() {
        let mut sim = fast_sim();
        let handle = sim.submit_goal(GoalPose::new(3.0, 4.0, 0.0)).unwrap();

        let first = sim.progress_feedback(handle).unwrap();
        assert!(first <= 5.0);
        poll_until_terminal(&mut sim, handle);
    }
}
