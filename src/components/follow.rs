//! Follow behavior for the inactive Shadow.
//!
//! While engaged, the follower is carried kinematically towards
//! `target position + offset`: it teleports when it fell too far behind (so it
//! can never get stuck behind geometry), glides by a fixed lerp factor per
//! tick when it is merely behind, and holds still once it is close enough.
//!
//! The target is a plain [`Entity`] handle. It is never owned; if the target
//! disappears the follow system simply skips the tick.
//!
//! Engaging disables the follower's physics body and disengaging re-enables
//! it, in the same call, so no physics step ever sees a half-switched body.
//!
//! # Related
//!
//! - [`crate::systems::follow::follow_system`] – applies [`FollowBehavior::step`] each tick
//! - [`crate::resources::coordinator::SwitchCoordinator`] – engages/disengages on switch

use bevy_ecs::prelude::{Component, Entity};
use glam::DVec2;

use crate::components::character::Facing;
use crate::components::rigidbody::RigidBody;

pub const DEFAULT_FOLLOW_OFFSET: DVec2 = DVec2::new(20.0, -5.0);
pub const DEFAULT_LERP_FACTOR: f64 = 0.05;
pub const DEFAULT_TELEPORT_THRESHOLD: f64 = 150.0;
pub const DEFAULT_SETTLE_DISTANCE: f64 = 5.0;

/// Outcome of one follow tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FollowStep {
    /// Too far behind: jump straight to the target point.
    Teleport(DVec2),
    /// Move part of the way. `facing` is `None` when the target is straight
    /// above or below.
    Glide { to: DVec2, facing: Option<Facing> },
    /// Close enough already.
    Hold,
}

#[derive(Component, Debug, Clone, PartialEq)]
pub struct FollowBehavior {
    target: Option<Entity>,
    /// Offset from the target's position.
    pub offset: DVec2,
    /// Fraction of the remaining distance covered per tick, in (0, 1].
    pub lerp_factor: f64,
    /// Beyond this distance the follower teleports.
    pub teleport_threshold: f64,
    /// Within this distance the follower stays put.
    pub settle_distance: f64,
    following: bool,
}

impl Default for FollowBehavior {
    fn default() -> Self {
        Self::new(
            DEFAULT_FOLLOW_OFFSET,
            DEFAULT_LERP_FACTOR,
            DEFAULT_TELEPORT_THRESHOLD,
        )
    }
}

impl FollowBehavior {
    /// Create a disengaged behavior.
    pub fn new(offset: DVec2, lerp_factor: f64, teleport_threshold: f64) -> Self {
        Self {
            target: None,
            offset,
            lerp_factor,
            teleport_threshold,
            settle_distance: DEFAULT_SETTLE_DISTANCE,
            following: false,
        }
    }

    pub fn with_settle_distance(mut self, settle_distance: f64) -> Self {
        self.settle_distance = settle_distance;
        self
    }

    pub fn is_following(&self) -> bool {
        self.following
    }

    pub fn target(&self) -> Option<Entity> {
        self.target
    }

    /// Engage on `target` and hand `body` over to kinematic control.
    pub fn start_following(&mut self, target: Entity, body: &mut RigidBody) {
        self.following = true;
        self.target = Some(target);
        body.disable();
    }

    /// Disengage and give `body` back to the physics backend.
    pub fn stop_following(&mut self, body: &mut RigidBody) {
        self.following = false;
        self.target = None;
        body.enable();
    }

    /// Point the follower is heading for.
    pub fn target_point(&self, target_pos: DVec2) -> DVec2 {
        target_pos + self.offset
    }

    /// Decide this tick's movement from the follower's and target's positions.
    pub fn step(&self, current: DVec2, target_pos: DVec2) -> FollowStep {
        let goal = self.target_point(target_pos);
        let distance = current.distance(goal);

        if distance > self.teleport_threshold {
            FollowStep::Teleport(goal)
        } else if distance > self.settle_distance {
            let facing = if goal.x < current.x {
                Some(Facing::Left)
            } else if goal.x > current.x {
                Some(Facing::Right)
            } else {
                None
            };
            FollowStep::Glide {
                to: current.lerp(goal, self.lerp_factor),
                facing,
            }
        } else {
            FollowStep::Hold
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: DVec2, b: DVec2) -> bool {
        a.distance(b) < 1e-9
    }

    #[test]
    fn test_far_target_teleports_exactly() {
        let f = FollowBehavior::default();
        // 200 units away from the goal (500 + 20, 500 - 5).
        let current = DVec2::new(320.0, 495.0);
        let step = f.step(current, DVec2::new(500.0, 500.0));
        assert_eq!(step, FollowStep::Teleport(DVec2::new(520.0, 495.0)));
    }

    #[test]
    fn test_mid_distance_lerps() {
        let f = FollowBehavior::default();
        let current = DVec2::new(400.0, 495.0);
        let target = DVec2::new(500.0, 500.0);
        match f.step(current, target) {
            FollowStep::Glide { to, facing } => {
                let expected = DVec2::new(400.0 + (520.0 - 400.0) * 0.05, 495.0);
                assert!(approx(to, expected));
                assert_eq!(facing, Some(Facing::Right));
            }
            other => panic!("expected glide, got {other:?}"),
        }
    }

    #[test]
    fn test_threshold_distance_is_not_a_teleport() {
        let f = FollowBehavior::default();
        let current = DVec2::new(520.0 + 150.0, 495.0);
        match f.step(current, DVec2::new(500.0, 500.0)) {
            FollowStep::Glide { facing, .. } => assert_eq!(facing, Some(Facing::Left)),
            other => panic!("expected glide, got {other:?}"),
        }
    }

    #[test]
    fn test_close_enough_holds() {
        let f = FollowBehavior::default();
        let current = DVec2::new(523.0, 499.0);
        assert_eq!(f.step(current, DVec2::new(500.0, 500.0)), FollowStep::Hold);
    }

    #[test]
    fn test_vertical_only_glide_has_no_facing() {
        let f = FollowBehavior::default();
        let current = DVec2::new(520.0, 400.0);
        match f.step(current, DVec2::new(500.0, 500.0)) {
            FollowStep::Glide { facing, .. } => assert_eq!(facing, None),
            other => panic!("expected glide, got {other:?}"),
        }
    }

    #[test]
    fn test_engage_toggles_physics_atomically() {
        let mut f = FollowBehavior::default();
        let mut body = RigidBody::new();
        let mut world = bevy_ecs::world::World::new();
        let target = world.spawn_empty().id();
        f.start_following(target, &mut body);
        assert!(f.is_following());
        assert_eq!(f.target(), Some(target));
        assert!(!body.enabled);
        f.stop_following(&mut body);
        assert!(!f.is_following());
        assert_eq!(f.target(), None);
        assert!(body.enabled);
    }
}
