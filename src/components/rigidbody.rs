//! Physics body component shared between the characters and the physics
//! collaborator.
//!
//! The [`RigidBody`] component is the contract surface with whatever physics
//! backend integrates the world. Characters write `velocity` and read
//! `touching_down`; the backend integrates `velocity` into
//! [`MapPosition`](super::mapposition::MapPosition), resolves collisions and
//! reports ground contact.
//!
//! The `enabled` flag turns gravity, integration and collision response off
//! for a body. A disabled body is carried kinematically: its position can
//! still be written externally (e.g. by the follow system) and its velocity is
//! kept untouched until it is enabled again.

use bevy_ecs::prelude::Component;
use glam::DVec2;

/// Velocity plus physics-collaborator flags for one entity.
///
/// # Fields
/// - `velocity` - Current velocity in world units per second
/// - `enabled` - When false, the physics backend skips this body entirely
/// - `touching_down` - Ground contact reported by the last physics step
///
/// # Example
/// ```ignore
/// let mut rb = RigidBody::new();
/// rb.velocity.y = -500.0; // jump
///
/// // Carry the body kinematically (no gravity, no collisions)
/// rb.disable();
/// ```
#[derive(Component, Clone, Debug, PartialEq)]
pub struct RigidBody {
    /// Current velocity in world units per second.
    pub velocity: DVec2,
    /// Whether gravity, integration and collision response apply to this body.
    pub enabled: bool,
    /// Whether the body rested on a surface during the last physics step.
    pub touching_down: bool,
}

impl Default for RigidBody {
    fn default() -> Self {
        Self::new()
    }
}

impl RigidBody {
    /// Create an enabled RigidBody at rest with no ground contact.
    pub fn new() -> Self {
        Self {
            velocity: DVec2::ZERO,
            enabled: true,
            touching_down: false,
        }
    }

    /// Create an enabled RigidBody with an initial velocity.
    pub fn with_velocity(velocity: DVec2) -> Self {
        Self {
            velocity,
            ..Self::new()
        }
    }

    /// Hand the body back to the physics backend.
    pub fn enable(&mut self) {
        self.enabled = true;
    }

    /// Take the body away from the physics backend.
    ///
    /// Ground contact is cleared; velocity is kept as-is.
    pub fn disable(&mut self) {
        self.enabled = false;
        self.touching_down = false;
    }
}
