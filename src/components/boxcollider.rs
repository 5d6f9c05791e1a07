//! Axis-aligned collider used by the arcade physics backend.
//!
//! Characters carry a [`BoxCollider`] whose `offset` places the hitbox
//! relative to their center. Level geometry is spawned with
//! [`StaticBody`] and a zero offset, so its [`MapPosition`] is the top-left
//! corner of the platform.
//!
//! [`MapPosition`]: super::mapposition::MapPosition

use bevy_ecs::prelude::Component;
use glam::DVec2;

#[derive(Debug, Clone, Copy, PartialEq, Component)]
pub struct BoxCollider {
    pub size: DVec2,
    pub offset: DVec2,
}

/// Marker for immovable level geometry.
#[derive(Component, Clone, Copy, Debug, Default)]
pub struct StaticBody;

impl BoxCollider {
    /// Create a BoxCollider with given size
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            size: DVec2::new(width, height),
            offset: DVec2::ZERO,
        }
    }

    /// Modify BoxCollider with given offset
    pub fn with_offset(mut self, offset: DVec2) -> Self {
        self.offset = offset;
        self
    }

    /// Hitbox used by both characters: 28x44, shifted 4 units below center.
    pub fn character() -> Self {
        Self::new(28.0, 44.0).with_offset(DVec2::new(-14.0, -20.0))
    }

    /// Returns (min, max) of the collider AABB for a given entity position.
    /// Handles negative size by normalizing to proper min/max.
    pub fn aabb(&self, position: DVec2) -> (DVec2, DVec2) {
        let p0 = position + self.offset;
        let p1 = p0 + self.size;
        (p0.min(p1), p0.max(p1))
    }
}
