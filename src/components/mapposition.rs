//! World-space position component.
//!
//! [`MapPosition`] stores the center of an entity in world units. Characters
//! read and write it through [`MapPosition::pos`] and [`MapPosition::set_pos`];
//! the follow system writes it directly while the physics collaborator is
//! disabled for the follower.

use bevy_ecs::prelude::Component;
use glam::DVec2;

/// Center position of an entity in world coordinates (y grows downwards).
#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct MapPosition {
    pub pos: DVec2,
}

impl MapPosition {
    /// Create a new position.
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            pos: DVec2::new(x, y),
        }
    }

    /// Current position.
    pub fn pos(&self) -> DVec2 {
        self.pos
    }

    /// Move the entity to `pos` without touching its velocity.
    pub fn set_pos(&mut self, pos: DVec2) {
        self.pos = pos;
    }
}
