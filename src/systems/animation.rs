//! Animation systems.
//!
//! - [`animation_controller`] picks the track for each character from its
//!   movement state, ground contact and whether physics owns its body.
//! - [`animation`] advances playback by the tick delta.
//!
//! Frame art lives with the frontend; these systems only track which frame
//! of which track is showing.
use bevy_ecs::prelude::*;

use crate::components::animation::Animation;
use crate::components::character::Character;
use crate::components::rigidbody::RigidBody;
use crate::resources::worldtime::WorldTime;

pub fn animation_controller(mut query: Query<(&Character, &RigidBody, &mut Animation)>) {
    for (character, body, mut anim) in query.iter_mut() {
        anim.play(
            character.id(),
            character.animation_kind(body.enabled),
            character.facing(),
        );
    }
}

/// Advance playback of every animation.
pub fn animation(mut query: Query<&mut Animation>, time: Res<WorldTime>) {
    for mut anim in query.iter_mut() {
        anim.advance(time.delta);
    }
}
