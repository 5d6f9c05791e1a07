//! Landing notifications.
//!
//! [`grounded_system`](crate::systems::character::grounded_system) triggers a
//! [`LandingEvent`] whenever a character's ground contact goes from absent to
//! present. Effects (dust, camera shake, sound) hang off this event; with no
//! observer registered the trigger does nothing.
use bevy_ecs::observer::On;
use bevy_ecs::prelude::*;
use glam::DVec2;
use log::debug;

use crate::components::character::CharacterId;

#[derive(Event, Debug, Clone, Copy)]
pub struct LandingEvent {
    pub entity: Entity,
    pub character: CharacterId,
    /// Where the character touched down.
    pub position: DVec2,
}

/// Observer that logs every landing.
pub fn log_landing_observer(trigger: On<LandingEvent>) {
    let event = trigger.event();
    debug!(
        "{} landed at ({:.1}, {:.1})",
        event.character, event.position.x, event.position.y
    );
}
