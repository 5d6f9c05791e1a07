//! Character switch notifications.
//!
//! [`switch_characters`](crate::systems::switching::switch_characters)
//! triggers a [`CharacterSwitchedEvent`] after both characters have been
//! re-activated/deactivated. Cosmetic collaborators (connection line,
//! particle bursts, camera retarget) observe it.
use bevy_ecs::observer::On;
use bevy_ecs::prelude::*;
use glam::DVec2;
use log::info;

use crate::components::character::CharacterId;

#[derive(Event, Debug, Clone, Copy)]
pub struct CharacterSwitchedEvent {
    pub from: CharacterId,
    pub to: CharacterId,
    pub main_position: DVec2,
    pub shadow_position: DVec2,
}

/// Observer that logs every accepted switch.
pub fn log_switch_observer(trigger: On<CharacterSwitchedEvent>) {
    let event = trigger.event();
    info!(
        "Switched {} -> {} (main at ({:.0}, {:.0}), shadow at ({:.0}, {:.0}))",
        event.from,
        event.to,
        event.main_position.x,
        event.main_position.y,
        event.shadow_position.x,
        event.shadow_position.y
    );
}
