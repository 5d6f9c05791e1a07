//! Character switching.
//!
//! Three systems share the [`SwitchCoordinator`] across a tick:
//!
//! 1. [`tick_switch_cooldown`] runs the cooldown down by the tick delta.
//! 2. [`switch_characters`] reacts to a fresh press of the switch action,
//!    hands control to the other character and triggers a
//!    [`CharacterSwitchedEvent`].
//! 3. [`publish_active_character`] runs last and pushes the new active
//!    character into the [`GameStateStore`], so subscribers only ever see a
//!    pair that has settled for the tick.
use bevy_ecs::prelude::*;
use glam::DVec2;
use log::warn;

use crate::components::character::{Character, CharacterId};
use crate::components::follow::FollowBehavior;
use crate::components::mapposition::MapPosition;
use crate::components::rigidbody::RigidBody;
use crate::events::switch::CharacterSwitchedEvent;
use crate::resources::coordinator::SwitchCoordinator;
use crate::resources::gamestate::{GameStateStore, StatePatch};
use crate::resources::input::{Action, InputState};
use crate::resources::worldtime::WorldTime;

pub fn tick_switch_cooldown(mut coordinator: ResMut<SwitchCoordinator>, time: Res<WorldTime>) {
    coordinator.tick_cooldown(time.delta);
}

/// Swap the active character when the switch action was just pressed.
///
/// The outgoing character stops taking input first. If it carries a
/// [`FollowBehavior`] it starts following the incoming one, which turns its
/// body off. The incoming character drops its follow (body back on) before
/// it accepts input. Exactly one of the pair is active once this returns.
pub fn switch_characters(
    mut coordinator: ResMut<SwitchCoordinator>,
    input: Res<InputState>,
    mut characters: Query<(
        &mut Character,
        &mut RigidBody,
        &MapPosition,
        Option<&mut FollowBehavior>,
    )>,
    mut commands: Commands,
) {
    if !input.is_pressed(Action::Switch) {
        return;
    }
    let from = coordinator.active();
    let (Some(outgoing), Some(incoming)) =
        (coordinator.entity_for(from), coordinator.entity_for(from.other()))
    else {
        // Lets the coordinator log the uninitialized request.
        coordinator.request_switch();
        return;
    };
    if !characters.contains(outgoing) || !characters.contains(incoming) {
        warn!("Switch requested but a character entity is missing; ignoring");
        return;
    }
    let Some(to) = coordinator.request_switch() else {
        return;
    };

    if let Ok((mut character, mut body, _, follow)) = characters.get_mut(outgoing) {
        character.deactivate();
        if let Some(mut follow) = follow {
            follow.start_following(incoming, &mut body);
            character.follow_engaged();
        }
    }
    if let Ok((mut character, mut body, _, follow)) = characters.get_mut(incoming) {
        if let Some(mut follow) = follow {
            follow.stop_following(&mut body);
        }
        character.activate();
    }

    let position_of = |id: CharacterId| {
        coordinator
            .entity_for(id)
            .and_then(|e| characters.get(e).ok())
            .map(|(_, _, position, _)| position.pos())
            .unwrap_or(DVec2::ZERO)
    };
    let event = CharacterSwitchedEvent {
        from,
        to,
        main_position: position_of(CharacterId::Main),
        shadow_position: position_of(CharacterId::Shadow),
    };
    commands.trigger(event);
}

/// Push a pending active-character change into the store.
///
/// Returns `true` if subscribers were notified.
pub fn publish_pending(coordinator: &mut SwitchCoordinator, store: &mut GameStateStore) -> bool {
    match coordinator.take_pending_publish() {
        Some(id) => {
            store.update_state(StatePatch::active_character(id));
            true
        }
        None => false,
    }
}

pub fn publish_active_character(
    mut coordinator: ResMut<SwitchCoordinator>,
    mut store: ResMut<GameStateStore>,
) {
    publish_pending(&mut coordinator, &mut store);
}
