use bevy_ecs::prelude::*;

use crate::resources::gamestate::{GameStateStore, PlayState, StatePatch};

/// Run condition: gameplay systems only run while playing.
pub fn state_is_playing(store: Res<GameStateStore>) -> bool {
    store.is_playing()
}

/// Flip between `Playing` and `Paused`. `GameOver` is left alone.
pub fn toggle_pause(store: &mut GameStateStore) {
    let next = match store.get_state().play_state {
        PlayState::Playing => PlayState::Paused,
        PlayState::Paused => PlayState::Playing,
        PlayState::GameOver => return,
    };
    store.update_state(StatePatch::play_state(next));
}
