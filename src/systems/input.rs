//! Input system.
//!
//! [`update_input_state`] advances the [`InputDevice`] by one tick and feeds
//! its levels through the edge detectors of
//! [`InputState`](crate::resources::input::InputState).
use bevy_ecs::prelude::*;

use crate::resources::input::{HeldActions, InputDevice, InputState};

/// Sample the input device into `InputState`.
///
/// Without a device every action reads as released.
pub fn update_input_state(mut input: ResMut<InputState>, device: Option<ResMut<InputDevice>>) {
    match device {
        Some(mut device) => {
            device.0.poll();
            input.update_from(device.0.as_ref());
        }
        None => input.update_from(&HeldActions::new()),
    }
}
