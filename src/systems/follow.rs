//! Kinematic follow for characters carrying a [`FollowBehavior`].
//!
//! Runs after input and before physics. A following body has physics turned
//! off, so this system is the only thing moving it; the target is read as it
//! stood at the start of the physics step.
use bevy_ecs::prelude::*;
use log::debug;

use crate::components::character::Character;
use crate::components::follow::{FollowBehavior, FollowStep};
use crate::components::mapposition::MapPosition;

pub fn follow_system(
    mut followers: Query<(&mut Character, &FollowBehavior, &mut MapPosition)>,
    targets: Query<&MapPosition, Without<FollowBehavior>>,
) {
    for (mut character, follow, mut position) in followers.iter_mut() {
        if !follow.is_following() {
            continue;
        }
        let Some(target) = follow.target() else {
            continue;
        };
        let Ok(target_pos) = targets.get(target) else {
            debug!("{} follow target {:?} has no position", character.id(), target);
            continue;
        };
        match follow.step(position.pos(), target_pos.pos()) {
            FollowStep::Teleport(to) => position.set_pos(to),
            FollowStep::Glide { to, facing } => {
                position.set_pos(to);
                character.follow_moved(facing);
            }
            FollowStep::Hold => character.follow_settled(),
        }
    }
}
