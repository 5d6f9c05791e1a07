//! Per-character systems.
//!
//! [`character_input_system`] turns the tick's [`InputState`] into velocity
//! changes for the active character. [`grounded_system`] reads back the
//! physics backend's ground contact after integration and fires
//! [`LandingEvent`] on the transition from airborne to grounded.
use bevy_ecs::prelude::*;

use crate::components::character::Character;
use crate::components::mapposition::MapPosition;
use crate::components::rigidbody::RigidBody;
use crate::events::landing::LandingEvent;
use crate::resources::input::InputState;
use crate::resources::worldtime::WorldTime;

/// Apply input to every character. Inactive characters ignore it.
pub fn character_input_system(
    mut query: Query<(&mut Character, &mut RigidBody)>,
    input: Res<InputState>,
    time: Res<WorldTime>,
) {
    for (mut character, mut body) in query.iter_mut() {
        character.apply_input(&mut body, &input, time.delta);
    }
}

/// Copy ground contact from the physics backend into each character.
///
/// Bodies carried kinematically (physics disabled) keep their last grounded
/// flag.
pub fn grounded_system(
    mut query: Query<(Entity, &mut Character, &RigidBody, &MapPosition)>,
    mut commands: Commands,
) {
    for (entity, mut character, body, position) in query.iter_mut() {
        if !body.enabled {
            continue;
        }
        if character.update_grounded(body.touching_down) {
            commands.trigger(LandingEvent {
                entity,
                character: character.id(),
                position: position.pos(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::character::{CharacterId, MovementState, MovementTuning};
    use crate::resources::input::{Action, HeldActions};
    use bevy_ecs::observer::On;

    #[derive(Resource, Default)]
    struct Landings(u32);

    fn make_world() -> World {
        let mut world = World::new();
        world.insert_resource(WorldTime::default());
        world.insert_resource(InputState::default());
        world.insert_resource(Landings::default());
        world.add_observer(|_trigger: On<LandingEvent>, mut landings: ResMut<Landings>| {
            landings.0 += 1;
        });
        world
    }

    fn run_input(world: &mut World) {
        let mut schedule = Schedule::default();
        schedule.add_systems(character_input_system);
        schedule.run(world);
    }

    fn run_grounded(world: &mut World) {
        let mut schedule = Schedule::default();
        schedule.add_systems(grounded_system);
        schedule.run(world);
    }

    #[test]
    fn test_only_active_character_moves() {
        let mut world = make_world();
        let mut main = Character::new(CharacterId::Main, MovementTuning::main());
        main.activate();
        let main = world.spawn((main, RigidBody::new())).id();
        let shadow = world
            .spawn((
                Character::new(CharacterId::Shadow, MovementTuning::shadow()),
                RigidBody::new(),
            ))
            .id();
        world
            .resource_mut::<InputState>()
            .update_from(&HeldActions::new().with(Action::Right));
        run_input(&mut world);

        assert!(world.get::<RigidBody>(main).unwrap().velocity.x > 0.0);
        assert_eq!(world.get::<RigidBody>(shadow).unwrap().velocity.x, 0.0);
        assert_eq!(
            world.get::<Character>(main).unwrap().movement_state(),
            MovementState::Running
        );
    }

    #[test]
    fn test_landing_fires_once() {
        let mut world = make_world();
        let mut body = RigidBody::new();
        body.touching_down = true;
        let e = world
            .spawn((
                Character::new(CharacterId::Main, MovementTuning::main()),
                body,
                MapPosition::new(10.0, 20.0),
            ))
            .id();
        run_grounded(&mut world);
        run_grounded(&mut world);
        assert!(world.get::<Character>(e).unwrap().is_grounded());
        assert_eq!(world.resource::<Landings>().0, 1);
    }

    #[test]
    fn test_disabled_body_keeps_grounded_flag() {
        let mut world = make_world();
        let mut body = RigidBody::new();
        body.disable();
        let e = world
            .spawn((
                Character::new(CharacterId::Shadow, MovementTuning::shadow()),
                body,
                MapPosition::new(0.0, 0.0),
            ))
            .id();
        world.get_mut::<Character>(e).unwrap().update_grounded(true);
        run_grounded(&mut world);
        assert!(world.get::<Character>(e).unwrap().is_grounded());
        assert_eq!(world.resource::<Landings>().0, 0);
    }
}
