//! World setup and the per-tick schedule.
//!
//! [`Simulation`] owns a `bevy_ecs` [`World`] populated with the level, both
//! characters and every resource the systems read, plus the chained
//! [`Schedule`] built by [`build_schedule`]. Each [`Simulation::tick`]
//! advances [`WorldTime`] by one fixed step and runs the schedule once.
//!
//! Nothing here touches a window; the headless runner, the tests and the
//! raylib frontend all drive the same `Simulation`.

use bevy_ecs::observer::Observer;
use bevy_ecs::prelude::*;
use glam::DVec2;
use log::info;

use crate::components::animation::Animation;
use crate::components::boxcollider::{BoxCollider, StaticBody};
use crate::components::character::{Character, CharacterId};
use crate::components::follow::FollowBehavior;
use crate::components::mapposition::MapPosition;
use crate::components::rigidbody::RigidBody;
use crate::events::landing::log_landing_observer;
use crate::events::switch::log_switch_observer;
use crate::resources::coordinator::{CoordinatorState, SwitchCoordinator};
use crate::resources::gameconfig::GameConfig;
use crate::resources::gamestate::{GameSnapshot, GameStateStore, SubscriptionId};
use crate::resources::input::{InputDevice, InputSource, InputState};
use crate::resources::level::LevelLayout;
use crate::resources::worldtime::WorldTime;
use crate::systems::animation::{animation, animation_controller};
use crate::systems::character::{character_input_system, grounded_system};
use crate::systems::follow::follow_system;
use crate::systems::gamestate::{state_is_playing, toggle_pause};
use crate::systems::input::update_input_state;
use crate::systems::physics::arcade_physics_system;
use crate::systems::switching::{
    publish_active_character, publish_pending, switch_characters, tick_switch_cooldown,
};
use crate::systems::time::update_world_time;

/// Spawn one static body per platform of `level`.
pub fn spawn_level(world: &mut World, level: &LevelLayout) {
    for platform in &level.platforms {
        world.spawn((
            MapPosition::new(platform.x, platform.y),
            BoxCollider::new(platform.width, platform.height),
            StaticBody,
        ));
    }
}

/// Spawn Main and Shadow at their spawn points.
///
/// Main starts active. Shadow starts inactive and following Main, so its body
/// is kinematic from the first tick. Returns `(main, shadow)`.
pub fn spawn_characters(
    world: &mut World,
    config: &GameConfig,
    level: &LevelLayout,
) -> (Entity, Entity) {
    let mut main_character = Character::new(CharacterId::Main, config.main);
    main_character.activate();
    let main = world
        .spawn((
            main_character,
            MapPosition::new(level.main_spawn.x, level.main_spawn.y),
            RigidBody::new(),
            BoxCollider::character(),
            Animation::new(CharacterId::Main),
        ))
        .id();

    let shadow_character = Character::new(CharacterId::Shadow, config.shadow);
    let mut shadow_body = RigidBody::new();
    let mut follow = config.follow_behavior();
    follow.start_following(main, &mut shadow_body);
    let shadow = world
        .spawn((
            shadow_character,
            MapPosition::new(level.shadow_spawn.x, level.shadow_spawn.y),
            shadow_body,
            BoxCollider::character(),
            Animation::new(CharacterId::Shadow),
            follow,
        ))
        .id();

    (main, shadow)
}

/// The per-tick schedule.
///
/// Input is always sampled so the pause toggle keeps working; the rest only
/// runs while playing.
pub fn build_schedule() -> Schedule {
    let mut update = Schedule::default();
    update.add_systems(update_input_state);
    update.add_systems(
        (
            tick_switch_cooldown,
            switch_characters,
            character_input_system,
            follow_system,
            arcade_physics_system,
            grounded_system,
            animation_controller,
            animation,
            publish_active_character,
        )
            .chain()
            .run_if(state_is_playing)
            .after(update_input_state),
    );
    update
}

pub struct Simulation {
    world: World,
    schedule: Schedule,
    tick_seconds: f64,
}

impl Simulation {
    /// Build a world for `level` tuned by `config`, reading input from `input`.
    ///
    /// The store already holds `active_character == main` when this returns.
    pub fn new(
        config: GameConfig,
        mut level: LevelLayout,
        input: impl InputSource + 'static,
    ) -> Self {
        let mut world = World::new();
        level.gravity = config.gravity;
        let tick_seconds = config.tick_seconds();

        world.insert_resource(WorldTime {
            delta: tick_seconds,
            ..WorldTime::default()
        });
        world.insert_resource(InputState::default());
        world.insert_resource(InputDevice::new(input));
        world.insert_resource(GameStateStore::new());

        spawn_level(&mut world, &level);
        let (main, shadow) = spawn_characters(&mut world, &config, &level);

        let mut coordinator = SwitchCoordinator::new(config.switch_cooldown_seconds());
        coordinator.initialize(main, shadow);
        {
            let mut store = world.resource_mut::<GameStateStore>();
            publish_pending(&mut coordinator, &mut store);
        }
        world.insert_resource(coordinator);
        world.insert_resource(level);
        world.insert_resource(config);

        world.spawn(Observer::new(log_switch_observer));
        world.spawn(Observer::new(log_landing_observer));
        // Observers must exist before the first trigger.
        world.flush();

        info!("Simulation ready, tick {:.4}s", tick_seconds);
        Self {
            world,
            schedule: build_schedule(),
            tick_seconds,
        }
    }

    /// Advance by one fixed tick.
    pub fn tick(&mut self) {
        update_world_time(&mut self.world, self.tick_seconds);
        self.schedule.run(&mut self.world);
        self.world.clear_trackers();
    }

    pub fn run(&mut self, ticks: u64) {
        for _ in 0..ticks {
            self.tick();
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Ticks run so far.
    pub fn frame(&self) -> u64 {
        self.world.resource::<WorldTime>().frame_count
    }

    /// Replace the input source. Edge state carries over.
    pub fn set_input(&mut self, input: impl InputSource + 'static) {
        self.world.insert_resource(InputDevice::new(input));
    }

    pub fn coordinator(&self) -> &SwitchCoordinator {
        self.world.resource::<SwitchCoordinator>()
    }

    pub fn store(&self) -> &GameStateStore {
        self.world.resource::<GameStateStore>()
    }

    pub fn snapshot(&self) -> GameSnapshot {
        self.store().get_state()
    }

    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: Fn(&GameSnapshot) + Send + Sync + 'static,
    {
        self.world
            .resource_mut::<GameStateStore>()
            .subscribe(callback)
    }

    pub fn toggle_pause(&mut self) {
        toggle_pause(&mut self.world.resource_mut::<GameStateStore>());
    }

    pub fn entity(&self, id: CharacterId) -> Option<Entity> {
        self.coordinator().entity_for(id)
    }

    pub fn character(&self, id: CharacterId) -> Option<&Character> {
        self.entity(id).and_then(|e| self.world.get::<Character>(e))
    }

    pub fn body(&self, id: CharacterId) -> Option<&RigidBody> {
        self.entity(id).and_then(|e| self.world.get::<RigidBody>(e))
    }

    pub fn follow(&self, id: CharacterId) -> Option<&FollowBehavior> {
        self.entity(id).and_then(|e| self.world.get::<FollowBehavior>(e))
    }

    pub fn position(&self, id: CharacterId) -> Option<DVec2> {
        self.entity(id)
            .and_then(|e| self.world.get::<MapPosition>(e))
            .map(MapPosition::pos)
    }

    /// Teleport a character. Test and debugging aid.
    pub fn set_position(&mut self, id: CharacterId, pos: DVec2) {
        if let Some(e) = self.entity(id)
            && let Some(mut position) = self.world.get_mut::<MapPosition>(e)
        {
            position.set_pos(pos);
        }
    }

    pub fn coordinator_state(&self) -> CoordinatorState {
        let coordinator = self.coordinator();
        CoordinatorState {
            active_character: coordinator.active(),
            main_position: self.position(CharacterId::Main),
            shadow_position: self.position(CharacterId::Shadow),
            cooldown_remaining: coordinator.cooldown().remaining(),
        }
    }

    /// One-line summary of the active character, for overlays and logs.
    pub fn debug_line(&self) -> String {
        let active = self.coordinator().active();
        let pos = self.position(active).unwrap_or(DVec2::ZERO);
        let vel = self.body(active).map(|b| b.velocity).unwrap_or(DVec2::ZERO);
        let (grounded, state) = self
            .character(active)
            .map(|c| (c.is_grounded(), c.movement_state()))
            .unwrap_or_default();
        format!(
            "Active: {} | Pos: ({:.0}, {:.0}) | Vel: ({:.0}, {:.0}) | Grounded: {} | State: {:?}",
            active.name().to_uppercase(),
            pos.x,
            pos.y,
            vel.x,
            vel.y,
            grounded,
            state
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::input::HeldActions;

    fn sim() -> Simulation {
        Simulation::new(GameConfig::new(), LevelLayout::reference(), HeldActions::new())
    }

    #[test]
    fn test_new_publishes_main() {
        let sim = sim();
        assert_eq!(sim.snapshot().active_character, CharacterId::Main);
        assert_eq!(sim.store().notification_count(), 1);
        assert!(sim.character(CharacterId::Main).unwrap().is_active());
        assert!(!sim.character(CharacterId::Shadow).unwrap().is_active());
        assert!(sim.follow(CharacterId::Shadow).unwrap().is_following());
    }

    #[test]
    fn test_characters_settle_on_ground() {
        let mut sim = sim();
        sim.run(120);
        assert!(sim.character(CharacterId::Main).unwrap().is_grounded());
        let main = sim.position(CharacterId::Main).unwrap();
        let (_, max) = BoxCollider::character().aabb(main);
        assert!((max.y - 1100.0).abs() < 1e-6);
        assert_eq!(sim.frame(), 120);
    }

    #[test]
    fn test_debug_line_names_active_character() {
        let sim = sim();
        let line = sim.debug_line();
        assert!(line.starts_with("Active: MAIN | Pos: (100, 1000)"));
    }

    #[test]
    fn test_paused_world_does_not_move() {
        let mut sim = sim();
        sim.toggle_pause();
        sim.run(30);
        assert_eq!(
            sim.position(CharacterId::Main).unwrap(),
            DVec2::new(100.0, 1000.0)
        );
    }
}
