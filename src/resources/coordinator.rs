//! Character switching coordinator.
//!
//! [`SwitchCoordinator`] knows the two character entities, which one is
//! active and whether the post-switch cooldown is still running. It decides
//! whether a switch request is accepted; the actual activation/deactivation
//! of the entities and the follow hand-over is done by
//! [`switch_characters`](crate::systems::switching::switch_characters), and
//! the resulting `activeCharacter` is published to the
//! [`GameStateStore`](crate::resources::gamestate::GameStateStore) at the end
//! of the tick by
//! [`publish_active_character`](crate::systems::switching::publish_active_character).
//!
//! The cooldown is a plain duration counted down every tick. Nothing is
//! scheduled, so there is nothing left to fire once the coordinator is gone.

use bevy_ecs::prelude::*;
use glam::DVec2;
use log::{debug, warn};
use serde::Serialize;

use crate::components::character::CharacterId;

/// Window after an accepted switch during which requests are dropped.
pub const DEFAULT_SWITCH_COOLDOWN: f64 = 0.2;

/// Residue below which a countdown counts as expired. Repeated subtraction of
/// `1/60` leaves a few ulps behind after exactly 200 ms.
const COOLDOWN_EPSILON: f64 = 1e-9;

/// Countdown that is running while `remaining > 0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cooldown {
    duration: f64,
    remaining: f64,
}

impl Cooldown {
    pub fn new(duration: f64) -> Self {
        Self {
            duration,
            remaining: 0.0,
        }
    }

    pub fn start(&mut self) {
        self.remaining = self.duration;
    }

    pub fn tick(&mut self, dt: f64) {
        if self.remaining > 0.0 {
            self.remaining -= dt;
            if self.remaining < COOLDOWN_EPSILON {
                self.remaining = 0.0;
            }
        }
    }

    pub fn is_active(&self) -> bool {
        self.remaining > 0.0
    }

    pub fn remaining(&self) -> f64 {
        self.remaining
    }
}

#[derive(Resource, Debug, Clone)]
pub struct SwitchCoordinator {
    main: Option<Entity>,
    shadow: Option<Entity>,
    active: CharacterId,
    cooldown: Cooldown,
    pending_publish: Option<CharacterId>,
    switch_count: u64,
}

impl Default for SwitchCoordinator {
    fn default() -> Self {
        Self::new(DEFAULT_SWITCH_COOLDOWN)
    }
}

impl SwitchCoordinator {
    /// An uninitialized coordinator. Switch requests are ignored until
    /// [`initialize`](Self::initialize) is called.
    pub fn new(cooldown_seconds: f64) -> Self {
        Self {
            main: None,
            shadow: None,
            active: CharacterId::Main,
            cooldown: Cooldown::new(cooldown_seconds),
            pending_publish: None,
            switch_count: 0,
        }
    }

    /// Take charge of the pair. Main starts active; the store learns about it
    /// at the end of the next tick.
    ///
    /// The entities themselves are put in their initial state by
    /// [`game::spawn_characters`](crate::game::spawn_characters).
    pub fn initialize(&mut self, main: Entity, shadow: Entity) {
        self.main = Some(main);
        self.shadow = Some(shadow);
        self.active = CharacterId::Main;
        self.pending_publish = Some(CharacterId::Main);
    }

    pub fn is_ready(&self) -> bool {
        self.main.is_some() && self.shadow.is_some()
    }

    pub fn active(&self) -> CharacterId {
        self.active
    }

    pub fn main_entity(&self) -> Option<Entity> {
        self.main
    }

    pub fn shadow_entity(&self) -> Option<Entity> {
        self.shadow
    }

    pub fn entity_for(&self, id: CharacterId) -> Option<Entity> {
        match id {
            CharacterId::Main => self.main,
            CharacterId::Shadow => self.shadow,
        }
    }

    pub fn active_entity(&self) -> Option<Entity> {
        self.entity_for(self.active)
    }

    pub fn inactive_entity(&self) -> Option<Entity> {
        self.entity_for(self.active.other())
    }

    pub fn cooldown(&self) -> &Cooldown {
        &self.cooldown
    }

    /// Number of accepted switches since start.
    pub fn switch_count(&self) -> u64 {
        self.switch_count
    }

    pub fn tick_cooldown(&mut self, dt: f64) {
        self.cooldown.tick(dt);
    }

    /// Try to hand control to the other character.
    ///
    /// Returns the newly active character, or `None` if the request was
    /// dropped (cooldown running or pair not initialized). Dropped requests
    /// are not queued.
    pub fn request_switch(&mut self) -> Option<CharacterId> {
        if !self.is_ready() {
            warn!("Switch requested before both characters were registered; ignoring");
            return None;
        }
        if self.cooldown.is_active() {
            debug!(
                "Switch dropped, cooldown {:.3}s remaining",
                self.cooldown.remaining()
            );
            return None;
        }
        self.active = self.active.other();
        self.cooldown.start();
        self.switch_count += 1;
        self.pending_publish = Some(self.active);
        Some(self.active)
    }

    /// Active character still waiting to be published, if any.
    pub fn take_pending_publish(&mut self) -> Option<CharacterId> {
        self.pending_publish.take()
    }
}

/// Debug view of the pair, for overlays and state dumps.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CoordinatorState {
    pub active_character: CharacterId,
    pub main_position: Option<DVec2>,
    pub shadow_position: Option<DVec2>,
    pub cooldown_remaining: f64,
}
