//! Observable game-state store.
//!
//! [`GameStateStore`] holds an immutable [`GameSnapshot`] that is replaced
//! wholesale on every [`update_state`](GameStateStore::update_state) call. A
//! [`StatePatch`] names only the fields that change; the store merges it over
//! the previous snapshot field by field and then calls every subscriber,
//! synchronously and in subscription order, with the new snapshot.
//!
//! The switch coordinator is the only gameplay writer. UI and telemetry read
//! through subscriptions or [`get_state`](GameStateStore::get_state), which
//! hands out an owned copy.

use bevy_ecs::prelude::*;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::components::character::CharacterId;

/// Whether the simulation is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayState {
    #[default]
    Playing,
    Paused,
    GameOver,
}

/// Immutable value published to observers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub active_character: CharacterId,
    pub level: u32,
    pub health: u32,
    pub play_state: PlayState,
}

impl Default for GameSnapshot {
    fn default() -> Self {
        Self {
            active_character: CharacterId::Main,
            level: 1,
            health: 100,
            play_state: PlayState::Playing,
        }
    }
}

/// Partial update. `None` fields keep their previous value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StatePatch {
    pub active_character: Option<CharacterId>,
    pub level: Option<u32>,
    pub health: Option<u32>,
    pub play_state: Option<PlayState>,
}

impl StatePatch {
    pub fn active_character(id: CharacterId) -> Self {
        Self {
            active_character: Some(id),
            ..Self::default()
        }
    }

    pub fn play_state(state: PlayState) -> Self {
        Self {
            play_state: Some(state),
            ..Self::default()
        }
    }

    fn apply(&self, snapshot: &GameSnapshot) -> GameSnapshot {
        GameSnapshot {
            active_character: self.active_character.unwrap_or(snapshot.active_character),
            level: self.level.unwrap_or(snapshot.level),
            health: self.health.unwrap_or(snapshot.health),
            play_state: self.play_state.unwrap_or(snapshot.play_state),
        }
    }
}

/// Handle returned by [`GameStateStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Subscriber = Box<dyn Fn(&GameSnapshot) + Send + Sync>;

#[derive(Resource, Default)]
pub struct GameStateStore {
    snapshot: GameSnapshot,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
    next_id: u64,
    notifications: u64,
}

impl GameStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Owned copy of the current snapshot.
    pub fn get_state(&self) -> GameSnapshot {
        self.snapshot
    }

    /// Register `callback`. It runs on every later update, after all
    /// previously registered callbacks.
    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: Fn(&GameSnapshot) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    /// Remove a subscriber. Returns false if it was already gone.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sid, _)| *sid != id);
        self.subscribers.len() != before
    }

    /// How many updates have been published so far.
    pub fn notification_count(&self) -> u64 {
        self.notifications
    }

    /// Merge `patch` over the current snapshot and notify every subscriber.
    ///
    /// Subscribers are notified even when the patch changes nothing.
    pub fn update_state(&mut self, patch: StatePatch) {
        self.snapshot = patch.apply(&self.snapshot);
        self.notifications += 1;
        debug!("Game state updated: {:?}", self.snapshot);
        let snapshot = self.snapshot;
        for (_, callback) in &self.subscribers {
            callback(&snapshot);
        }
    }

    pub fn is_playing(&self) -> bool {
        self.snapshot.play_state == PlayState::Playing
    }
}

impl std::fmt::Debug for GameStateStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameStateStore")
            .field("snapshot", &self.snapshot)
            .field("subscribers", &self.subscribers.len())
            .field("notifications", &self.notifications)
            .finish()
    }
}
