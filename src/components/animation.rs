use bevy_ecs::prelude::Component;
use serde::{Deserialize, Serialize};

use crate::components::character::{CharacterId, Facing};

/// The three poses every character has.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnimationKind {
    #[default]
    Idle,
    Running,
    Jumping,
}

impl AnimationKind {
    pub fn suffix(self) -> &'static str {
        match self {
            AnimationKind::Idle => "idle",
            AnimationKind::Running => "running",
            AnimationKind::Jumping => "jumping",
        }
    }

    /// Number of frames in the track.
    pub fn frame_count(self) -> usize {
        match self {
            AnimationKind::Running => 4,
            AnimationKind::Idle | AnimationKind::Jumping => 1,
        }
    }

    pub fn fps(self) -> f64 {
        match self {
            AnimationKind::Running => 8.0,
            AnimationKind::Idle | AnimationKind::Jumping => 1.0,
        }
    }
}

/// Animation track currently shown for a character, e.g. `"shadow-running"`.
#[derive(Debug, Clone, Component, PartialEq, Serialize, Deserialize)]
pub struct Animation {
    pub animation_key: String,
    pub kind: AnimationKind,
    pub frame_index: usize,
    pub elapsed_time: f64,
    pub flip_x: bool,
}

impl Animation {
    pub fn new(id: CharacterId) -> Self {
        Self {
            animation_key: Self::key_for(id, AnimationKind::Idle),
            kind: AnimationKind::Idle,
            frame_index: 0,
            elapsed_time: 0.0,
            flip_x: false,
        }
    }

    pub fn key_for(id: CharacterId, kind: AnimationKind) -> String {
        format!("{}-{}", id.name(), kind.suffix())
    }

    /// Switch track. Playback restarts only if the track actually changes.
    pub fn play(&mut self, id: CharacterId, kind: AnimationKind, facing: Facing) {
        self.flip_x = facing == Facing::Left;
        if self.kind == kind {
            return;
        }
        self.kind = kind;
        self.animation_key = Self::key_for(id, kind);
        self.frame_index = 0;
        self.elapsed_time = 0.0;
    }

    /// Advance playback by `dt` seconds. All tracks loop.
    pub fn advance(&mut self, dt: f64) {
        self.elapsed_time += dt;
        let frame_duration = 1.0 / self.kind.fps();
        while self.elapsed_time >= frame_duration {
            self.elapsed_time -= frame_duration;
            self.frame_index = (self.frame_index + 1) % self.kind.frame_count();
        }
    }
}
