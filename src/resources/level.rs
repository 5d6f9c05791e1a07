//! Level geometry handed to the physics backend.
//!
//! [`LevelLayout`] describes the static platforms, the world bounds and the
//! spawn points of both characters. Platforms are axis-aligned rectangles
//! given by their top-left corner.

use bevy_ecs::prelude::Resource;
use glam::DVec2;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlatformKind {
    Ground,
    Float,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlatformRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub kind: PlatformKind,
}

impl PlatformRect {
    pub fn new(x: f64, y: f64, width: f64, height: f64, kind: PlatformKind) -> Self {
        Self {
            x,
            y,
            width,
            height,
            kind,
        }
    }
}

#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelLayout {
    /// Size of the playable area; its top-left corner is the origin.
    pub bounds: DVec2,
    pub gravity: f64,
    pub platforms: Vec<PlatformRect>,
    pub main_spawn: DVec2,
    pub shadow_spawn: DVec2,
}

impl Default for LevelLayout {
    fn default() -> Self {
        Self::reference()
    }
}

impl LevelLayout {
    /// The first level: two ground slabs with a gap and five floating platforms.
    pub fn reference() -> Self {
        use PlatformKind::{Float, Ground};
        Self {
            bounds: DVec2::new(1600.0, 1200.0),
            gravity: 800.0,
            platforms: vec![
                PlatformRect::new(0.0, 1100.0, 800.0, 100.0, Ground),
                PlatformRect::new(1000.0, 1100.0, 600.0, 100.0, Ground),
                PlatformRect::new(300.0, 900.0, 200.0, 16.0, Float),
                PlatformRect::new(600.0, 750.0, 200.0, 16.0, Float),
                PlatformRect::new(200.0, 600.0, 200.0, 16.0, Float),
                PlatformRect::new(800.0, 500.0, 200.0, 16.0, Float),
                PlatformRect::new(1200.0, 800.0, 200.0, 16.0, Float),
            ],
            main_spawn: DVec2::new(100.0, 1000.0),
            shadow_spawn: DVec2::new(120.0, 1000.0),
        }
    }

    /// An empty box of the given size, for tests and sandboxes.
    pub fn empty(bounds: DVec2, gravity: f64) -> Self {
        Self {
            bounds,
            gravity,
            platforms: Vec::new(),
            main_spawn: DVec2::ZERO,
            shadow_spawn: DVec2::ZERO,
        }
    }
}
