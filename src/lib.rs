//! Shadow Swap library.
//!
//! A two-character platformer core: the player drives one of two bodies
//! while the other follows, and control moves between them on demand.
//!
//! This module exposes the ECS components, resources, systems, and events
//! for use in integration tests and by the binary.

pub mod components;
pub mod events;
#[cfg(feature = "window")]
pub mod frontend;
pub mod game;
pub mod resources;
pub mod systems;
