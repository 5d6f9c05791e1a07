//! Simulation systems.
//!
//! Submodules overview
//! - [`animation`] – pick and advance each character's animation track
//! - [`character`] – apply input to the active character and read back ground contact
//! - [`follow`] – move following characters kinematically towards their target
//! - [`gamestate`] – run condition and pause toggle over the state store
//! - [`input`] – sample the input device into [`crate::resources::input::InputState`]
//! - [`physics`] – arcade gravity, integration and collision against static bodies
//! - [`switching`] – switch cooldown, character hand-over and store publishing
//! - [`time`] – advance simulation time

pub mod animation;
pub mod character;
pub mod follow;
pub mod gamestate;
pub mod input;
pub mod physics;
pub mod switching;
pub mod time;
