//! ECS components for entities.
//!
//! Submodules overview:
//! - [`animation`] – animation track selected from the character state machine
//! - [`boxcollider`] – axis-aligned hitboxes and the static geometry marker
//! - [`character`] – the per-character movement state machine
//! - [`follow`] – kinematic follow behavior carried by the Shadow
//! - [`mapposition`] – world-space position of an entity
//! - [`rigidbody`] – velocity and physics-collaborator flags

pub mod animation;
pub mod boxcollider;
pub mod character;
pub mod follow;
pub mod mapposition;
pub mod rigidbody;
