//! Event types and observers used by the simulation.
//!
//! Events are how the core notifies cosmetic collaborators without knowing
//! about them.
//!
//! Submodules:
//! - [`landing`] – a character touched down after being airborne
//! - [`switch`] – control moved from one character to the other
pub mod landing;
pub mod switch;
