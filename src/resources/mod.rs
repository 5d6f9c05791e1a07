//! ECS resources made available to systems.
//!
//! Overview
//! - `coordinator` – which character is active, switch cooldown, entity handles
//! - `gameconfig` – tuning loaded from `config.ini`
//! - `gamestate` – observable snapshot store for UI and telemetry
//! - `input` – logical actions, edge detection and the input device
//! - `level` – static geometry and spawn points for the physics backend
//! - `script` – scripted input for headless runs
//! - `worldtime` – simulation time and fixed tick length
pub mod coordinator;
pub mod gameconfig;
pub mod gamestate;
pub mod input;
pub mod level;
pub mod script;
pub mod worldtime;
