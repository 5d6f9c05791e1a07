//! Game configuration resource.
//!
//! Tuning for the simulation, loaded from an INI configuration file. Every
//! value has a default matching the reference behavior, so a missing file or
//! a missing key is never an error; a present but malformed or out-of-range
//! value is.
//!
//! # Configuration File Format
//!
//! ```ini
//! [simulation]
//! tick_rate = 60
//!
//! [switch]
//! cooldown_ms = 200
//!
//! [main]
//! max_speed = 200
//! acceleration = 800
//! jump_power = 500
//! friction = 0.8
//!
//! [shadow]
//! max_speed = 180
//! acceleration = 700
//! jump_power = 450
//! friction = 0.8
//!
//! [follow]
//! offset_x = 20
//! offset_y = -5
//! lerp = 0.05
//! teleport_threshold = 150
//! settle_distance = 5
//!
//! [physics]
//! gravity = 800
//!
//! [window]
//! width = 1024
//! height = 768
//! target_fps = 60
//!
//! [bindings]
//! switch = F, TAB
//! ```

use bevy_ecs::prelude::*;
use configparser::ini::Ini;
use glam::DVec2;
use log::info;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::components::character::MovementTuning;
use crate::components::follow::{
    DEFAULT_FOLLOW_OFFSET, DEFAULT_LERP_FACTOR, DEFAULT_SETTLE_DISTANCE,
    DEFAULT_TELEPORT_THRESHOLD, FollowBehavior,
};
use crate::resources::coordinator::DEFAULT_SWITCH_COOLDOWN;
use crate::resources::input::{Action, KeyBindings};
use crate::resources::worldtime::DEFAULT_TICK_RATE;

const DEFAULT_GRAVITY: f64 = 800.0;
const DEFAULT_WINDOW_WIDTH: u32 = 1024;
const DEFAULT_WINDOW_HEIGHT: u32 = 768;
const DEFAULT_TARGET_FPS: u32 = 60;
const DEFAULT_CONFIG_PATH: &str = "./config.ini";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load config file {path}: {reason}")]
    Load { path: PathBuf, reason: String },
    #[error("failed to save config file {path}: {source}")]
    Save {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("[{section}] {key}: {reason}")]
    Parse {
        section: String,
        key: String,
        reason: String,
    },
    #[error("invalid {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

#[derive(Resource, Debug, Clone)]
pub struct GameConfig {
    /// Simulation ticks per second.
    pub tick_rate: f64,
    /// Post-switch cooldown in milliseconds.
    pub switch_cooldown_ms: u64,
    pub main: MovementTuning,
    pub shadow: MovementTuning,
    pub follow_offset: DVec2,
    pub follow_lerp: f64,
    pub teleport_threshold: f64,
    pub settle_distance: f64,
    /// Downward acceleration used by the arcade physics backend.
    pub gravity: f64,
    pub window_width: u32,
    pub window_height: u32,
    pub target_fps: u32,
    pub bindings: KeyBindings,
    /// Path to the configuration file.
    pub config_path: PathBuf,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl GameConfig {
    /// Create a new configuration with the reference values.
    pub fn new() -> Self {
        Self {
            tick_rate: DEFAULT_TICK_RATE,
            switch_cooldown_ms: (DEFAULT_SWITCH_COOLDOWN * 1000.0) as u64,
            main: MovementTuning::main(),
            shadow: MovementTuning::shadow(),
            follow_offset: DEFAULT_FOLLOW_OFFSET,
            follow_lerp: DEFAULT_LERP_FACTOR,
            teleport_threshold: DEFAULT_TELEPORT_THRESHOLD,
            settle_distance: DEFAULT_SETTLE_DISTANCE,
            gravity: DEFAULT_GRAVITY,
            window_width: DEFAULT_WINDOW_WIDTH,
            window_height: DEFAULT_WINDOW_HEIGHT,
            target_fps: DEFAULT_TARGET_FPS,
            bindings: KeyBindings::default(),
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    /// Create a new configuration with a custom config file path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    /// Fixed tick length in seconds.
    pub fn tick_seconds(&self) -> f64 {
        1.0 / self.tick_rate
    }

    pub fn switch_cooldown_seconds(&self) -> f64 {
        self.switch_cooldown_ms as f64 / 1000.0
    }

    /// Follow behavior built from the `[follow]` section.
    pub fn follow_behavior(&self) -> FollowBehavior {
        FollowBehavior::new(self.follow_offset, self.follow_lerp, self.teleport_threshold)
            .with_settle_distance(self.settle_distance)
    }

    /// Load configuration from the INI file at `config_path`.
    ///
    /// Missing values retain their current values.
    pub fn load_from_file(&mut self) -> Result<(), ConfigError> {
        let mut ini = Ini::new();
        ini.load(&self.config_path).map_err(|reason| ConfigError::Load {
            path: self.config_path.clone(),
            reason,
        })?;
        self.apply_ini(&ini)?;
        info!(
            "Loaded config from {:?}: tick_rate={}, cooldown={}ms, gravity={}",
            self.config_path, self.tick_rate, self.switch_cooldown_ms, self.gravity
        );
        Ok(())
    }

    /// Load configuration from INI text.
    pub fn load_from_str(&mut self, text: &str) -> Result<(), ConfigError> {
        let mut ini = Ini::new();
        ini.read(text.to_string())
            .map_err(|reason| ConfigError::Load {
                path: PathBuf::from("<string>"),
                reason,
            })?;
        self.apply_ini(&ini)
    }

    /// Read `ini` into a copy and keep it only if it validates.
    fn apply_ini(&mut self, ini: &Ini) -> Result<(), ConfigError> {
        let mut next = self.clone();
        next.read_ini(ini)?;
        next.validate()?;
        *self = next;
        Ok(())
    }

    fn read_ini(&mut self, ini: &Ini) -> Result<(), ConfigError> {
        if let Some(v) = float(ini, "simulation", "tick_rate")? {
            self.tick_rate = v;
        }
        if let Some(v) = uint(ini, "switch", "cooldown_ms")? {
            self.switch_cooldown_ms = v;
        }
        apply_tuning(ini, "main", &mut self.main)?;
        apply_tuning(ini, "shadow", &mut self.shadow)?;

        if let Some(v) = float(ini, "follow", "offset_x")? {
            self.follow_offset.x = v;
        }
        if let Some(v) = float(ini, "follow", "offset_y")? {
            self.follow_offset.y = v;
        }
        if let Some(v) = float(ini, "follow", "lerp")? {
            self.follow_lerp = v;
        }
        if let Some(v) = float(ini, "follow", "teleport_threshold")? {
            self.teleport_threshold = v;
        }
        if let Some(v) = float(ini, "follow", "settle_distance")? {
            self.settle_distance = v;
        }
        if let Some(v) = float(ini, "physics", "gravity")? {
            self.gravity = v;
        }

        if let Some(v) = uint(ini, "window", "width")? {
            self.window_width = v as u32;
        }
        if let Some(v) = uint(ini, "window", "height")? {
            self.window_height = v as u32;
        }
        if let Some(v) = uint(ini, "window", "target_fps")? {
            self.target_fps = v as u32;
        }

        for action in Action::ALL {
            if let Some(keys) = ini.get("bindings", action.name()) {
                self.bindings.set(
                    action,
                    keys.split(',')
                        .map(|k| k.trim().to_ascii_uppercase())
                        .filter(|k| !k.is_empty()),
                );
            }
        }
        Ok(())
    }

    /// Reject values the simulation cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.tick_rate > 0.0) {
            return Err(ConfigError::Invalid {
                key: "simulation.tick_rate",
                reason: format!("must be positive, got {}", self.tick_rate),
            });
        }
        if !(self.follow_lerp > 0.0 && self.follow_lerp <= 1.0) {
            return Err(ConfigError::Invalid {
                key: "follow.lerp",
                reason: format!("must be in (0, 1], got {}", self.follow_lerp),
            });
        }
        if !(self.teleport_threshold > 0.0) {
            return Err(ConfigError::Invalid {
                key: "follow.teleport_threshold",
                reason: format!("must be positive, got {}", self.teleport_threshold),
            });
        }
        if !(self.settle_distance >= 0.0) {
            return Err(ConfigError::Invalid {
                key: "follow.settle_distance",
                reason: format!("must not be negative, got {}", self.settle_distance),
            });
        }
        Ok(())
    }

    /// Save configuration to the INI file.
    ///
    /// Creates the file if it doesn't exist.
    pub fn save_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        let mut ini = Ini::new();
        let mut set = |section: &str, key: &str, value: String| {
            ini.set(section, key, Some(value));
        };

        set("simulation", "tick_rate", self.tick_rate.to_string());
        set("switch", "cooldown_ms", self.switch_cooldown_ms.to_string());
        for (section, t) in [("main", &self.main), ("shadow", &self.shadow)] {
            set(section, "max_speed", t.max_speed.to_string());
            set(section, "acceleration", t.acceleration.to_string());
            set(section, "jump_power", t.jump_power.to_string());
            set(section, "friction", t.friction.to_string());
            set(section, "deadzone", t.deadzone.to_string());
        }
        set("follow", "offset_x", self.follow_offset.x.to_string());
        set("follow", "offset_y", self.follow_offset.y.to_string());
        set("follow", "lerp", self.follow_lerp.to_string());
        set("follow", "teleport_threshold", self.teleport_threshold.to_string());
        set("follow", "settle_distance", self.settle_distance.to_string());
        set("physics", "gravity", self.gravity.to_string());
        set("window", "width", self.window_width.to_string());
        set("window", "height", self.window_height.to_string());
        set("window", "target_fps", self.target_fps.to_string());
        for action in Action::ALL {
            set("bindings", action.name(), self.bindings.keys(action).join(", "));
        }

        ini.write(path).map_err(|source| ConfigError::Save {
            path: path.to_path_buf(),
            source,
        })?;
        info!("Saved config to {:?}", path);
        Ok(())
    }
}

fn float(ini: &Ini, section: &str, key: &str) -> Result<Option<f64>, ConfigError> {
    ini.getfloat(section, key).map_err(|reason| ConfigError::Parse {
        section: section.to_string(),
        key: key.to_string(),
        reason,
    })
}

fn uint(ini: &Ini, section: &str, key: &str) -> Result<Option<u64>, ConfigError> {
    ini.getuint(section, key).map_err(|reason| ConfigError::Parse {
        section: section.to_string(),
        key: key.to_string(),
        reason,
    })
}

fn apply_tuning(ini: &Ini, section: &str, tuning: &mut MovementTuning) -> Result<(), ConfigError> {
    if let Some(v) = float(ini, section, "max_speed")? {
        tuning.max_speed = v;
    }
    if let Some(v) = float(ini, section, "acceleration")? {
        tuning.acceleration = v;
    }
    if let Some(v) = float(ini, section, "jump_power")? {
        tuning.jump_power = v;
    }
    if let Some(v) = float(ini, section, "friction")? {
        tuning.friction = v;
    }
    if let Some(v) = float(ini, section, "deadzone")? {
        tuning.deadzone = v;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_reference_behavior() {
        let c = GameConfig::new();
        assert_eq!(c.switch_cooldown_ms, 200);
        assert_eq!(c.main, MovementTuning::main());
        assert_eq!(c.shadow, MovementTuning::shadow());
        assert_eq!(c.follow_offset, DVec2::new(20.0, -5.0));
        assert!((c.tick_seconds() - 1.0 / 60.0).abs() < 1e-12);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn test_partial_ini_keeps_other_defaults() {
        let mut c = GameConfig::new();
        c.load_from_str("[switch]\ncooldown_ms = 350\n[shadow]\nmax_speed = 220\n")
            .unwrap();
        assert_eq!(c.switch_cooldown_ms, 350);
        assert_eq!(c.shadow.max_speed, 220.0);
        assert_eq!(c.shadow.acceleration, 700.0);
        assert_eq!(c.main, MovementTuning::main());
    }

    #[test]
    fn test_bindings_section() {
        let mut c = GameConfig::new();
        c.load_from_str("[bindings]\nswitch = f, tab\n").unwrap();
        assert_eq!(
            c.bindings.keys(Action::Switch),
            ["F".to_string(), "TAB".to_string()]
        );
        assert_eq!(c.bindings.keys(Action::Left), ["A".to_string(), "LEFT".to_string()]);
    }

    #[test]
    fn test_rejects_lerp_out_of_range() {
        let mut c = GameConfig::new();
        let err = c.load_from_str("[follow]\nlerp = 1.5\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "follow.lerp", .. }));
    }

    #[test]
    fn test_rejected_file_leaves_config_untouched() {
        let mut c = GameConfig::new();
        let err = c
            .load_from_str("[switch]\ncooldown_ms = 500\n[follow]\nlerp = 0\n")
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "follow.lerp", .. }));
        assert_eq!(c.switch_cooldown_ms, 200);
        assert_eq!(c.follow_lerp, 0.05);

        let err = c
            .load_from_str("[simulation]\ntick_rate = 30\n[physics]\ngravity = lots\n")
            .unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!((c.tick_seconds() - 1.0 / 60.0).abs() < 1e-12);
    }

    #[test]
    fn test_rejects_non_numeric_value() {
        let mut c = GameConfig::new();
        let err = c.load_from_str("[physics]\ngravity = lots\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_missing_file_is_a_load_error() {
        let mut c = GameConfig::with_path("./definitely/not/here.ini");
        assert!(matches!(c.load_from_file(), Err(ConfigError::Load { .. })));
    }

    #[test]
    fn test_follow_behavior_from_config() {
        let mut c = GameConfig::new();
        c.teleport_threshold = 90.0;
        let f = c.follow_behavior();
        assert_eq!(f.teleport_threshold, 90.0);
        assert_eq!(f.lerp_factor, 0.05);
        assert!(!f.is_following());
    }
}
