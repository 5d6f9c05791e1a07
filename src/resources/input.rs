//! Per-tick input resource.
//!
//! Gameplay never looks at physical keys. An [`InputSource`] reports which
//! logical [`Action`]s are held this tick, and [`InputState`] runs one
//! [`EdgeDetector`] per action so that one-shot actions (`jump`, `switch`)
//! fire exactly once per press no matter how long the key stays down.
//!
//! Default bindings use WASD and the arrow keys for movement, SPACE/UP for
//! jump and F for switching characters. See [`KeyBindings`].
use bevy_ecs::prelude::*;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use smallvec::{SmallVec, smallvec};

/// Closed set of logical input actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Left,
    Right,
    Up,
    Down,
    Jump,
    Switch,
}

impl Action {
    /// Every action, in a stable order.
    pub const ALL: [Action; 6] = [
        Action::Left,
        Action::Right,
        Action::Up,
        Action::Down,
        Action::Jump,
        Action::Switch,
    ];

    /// Name used in config files and scripts.
    pub fn name(self) -> &'static str {
        match self {
            Action::Left => "left",
            Action::Right => "right",
            Action::Up => "up",
            Action::Down => "down",
            Action::Jump => "jump",
            Action::Switch => "switch",
        }
    }

    /// Parse an action name. Unknown names yield `None`.
    pub fn from_name(name: &str) -> Option<Action> {
        Action::ALL.into_iter().find(|a| a.name() == name)
    }

    /// One-shot actions report `is_pressed` only on the tick they went down.
    pub fn is_one_shot(self) -> bool {
        matches!(self, Action::Jump | Action::Switch)
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Anything that can tell whether an action is physically held right now.
pub trait InputSource: Send + Sync {
    /// Advance to the next tick. Called once before the state is sampled.
    fn poll(&mut self) {}

    /// Whether `action` is held during the current tick.
    fn is_down(&self, action: Action) -> bool;
}

/// Plain set of held actions. The window frontend fills one from the
/// keyboard each frame; tests build them by hand.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeldActions {
    held: [bool; 6],
}

impl HeldActions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, action: Action) -> Self {
        self.set(action, true);
        self
    }

    pub fn set(&mut self, action: Action, down: bool) {
        self.held[action.index()] = down;
    }
}

impl InputSource for HeldActions {
    fn is_down(&self, action: Action) -> bool {
        self.held[action.index()]
    }
}

/// Previous-vs-current comparison for a single boolean input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EdgeDetector {
    /// Whether the input is held this tick.
    pub active: bool,
    /// Whether the input went down this tick.
    pub just_pressed: bool,
    /// Whether the input went up this tick.
    pub just_released: bool,
}

impl EdgeDetector {
    /// Feed this tick's level and recompute the edges.
    pub fn update(&mut self, down: bool) {
        self.just_pressed = down && !self.active;
        self.just_released = !down && self.active;
        self.active = down;
    }
}

/// Resource capturing the per-tick state of every [`Action`].
#[derive(Resource, Debug, Clone, Default)]
pub struct InputState {
    states: [EdgeDetector; 6],
}

/// The [`InputSource`] that feeds [`InputState`] each tick.
#[derive(Resource)]
pub struct InputDevice(pub Box<dyn InputSource>);

impl InputDevice {
    pub fn new(source: impl InputSource + 'static) -> Self {
        Self(Box::new(source))
    }
}

impl InputState {
    /// Sample every action from `source`.
    pub fn update_from(&mut self, source: &dyn InputSource) {
        for action in Action::ALL {
            self.states[action.index()].update(source.is_down(action));
        }
    }

    /// Feed a single action's level for this tick.
    pub fn set(&mut self, action: Action, down: bool) {
        self.states[action.index()].update(down);
    }

    /// Edge state of `action`.
    pub fn state(&self, action: Action) -> EdgeDetector {
        self.states[action.index()]
    }

    /// Level-sensitive for movement actions, edge-sensitive for one-shots.
    pub fn is_pressed(&self, action: Action) -> bool {
        let state = self.state(action);
        if action.is_one_shot() {
            state.just_pressed
        } else {
            state.active
        }
    }

    /// Always level-sensitive.
    pub fn is_held(&self, action: Action) -> bool {
        self.state(action).active
    }

    /// String-keyed lookup. Unknown names are never pressed.
    pub fn is_pressed_named(&self, name: &str) -> bool {
        Action::from_name(name).is_some_and(|a| self.is_pressed(a))
    }
}

/// Key names bound to each action. Names follow raylib's `KEY_*` constants
/// without the prefix (`"A"`, `"LEFT"`, `"SPACE"`, ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyBindings {
    map: FxHashMap<Action, SmallVec<[String; 2]>>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        let mut map = FxHashMap::default();
        map.insert(Action::Left, smallvec!["A".to_string(), "LEFT".to_string()]);
        map.insert(Action::Right, smallvec!["D".to_string(), "RIGHT".to_string()]);
        map.insert(Action::Up, smallvec!["W".to_string(), "UP".to_string()]);
        map.insert(Action::Down, smallvec!["S".to_string(), "DOWN".to_string()]);
        map.insert(Action::Jump, smallvec!["SPACE".to_string(), "UP".to_string()]);
        map.insert(Action::Switch, smallvec!["F".to_string()]);
        Self { map }
    }
}

impl KeyBindings {
    /// Keys bound to `action`.
    pub fn keys(&self, action: Action) -> &[String] {
        self.map.get(&action).map(|k| k.as_slice()).unwrap_or(&[])
    }

    /// Replace the keys bound to `action`.
    pub fn set<I, S>(&mut self, action: Action, keys: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.map
            .insert(action, keys.into_iter().map(Into::into).collect());
    }
}
