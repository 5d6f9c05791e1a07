//! Scripted input for headless runs and tests.
//!
//! A script is a JSON array of steps. Each step lasts `frames` ticks; the
//! `hold` actions are down for the whole step and the `press` actions only on
//! its first tick:
//!
//! ```json
//! [
//!   { "frames": 30, "hold": ["right"] },
//!   { "frames": 1, "press": ["switch"] },
//!   { "frames": 60, "hold": ["left"], "press": ["jump"] }
//! ]
//! ```
//!
//! Once the script runs out, nothing is held.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::resources::input::{Action, HeldActions, InputSource};

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("failed to read input script {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed input script: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ScriptStep {
    pub frames: u32,
    #[serde(default)]
    pub hold: Vec<Action>,
    #[serde(default)]
    pub press: Vec<Action>,
}

impl ScriptStep {
    pub fn hold(frames: u32, actions: &[Action]) -> Self {
        Self {
            frames,
            hold: actions.to_vec(),
            press: Vec::new(),
        }
    }

    pub fn press(actions: &[Action]) -> Self {
        Self {
            frames: 1,
            hold: Vec::new(),
            press: actions.to_vec(),
        }
    }

    pub fn idle(frames: u32) -> Self {
        Self::hold(frames, &[])
    }
}

/// [`InputSource`] replaying a pre-expanded list of frames.
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    frames: Vec<HeldActions>,
    /// Index of the current frame; `None` before the first poll.
    cursor: Option<usize>,
}

impl ScriptedInput {
    pub fn from_steps(steps: &[ScriptStep]) -> Self {
        let mut frames = Vec::new();
        for step in steps {
            for i in 0..step.frames {
                let mut held = HeldActions::new();
                for a in &step.hold {
                    held.set(*a, true);
                }
                if i == 0 {
                    for a in &step.press {
                        held.set(*a, true);
                    }
                }
                frames.push(held);
            }
        }
        Self {
            frames,
            cursor: None,
        }
    }

    pub fn from_json(text: &str) -> Result<Self, ScriptError> {
        let steps: Vec<ScriptStep> = serde_json::from_str(text)?;
        Ok(Self::from_steps(&steps))
    }

    pub fn from_file(path: &Path) -> Result<Self, ScriptError> {
        let text = std::fs::read_to_string(path).map_err(|source| ScriptError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    /// Total scripted ticks.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    fn current(&self) -> Option<&HeldActions> {
        self.cursor.and_then(|i| self.frames.get(i))
    }
}

impl InputSource for ScriptedInput {
    fn poll(&mut self) {
        self.cursor = Some(self.cursor.map_or(0, |i| i.saturating_add(1)));
    }

    fn is_down(&self, action: Action) -> bool {
        self.current().is_some_and(|h| h.is_down(action))
    }
}
