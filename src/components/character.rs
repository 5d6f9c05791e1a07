//! Controllable character state machine.
//!
//! Both playable bodies (Main and Shadow) carry a [`Character`] component.
//! It owns the movement state machine, facing, ground contact and the
//! active flag; velocity lives in the entity's
//! [`RigidBody`](super::rigidbody::RigidBody) and is only written from
//! [`Character::apply_input`].
//!
//! Transitions are evaluated once per tick, and input is read only while the
//! character is active:
//!
//! - exactly one of left/right held: accelerate towards `±max_speed`, `Running`
//! - otherwise: multiply by `friction`, snap to 0 inside the deadzone, `Idle`
//! - jump pressed while grounded: launch upwards, `Jumping`
//!
//! `Following` is only ever entered through the follow system, on the entity
//! carrying a [`FollowBehavior`](super::follow::FollowBehavior).

use bevy_ecs::prelude::Component;
use serde::{Deserialize, Serialize};

use crate::components::animation::AnimationKind;
use crate::components::rigidbody::RigidBody;
use crate::resources::input::{Action, InputState};

/// Which of the two playable bodies an entity is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CharacterId {
    Main,
    Shadow,
}

impl CharacterId {
    /// The other character of the pair.
    pub fn other(self) -> CharacterId {
        match self {
            CharacterId::Main => CharacterId::Shadow,
            CharacterId::Shadow => CharacterId::Main,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            CharacterId::Main => "main",
            CharacterId::Shadow => "shadow",
        }
    }
}

impl std::fmt::Display for CharacterId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Facing {
    Left,
    #[default]
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovementState {
    #[default]
    Idle,
    Running,
    Jumping,
    Following,
}

/// Per-character movement constants. Velocities are in units per second,
/// `friction` is a per-tick multiplier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MovementTuning {
    pub max_speed: f64,
    pub acceleration: f64,
    pub jump_power: f64,
    pub friction: f64,
    /// Below this horizontal speed, friction snaps velocity to zero.
    pub deadzone: f64,
}

impl MovementTuning {
    pub fn main() -> Self {
        Self {
            max_speed: 200.0,
            acceleration: 800.0,
            jump_power: 500.0,
            friction: 0.8,
            deadzone: 10.0,
        }
    }

    /// Slightly slower and floatier than Main.
    pub fn shadow() -> Self {
        Self {
            max_speed: 180.0,
            acceleration: 700.0,
            jump_power: 450.0,
            friction: 0.8,
            deadzone: 10.0,
        }
    }

    pub fn for_character(id: CharacterId) -> Self {
        match id {
            CharacterId::Main => Self::main(),
            CharacterId::Shadow => Self::shadow(),
        }
    }
}

/// Movement state machine of one playable body.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct Character {
    id: CharacterId,
    tuning: MovementTuning,
    facing: Facing,
    movement_state: MovementState,
    active: bool,
    grounded: bool,
}

impl Character {
    /// A new, inactive, airborne character facing right.
    pub fn new(id: CharacterId, tuning: MovementTuning) -> Self {
        Self {
            id,
            tuning,
            facing: Facing::Right,
            movement_state: MovementState::Idle,
            active: false,
            grounded: false,
        }
    }

    pub fn id(&self) -> CharacterId {
        self.id
    }

    pub fn tuning(&self) -> &MovementTuning {
        &self.tuning
    }

    pub fn facing(&self) -> Facing {
        self.facing
    }

    pub fn movement_state(&self) -> MovementState {
        self.movement_state
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_grounded(&self) -> bool {
        self.grounded
    }

    /// Start accepting input. Idempotent.
    pub fn activate(&mut self) {
        self.active = true;
    }

    /// Stop accepting input. Idempotent; velocity is left alone so a body
    /// deactivated mid-jump keeps flying.
    pub fn deactivate(&mut self) {
        self.active = false;
    }

    /// Run one tick of the input half of the state machine.
    ///
    /// Does nothing while inactive. `dt` is the fixed tick length in seconds.
    pub fn apply_input(&mut self, body: &mut RigidBody, input: &InputState, dt: f64) {
        if !self.active {
            return;
        }
        let t = self.tuning;
        let left = input.is_pressed(Action::Left);
        let right = input.is_pressed(Action::Right);

        if left && !right {
            body.velocity.x = (body.velocity.x - t.acceleration * dt).max(-t.max_speed);
            self.facing = Facing::Left;
            self.movement_state = MovementState::Running;
        } else if right && !left {
            body.velocity.x = (body.velocity.x + t.acceleration * dt).min(t.max_speed);
            self.facing = Facing::Right;
            self.movement_state = MovementState::Running;
        } else {
            body.velocity.x *= t.friction;
            if body.velocity.x.abs() < t.deadzone {
                body.velocity.x = 0.0;
            }
            self.movement_state = MovementState::Idle;
        }

        if input.is_pressed(Action::Jump) && self.grounded {
            body.velocity.y = -t.jump_power;
            self.grounded = false;
            self.movement_state = MovementState::Jumping;
        }
    }

    /// Take the physics collaborator's ground report for this tick.
    ///
    /// Returns true when the character just landed.
    pub fn update_grounded(&mut self, touching_down: bool) -> bool {
        let was_grounded = self.grounded;
        self.grounded = touching_down;
        !was_grounded && self.grounded
    }

    /// Hand the body over to the follow system.
    ///
    /// Clears ground contact, which is not read back while physics is off, and
    /// drops any running pose left from player control.
    pub(crate) fn follow_engaged(&mut self) {
        self.grounded = false;
        self.movement_state = MovementState::Idle;
    }

    /// Record a follow step that moved the body.
    pub(crate) fn follow_moved(&mut self, facing: Option<Facing>) {
        match facing {
            Some(facing) => {
                self.facing = facing;
                self.movement_state = MovementState::Following;
            }
            None => self.movement_state = MovementState::Idle,
        }
    }

    /// Record a follow step that left the body in place.
    pub(crate) fn follow_settled(&mut self) {
        self.movement_state = MovementState::Idle;
    }

    /// Animation to show for the current state.
    ///
    /// `physics_enabled` is false while the body is carried kinematically; an
    /// airborne body only shows the jump pose when physics owns it.
    pub fn animation_kind(&self, physics_enabled: bool) -> AnimationKind {
        match self.movement_state {
            MovementState::Following => AnimationKind::Running,
            _ if !self.grounded && physics_enabled => AnimationKind::Jumping,
            MovementState::Running => AnimationKind::Running,
            _ => AnimationKind::Idle,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec2;

    const DT: f64 = 1.0 / 60.0;

    fn active(id: CharacterId) -> Character {
        let mut c = Character::new(id, MovementTuning::for_character(id));
        c.activate();
        c
    }

    fn input_with(actions: &[Action]) -> InputState {
        let mut input = InputState::default();
        for a in actions {
            input.set(*a, true);
        }
        input
    }

    #[test]
    fn test_holding_left_reaches_max_speed_without_overshoot() {
        for id in [CharacterId::Main, CharacterId::Shadow] {
            let mut c = active(id);
            let mut body = RigidBody::new();
            let input = input_with(&[Action::Left]);
            let t = *c.tuning();
            let ticks = (t.max_speed / (t.acceleration * DT)).ceil() as usize;
            let mut last = 0.0;
            for _ in 0..ticks {
                c.apply_input(&mut body, &input, DT);
                assert!(body.velocity.x <= last);
                assert!(body.velocity.x >= -t.max_speed);
                last = body.velocity.x;
            }
            assert!((body.velocity.x + t.max_speed).abs() < 1e-9);
            c.apply_input(&mut body, &input, DT);
            assert_eq!(body.velocity.x, -t.max_speed);
            assert_eq!(c.facing(), Facing::Left);
            assert_eq!(c.movement_state(), MovementState::Running);
        }
    }

    #[test]
    fn test_holding_right_clamps_to_max_speed() {
        let mut c = active(CharacterId::Main);
        let mut body = RigidBody::with_velocity(DVec2::new(195.0, 0.0));
        c.apply_input(&mut body, &input_with(&[Action::Right]), DT);
        assert_eq!(body.velocity.x, 200.0);
        assert_eq!(c.facing(), Facing::Right);
    }

    #[test]
    fn test_release_decays_to_exact_zero() {
        let mut c = active(CharacterId::Main);
        let mut body = RigidBody::with_velocity(DVec2::new(200.0, 0.0));
        let idle = InputState::default();
        // 200 * 0.8^14 < 10
        for _ in 0..14 {
            c.apply_input(&mut body, &idle, DT);
        }
        assert_eq!(body.velocity.x, 0.0);
        assert_eq!(c.movement_state(), MovementState::Idle);
    }

    #[test]
    fn test_friction_applies_per_tick() {
        let mut c = active(CharacterId::Shadow);
        let mut body = RigidBody::with_velocity(DVec2::new(-100.0, 0.0));
        c.apply_input(&mut body, &InputState::default(), DT);
        assert!((body.velocity.x - -80.0).abs() < 1e-9);
    }

    #[test]
    fn test_left_and_right_together_count_as_no_input() {
        let mut c = active(CharacterId::Main);
        let mut body = RigidBody::with_velocity(DVec2::new(50.0, 0.0));
        c.apply_input(&mut body, &input_with(&[Action::Left, Action::Right]), DT);
        assert!((body.velocity.x - 40.0).abs() < 1e-9);
        assert_eq!(c.movement_state(), MovementState::Idle);
    }

    #[test]
    fn test_jump_when_grounded() {
        let mut c = active(CharacterId::Main);
        c.update_grounded(true);
        let mut body = RigidBody::new();
        c.apply_input(&mut body, &input_with(&[Action::Jump]), DT);
        assert_eq!(body.velocity.y, -500.0);
        assert!(!c.is_grounded());
        assert_eq!(c.movement_state(), MovementState::Jumping);
    }

    #[test]
    fn test_jump_when_airborne_is_noop() {
        let mut c = active(CharacterId::Shadow);
        let mut body = RigidBody::with_velocity(DVec2::new(0.0, 123.0));
        c.apply_input(&mut body, &input_with(&[Action::Jump]), DT);
        assert_eq!(body.velocity.y, 123.0);
        assert_ne!(c.movement_state(), MovementState::Jumping);
    }

    #[test]
    fn test_holding_jump_does_not_retrigger() {
        let mut c = active(CharacterId::Main);
        let mut input = InputState::default();
        let mut body = RigidBody::new();
        c.update_grounded(true);
        input.set(Action::Jump, true);
        c.apply_input(&mut body, &input, DT);
        assert_eq!(body.velocity.y, -500.0);

        // Lands again while the key is still held.
        body.velocity.y = 0.0;
        c.update_grounded(true);
        input.set(Action::Jump, true);
        c.apply_input(&mut body, &input, DT);
        assert_eq!(body.velocity.y, 0.0);
    }

    #[test]
    fn test_inactive_character_ignores_input_and_keeps_velocity() {
        let mut c = active(CharacterId::Main);
        c.update_grounded(true);
        c.deactivate();
        let mut body = RigidBody::with_velocity(DVec2::new(150.0, -300.0));
        c.apply_input(&mut body, &input_with(&[Action::Left, Action::Jump]), DT);
        assert_eq!(body.velocity, DVec2::new(150.0, -300.0));
    }

    #[test]
    fn test_activate_and_deactivate_are_idempotent() {
        let mut c = Character::new(CharacterId::Main, MovementTuning::main());
        c.activate();
        c.activate();
        assert!(c.is_active());
        c.deactivate();
        c.deactivate();
        assert!(!c.is_active());
    }

    #[test]
    fn test_update_grounded_reports_landing_once() {
        let mut c = Character::new(CharacterId::Main, MovementTuning::main());
        assert!(c.update_grounded(true));
        assert!(!c.update_grounded(true));
        assert!(!c.update_grounded(false));
        assert!(c.update_grounded(true));
    }

    #[test]
    fn test_animation_kind_projection() {
        let mut c = active(CharacterId::Shadow);
        assert_eq!(c.animation_kind(true), AnimationKind::Jumping);
        assert_eq!(c.animation_kind(false), AnimationKind::Idle);
        c.update_grounded(true);
        let mut body = RigidBody::new();
        c.apply_input(&mut body, &input_with(&[Action::Right]), DT);
        assert_eq!(c.animation_kind(true), AnimationKind::Running);
        c.follow_moved(Some(Facing::Left));
        assert_eq!(c.animation_kind(false), AnimationKind::Running);
        c.follow_settled();
        assert_eq!(c.animation_kind(false), AnimationKind::Idle);
    }

    #[test]
    fn test_follow_engaged_clears_ground_and_running_pose() {
        let mut c = active(CharacterId::Shadow);
        c.update_grounded(true);
        let mut body = RigidBody::new();
        c.apply_input(&mut body, &input_with(&[Action::Right]), DT);
        assert_eq!(c.movement_state(), MovementState::Running);

        c.deactivate();
        c.follow_engaged();
        assert!(!c.is_grounded());
        assert_eq!(c.movement_state(), MovementState::Idle);
        assert_eq!(c.animation_kind(false), AnimationKind::Idle);
    }

    #[test]
    fn test_character_id_other() {
        assert_eq!(CharacterId::Main.other(), CharacterId::Shadow);
        assert_eq!(CharacterId::Shadow.other(), CharacterId::Main);
        assert_eq!(CharacterId::Shadow.to_string(), "shadow");
    }
}
