//! Arcade physics backend.
//!
//! A minimal stand-in for a full physics engine: constant downward gravity,
//! per-axis integration, and push-out against [`StaticBody`] boxes and the
//! level bounds. After the step each body's `touching_down` reports whether
//! something stopped it from falling.
//!
//! Bodies with `enabled == false` are skipped entirely; the follow system
//! owns their position.
use bevy_ecs::prelude::*;
use glam::DVec2;

use crate::components::boxcollider::{BoxCollider, StaticBody};
use crate::components::mapposition::MapPosition;
use crate::components::rigidbody::RigidBody;
use crate::resources::level::LevelLayout;
use crate::resources::worldtime::WorldTime;

#[derive(Clone, Copy)]
enum Axis {
    X,
    Y,
}

fn component(v: DVec2, axis: Axis) -> f64 {
    match axis {
        Axis::X => v.x,
        Axis::Y => v.y,
    }
}

fn component_mut(v: &mut DVec2, axis: Axis) -> &mut f64 {
    match axis {
        Axis::X => &mut v.x,
        Axis::Y => &mut v.y,
    }
}

/// Overlaps shallower than this are rounding noise from a previous push-out.
const CONTACT_EPSILON: f64 = 1e-6;

fn penetrates(min: DVec2, max: DVec2, solid_min: DVec2, solid_max: DVec2) -> bool {
    min.x < solid_max.x - CONTACT_EPSILON
        && max.x > solid_min.x + CONTACT_EPSILON
        && min.y < solid_max.y - CONTACT_EPSILON
        && max.y > solid_min.y + CONTACT_EPSILON
}

/// Move `pos` along `axis` by the body's velocity and resolve overlaps with
/// `solids`. Returns true if a solid blocked downward motion.
fn step_axis(
    pos: &mut DVec2,
    body: &mut RigidBody,
    collider: &BoxCollider,
    solids: &[(DVec2, BoxCollider)],
    axis: Axis,
    dt: f64,
) -> bool {
    let v = component(body.velocity, axis);
    *component_mut(pos, axis) += v * dt;
    if v == 0.0 {
        return false;
    }
    let mut landed = false;
    for (solid_pos, solid) in solids {
        let (min, max) = collider.aabb(*pos);
        let (solid_min, solid_max) = solid.aabb(*solid_pos);
        if !penetrates(min, max, solid_min, solid_max) {
            continue;
        }
        let push = if v > 0.0 {
            component(solid_min, axis) - component(max, axis)
        } else {
            component(solid_max, axis) - component(min, axis)
        };
        *component_mut(pos, axis) += push;
        *component_mut(&mut body.velocity, axis) = 0.0;
        if matches!(axis, Axis::Y) && v > 0.0 {
            landed = true;
        }
        break;
    }
    landed
}

/// Keep the collider inside `[0, bounds]`. Returns true if the floor was hit.
fn clamp_to_bounds(
    pos: &mut DVec2,
    body: &mut RigidBody,
    collider: &BoxCollider,
    bounds: DVec2,
) -> bool {
    let (min, max) = collider.aabb(*pos);
    let mut on_floor = false;
    if min.x < 0.0 {
        pos.x -= min.x;
        body.velocity.x = body.velocity.x.max(0.0);
    } else if max.x > bounds.x {
        pos.x -= max.x - bounds.x;
        body.velocity.x = body.velocity.x.min(0.0);
    }
    if min.y < 0.0 {
        pos.y -= min.y;
        body.velocity.y = body.velocity.y.max(0.0);
    } else if max.y >= bounds.y {
        pos.y -= max.y - bounds.y;
        body.velocity.y = body.velocity.y.min(0.0);
        on_floor = true;
    }
    on_floor
}

/// Integrate every enabled body for one tick.
pub fn arcade_physics_system(
    mut bodies: Query<(&mut MapPosition, &mut RigidBody, &BoxCollider), Without<StaticBody>>,
    statics: Query<(&MapPosition, &BoxCollider), With<StaticBody>>,
    level: Res<LevelLayout>,
    time: Res<WorldTime>,
) {
    let dt = time.delta;
    let solids: Vec<(DVec2, BoxCollider)> = statics
        .iter()
        .map(|(position, collider)| (position.pos(), *collider))
        .collect();

    for (mut position, mut body, collider) in bodies.iter_mut() {
        if !body.enabled {
            continue;
        }
        body.velocity.y += level.gravity * dt;

        let mut pos = position.pos();
        step_axis(&mut pos, &mut body, collider, &solids, Axis::X, dt);
        let landed = step_axis(&mut pos, &mut body, collider, &solids, Axis::Y, dt);
        let on_floor = clamp_to_bounds(&mut pos, &mut body, collider, level.bounds);

        body.touching_down = landed || on_floor;
        position.set_pos(pos);
    }
}
