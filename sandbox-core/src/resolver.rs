//! Impulse-based response for a single contact pair.
//!
//! Penetration is never pushed out. After an impulse both bodies are put
//! back at their pre-step positions and the overlap is re-evaluated on the
//! next tick.

use crate::body::PhysicsBody;
use crate::config::PhysicsConfig;
use glam::Vec3;
use tracing::trace;

/// Relative normal speed above which a contact counts as separating or resting
pub const SEPARATING_EPSILON: f32 = 1e-4;
/// Combined inverse mass at or below which neither body can move
pub const INVERSE_MASS_EPSILON: f32 = 1e-5;
/// Applied per axis to each moving body after the impulse
pub const COLLISION_DAMPING: f32 = 0.99;

/// Tangential speed² under which a body counts as stuck
pub const STUCK_TANGENT_SPEED_SQ: f32 = 0.001;
/// Tangential gravity² above which a slope can slide a body
pub const SLOPE_GRAVITY_SQ: f32 = 0.001;
pub const SLOW_TANGENT_SPEED_SQ: f32 = 1e-3;
pub const VERY_SLOW_TANGENT_SPEED_SQ: f32 = 1e-5;

pub const UNSTICK_SCALE: f32 = 0.2;
pub const SLOW_UNSTICK_SCALE: f32 = 0.3;
pub const VERY_SLOW_UNSTICK_SCALE: f32 = 0.4;
/// Fraction of tangential gravity added on every correction
pub const SLIDING_BIAS: f32 = 0.1;

/// Resolve a confirmed contact between `a` and `b`.
///
/// `normal` is unit length and points from `b` toward `a`.
/// `_penetration_depth` is accepted for the contact contract but unused.
pub fn resolve_collision(
    a: &mut PhysicsBody,
    b: &mut PhysicsBody,
    normal: Vec3,
    _penetration_depth: f32,
    config: &PhysicsConfig,
) {
    if a.is_fixed && b.is_fixed {
        trace!(a = %a.name, b = %b.name, "both bodies fixed, skipping");
        return;
    }

    let relative_velocity = a.velocity - b.velocity;
    let velocity_along_normal = relative_velocity.dot(normal);
    if velocity_along_normal > -SEPARATING_EPSILON {
        trace!(a = %a.name, b = %b.name, vn = velocity_along_normal, "separating, skipping");
        return;
    }

    let inv_mass_a = if a.is_fixed { 0.0 } else { a.inverse_mass() };
    let inv_mass_b = if b.is_fixed { 0.0 } else { b.inverse_mass() };
    let inv_mass_sum = inv_mass_a + inv_mass_b;
    if inv_mass_sum <= INVERSE_MASS_EPSILON {
        trace!(a = %a.name, b = %b.name, "no movable mass, skipping");
        return;
    }

    let e = config.restitution.get(a.material, b.material);
    let impulse_magnitude = -(1.0 + e) * velocity_along_normal / inv_mass_sum;
    let impulse = normal * impulse_magnitude;

    trace!(
        a = %a.name,
        b = %b.name,
        vn = velocity_along_normal,
        restitution = e,
        impulse = impulse_magnitude,
        "resolving contact"
    );

    if !a.is_fixed {
        a.velocity += impulse * inv_mass_a;
        a.velocity *= COLLISION_DAMPING;
    }
    if !b.is_fixed {
        b.velocity -= impulse * inv_mass_b;
        b.velocity *= COLLISION_DAMPING;
    }

    if !a.is_fixed {
        apply_sliding_correction(&mut a.velocity, normal, config.gravity);
    }
    if !b.is_fixed {
        apply_sliding_correction(&mut b.velocity, normal, config.gravity);
    }

    a.restore_previous_position();
    b.restore_previous_position();
}

/// Nudge a velocity along the slope defined by `normal` so bodies do not
/// rest indefinitely on an incline.
///
/// A stuck body (slow tangential motion with gravity pulling along the
/// surface) gets a scaled share of tangential gravity; the finest matching
/// threshold picks the scale. Every call then adds [`SLIDING_BIAS`] of
/// tangential gravity regardless.
pub fn apply_sliding_correction(velocity: &mut Vec3, normal: Vec3, gravity: Vec3) {
    let v_tangent = *velocity - normal * velocity.dot(normal);
    let g_tangent = gravity - normal * gravity.dot(normal);

    let v_tangent_sq = v_tangent.length_squared();
    let g_tangent_sq = g_tangent.length_squared();

    if v_tangent_sq < STUCK_TANGENT_SPEED_SQ && g_tangent_sq > SLOPE_GRAVITY_SQ {
        let mut scale = UNSTICK_SCALE;
        if v_tangent_sq < SLOW_TANGENT_SPEED_SQ {
            scale = SLOW_UNSTICK_SCALE;
        }
        if v_tangent_sq < VERY_SLOW_TANGENT_SPEED_SQ {
            scale = VERY_SLOW_UNSTICK_SCALE;
        }
        *velocity += g_tangent * scale;
    }

    *velocity += g_tangent * SLIDING_BIAS;
}

/// Borrow two distinct bodies of an arena mutably.
///
/// Returns `None` when `i == j` or either index is out of range.
pub fn pair_mut(
    bodies: &mut [PhysicsBody],
    i: usize,
    j: usize,
) -> Option<(&mut PhysicsBody, &mut PhysicsBody)> {
    if i == j || i >= bodies.len() || j >= bodies.len() {
        return None;
    }
    if i < j {
        let (head, tail) = bodies.split_at_mut(j);
        Some((&mut head[i], &mut tail[0]))
    } else {
        let (head, tail) = bodies.split_at_mut(i);
        Some((&mut tail[0], &mut head[j]))
    }
}
