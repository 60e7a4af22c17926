use crate::body::{IntegrationMethod, PhysicsBody};
use glam::Vec3;

impl IntegrationMethod {
    /// Advance `velocity` in place and return the position delta for this step
    pub fn advance(self, velocity: &mut Vec3, acceleration: Vec3, dt: f32) -> Vec3 {
        match self {
            IntegrationMethod::SemiImplicitEuler => semi_implicit_euler(velocity, acceleration, dt),
            IntegrationMethod::Rk4 => rk4(velocity, acceleration, dt),
            IntegrationMethod::Verlet => verlet(velocity, acceleration, dt),
        }
    }
}

/// Semi-implicit Euler: v += a*dt, then delta = v_new*dt
pub fn semi_implicit_euler(velocity: &mut Vec3, acceleration: Vec3, dt: f32) -> Vec3 {
    *velocity += acceleration * dt;
    *velocity * dt
}

/// RK4 for a step with constant acceleration.
///
/// Every velocity stage is taken from the pre-step velocity rather than
/// chained from the previous stage, and every acceleration stage equals the
/// initial acceleration.
pub fn rk4(velocity: &mut Vec3, acceleration: Vec3, dt: f32) -> Vec3 {
    let v0 = *velocity;

    let k1_v = v0;
    let k1_a = acceleration;

    let k2_v = v0 + k1_a * (0.5 * dt);
    let k2_a = k1_a;

    let k3_v = v0 + k2_a * (0.5 * dt);
    let k3_a = k2_a;

    let k4_v = v0 + k3_a * dt;
    let k4_a = k3_a;

    let sixth = dt / 6.0;
    *velocity += (k1_a + 2.0 * k2_a + 2.0 * k3_a + k4_a) * sixth;

    (k1_v + 2.0 * k2_v + 2.0 * k3_v + k4_v) * sixth
}

/// Verlet variant: displacement from the pre-step velocity, velocity updated afterwards
pub fn verlet(velocity: &mut Vec3, acceleration: Vec3, dt: f32) -> Vec3 {
    let delta = *velocity * dt + acceleration * (0.5 * dt * dt);
    *velocity += acceleration * dt;
    delta
}

/// Advance one body by `dt` under `gravity`.
///
/// Bodies without a collider and fixed bodies are left untouched. The
/// previous-position snapshot is the caller's job (see `World::step`).
pub fn update(body: &mut PhysicsBody, gravity: Vec3, dt: f32) {
    if body.is_fixed || body.collider.is_none() {
        return;
    }

    body.acceleration = gravity * body.inverse_mass();

    let method = body.integration_method();
    let delta = method.advance(&mut body.velocity, body.acceleration, dt);

    let Some(collider) = body.collider.as_mut() else {
        return;
    };
    collider.increment_position(delta);

    body.world_matrix = collider.update_world_matrix();
}
