//! Collision resolution: impulse, damping, sliding correction and rollback

use glam::Vec3;
use sandbox_core::resolver::{COLLISION_DAMPING, SLIDING_BIAS, SLOW_UNSTICK_SCALE};
use sandbox_core::tests::test_helpers::{approx_eq_f32, approx_eq_vec3, sphere_body};
use sandbox_core::{
    apply_sliding_correction, pair_mut, resolve_collision, IntegrationMethod, Material,
    PhysicsBody, PhysicsConfig, RestitutionTable, ShapeCollider,
};

fn zero_gravity(e: f32) -> PhysicsConfig {
    PhysicsConfig::new(Vec3::ZERO, RestitutionTable::uniform(e))
}

/// Snapshot both bodies, then move them as an integration step would
fn displaced_pair(velocity_a: Vec3, velocity_b: Vec3) -> (PhysicsBody, PhysicsBody) {
    let mut a = sphere_body("a", Vec3::new(0.0, 1.0, 0.0), 1.0).with_velocity(velocity_a);
    let mut b = sphere_body("b", Vec3::new(0.0, -1.0, 0.0), 1.0).with_velocity(velocity_b);
    a.snapshot_position();
    b.snapshot_position();
    a.collider.as_mut().unwrap().increment_position(Vec3::new(0.0, -0.2, 0.0));
    b.collider.as_mut().unwrap().increment_position(Vec3::new(0.0, 0.3, 0.0));
    (a, b)
}

#[test]
fn test_impulse_magnitude_and_damping() {
    // vn = -2, e = 0.5, both inverse masses 1 -> impulse 1.5 along +y
    let (mut a, mut b) = displaced_pair(Vec3::new(0.0, -2.0, 0.0), Vec3::ZERO);
    let config = zero_gravity(0.5);

    resolve_collision(&mut a, &mut b, Vec3::Y, 0.1, &config);

    // a: (-2 + 1.5) * 0.99, b: (0 - 1.5) * 0.99
    assert!(approx_eq_f32(a.velocity.y, -0.5 * COLLISION_DAMPING, 1e-6));
    assert!(approx_eq_f32(b.velocity.y, -1.5 * COLLISION_DAMPING, 1e-6));
}

#[test]
fn test_damping_applies_once_per_axis() {
    let (mut a, mut b) = displaced_pair(Vec3::new(1.0, -2.0, -4.0), Vec3::new(2.0, 0.0, 0.5));
    let config = zero_gravity(0.5);

    resolve_collision(&mut a, &mut b, Vec3::Y, 0.0, &config);

    // Tangential axes only see the damping
    assert!(approx_eq_f32(a.velocity.x, 0.99, 1e-6));
    assert!(approx_eq_f32(a.velocity.z, -3.96, 1e-6));
    assert!(approx_eq_f32(b.velocity.x, 1.98, 1e-6));
    assert!(approx_eq_f32(b.velocity.z, 0.495, 1e-6));
    assert!(approx_eq_f32(a.velocity.y, -0.495, 1e-6));
    assert!(approx_eq_f32(b.velocity.y, -1.485, 1e-6));
}

#[test]
fn test_separating_contact_is_untouched() {
    // vn = 0.001
    let (mut a, mut b) = displaced_pair(Vec3::new(0.0, 0.001, 0.0), Vec3::ZERO);
    let (pos_a, pos_b) = (a.position(), b.position());

    resolve_collision(&mut a, &mut b, Vec3::Y, 0.5, &PhysicsConfig::default());

    assert_eq!(a.velocity, Vec3::new(0.0, 0.001, 0.0));
    assert_eq!(b.velocity, Vec3::ZERO);
    assert_eq!(a.position(), pos_a);
    assert_eq!(b.position(), pos_b);
}

#[test]
fn test_resting_contact_within_epsilon_is_untouched() {
    let (mut a, mut b) = displaced_pair(Vec3::new(0.0, -0.00005, 0.0), Vec3::ZERO);
    let pos_a = a.position();

    resolve_collision(&mut a, &mut b, Vec3::Y, 0.5, &PhysicsConfig::default());

    assert_eq!(a.velocity, Vec3::new(0.0, -0.00005, 0.0));
    assert_eq!(a.position(), pos_a);
}

#[test]
fn test_resolution_rolls_back_positions() {
    let (mut a, mut b) = displaced_pair(Vec3::new(0.3, -5.0, 0.0), Vec3::new(0.0, 2.0, 0.0));
    let config = PhysicsConfig::default();

    resolve_collision(&mut a, &mut b, Vec3::Y, 0.4, &config);

    assert_eq!(a.position(), Some(a.previous_position));
    assert_eq!(b.position(), Some(b.previous_position));
    assert_eq!(a.previous_position, Vec3::new(0.0, 1.0, 0.0));
    assert_eq!(b.previous_position, Vec3::new(0.0, -1.0, 0.0));
}

#[test]
fn test_both_fixed_is_a_no_op() {
    let (a, b) = displaced_pair(Vec3::new(0.0, -3.0, 0.0), Vec3::ZERO);
    let (mut a, mut b) = (a.fixed(), b.fixed());
    let pos_a = a.position();

    resolve_collision(&mut a, &mut b, Vec3::Y, 0.1, &PhysicsConfig::default());

    assert_eq!(a.velocity, Vec3::new(0.0, -3.0, 0.0));
    assert_eq!(a.position(), pos_a);
}

#[test]
fn test_zero_inverse_mass_sum_is_a_no_op() {
    let mut a = PhysicsBody::new(
        "wall",
        0.0,
        IntegrationMethod::SemiImplicitEuler,
        Material::Concrete,
    )
    .with_collider(ShapeCollider::sphere(Vec3::ZERO, 1.0))
    .with_velocity(Vec3::new(0.0, -1.0, 0.0));
    let mut b = sphere_body("b", Vec3::new(0.0, -2.0, 0.0), 1.0).fixed();
    a.collider.as_mut().unwrap().increment_position(Vec3::X);

    resolve_collision(&mut a, &mut b, Vec3::Y, 0.1, &PhysicsConfig::default());

    assert_eq!(a.velocity, Vec3::new(0.0, -1.0, 0.0));
    assert_eq!(a.position(), Some(Vec3::X));
}

#[test]
fn test_fixed_body_never_receives_impulse() {
    // Fixed a sits above b, which moves up into it; normal points from b toward a
    let mut ground = sphere_body("ground", Vec3::ZERO, 1.0).fixed();
    let mut ball = sphere_body("ball", Vec3::new(0.0, -2.0, 0.0), 1.0)
        .with_velocity(Vec3::new(0.5, 3.0, 0.0));
    ground.snapshot_position();
    ball.snapshot_position();
    ball.collider.as_mut().unwrap().increment_position(Vec3::new(0.0, 0.1, 0.0));

    let config = PhysicsConfig::default();
    resolve_collision(&mut ground, &mut ball, Vec3::Y, 0.1, &config);

    assert_eq!(ground.velocity, Vec3::ZERO);
    assert_eq!(ground.position(), Some(Vec3::ZERO));
    // Full impulse lands on the ball: (1 + e) * 3 along +y, subtracted from b
    let e = config.restitution.get(Material::Default, Material::Default);
    assert!(approx_eq_f32(ball.velocity.y, (3.0 - (1.0 + e) * 3.0) * COLLISION_DAMPING, 1e-5));
    assert_eq!(ball.position(), Some(Vec3::new(0.0, -2.0, 0.0)));
}

#[test]
fn test_restitution_lookup_uses_ordered_pair() {
    let mut table = RestitutionTable::uniform(0.5);
    table.set_ordered(Material::Rubber, Material::Steel, 1.0);
    table.set_ordered(Material::Steel, Material::Rubber, 0.0);
    let config = PhysicsConfig::new(Vec3::ZERO, table);

    let make = |material_a, material_b| {
        let mut a = PhysicsBody::new(
            "a",
            1.0,
            IntegrationMethod::SemiImplicitEuler,
            material_a,
        )
        .with_velocity(Vec3::new(0.0, -1.0, 0.0));
        let mut b = PhysicsBody::new(
            "b",
            1.0,
            IntegrationMethod::SemiImplicitEuler,
            material_b,
        );
        resolve_collision(&mut a, &mut b, Vec3::Y, 0.0, &config);
        a.velocity.y
    };

    // e = 1: impulse 1 -> a.y = 0; e = 0: impulse 0.5 -> a.y = -0.5
    assert!(approx_eq_f32(make(Material::Rubber, Material::Steel), 0.0, 1e-6));
    assert!(approx_eq_f32(make(Material::Steel, Material::Rubber), -0.5 * 0.99, 1e-6));
}

#[test]
fn test_sliding_correction_very_slow_body() {
    // |vt|^2 = 1e-6, |gt|^2 = 0.01 -> 0.4 unstick + 0.1 bias
    let gravity = Vec3::new(0.1, -9.81, 0.0);
    let mut velocity = Vec3::new(0.001, 0.0, 0.0);

    apply_sliding_correction(&mut velocity, Vec3::Y, gravity);

    let g_tangent = Vec3::new(0.1, 0.0, 0.0);
    assert!(approx_eq_vec3(velocity, Vec3::new(0.001, 0.0, 0.0) + g_tangent * 0.5, 1e-6));
}

#[test]
fn test_sliding_correction_slow_body_uses_middle_scale() {
    // |vt|^2 = 1e-4 sits between the two finer thresholds
    let gravity = Vec3::new(0.1, -9.81, 0.0);
    let mut velocity = Vec3::new(0.01, 0.0, 0.0);

    apply_sliding_correction(&mut velocity, Vec3::Y, gravity);

    assert!(approx_eq_f32(velocity.x, 0.01 + 0.1 * (SLOW_UNSTICK_SCALE + SLIDING_BIAS), 1e-6));
}

#[test]
fn test_sliding_correction_moving_body_only_gets_bias() {
    let gravity = Vec3::new(0.1, -9.81, 0.0);
    let mut velocity = Vec3::new(2.0, 0.0, 0.0);

    apply_sliding_correction(&mut velocity, Vec3::Y, gravity);

    assert!(approx_eq_f32(velocity.x, 2.0 + 0.1 * SLIDING_BIAS, 1e-6));
}

#[test]
fn test_sliding_correction_ignores_normal_components() {
    // Flat ground: gravity has no tangential part, so nothing changes
    let mut velocity = Vec3::new(0.0, -4.0, 0.0);

    apply_sliding_correction(&mut velocity, Vec3::Y, Vec3::new(0.0, -9.81, 0.0));

    assert_eq!(velocity, Vec3::new(0.0, -4.0, 0.0));
}

#[test]
fn test_sliding_correction_on_incline() {
    // 45 degree slope: tangential gravity is half of g along the slope direction
    let normal = Vec3::new(-1.0, 1.0, 0.0).normalize();
    let gravity = Vec3::new(0.0, -10.0, 0.0);
    let mut velocity = Vec3::ZERO;

    apply_sliding_correction(&mut velocity, normal, gravity);

    let g_tangent = gravity - normal * gravity.dot(normal);
    assert!(approx_eq_vec3(velocity, g_tangent * 0.5, 1e-5));
    assert!(approx_eq_f32(velocity.dot(normal), 0.0, 1e-5));
}

#[test]
fn test_pair_mut_borrows_two_bodies() {
    let mut bodies = vec![
        sphere_body("a", Vec3::ZERO, 1.0),
        sphere_body("b", Vec3::X, 1.0),
        sphere_body("c", Vec3::Y, 1.0),
    ];

    let (c, a) = pair_mut(&mut bodies, 2, 0).unwrap();
    assert_eq!(c.name, "c");
    assert_eq!(a.name, "a");

    let (a, b) = pair_mut(&mut bodies, 0, 1).unwrap();
    assert_eq!((a.name.as_str(), b.name.as_str()), ("a", "b"));

    assert!(pair_mut(&mut bodies, 1, 1).is_none());
    assert!(pair_mut(&mut bodies, 0, 3).is_none());
}
