//! Position handle owned by each body.
//!
//! The core only moves colliders around; shape data is read by the
//! contact provider and the viewer.

use glam::{Mat4, Quat, Vec3};
use std::fmt::Debug;

/// Collision geometry attached to a collider
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    Sphere { radius: f32 },
    /// Half-space through the collider position; `normal` is unit length
    Plane { normal: Vec3 },
}

pub trait Collider: Debug {
    fn position(&self) -> Vec3;

    fn set_position(&mut self, position: Vec3);

    fn increment_position(&mut self, delta: Vec3);

    /// Recompute the world transform from the current position
    fn update_world_matrix(&mut self) -> Mat4;

    fn shape(&self) -> Shape;
}

#[derive(Debug, Clone)]
pub struct ShapeCollider {
    position: Vec3,
    shape: Shape,
    world: Mat4,
}

impl ShapeCollider {
    pub fn new(position: Vec3, shape: Shape) -> Self {
        let mut collider = Self {
            position,
            shape,
            world: Mat4::IDENTITY,
        };
        collider.update_world_matrix();
        collider
    }

    pub fn sphere(position: Vec3, radius: f32) -> Self {
        Self::new(position, Shape::Sphere { radius })
    }

    pub fn plane(position: Vec3, normal: Vec3) -> Self {
        Self::new(
            position,
            Shape::Plane {
                normal: normal.normalize_or_zero(),
            },
        )
    }

    pub fn world_matrix(&self) -> Mat4 {
        self.world
    }
}

impl Collider for ShapeCollider {
    fn position(&self) -> Vec3 {
        self.position
    }

    fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    fn increment_position(&mut self, delta: Vec3) {
        self.position += delta;
    }

    fn update_world_matrix(&mut self) -> Mat4 {
        let (scale, rotation) = match self.shape {
            Shape::Sphere { radius } => (Vec3::splat(radius), Quat::IDENTITY),
            Shape::Plane { normal } => (Vec3::ONE, Quat::from_rotation_arc(Vec3::Y, normal)),
        };
        self.world = Mat4::from_scale_rotation_translation(scale, rotation, self.position);
        self.world
    }

    fn shape(&self) -> Shape {
        self.shape
    }
}
