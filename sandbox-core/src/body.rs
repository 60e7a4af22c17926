use crate::collider::Collider;
use glam::{Mat4, Vec3};
use std::fmt;
use std::str::FromStr;

/// Surface material, used to index the restitution table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Material {
    #[default]
    Default,
    Rubber,
    Wood,
    Steel,
    Concrete,
    Ice,
}

impl Material {
    pub const COUNT: usize = 6;

    pub const ALL: [Material; Material::COUNT] = [
        Material::Default,
        Material::Rubber,
        Material::Wood,
        Material::Steel,
        Material::Concrete,
        Material::Ice,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Material::Default => "default",
            Material::Rubber => "rubber",
            Material::Wood => "wood",
            Material::Steel => "steel",
            Material::Concrete => "concrete",
            Material::Ice => "ice",
        }
    }
}

impl fmt::Display for Material {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Material {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Material::ALL
            .iter()
            .copied()
            .find(|m| m.name() == s)
            .ok_or_else(|| format!("unknown material '{}'", s))
    }
}

/// Numerical scheme used to advance a body, fixed for the body's lifetime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IntegrationMethod {
    #[default]
    SemiImplicitEuler,
    Rk4,
    Verlet,
}

impl FromStr for IntegrationMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "euler" => Ok(IntegrationMethod::SemiImplicitEuler),
            "rk4" => Ok(IntegrationMethod::Rk4),
            "verlet" => Ok(IntegrationMethod::Verlet),
            other => Err(format!("unknown integration method '{}'", other)),
        }
    }
}

/// A simulated rigid body (linear motion only)
#[derive(Debug)]
pub struct PhysicsBody {
    pub name: String,
    pub velocity: Vec3,
    /// Recomputed every tick from gravity; not meaningful between ticks
    pub acceleration: Vec3,
    inverse_mass: f32,
    pub is_fixed: bool,
    integration_method: IntegrationMethod,
    pub material: Material,
    /// Position before the current integration step, restored on collision
    pub previous_position: Vec3,
    pub world_matrix: Mat4,
    pub collider: Option<Box<dyn Collider>>,
}

impl PhysicsBody {
    pub fn new(
        name: impl Into<String>,
        inverse_mass: f32,
        integration_method: IntegrationMethod,
        material: Material,
    ) -> Self {
        Self {
            name: name.into(),
            velocity: Vec3::ZERO,
            acceleration: Vec3::ZERO,
            inverse_mass,
            is_fixed: false,
            integration_method,
            material,
            previous_position: Vec3::ZERO,
            world_matrix: Mat4::IDENTITY,
            collider: None,
        }
    }

    pub fn with_collider(mut self, collider: impl Collider + 'static) -> Self {
        self.previous_position = collider.position();
        self.collider = Some(Box::new(collider));
        self
    }

    pub fn with_velocity(mut self, velocity: Vec3) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn fixed(mut self) -> Self {
        self.is_fixed = true;
        self
    }

    pub fn inverse_mass(&self) -> f32 {
        self.inverse_mass
    }

    pub fn integration_method(&self) -> IntegrationMethod {
        self.integration_method
    }

    /// Current position, or `None` for a body without a collider
    pub fn position(&self) -> Option<Vec3> {
        self.collider.as_ref().map(|c| c.position())
    }

    /// Record the current position so a later collision can roll back to it
    pub fn snapshot_position(&mut self) {
        if let Some(collider) = &self.collider {
            self.previous_position = collider.position();
        }
    }

    pub(crate) fn restore_previous_position(&mut self) {
        if let Some(collider) = self.collider.as_mut() {
            collider.set_position(self.previous_position);
        }
    }
}
