use crate::materials::RestitutionTable;
use glam::Vec3;

pub const EARTH_GRAVITY: Vec3 = Vec3::new(0.0, -9.81, 0.0);

/// Process-wide physics settings, passed explicitly to the integrator and resolver
#[derive(Debug, Clone, PartialEq)]
pub struct PhysicsConfig {
    pub gravity: Vec3,
    pub restitution: RestitutionTable,
}

impl PhysicsConfig {
    pub fn new(gravity: Vec3, restitution: RestitutionTable) -> Self {
        Self {
            gravity,
            restitution,
        }
    }

    pub fn with_gravity(mut self, gravity: Vec3) -> Self {
        self.gravity = gravity;
        self
    }
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self::new(EARTH_GRAVITY, RestitutionTable::default())
    }
}
