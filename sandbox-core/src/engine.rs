use crate::body::PhysicsBody;
use crate::config::PhysicsConfig;
use crate::contact::ContactProvider;
use crate::integrator;
use crate::resolver::{pair_mut, resolve_collision};
use tracing::debug;

/// The physics world: a body arena plus the configuration shared by every body
#[derive(Debug)]
pub struct World {
    pub bodies: Vec<PhysicsBody>,
    pub config: PhysicsConfig,
}

impl World {
    pub fn new(config: PhysicsConfig) -> Self {
        Self {
            bodies: Vec::new(),
            config,
        }
    }

    /// Add a body and return its arena index
    pub fn add_body(&mut self, body: PhysicsBody) -> usize {
        self.bodies.push(body);
        self.bodies.len() - 1
    }

    pub fn body(&self, name: &str) -> Option<&PhysicsBody> {
        self.bodies.iter().find(|b| b.name == name)
    }

    pub fn body_index(&self, name: &str) -> Option<usize> {
        self.bodies.iter().position(|b| b.name == name)
    }

    /// Advance the world by one tick and return the number of contacts handled.
    ///
    /// Every body is snapshotted and integrated before any contact is
    /// resolved; contacts are then resolved one at a time in the order the
    /// provider reports them.
    pub fn step(&mut self, dt: f32, provider: &impl ContactProvider) -> usize {
        for body in &mut self.bodies {
            body.snapshot_position();
        }

        let gravity = self.config.gravity;
        for body in &mut self.bodies {
            integrator::update(body, gravity, dt);
        }

        let contacts = provider.contacts(&self.bodies);
        for contact in &contacts {
            if let Some((a, b)) = pair_mut(&mut self.bodies, contact.a, contact.b) {
                resolve_collision(a, b, contact.normal, contact.penetration, &self.config);
            }
        }

        debug!(bodies = self.bodies.len(), contacts = contacts.len(), "tick");
        contacts.len()
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new(PhysicsConfig::default())
    }
}
