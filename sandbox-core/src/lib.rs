//! Rigid-body motion and collision response for a small real-time sandbox.
//!
//! Bodies are advanced under gravity by one of three integrators, then
//! contact pairs are resolved with a restitution impulse, a tangential
//! sliding correction and a rollback to the pre-step position.

pub mod analyzer;
pub mod ast;
pub mod body;
pub mod collider;
pub mod config;
pub mod contact;
pub mod diagnostics;
pub mod engine;
pub mod integrator;
pub mod materials;
pub mod parser;
pub mod resolver;
pub mod runtime;

pub use analyzer::analyze_scene;
pub use body::{IntegrationMethod, Material, PhysicsBody};
pub use collider::{Collider, Shape, ShapeCollider};
pub use config::PhysicsConfig;
pub use contact::{AllPairsContacts, Contact, ContactProvider};
pub use diagnostics::{Diagnostic, DiagnosticSeverity, Diagnostics, Span};
pub use engine::World;
pub use materials::RestitutionTable;
pub use parser::{parse_scene, ParseError};
pub use resolver::{apply_sliding_correction, pair_mut, resolve_collision};
pub use runtime::{
    build_simulation_context, build_simulation_context_from_source, build_world,
    get_body_states, run_scene, step_simulation, BodyState, DetectorResult, SceneError,
    SimulationContext, SimulationResult,
};
