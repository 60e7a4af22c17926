use crate::analyzer::analyze_scene;
use crate::ast::{DetectorKind, Scene, ShapeDecl};
use crate::body::PhysicsBody;
use crate::collider::ShapeCollider;
use crate::config::PhysicsConfig;
use crate::contact::AllPairsContacts;
use crate::diagnostics::Diagnostics;
use crate::engine::World;
use crate::parser::{parse_scene, ParseError};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum SceneError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("scene has errors:\n{0}")]
    Analysis(Diagnostics),
    #[error("body '{0}' not found")]
    UnknownBody(String),
}

/// Result of a detector evaluation
#[derive(Debug, Clone, Serialize)]
pub struct DetectorResult {
    pub name: String,
    pub value: f32,
}

/// Snapshot of one body for reporting and drawing
#[derive(Debug, Clone, Serialize)]
pub struct BodyState {
    pub name: String,
    pub position: [f32; 3],
    pub velocity: [f32; 3],
    pub fixed: bool,
}

/// Final result of running a scene
#[derive(Debug, Serialize)]
pub struct SimulationResult {
    pub detectors: Vec<DetectorResult>,
    pub bodies: Vec<BodyState>,
}

/// A world together with its run settings, advanced one tick at a time
#[derive(Debug)]
pub struct SimulationContext {
    pub world: World,
    pub scene: Scene,
    pub dt: f32,
    pub max_steps: usize,
    pub current_step: usize,
}

/// Main entry point: parse, check and run a scene
pub fn run_scene(source: &str) -> Result<SimulationResult, SceneError> {
    let (mut ctx, _warnings) = build_simulation_context_from_source(source)?;

    while !step_simulation(&mut ctx) {}

    let detectors = evaluate_detectors(&ctx.scene, &ctx.world)?;
    info!(steps = ctx.current_step, detectors = detectors.len(), "simulation finished");

    Ok(SimulationResult {
        detectors,
        bodies: get_body_states(&ctx),
    })
}

/// Parse and analyze `source`, returning a ready context and any warnings
pub fn build_simulation_context_from_source(
    source: &str,
) -> Result<(SimulationContext, Diagnostics), SceneError> {
    let scene = parse_scene(source)?;
    let diagnostics = analyze_scene(&scene);
    if diagnostics.has_errors() {
        return Err(SceneError::Analysis(diagnostics));
    }
    Ok((build_simulation_context(scene), diagnostics))
}

pub fn build_simulation_context(scene: Scene) -> SimulationContext {
    SimulationContext {
        world: build_world(&scene),
        dt: scene.simulate.dt,
        max_steps: scene.simulate.steps,
        current_step: 0,
        scene,
    }
}

/// Build a World from a parsed Scene. Values are taken as given; run
/// [`analyze_scene`] first to reject meaningless ones.
pub fn build_world(scene: &Scene) -> World {
    let mut config = PhysicsConfig::default();
    if let Some(gravity) = scene.gravity {
        config.gravity = gravity;
    }
    for decl in &scene.restitutions {
        if decl.symmetric {
            config.restitution.set(decl.a, decl.b, decl.value);
        } else {
            config.restitution.set_ordered(decl.a, decl.b, decl.value);
        }
    }

    let mut world = World::new(config);
    for decl in &scene.bodies {
        let collider = match decl.shape {
            ShapeDecl::Sphere { radius } => ShapeCollider::sphere(decl.position, radius),
            ShapeDecl::Plane { normal } => ShapeCollider::plane(decl.position, normal),
        };
        let mut body = PhysicsBody::new(&decl.name, decl.inverse_mass, decl.method, decl.material)
            .with_velocity(decl.velocity)
            .with_collider(collider);
        if decl.fixed {
            body = body.fixed();
        }
        world.add_body(body);
    }

    debug!(bodies = world.bodies.len(), gravity = ?world.config.gravity, "world built");
    world
}

/// Advance the context by one tick. Returns true once the run is complete.
pub fn step_simulation(ctx: &mut SimulationContext) -> bool {
    if ctx.current_step >= ctx.max_steps {
        return true;
    }
    ctx.world.step(ctx.dt, &AllPairsContacts);
    ctx.current_step += 1;
    ctx.current_step >= ctx.max_steps
}

pub fn get_body_states(ctx: &SimulationContext) -> Vec<BodyState> {
    ctx.world
        .bodies
        .iter()
        .map(|body| BodyState {
            name: body.name.clone(),
            position: body.position().unwrap_or(body.previous_position).to_array(),
            velocity: body.velocity.to_array(),
            fixed: body.is_fixed,
        })
        .collect()
}

/// Evaluate all detectors on the current world state
pub fn evaluate_detectors(scene: &Scene, world: &World) -> Result<Vec<DetectorResult>, SceneError> {
    let position_of = |body: &PhysicsBody| body.position().unwrap_or(body.previous_position);

    scene
        .detectors
        .iter()
        .map(|detector| {
            let value = match &detector.kind {
                DetectorKind::Position { body, axis } => {
                    axis.pick(position_of(find_body(world, body)?))
                }
                DetectorKind::Velocity { body, axis } => {
                    axis.pick(find_body(world, body)?.velocity)
                }
                DetectorKind::Speed(body) => find_body(world, body)?.velocity.length(),
                DetectorKind::Distance { a, b } => {
                    let pa = position_of(find_body(world, a)?);
                    let pb = position_of(find_body(world, b)?);
                    pa.distance(pb)
                }
            };
            Ok(DetectorResult {
                name: detector.name.clone(),
                value,
            })
        })
        .collect()
}

fn find_body<'w>(world: &'w World, name: &str) -> Result<&'w PhysicsBody, SceneError> {
    world
        .body(name)
        .ok_or_else(|| SceneError::UnknownBody(name.to_string()))
}
