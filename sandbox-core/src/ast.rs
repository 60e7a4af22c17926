use crate::body::{IntegrationMethod, Material};
use crate::diagnostics::Span;
use glam::Vec3;

/// A parsed scene file
#[derive(Debug, Clone)]
pub struct Scene {
    pub gravity: Option<Vec3>,
    pub restitutions: Vec<RestitutionDecl>,
    pub bodies: Vec<BodyDecl>,
    pub simulate: SimulateDecl,
    pub detectors: Vec<DetectorDecl>,
}

/// `restitution a b = e` (symmetric) or `restitution_ordered a b = e`
#[derive(Debug, Clone)]
pub struct RestitutionDecl {
    pub a: Material,
    pub b: Material,
    pub value: f32,
    pub symmetric: bool,
    pub span: Option<Span>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShapeDecl {
    Sphere { radius: f32 },
    Plane { normal: Vec3 },
}

/// `body name <shape> at (x, y, z) [options...]`
#[derive(Debug, Clone)]
pub struct BodyDecl {
    pub name: String,
    pub shape: ShapeDecl,
    pub position: Vec3,
    pub velocity: Vec3,
    pub inverse_mass: f32,
    pub fixed: bool,
    pub material: Material,
    pub method: IntegrationMethod,
    pub span: Option<Span>,
}

/// `simulate dt = x steps = n`
#[derive(Debug, Clone)]
pub struct SimulateDecl {
    pub dt: f32,
    pub steps: usize,
    pub span: Option<Span>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub fn pick(self, v: Vec3) -> f32 {
        match self {
            Axis::X => v.x,
            Axis::Y => v.y,
            Axis::Z => v.z,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DetectorKind {
    Position { body: String, axis: Axis },
    Velocity { body: String, axis: Axis },
    Speed(String),
    Distance { a: String, b: String },
}

impl DetectorKind {
    /// Bodies the detector reads from
    pub fn bodies(&self) -> Vec<&str> {
        match self {
            DetectorKind::Position { body, .. }
            | DetectorKind::Velocity { body, .. }
            | DetectorKind::Speed(body) => vec![body.as_str()],
            DetectorKind::Distance { a, b } => vec![a.as_str(), b.as_str()],
        }
    }
}

/// `detect name = <kind>`
#[derive(Debug, Clone)]
pub struct DetectorDecl {
    pub name: String,
    pub kind: DetectorKind,
    pub span: Option<Span>,
}
