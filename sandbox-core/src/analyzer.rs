//! Static checks for parsed scenes
//!
//! Catches values the physics core would silently accept but that make a
//! scene meaningless, before any world is built.

use crate::ast::{Scene, ShapeDecl};
use crate::diagnostics::{Diagnostic, Diagnostics, Span};
use glam::Vec3;
use std::collections::HashMap;

/// Analyze a scene and return diagnostics
pub fn analyze_scene(scene: &Scene) -> Diagnostics {
    let mut diagnostics = Diagnostics::new();

    if let Some(gravity) = scene.gravity {
        if !gravity.is_finite() {
            diagnostics.push(non_finite("gravity".to_string(), None));
        }
    }

    let mut names = HashMap::new();
    for (idx, body) in scene.bodies.iter().enumerate() {
        if names.insert(body.name.as_str(), idx).is_some() {
            diagnostics.push(Diagnostic::error(
                format!("duplicate body name '{}'", body.name),
                body.span,
            ));
        }

        for (field, v) in [("position", body.position), ("velocity", body.velocity)] {
            if !v.is_finite() {
                diagnostics.push(non_finite(format!("{} of body '{}'", field, body.name), body.span));
            }
        }

        if !body.inverse_mass.is_finite() {
            diagnostics.push(non_finite(format!("inverse mass of body '{}'", body.name), body.span));
        } else if body.inverse_mass < 0.0 {
            diagnostics.push(Diagnostic::error(
                format!("body '{}' has negative inverse mass {}", body.name, body.inverse_mass),
                body.span,
            ));
        }

        match body.shape {
            ShapeDecl::Sphere { radius } if !radius.is_finite() => {
                diagnostics.push(non_finite(format!("radius of body '{}'", body.name), body.span));
            }
            ShapeDecl::Sphere { radius } if radius <= 0.0 => {
                diagnostics.push(Diagnostic::error(
                    format!("body '{}' has non-positive radius {}", body.name, radius),
                    body.span,
                ));
            }
            ShapeDecl::Plane { normal } if !normal.is_finite() => {
                diagnostics.push(non_finite(format!("plane normal of body '{}'", body.name), body.span));
            }
            ShapeDecl::Plane { normal } if normal.length_squared() == 0.0 => {
                diagnostics.push(Diagnostic::error(
                    format!("body '{}' has a zero-length plane normal", body.name),
                    body.span,
                ));
            }
            _ => {}
        }

        if body.fixed && body.velocity != Vec3::ZERO {
            diagnostics.push(Diagnostic::warning(
                format!("fixed body '{}' has an initial velocity that will never be used", body.name),
                body.span,
            ));
        }
    }

    for decl in &scene.restitutions {
        if !decl.value.is_finite() {
            diagnostics.push(non_finite(format!("restitution {} / {}", decl.a, decl.b), decl.span));
        } else if decl.value < 0.0 {
            diagnostics.push(Diagnostic::error(
                format!("restitution {} / {} is negative ({})", decl.a, decl.b, decl.value),
                decl.span,
            ));
        } else if decl.value > 1.0 {
            diagnostics.push(Diagnostic::warning(
                format!("restitution {} / {} exceeds 1.0 and adds energy on impact", decl.a, decl.b),
                decl.span,
            ));
        }
    }

    let dt = scene.simulate.dt;
    if !dt.is_finite() {
        diagnostics.push(non_finite("time step".to_string(), scene.simulate.span));
    } else if dt <= 0.0 {
        diagnostics.push(Diagnostic::error(
            format!("time step must be positive, got {}", dt),
            scene.simulate.span,
        ));
    }
    if scene.simulate.steps == 0 {
        diagnostics.push(Diagnostic::warning(
            "simulation has zero steps",
            scene.simulate.span,
        ));
    }

    for detector in &scene.detectors {
        for body in detector.kind.bodies() {
            if !names.contains_key(body) {
                diagnostics.push(Diagnostic::error(
                    format!("detector '{}' references unknown body '{}'", detector.name, body),
                    detector.span,
                ));
            }
        }
    }

    diagnostics
}

/// NaN or infinity in any numeric field
fn non_finite(what: String, span: Option<Span>) -> Diagnostic {
    Diagnostic::error(format!("{} is not a finite number", what), span)
}
