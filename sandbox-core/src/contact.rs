use crate::body::PhysicsBody;
use crate::collider::Shape;
use glam::Vec3;

/// A confirmed overlap between two bodies of the world arena
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    pub a: usize,
    pub b: usize,
    /// Unit normal pointing from `b` toward `a`
    pub normal: Vec3,
    pub penetration: f32,
}

/// Source of contact pairs for a tick
pub trait ContactProvider {
    fn contacts(&self, bodies: &[PhysicsBody]) -> Vec<Contact>;
}

/// Tests every pair of bodies against each other.
///
/// Only sphere/sphere and sphere/plane overlaps are reported.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllPairsContacts;

impl ContactProvider for AllPairsContacts {
    fn contacts(&self, bodies: &[PhysicsBody]) -> Vec<Contact> {
        let mut contacts = Vec::new();
        for i in 0..bodies.len() {
            for j in (i + 1)..bodies.len() {
                if let Some(contact) = overlap(bodies, i, j) {
                    contacts.push(contact);
                }
            }
        }
        contacts
    }
}

fn overlap(bodies: &[PhysicsBody], i: usize, j: usize) -> Option<Contact> {
    let ca = bodies[i].collider.as_ref()?;
    let cb = bodies[j].collider.as_ref()?;
    let (pa, pb) = (ca.position(), cb.position());

    match (ca.shape(), cb.shape()) {
        (Shape::Sphere { radius: ra }, Shape::Sphere { radius: rb }) => {
            let d = pa - pb;
            let dist = d.length();
            if dist <= 0.0 || dist >= ra + rb {
                return None;
            }
            Some(Contact {
                a: i,
                b: j,
                normal: d / dist,
                penetration: ra + rb - dist,
            })
        }
        (Shape::Sphere { radius }, Shape::Plane { normal }) => {
            sphere_plane(i, pa, radius, j, pb, normal)
        }
        (Shape::Plane { normal }, Shape::Sphere { radius }) => {
            sphere_plane(j, pb, radius, i, pa, normal)
        }
        (Shape::Plane { .. }, Shape::Plane { .. }) => None,
    }
}

fn sphere_plane(
    sphere: usize,
    center: Vec3,
    radius: f32,
    plane: usize,
    point: Vec3,
    normal: Vec3,
) -> Option<Contact> {
    let distance = (center - point).dot(normal);
    if distance >= radius {
        return None;
    }
    Some(Contact {
        a: sphere,
        b: plane,
        normal,
        penetration: radius - distance,
    })
}
