//! Material-pair restitution lookup.
//!
//! Lookups are by ordered pair. [`RestitutionTable::set`] writes both
//! orderings so the usual table stays symmetric; [`RestitutionTable::set_ordered`]
//! exists for the rare deliberately asymmetric entry.

use crate::body::Material;

pub const DEFAULT_RESTITUTION: f32 = 0.5;

#[derive(Debug, Clone, PartialEq)]
pub struct RestitutionTable {
    values: [[f32; Material::COUNT]; Material::COUNT],
}

impl RestitutionTable {
    /// A table with every ordered pair set to `e`
    pub fn uniform(e: f32) -> Self {
        Self {
            values: [[e; Material::COUNT]; Material::COUNT],
        }
    }

    pub fn get(&self, a: Material, b: Material) -> f32 {
        self.values[a.index()][b.index()]
    }

    pub fn set(&mut self, a: Material, b: Material, e: f32) {
        self.values[a.index()][b.index()] = e;
        self.values[b.index()][a.index()] = e;
    }

    pub fn set_ordered(&mut self, a: Material, b: Material, e: f32) {
        self.values[a.index()][b.index()] = e;
    }

    pub fn is_symmetric(&self) -> bool {
        (0..Material::COUNT)
            .all(|i| (0..Material::COUNT).all(|j| self.values[i][j] == self.values[j][i]))
    }
}

impl Default for RestitutionTable {
    fn default() -> Self {
        use Material::{Concrete, Ice, Rubber, Steel, Wood};

        let mut table = Self::uniform(DEFAULT_RESTITUTION);
        table.set(Rubber, Rubber, 0.9);
        table.set(Rubber, Wood, 0.75);
        table.set(Rubber, Steel, 0.8);
        table.set(Rubber, Concrete, 0.8);
        table.set(Rubber, Ice, 0.6);
        table.set(Wood, Wood, 0.5);
        table.set(Wood, Steel, 0.55);
        table.set(Wood, Concrete, 0.45);
        table.set(Steel, Steel, 0.6);
        table.set(Steel, Concrete, 0.4);
        table.set(Concrete, Concrete, 0.3);
        table.set(Ice, Ice, 0.1);
        table.set(Ice, Wood, 0.2);
        table.set(Ice, Steel, 0.15);
        table.set(Ice, Concrete, 0.15);
        table
    }
}
