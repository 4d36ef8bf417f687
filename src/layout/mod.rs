//! Deterministic 3-D positions for visualization.
pub mod force;
pub mod generator;
pub mod seed;

pub use generator::LayoutGenerator;

use crate::model::AssetId;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Position {
    pub const ORIGIN: Position = Position { x: 0.0, y: 0.0, z: 0.0 };

    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn from_array([x, y, z]: [f64; 3]) -> Self {
        Self { x, y, z }
    }

    pub fn to_array(self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    pub fn distance(&self, other: &Position) -> f64 {
        let (dx, dy, dz) = (self.x - other.x, self.y - other.y, self.z - other.z);
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    pub fn offset(self, [dx, dy, dz]: [f64; 3]) -> Self {
        Self { x: self.x + dx, y: self.y + dy, z: self.z + dz }
    }
}

/// Positions keyed by asset identifier, iterated in identifier order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Layout {
    positions: BTreeMap<AssetId, Position>,
}

impl Layout {
    pub fn get(&self, id: &str) -> Option<Position> {
        self.positions.get(id).copied()
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&AssetId, &Position)> {
        self.positions.iter()
    }

    /// Parallel identifier and coordinate columns, the shape the payload
    /// builder validates.
    pub fn columns(&self) -> (Vec<AssetId>, Vec<Vec<f64>>) {
        self.positions
            .iter()
            .map(|(id, p)| (id.clone(), p.to_array().to_vec()))
            .unzip()
    }
}

impl FromIterator<(AssetId, Position)> for Layout {
    fn from_iter<I: IntoIterator<Item = (AssetId, Position)>>(iter: I) -> Self {
        Self { positions: iter.into_iter().collect() }
    }
}
