use serde::{Deserialize, Serialize};

/// Dense position of an asset inside a `GraphStore`.
///
/// Assigned in insertion order and only meaningful for the store that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct NodeId(pub u32);

impl NodeId {
    #[inline(always)]
    pub fn index(&self) -> usize { self.0 as usize }
    pub fn new(idx: usize) -> Self { Self(idx as u32) }
}

/// Index of a stored relationship, in insertion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct EdgeId(pub u32);

impl EdgeId {
    #[inline(always)]
    pub fn index(&self) -> usize { self.0 as usize }
}
