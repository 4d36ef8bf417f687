//! The relationship inference engine.
//!
//! Each rule looks at one unordered asset pair (or one regulatory event) and
//! emits candidate relationships. Rules never deduplicate: the graph store's
//! uniqueness invariant decides which candidate survives.

pub use self::engine::InferenceEngine;

mod engine;
mod rules {
    use crate::model::{Asset, ModelError, Relationship, RelationshipType, Strength};

    pub mod commodity;
    pub mod currency;
    pub mod issuer;
    pub mod regulatory;
    pub mod sector;

    /// Case-insensitive label comparison that also folds non-ASCII letters.
    pub(super) fn same_label(a: &str, b: &str) -> bool {
        a == b || a.to_lowercase() == b.to_lowercase()
    }

    /// Builds a relationship between two assets with a clamped rule strength.
    pub(super) fn link(
        source: &Asset,
        target: &Asset,
        kind: RelationshipType,
        raw_strength: f64,
    ) -> Result<Relationship, ModelError> {
        Relationship::with_direction(
            source.id().clone(),
            target.id().clone(),
            kind,
            Strength::clamped(raw_strength)?,
            kind.is_bidirectional(),
        )
    }
}
