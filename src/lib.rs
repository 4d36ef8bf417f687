//! Financial asset relationship network.
//!
//! Assets and regulatory events go in; a deduplicated relationship graph,
//! network metrics, a deterministic 3-D layout and a renderer-ready payload
//! come out. `pipeline::SharedNetwork` ties the stages together and publishes
//! immutable snapshots.

pub mod analysis;
pub mod config;
pub mod display;
pub mod inference;
pub mod layout;
pub mod model;
pub mod pipeline;
pub mod store;

#[cfg(test)]
mod fixtures;

pub use analysis::{compute_metrics, NetworkMetrics};
pub use config::{ConfigError, EngineConfig};
pub use display::{PayloadBuilder, PayloadError, VisualizationPayload};
pub use inference::InferenceEngine;
pub use layout::{Layout, LayoutGenerator, Position};
pub use model::{Asset, AssetClass, AssetId, ModelError, RegulatoryEvent, Relationship, RelationshipType};
pub use pipeline::{build_snapshot, NetworkSnapshot, PipelineError, SharedNetwork};
pub use store::{GraphError, GraphStore};
