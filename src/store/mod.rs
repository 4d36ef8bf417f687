//! The graph store: exclusive owner of assets and deduplicated relationships.
pub mod error;
pub mod registry;
pub mod types;

pub use error::GraphError;
pub use registry::GraphStore;
pub use types::{EdgeId, NodeId};
