//! Read-only analyses over a built graph.
pub mod metrics;
pub mod topology;

pub use metrics::{compute_metrics, NetworkMetrics};
pub use topology::Components;
