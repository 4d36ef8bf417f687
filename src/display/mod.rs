//! Turns a stored graph plus a layout into a renderer-ready payload.
pub mod error;
pub mod geometry;
pub mod palette;
pub mod payload;
pub mod validation;

pub use error::PayloadError;
pub use geometry::{Arrow, EdgeGeometry};
pub use payload::{EdgeView, NodeView, PayloadBuilder, VisualizationPayload};
pub use validation::validate_geometry;
