//! Payload construction errors. None of them touch the graph store.
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PayloadError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Shape error: {0}")]
    ShapeError(String),
    #[error("Numeric error: {0}")]
    NumericError(String),
    #[error("Content error: {0}")]
    ContentError(String),
    #[error("Payload of {nodes} nodes / {edges} edges exceeds the ceiling of {max_nodes} / {max_edges}")]
    CapacityExceeded {
        nodes: usize,
        edges: usize,
        max_nodes: usize,
        max_edges: usize,
    },
}
