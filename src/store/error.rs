//! Build-time errors of the graph store. Either one aborts the whole build.
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("Asset '{0}' is already present in the graph")]
    DuplicateIdentifier(String),
    #[error("Relationship {kind} {source_id} -> {target_id} references unknown asset '{missing}'")]
    InvalidEndpoint {
        source_id: String,
        target_id: String,
        kind: String,
        missing: String,
    },
}
