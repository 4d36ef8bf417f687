//! Issuer linkage: an instrument pointing at the entity that issued it.
use super::link;
use crate::config::InferenceConfig;
use crate::model::{Asset, ModelError, Relationship, RelationshipType};

pub(crate) fn infer(
    a: &Asset,
    b: &Asset,
    config: &InferenceConfig,
    out: &mut Vec<Relationship>,
) -> Result<(), ModelError> {
    if a.issuer() == Some(b.id()) {
        out.push(link(a, b, RelationshipType::Issuer, config.issuer_strength)?);
    }
    if b.issuer() == Some(a.id()) {
        out.push(link(b, a, RelationshipType::Issuer, config.issuer_strength)?);
    }
    Ok(())
}
