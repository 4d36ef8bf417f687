//! Currency exposure: any asset denominated in a currency asset's code.
use super::link;
use crate::config::InferenceConfig;
use crate::model::{Asset, AssetClass, ModelError, Relationship, RelationshipType};

pub(crate) fn infer(
    a: &Asset,
    b: &Asset,
    config: &InferenceConfig,
    out: &mut Vec<Relationship>,
) -> Result<(), ModelError> {
    if a.currency() != b.currency() {
        return Ok(());
    }
    let strength = config.currency_exposure_strength;
    // `a` precedes `b` in the catalogue; two currency assets link later -> earlier.
    let edge = match (a.class() == AssetClass::Currency, b.class() == AssetClass::Currency) {
        (true, _) => Some((b, a)),
        (false, true) => Some((a, b)),
        (false, false) => None,
    };
    if let Some((exposed, currency)) = edge {
        out.push(link(exposed, currency, RelationshipType::CurrencyExposure, strength)?);
    }
    Ok(())
}
