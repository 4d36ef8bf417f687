//! Commodity exposure: a non-commodity asset referencing a commodity asset.
use super::{link, same_label};
use crate::config::InferenceConfig;
use crate::model::{Asset, AssetClass, ModelError, Relationship, RelationshipType};

pub(crate) fn infer(
    a: &Asset,
    b: &Asset,
    config: &InferenceConfig,
    out: &mut Vec<Relationship>,
) -> Result<(), ModelError> {
    let (commodity, exposed) = match (a.class(), b.class()) {
        (AssetClass::Commodity, other) if other != AssetClass::Commodity => (a, b),
        (other, AssetClass::Commodity) if other != AssetClass::Commodity => (b, a),
        _ => return Ok(()),
    };

    if let Some(weight) = exposure_weight(commodity, exposed) {
        out.push(link(
            exposed,
            commodity,
            RelationshipType::CommodityExposure,
            config.commodity_exposure_weight * weight,
        )?);
    }
    Ok(())
}

/// Strongest weight among the exposures that reference `commodity`.
///
/// A reference matches the commodity's identifier, its symbol, or its sector
/// (the contract proxy for e.g. "Energy" or "Precious Metals").
fn exposure_weight(commodity: &Asset, exposed: &Asset) -> Option<f64> {
    exposed
        .commodity_exposures()
        .iter()
        .filter(|(reference, _)| references(commodity, reference))
        .map(|&(_, weight)| weight)
        .fold(None, |best: Option<f64>, w| Some(best.map_or(w, |b| b.max(w))))
}

fn references(commodity: &Asset, reference: &str) -> bool {
    let reference = reference.trim();
    same_label(reference, commodity.id().as_str())
        || same_label(reference, commodity.symbol())
        || commodity.sector().is_some_and(|s| same_label(reference, s))
}
