//! Fixed per-class colours for rendered nodes.
use crate::model::AssetClass;

pub fn class_color(class: AssetClass) -> &'static str {
    match class {
        AssetClass::Equity => "#4e79a7",
        AssetClass::FixedIncome => "#f28e2b",
        AssetClass::Commodity => "#e15759",
        AssetClass::Currency => "#59a14f",
        AssetClass::Derivative => "#b07aa1",
        AssetClass::Fund => "#76b7b2",
    }
}
