//! Shared asset and event constructors for unit tests.
use crate::model::{
    Asset, AssetClass, AssetId, ClassAttributes, CommodityExposure, ImpactScore, RegulatoryEvent,
};
use chrono::NaiveDate;

pub(crate) fn equity(id: &str, sector: Option<&str>) -> Asset {
    Asset::builder(id, id, AssetClass::Equity)
        .name(format!("{} Corp", id))
        .maybe_sector(sector.map(str::to_string))
        .price(100.0)
        .build()
        .unwrap()
}

pub(crate) fn equity_exposed(id: &str, sector: &str, commodities: &[&str]) -> Asset {
    let exposures = commodities
        .iter()
        .map(|c| CommodityExposure::new(*c, 1.0).unwrap())
        .collect();
    Asset::builder(id, id, AssetClass::Equity)
        .sector(sector)
        .attributes(ClassAttributes::Equity { pe_ratio: None, dividend_yield: None, beta: None, exposures })
        .build()
        .unwrap()
}

pub(crate) fn bond(id: &str, issuer: &str) -> Asset {
    Asset::builder(id, id, AssetClass::FixedIncome)
        .issuer(issuer)
        .price(99.5)
        .build()
        .unwrap()
}

pub(crate) fn commodity_with_sector(id: &str, sector: &str) -> Asset {
    Asset::builder(id, id, AssetClass::Commodity)
        .sector(sector)
        .build()
        .unwrap()
}

pub(crate) fn currency(code: &str) -> Asset {
    Asset::builder(code, code, AssetClass::Currency)
        .currency(code)
        .price(1.0)
        .build()
        .unwrap()
}

pub(crate) fn event(id: &str, asset_ids: &[&str], impact: f64) -> RegulatoryEvent {
    RegulatoryEvent::new(
        id,
        asset_ids.iter().map(|s| AssetId::new(*s).unwrap()),
        "RULE_CHANGE",
        NaiveDate::from_ymd_opt(2024, 6, 30).unwrap(),
        "test event",
        ImpactScore::new(impact).unwrap(),
    )
    .unwrap()
}
