//! Flat ingestion records and their validated conversion into domain types.
//!
//! The upstream ingestion layer hands over loosely-typed records, typically
//! decoded from JSON. Conversion runs every construction-time check, so a bad
//! record fails here instead of surfacing during graph build.

use super::asset::{Asset, AssetClass, AssetId, ClassAttributes, CommodityExposure};
use super::error::ModelError;
use super::event::{ImpactScore, RegulatoryEvent};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Clone, Deserialize)]
pub struct AssetRecord {
    pub id: String,
    pub symbol: String,
    #[serde(default)]
    pub name: Option<String>,
    pub asset_class: String,
    #[serde(default)]
    pub sector: Option<String>,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub market_cap: Option<f64>,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default)]
    pub issuer: Option<String>,
    #[serde(default)]
    pub attributes: Map<String, Value>,
}

fn default_currency() -> String {
    "USD".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct EventRecord {
    pub id: String,
    pub asset_ids: Vec<String>,
    pub event_type: String,
    /// ISO date, `YYYY-MM-DD`.
    pub date: String,
    #[serde(default)]
    pub description: String,
    pub impact_score: f64,
}

/// The ingestion payload: every asset and event for one graph version.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogueRecord {
    #[serde(default)]
    pub assets: Vec<AssetRecord>,
    #[serde(default)]
    pub events: Vec<EventRecord>,
}

/// Validated contents of a catalogue.
#[derive(Debug, Clone, Default)]
pub struct Catalogue {
    pub assets: Vec<Asset>,
    pub events: Vec<RegulatoryEvent>,
}

impl TryFrom<CatalogueRecord> for Catalogue {
    type Error = ModelError;

    fn try_from(record: CatalogueRecord) -> Result<Self, Self::Error> {
        let assets = record.assets.into_iter().map(Asset::try_from).collect::<Result<Vec<_>, _>>()?;
        let events = record
            .events
            .into_iter()
            .map(RegulatoryEvent::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { assets, events })
    }
}

/// Parses a JSON catalogue of the form `{ "assets": [...], "events": [...] }`.
pub fn parse_catalogue(json: &str) -> Result<Catalogue, ModelError> {
    let record: CatalogueRecord = serde_json::from_str(json).map_err(|e| ModelError::Parse(e.to_string()))?;
    Catalogue::try_from(record)
}

impl TryFrom<AssetRecord> for Asset {
    type Error = ModelError;

    fn try_from(record: AssetRecord) -> Result<Self, Self::Error> {
        let class: AssetClass = record.asset_class.parse()?;
        let attrs = AttributeReader { asset_id: &record.id, map: &record.attributes };
        let attributes = attrs.project(class)?;

        Asset::builder(record.id.clone(), record.symbol, class)
            .name(record.name.unwrap_or_default())
            .maybe_sector(record.sector)
            .price(record.price)
            .market_cap(record.market_cap)
            .currency(record.currency)
            .maybe_issuer(record.issuer)
            .attributes(attributes)
            .build()
    }
}

impl TryFrom<EventRecord> for RegulatoryEvent {
    type Error = ModelError;

    fn try_from(record: EventRecord) -> Result<Self, Self::Error> {
        let date = parse_date(&record.date)?;
        let impact = ImpactScore::new(record.impact_score)?;
        let asset_ids = record.asset_ids.into_iter().map(AssetId::new).collect::<Result<Vec<_>, _>>()?;
        RegulatoryEvent::new(record.id, asset_ids, record.event_type, date, record.description, impact)
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate, ModelError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|e| ModelError::InvalidDate {
        value: raw.to_string(),
        reason: e.to_string(),
    })
}

/// Typed accessors over a record's free-form attribute map.
///
/// Unknown keys are ignored; known keys with the wrong JSON type are errors.
struct AttributeReader<'a> {
    asset_id: &'a str,
    map: &'a Map<String, Value>,
}

impl<'a> AttributeReader<'a> {
    fn project(&self, class: AssetClass) -> Result<ClassAttributes, ModelError> {
        Ok(match class {
            AssetClass::Equity => ClassAttributes::Equity {
                pe_ratio: self.number("pe_ratio")?,
                dividend_yield: self.number("dividend_yield")?,
                beta: self.number("beta")?,
                exposures: self.exposures()?,
            },
            AssetClass::FixedIncome => ClassAttributes::FixedIncome {
                coupon_rate: self.number("coupon_rate")?,
                maturity: self.date("maturity")?,
                credit_rating: self.text("credit_rating")?,
                exposures: self.exposures()?,
            },
            AssetClass::Commodity => ClassAttributes::Commodity {
                contract_size: self.number("contract_size")?,
                delivery_date: self.date("delivery_date")?,
                unit: self.text("unit")?,
            },
            AssetClass::Currency => ClassAttributes::Currency {
                exchange_rate: self.number("exchange_rate")?,
                central_bank_rate: self.number("central_bank_rate")?,
            },
            AssetClass::Derivative => ClassAttributes::Derivative {
                underlying: self.text("underlying")?,
                expiry: self.date("expiry")?,
                exposures: self.exposures()?,
            },
            AssetClass::Fund => ClassAttributes::Fund {
                expense_ratio: self.number("expense_ratio")?,
                exposures: self.exposures()?,
            },
        })
    }

    fn invalid(&self, key: &str, reason: impl Into<String>) -> ModelError {
        ModelError::InvalidAttribute {
            asset_id: self.asset_id.to_string(),
            key: key.to_string(),
            reason: reason.into(),
        }
    }

    fn number(&self, key: &str) -> Result<Option<f64>, ModelError> {
        match self.map.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Number(n)) => match n.as_f64() {
                Some(v) if v.is_finite() => Ok(Some(v)),
                _ => Err(self.invalid(key, "number is not representable as a finite f64")),
            },
            Some(other) => Err(self.invalid(key, format!("expected number, found {}", other))),
        }
    }

    fn text(&self, key: &str) -> Result<Option<String>, ModelError> {
        match self.map.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(other) => Err(self.invalid(key, format!("expected string, found {}", other))),
        }
    }

    fn date(&self, key: &str) -> Result<Option<NaiveDate>, ModelError> {
        self.text(key)?.map(|raw| parse_date(&raw)).transpose()
    }

    /// Reads `exposures` as a list of either bare commodity names or
    /// `{ "commodity": ..., "weight": ... }` objects.
    fn exposures(&self) -> Result<Vec<CommodityExposure>, ModelError> {
        let items = match self.map.get("exposures") {
            None | Some(Value::Null) => return Ok(Vec::new()),
            Some(Value::Array(items)) => items,
            Some(other) => return Err(self.invalid("exposures", format!("expected array, found {}", other))),
        };

        items
            .iter()
            .map(|item| match item {
                Value::String(name) => CommodityExposure::new(name.clone(), 1.0),
                Value::Object(obj) => {
                    let name = obj
                        .get("commodity")
                        .and_then(Value::as_str)
                        .ok_or_else(|| self.invalid("exposures", "object entry needs a 'commodity' string"))?;
                    let weight = match obj.get("weight") {
                        None | Some(Value::Null) => 1.0,
                        Some(w) => w
                            .as_f64()
                            .ok_or_else(|| self.invalid("exposures", "'weight' must be a number"))?,
                    };
                    CommodityExposure::new(name, weight)
                }
                other => Err(self.invalid("exposures", format!("unsupported entry {}", other))),
            })
            .collect()
    }
}
