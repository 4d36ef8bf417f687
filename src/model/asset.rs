//! Defines the `Asset` value object and its class-specific attributes.

use super::error::ModelError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use smallvec::{smallvec, SmallVec};
use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;

/// A unique, immutable identifier for an asset within a graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AssetId(String);

impl AssetId {
    pub fn new(id: impl Into<String>) -> Result<Self, ModelError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(ModelError::EmptyIdentifier { field: "asset id" });
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for AssetId {
    type Error = ModelError;
    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<AssetId> for String {
    fn from(id: AssetId) -> Self {
        id.0
    }
}

impl AsRef<str> for AssetId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for AssetId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The closed set of instrument classes the engine recognises.
///
/// Declaration order is significant: it drives the `Ord` impl, which in turn
/// fixes class ordering in metrics maps and layout sectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssetClass {
    Equity,
    FixedIncome,
    Commodity,
    Currency,
    Derivative,
    Fund,
}

impl AssetClass {
    pub const ALL: [AssetClass; 6] = [
        AssetClass::Equity,
        AssetClass::FixedIncome,
        AssetClass::Commodity,
        AssetClass::Currency,
        AssetClass::Derivative,
        AssetClass::Fund,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            AssetClass::Equity => "EQUITY",
            AssetClass::FixedIncome => "FIXED_INCOME",
            AssetClass::Commodity => "COMMODITY",
            AssetClass::Currency => "CURRENCY",
            AssetClass::Derivative => "DERIVATIVE",
            AssetClass::Fund => "FUND",
        }
    }

    /// Position of the class within `ALL`.
    pub fn ordinal(self) -> usize {
        self as usize
    }
}

impl fmt::Display for AssetClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssetClass {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase().replace([' ', '-'], "_");
        AssetClass::ALL
            .into_iter()
            .find(|class| class.as_str() == normalized)
            .ok_or_else(|| ModelError::UnknownAssetClass(s.to_string()))
    }
}

/// An ISO-style three letter currency code, stored uppercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CurrencyCode(String);

impl CurrencyCode {
    pub fn new(code: &str) -> Result<Self, ModelError> {
        let code = code.trim();
        if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(ModelError::InvalidCurrencyCode(code.to_string()));
        }
        Ok(Self(code.to_ascii_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for CurrencyCode {
    type Error = ModelError;
    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<CurrencyCode> for String {
    fn from(code: CurrencyCode) -> Self {
        code.0
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A reference from a non-commodity asset to a commodity it depends on.
///
/// `commodity` is matched against a commodity asset's identifier, symbol or
/// sector. `weight` scales the inferred relationship strength.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawExposure")]
pub struct CommodityExposure {
    commodity: String,
    weight: f64,
}

#[derive(Deserialize)]
struct RawExposure {
    commodity: String,
    weight: f64,
}

impl CommodityExposure {
    pub fn new(commodity: impl Into<String>, weight: f64) -> Result<Self, ModelError> {
        let exposure = Self { commodity: commodity.into(), weight };
        exposure.check()?;
        Ok(exposure)
    }

    pub fn commodity(&self) -> &str {
        &self.commodity
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    fn check(&self) -> Result<(), ModelError> {
        if self.commodity.trim().is_empty() {
            return Err(ModelError::EmptyIdentifier { field: "exposure commodity" });
        }
        if !self.weight.is_finite() || !(0.0..=1.0).contains(&self.weight) {
            return Err(ModelError::InvalidExposureWeight {
                commodity: self.commodity.clone(),
                weight: self.weight,
            });
        }
        Ok(())
    }
}

impl TryFrom<RawExposure> for CommodityExposure {
    type Error = ModelError;
    fn try_from(raw: RawExposure) -> Result<Self, Self::Error> {
        Self::new(raw.commodity, raw.weight)
    }
}

/// Class-specific attributes. Each variant carries only the fields that are
/// meaningful for its asset class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClassAttributes {
    Equity {
        pe_ratio: Option<f64>,
        dividend_yield: Option<f64>,
        beta: Option<f64>,
        exposures: Vec<CommodityExposure>,
    },
    FixedIncome {
        coupon_rate: Option<f64>,
        maturity: Option<NaiveDate>,
        credit_rating: Option<String>,
        exposures: Vec<CommodityExposure>,
    },
    Commodity {
        contract_size: Option<f64>,
        delivery_date: Option<NaiveDate>,
        unit: Option<String>,
    },
    Currency {
        exchange_rate: Option<f64>,
        central_bank_rate: Option<f64>,
    },
    Derivative {
        underlying: Option<String>,
        expiry: Option<NaiveDate>,
        exposures: Vec<CommodityExposure>,
    },
    Fund {
        expense_ratio: Option<f64>,
        exposures: Vec<CommodityExposure>,
    },
}

impl ClassAttributes {
    /// An attribute set with every optional field empty.
    pub fn empty_for(class: AssetClass) -> Self {
        match class {
            AssetClass::Equity => ClassAttributes::Equity {
                pe_ratio: None,
                dividend_yield: None,
                beta: None,
                exposures: Vec::new(),
            },
            AssetClass::FixedIncome => ClassAttributes::FixedIncome {
                coupon_rate: None,
                maturity: None,
                credit_rating: None,
                exposures: Vec::new(),
            },
            AssetClass::Commodity => ClassAttributes::Commodity {
                contract_size: None,
                delivery_date: None,
                unit: None,
            },
            AssetClass::Currency => ClassAttributes::Currency {
                exchange_rate: None,
                central_bank_rate: None,
            },
            AssetClass::Derivative => ClassAttributes::Derivative {
                underlying: None,
                expiry: None,
                exposures: Vec::new(),
            },
            AssetClass::Fund => ClassAttributes::Fund {
                expense_ratio: None,
                exposures: Vec::new(),
            },
        }
    }

    pub fn class(&self) -> AssetClass {
        match self {
            ClassAttributes::Equity { .. } => AssetClass::Equity,
            ClassAttributes::FixedIncome { .. } => AssetClass::FixedIncome,
            ClassAttributes::Commodity { .. } => AssetClass::Commodity,
            ClassAttributes::Currency { .. } => AssetClass::Currency,
            ClassAttributes::Derivative { .. } => AssetClass::Derivative,
            ClassAttributes::Fund { .. } => AssetClass::Fund,
        }
    }

    /// Every numeric attribute that is set, keyed by field name.
    fn numeric_fields(&self) -> SmallVec<[(&'static str, f64); 3]> {
        let fields: SmallVec<[(&'static str, Option<f64>); 3]> = match self {
            ClassAttributes::Equity { pe_ratio, dividend_yield, beta, .. } => {
                smallvec![("pe_ratio", *pe_ratio), ("dividend_yield", *dividend_yield), ("beta", *beta)]
            }
            ClassAttributes::FixedIncome { coupon_rate, .. } => smallvec![("coupon_rate", *coupon_rate)],
            ClassAttributes::Commodity { contract_size, .. } => smallvec![("contract_size", *contract_size)],
            ClassAttributes::Currency { exchange_rate, central_bank_rate } => {
                smallvec![("exchange_rate", *exchange_rate), ("central_bank_rate", *central_bank_rate)]
            }
            ClassAttributes::Derivative { .. } => SmallVec::new(),
            ClassAttributes::Fund { expense_ratio, .. } => smallvec![("expense_ratio", *expense_ratio)],
        };
        fields.into_iter().filter_map(|(key, v)| v.map(|v| (key, v))).collect()
    }

    fn declared_exposures(&self) -> &[CommodityExposure] {
        match self {
            ClassAttributes::Equity { exposures, .. }
            | ClassAttributes::FixedIncome { exposures, .. }
            | ClassAttributes::Derivative { exposures, .. }
            | ClassAttributes::Fund { exposures, .. } => exposures,
            ClassAttributes::Commodity { .. } | ClassAttributes::Currency { .. } => &[],
        }
    }
}

/// A financial instrument. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Asset {
    id: AssetId,
    symbol: String,
    name: String,
    class: AssetClass,
    sector: Option<String>,
    price: f64,
    market_cap: Option<f64>,
    currency: CurrencyCode,
    issuer: Option<AssetId>,
    attributes: ClassAttributes,
}

impl Asset {
    /// Starts building an asset. Validation happens in `AssetBuilder::build`.
    pub fn builder(id: impl Into<String>, symbol: impl Into<String>, class: AssetClass) -> AssetBuilder {
        AssetBuilder {
            id: id.into(),
            symbol: symbol.into(),
            name: None,
            class,
            sector: None,
            price: 0.0,
            market_cap: None,
            currency: "USD".to_string(),
            issuer: None,
            attributes: None,
        }
    }

    pub fn id(&self) -> &AssetId { &self.id }
    pub fn symbol(&self) -> &str { &self.symbol }
    pub fn name(&self) -> &str { &self.name }
    pub fn class(&self) -> AssetClass { self.class }
    pub fn sector(&self) -> Option<&str> { self.sector.as_deref() }
    pub fn price(&self) -> f64 { self.price }
    pub fn market_cap(&self) -> Option<f64> { self.market_cap }
    pub fn currency(&self) -> &CurrencyCode { &self.currency }
    pub fn issuer(&self) -> Option<&AssetId> { self.issuer.as_ref() }
    pub fn attributes(&self) -> &ClassAttributes { &self.attributes }

    /// Every commodity reference this asset carries, as `(reference, weight)`.
    ///
    /// A derivative's underlying counts as a full-weight exposure.
    pub fn commodity_exposures(&self) -> SmallVec<[(&str, f64); 4]> {
        let mut out: SmallVec<[(&str, f64); 4]> = self
            .attributes
            .declared_exposures()
            .iter()
            .map(|e| (e.commodity(), e.weight()))
            .collect();
        if let ClassAttributes::Derivative { underlying: Some(u), .. } = &self.attributes {
            out.push((u.as_str(), 1.0));
        }
        out
    }
}

/// Collects the fields of an [`Asset`] and validates them on `build`.
#[derive(Debug, Clone)]
pub struct AssetBuilder {
    id: String,
    symbol: String,
    name: Option<String>,
    class: AssetClass,
    sector: Option<String>,
    price: f64,
    market_cap: Option<f64>,
    currency: String,
    issuer: Option<String>,
    attributes: Option<ClassAttributes>,
}

impl AssetBuilder {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn sector(mut self, sector: impl Into<String>) -> Self {
        self.sector = Some(sector.into());
        self
    }

    pub fn maybe_sector(mut self, sector: Option<String>) -> Self {
        self.sector = sector;
        self
    }

    pub fn price(mut self, price: f64) -> Self {
        self.price = price;
        self
    }

    pub fn market_cap(mut self, market_cap: Option<f64>) -> Self {
        self.market_cap = market_cap;
        self
    }

    pub fn currency(mut self, code: impl Into<String>) -> Self {
        self.currency = code.into();
        self
    }

    pub fn issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = Some(issuer.into());
        self
    }

    pub fn maybe_issuer(mut self, issuer: Option<String>) -> Self {
        self.issuer = issuer;
        self
    }

    pub fn attributes(mut self, attributes: ClassAttributes) -> Self {
        self.attributes = Some(attributes);
        self
    }

    pub fn build(self) -> Result<Asset, ModelError> {
        let id = AssetId::new(self.id)?;
        if self.symbol.trim().is_empty() {
            return Err(ModelError::EmptyIdentifier { field: "symbol" });
        }
        if !self.price.is_finite() || self.price < 0.0 {
            return Err(ModelError::InvalidPrice { asset_id: id.0, field: "price", value: self.price });
        }
        if let Some(cap) = self.market_cap {
            if !cap.is_finite() || cap < 0.0 {
                return Err(ModelError::InvalidPrice { asset_id: id.0, field: "market cap", value: cap });
            }
        }
        let currency = CurrencyCode::new(&self.currency)?;

        let attributes = self.attributes.unwrap_or_else(|| ClassAttributes::empty_for(self.class));
        if attributes.class() != self.class {
            return Err(ModelError::AttributeMismatch {
                asset_id: id.0,
                class: self.class.to_string(),
                found: attributes.class().to_string(),
            });
        }

        for (key, value) in attributes.numeric_fields() {
            if !value.is_finite() {
                return Err(ModelError::InvalidAttribute {
                    asset_id: id.0,
                    key: key.to_string(),
                    reason: format!("{value} is not a finite number"),
                });
            }
        }
        for exposure in attributes.declared_exposures() {
            exposure.check()?;
        }
        if let ClassAttributes::Derivative { underlying: Some(u), .. } = &attributes {
            if u.trim().is_empty() {
                return Err(ModelError::InvalidAttribute {
                    asset_id: id.0,
                    key: "underlying".to_string(),
                    reason: "must not be blank".to_string(),
                });
            }
        }

        // Blank references are treated as absent rather than as dangling ids.
        let issuer = match self.issuer {
            Some(raw) if !raw.trim().is_empty() => Some(AssetId::new(raw)?),
            _ => None,
        };
        let sector = self.sector.map(|s| s.trim().to_string()).filter(|s| !s.is_empty());
        let name = self.name.filter(|n| !n.trim().is_empty()).unwrap_or_else(|| self.symbol.clone());

        Ok(Asset {
            id,
            symbol: self.symbol,
            name,
            class: self.class,
            sector,
            price: self.price,
            market_cap: self.market_cap,
            currency,
            issuer,
            attributes,
        })
    }
}
