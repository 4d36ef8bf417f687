//! Defines the `Relationship` type, a typed and weighted link between two assets.

use super::asset::AssetId;
use super::error::ModelError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Describes why two assets are linked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RelationshipType {
    /// Both assets report the same sector.
    SameSector,
    /// The source (e.g. a bond) is issued by the target entity.
    Issuer,
    /// The source depends on the target commodity.
    CommodityExposure,
    /// The source is denominated in the target currency.
    CurrencyExposure,
    /// Both assets are named by the same regulatory event.
    RegulatoryCoimpact,
}

impl RelationshipType {
    /// Whether links of this type have no natural direction.
    pub fn is_bidirectional(self) -> bool {
        matches!(self, RelationshipType::SameSector | RelationshipType::RegulatoryCoimpact)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RelationshipType::SameSector => "SAME_SECTOR",
            RelationshipType::Issuer => "ISSUER",
            RelationshipType::CommodityExposure => "COMMODITY_EXPOSURE",
            RelationshipType::CurrencyExposure => "CURRENCY_EXPOSURE",
            RelationshipType::RegulatoryCoimpact => "REGULATORY_COIMPACT",
        }
    }
}

impl fmt::Display for RelationshipType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A relationship weight, always finite and within [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct Strength(f64);

impl Strength {
    /// Strict constructor: out-of-range values are rejected.
    pub fn new(value: f64) -> Result<Self, ModelError> {
        if !value.is_finite() || !(0.0..=1.0).contains(&value) {
            return Err(ModelError::InvalidStrength(value));
        }
        Ok(Self(value))
    }

    /// Clamps a raw rule output into [0, 1]. NaN is still an error.
    pub fn clamped(raw: f64) -> Result<Self, ModelError> {
        if raw.is_nan() {
            return Err(ModelError::InvalidStrength(raw));
        }
        Self::new(raw.clamp(0.0, 1.0))
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Relationship {
    source: AssetId,
    target: AssetId,
    kind: RelationshipType,
    strength: Strength,
    bidirectional: bool,
}

impl Relationship {
    /// Creates a relationship whose direction follows its type.
    pub fn new(source: AssetId, target: AssetId, kind: RelationshipType, strength: f64) -> Result<Self, ModelError> {
        Self::with_direction(source, target, kind, Strength::new(strength)?, kind.is_bidirectional())
    }

    pub fn with_direction(
        source: AssetId,
        target: AssetId,
        kind: RelationshipType,
        strength: Strength,
        bidirectional: bool,
    ) -> Result<Self, ModelError> {
        if source == target {
            return Err(ModelError::SelfLoop(source.to_string()));
        }
        Ok(Self { source, target, kind, strength, bidirectional })
    }

    pub fn source(&self) -> &AssetId { &self.source }
    pub fn target(&self) -> &AssetId { &self.target }
    pub fn kind(&self) -> RelationshipType { self.kind }
    pub fn strength(&self) -> f64 { self.strength.value() }
    pub fn is_bidirectional(&self) -> bool { self.bidirectional }

    /// Returns the relationship with endpoints in canonical order.
    ///
    /// Bidirectional links are sorted by identifier so that A→B and B→A
    /// collapse to one key. Directional links keep their orientation.
    pub(crate) fn normalized(mut self) -> Self {
        if self.bidirectional && self.target < self.source {
            std::mem::swap(&mut self.source, &mut self.target);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn id(s: &str) -> AssetId {
        AssetId::new(s).unwrap()
    }

    #[rstest]
    #[case(0.0, true)]
    #[case(0.5, true)]
    #[case(1.0, true)]
    #[case(1.5, false)]
    #[case(-0.1, false)]
    #[case(f64::NAN, false)]
    #[case(f64::INFINITY, false)]
    fn test_strength_construction(#[case] value: f64, #[case] valid: bool) {
        let res = Relationship::new(id("A"), id("B"), RelationshipType::SameSector, value);
        assert_eq!(res.is_ok(), valid);
    }

    #[test]
    fn test_clamped_strength() {
        assert_eq!(Strength::clamped(1.7).unwrap().value(), 1.0);
        assert_eq!(Strength::clamped(-3.0).unwrap().value(), 0.0);
        assert_eq!(Strength::clamped(f64::INFINITY).unwrap().value(), 1.0);
        assert!(Strength::clamped(f64::NAN).is_err());
    }

    #[test]
    fn test_self_loop_rejected() {
        let err = Relationship::new(id("A"), id("A"), RelationshipType::Issuer, 0.9).unwrap_err();
        assert_eq!(err, ModelError::SelfLoop("A".into()));
    }

    #[test]
    fn test_normalization_only_flips_bidirectional() {
        let sector = Relationship::new(id("B"), id("A"), RelationshipType::SameSector, 0.8).unwrap().normalized();
        assert_eq!((sector.source().as_str(), sector.target().as_str()), ("A", "B"));

        let issuer = Relationship::new(id("B"), id("A"), RelationshipType::Issuer, 0.9).unwrap().normalized();
        assert_eq!((issuer.source().as_str(), issuer.target().as_str()), ("B", "A"));
    }
}
