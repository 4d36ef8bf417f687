//! Construction-time errors for the domain model.
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    #[error("Identifier must not be empty ({field})")]
    EmptyIdentifier { field: &'static str },
    #[error("Relationship strength {0} is not a finite value in [0, 1]")]
    InvalidStrength(f64),
    #[error("Impact score {0} is not a finite value in [-1, 1]")]
    InvalidImpactScore(f64),
    #[error("Invalid {field} for asset '{asset_id}': {value}")]
    InvalidPrice { asset_id: String, field: &'static str, value: f64 },
    #[error("Invalid currency code '{0}': expected three ASCII letters")]
    InvalidCurrencyCode(String),
    #[error("Unknown asset class '{0}'")]
    UnknownAssetClass(String),
    #[error("Asset '{asset_id}' is {class} but carries {found} attributes")]
    AttributeMismatch { asset_id: String, class: String, found: String },
    #[error("Attribute '{key}' of asset '{asset_id}' is invalid: {reason}")]
    InvalidAttribute { asset_id: String, key: String, reason: String },
    #[error("Exposure weight {weight} for '{commodity}' is not in [0, 1]")]
    InvalidExposureWeight { commodity: String, weight: f64 },
    #[error("Self-loop on asset '{0}'")]
    SelfLoop(String),
    #[error("Regulatory event '{0}' references no assets")]
    EmptyEventAssets(String),
    #[error("Invalid date '{value}': {reason}")]
    InvalidDate { value: String, reason: String },
    #[error("Catalogue parse error: {0}")]
    Parse(String),
}
