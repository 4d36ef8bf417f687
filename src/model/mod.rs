//! Domain entities: assets, regulatory events and relationships.
pub mod asset;
pub mod error;
pub mod event;
pub mod record;
pub mod relationship;

pub use asset::{Asset, AssetBuilder, AssetClass, AssetId, ClassAttributes, CommodityExposure, CurrencyCode};
pub use error::ModelError;
pub use event::{ImpactScore, RegulatoryEvent};
pub use record::{parse_catalogue, Catalogue};
pub use relationship::{Relationship, RelationshipType, Strength};
