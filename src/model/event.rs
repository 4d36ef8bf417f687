//! Regulatory events, the external occurrences used to infer co-impact links.

use super::asset::AssetId;
use super::error::ModelError;
use chrono::NaiveDate;
use serde::Serialize;
use smallvec::SmallVec;

/// Impact of a regulatory event, bounded to [-1, 1].
///
/// Negative values are adverse impacts. Only the magnitude feeds relationship
/// strength.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct ImpactScore(f64);

impl ImpactScore {
    pub fn new(value: f64) -> Result<Self, ModelError> {
        if !value.is_finite() || !(-1.0..=1.0).contains(&value) {
            return Err(ModelError::InvalidImpactScore(value));
        }
        Ok(Self(value))
    }

    pub fn value(self) -> f64 {
        self.0
    }

    pub fn magnitude(self) -> f64 {
        self.0.abs()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegulatoryEvent {
    id: String,
    asset_ids: SmallVec<[AssetId; 4]>,
    event_type: String,
    date: NaiveDate,
    description: String,
    impact: ImpactScore,
}

impl RegulatoryEvent {
    pub fn new(
        id: impl Into<String>,
        asset_ids: impl IntoIterator<Item = AssetId>,
        event_type: impl Into<String>,
        date: NaiveDate,
        description: impl Into<String>,
        impact: ImpactScore,
    ) -> Result<Self, ModelError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(ModelError::EmptyIdentifier { field: "event id" });
        }
        let asset_ids: SmallVec<[AssetId; 4]> = asset_ids.into_iter().collect();
        if asset_ids.is_empty() {
            return Err(ModelError::EmptyEventAssets(id));
        }
        Ok(Self {
            id,
            asset_ids,
            event_type: event_type.into(),
            date,
            description: description.into(),
            impact,
        })
    }

    pub fn id(&self) -> &str { &self.id }
    pub fn asset_ids(&self) -> &[AssetId] { &self.asset_ids }
    pub fn event_type(&self) -> &str { &self.event_type }
    pub fn date(&self) -> NaiveDate { self.date }
    pub fn description(&self) -> &str { &self.description }
    pub fn impact(&self) -> ImpactScore { self.impact }

    /// Referenced assets in first-seen order with duplicates removed.
    pub fn distinct_asset_ids(&self) -> SmallVec<[&AssetId; 4]> {
        let mut seen: SmallVec<[&AssetId; 4]> = SmallVec::new();
        for id in &self.asset_ids {
            if !seen.contains(&id) {
                seen.push(id);
            }
        }
        seen
    }
}
