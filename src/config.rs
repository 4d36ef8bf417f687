//! Engine configuration, loadable from TOML.
//!
//! Every field has a default so an empty document is a valid configuration.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid config value for '{field}': {reason}")]
    Invalid { field: &'static str, reason: String },
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub inference: InferenceConfig,
    #[serde(default)]
    pub layout: LayoutConfig,
    #[serde(default)]
    pub payload: PayloadConfig,
}

impl EngineConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let inf = &self.inference;
        unit_interval("inference.same_sector_strength", inf.same_sector_strength)?;
        unit_interval("inference.issuer_strength", inf.issuer_strength)?;
        unit_interval("inference.commodity_exposure_weight", inf.commodity_exposure_weight)?;
        unit_interval("inference.currency_exposure_strength", inf.currency_exposure_strength)?;
        non_negative("inference.regulatory_impact_scale", inf.regulatory_impact_scale)?;

        let layout = &self.layout;
        if layout.iterations == 0 {
            return Err(invalid("layout.iterations", "must be greater than zero"));
        }
        positive("layout.spread", layout.spread)?;
        positive("layout.component_spacing", layout.component_spacing)?;
        positive("layout.min_separation", layout.min_separation)?;

        let payload = &self.payload;
        if payload.max_nodes == 0 {
            return Err(invalid("payload.max_nodes", "must be greater than zero"));
        }
        if payload.max_edges == 0 {
            return Err(invalid("payload.max_edges", "must be greater than zero"));
        }
        positive("payload.base_node_size", payload.base_node_size)?;
        non_negative("payload.degree_size_scale", payload.degree_size_scale)?;
        non_negative("payload.arrow_offset", payload.arrow_offset)?;
        Ok(())
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid { field, reason: reason.into() }
}

fn unit_interval(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if !value.is_finite() || !(0.0..=1.0).contains(&value) {
        return Err(invalid(field, format!("{} is not in [0, 1]", value)));
    }
    Ok(())
}

fn non_negative(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if !value.is_finite() || value < 0.0 {
        return Err(invalid(field, format!("{} must be finite and >= 0", value)));
    }
    Ok(())
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(invalid(field, format!("{} must be finite and > 0", value)));
    }
    Ok(())
}

/// Base strengths for each inference rule.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct InferenceConfig {
    #[serde(default = "default_same_sector_strength")]
    pub same_sector_strength: f64,

    /// Issuer linkage is near-deterministic.
    #[serde(default = "default_issuer_strength")]
    pub issuer_strength: f64,

    /// Multiplied by the exposure's own weight.
    #[serde(default = "default_commodity_exposure_weight")]
    pub commodity_exposure_weight: f64,

    /// Shared currency is a weak signal.
    #[serde(default = "default_currency_exposure_strength")]
    pub currency_exposure_strength: f64,

    /// Multiplied by the event's impact magnitude before clamping.
    #[serde(default = "default_regulatory_impact_scale")]
    pub regulatory_impact_scale: f64,

    /// Catalogue size from which pair rows are evaluated on the rayon pool.
    #[serde(default = "default_parallel_threshold")]
    pub parallel_threshold: usize,
}

fn default_same_sector_strength() -> f64 { 0.8 }
fn default_issuer_strength() -> f64 { 0.95 }
fn default_commodity_exposure_weight() -> f64 { 0.7 }
fn default_currency_exposure_strength() -> f64 { 0.3 }
fn default_regulatory_impact_scale() -> f64 { 1.0 }
fn default_parallel_threshold() -> usize { 512 }

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            same_sector_strength: default_same_sector_strength(),
            issuer_strength: default_issuer_strength(),
            commodity_exposure_weight: default_commodity_exposure_weight(),
            currency_exposure_strength: default_currency_exposure_strength(),
            regulatory_impact_scale: default_regulatory_impact_scale(),
            parallel_threshold: default_parallel_threshold(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutStrategy {
    /// Class sectors on per-component rings, no simulation.
    ClassCluster,
    /// Class-cluster seed refined by a force-directed simulation.
    #[default]
    ForceDirected,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LayoutConfig {
    #[serde(default)]
    pub strategy: LayoutStrategy,

    /// Simulation steps for `ForceDirected`.
    #[serde(default = "default_iterations")]
    pub iterations: usize,

    /// Radius of a class ring and the ideal edge length.
    #[serde(default = "default_spread")]
    pub spread: f64,

    /// Distance between the anchors of neighbouring components.
    #[serde(default = "default_component_spacing")]
    pub component_spacing: f64,

    #[serde(default = "default_min_separation")]
    pub min_separation: f64,
}

fn default_iterations() -> usize { 150 }
fn default_spread() -> f64 { 10.0 }
fn default_component_spacing() -> f64 { 60.0 }
fn default_min_separation() -> f64 { 0.5 }

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            strategy: LayoutStrategy::default(),
            iterations: default_iterations(),
            spread: default_spread(),
            component_spacing: default_component_spacing(),
            min_separation: default_min_separation(),
        }
    }
}

/// What the payload builder does when the graph exceeds its ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OverflowPolicy {
    #[default]
    Reject,
    Degrade,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PayloadConfig {
    #[serde(default = "default_max_nodes")]
    pub max_nodes: usize,

    #[serde(default = "default_max_edges")]
    pub max_edges: usize,

    #[serde(default)]
    pub overflow: OverflowPolicy,

    #[serde(default = "default_base_node_size")]
    pub base_node_size: f64,

    /// Extra size given to the highest-degree node.
    #[serde(default = "default_degree_size_scale")]
    pub degree_size_scale: f64,

    /// Distance from the target node at which an arrow head is drawn.
    #[serde(default = "default_arrow_offset")]
    pub arrow_offset: f64,
}

fn default_max_nodes() -> usize { 5_000 }
fn default_max_edges() -> usize { 50_000 }
fn default_base_node_size() -> f64 { 1.0 }
fn default_degree_size_scale() -> f64 { 2.0 }
fn default_arrow_offset() -> f64 { 1.0 }

impl Default for PayloadConfig {
    fn default() -> Self {
        Self {
            max_nodes: default_max_nodes(),
            max_edges: default_max_edges(),
            overflow: OverflowPolicy::default(),
            base_node_size: default_base_node_size(),
            degree_size_scale: default_degree_size_scale(),
            arrow_offset: default_arrow_offset(),
        }
    }
}
