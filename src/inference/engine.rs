//! Orchestrates the inference rules over a catalogue.
use super::rules::{commodity, currency, issuer, regulatory, sector};
use crate::config::InferenceConfig;
use crate::model::{Asset, ModelError, RegulatoryEvent, Relationship};
use rayon::prelude::*;
use tracing::debug;

/// Derives candidate relationships from assets and regulatory events.
///
/// Pairs are visited as `(i, j)` with `i < j` in catalogue order, and the
/// rules run in a fixed order per pair, so the candidate sequence is a pure
/// function of the input order. Large catalogues evaluate rows on the rayon
/// pool; rows are concatenated in index order, giving the same output.
pub struct InferenceEngine<'a> {
    config: &'a InferenceConfig,
}

impl<'a> InferenceEngine<'a> {
    pub fn new(config: &'a InferenceConfig) -> Self {
        Self { config }
    }

    pub fn infer(&self, assets: &[Asset], events: &[RegulatoryEvent]) -> Result<Vec<Relationship>, ModelError> {
        let n = assets.len();
        let rows: Vec<Vec<Relationship>> = if n >= self.config.parallel_threshold {
            (0..n).into_par_iter().map(|i| self.row(assets, i)).collect::<Result<Vec<_>, ModelError>>()?
        } else {
            (0..n).map(|i| self.row(assets, i)).collect::<Result<Vec<_>, ModelError>>()?
        };

        let mut candidates: Vec<Relationship> = rows.into_iter().flatten().collect();
        let pairwise = candidates.len();

        for event in events {
            regulatory::infer(event, self.config, &mut candidates)?;
        }

        debug!(
            assets = n,
            events = events.len(),
            pairwise,
            event_driven = candidates.len() - pairwise,
            "inferred relationship candidates"
        );
        Ok(candidates)
    }

    /// All candidates for pairs `(i, j)` with `j > i`.
    fn row(&self, assets: &[Asset], i: usize) -> Result<Vec<Relationship>, ModelError> {
        let a = &assets[i];
        let mut out = Vec::new();
        for b in &assets[i + 1..] {
            // Duplicate identifiers are reported by the store, not turned into self-loops here.
            if a.id() == b.id() {
                continue;
            }
            sector::infer(a, b, self.config, &mut out)?;
            issuer::infer(a, b, self.config, &mut out)?;
            commodity::infer(a, b, self.config, &mut out)?;
            currency::infer(a, b, self.config, &mut out)?;
        }
        Ok(out)
    }
}
