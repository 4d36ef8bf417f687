//! End-to-end build: ingest, infer, store, measure, lay out.
//!
//! A `SharedNetwork` publishes immutable snapshots. Readers clone an `Arc` and
//! keep a consistent view for as long as they hold it; a rebuild computes a
//! whole new snapshot before swapping it in.

use crate::analysis::{compute_metrics, NetworkMetrics};
use crate::config::{ConfigError, EngineConfig};
use crate::display::{PayloadBuilder, PayloadError, VisualizationPayload};
use crate::inference::InferenceEngine;
use crate::layout::{Layout, LayoutGenerator};
use crate::model::{Asset, Catalogue, ModelError, RegulatoryEvent};
use crate::store::{GraphError, GraphStore};
use parking_lot::RwLock;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, instrument};

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error(transparent)]
    Graph(#[from] GraphError),
    #[error(transparent)]
    Payload(#[from] PayloadError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// One immutable graph version with everything derived from it.
#[derive(Debug, Clone)]
pub struct NetworkSnapshot {
    pub store: Arc<GraphStore>,
    pub metrics: NetworkMetrics,
    pub layout: Layout,
    pub version: u64,
}

impl NetworkSnapshot {
    fn empty() -> Self {
        Self {
            store: Arc::new(GraphStore::new()),
            metrics: NetworkMetrics::default(),
            layout: Layout::default(),
            version: 0,
        }
    }

    /// Renders this snapshot with the given payload settings.
    pub fn payload(&self, config: &EngineConfig) -> Result<VisualizationPayload, PayloadError> {
        PayloadBuilder::new(&config.payload).build(&self.store, &self.layout)
    }
}

/// Runs every stage for one catalogue. The returned snapshot has version 0.
#[instrument(skip_all, fields(assets = assets.len(), events = events.len()))]
pub fn build_snapshot(
    assets: Vec<Asset>,
    events: &[RegulatoryEvent],
    config: &EngineConfig,
) -> Result<NetworkSnapshot, PipelineError> {
    let candidates = InferenceEngine::new(&config.inference).infer(&assets, events)?;
    let store = GraphStore::build(assets, candidates)?;
    store.check_event_references(events)?;
    let metrics = compute_metrics(&store);
    let layout = LayoutGenerator::new(&config.layout).compute_positions(&store);
    debug!(
        relationships = store.relationship_count(),
        components = metrics.connected_components,
        "snapshot stages complete"
    );
    Ok(NetworkSnapshot { store: Arc::new(store), metrics, layout, version: 0 })
}

pub struct SharedNetwork {
    config: EngineConfig,
    current: RwLock<Arc<NetworkSnapshot>>,
}

impl SharedNetwork {
    /// Starts with an empty version-0 snapshot.
    pub fn new(config: EngineConfig) -> Result<Self, PipelineError> {
        config.validate()?;
        Ok(Self { config, current: RwLock::new(Arc::new(NetworkSnapshot::empty())) })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn current(&self) -> Arc<NetworkSnapshot> {
        self.current.read().clone()
    }

    pub fn version(&self) -> u64 {
        self.current.read().version
    }

    /// Builds and publishes a new snapshot.
    ///
    /// The write lock is held only for the pointer swap. On error the
    /// previously published snapshot stays current.
    pub fn rebuild(&self, assets: Vec<Asset>, events: &[RegulatoryEvent]) -> Result<Arc<NetworkSnapshot>, PipelineError> {
        let mut snapshot = build_snapshot(assets, events, &self.config)?;
        let mut guard = self.current.write();
        snapshot.version = guard.version + 1;
        let snapshot = Arc::new(snapshot);
        *guard = Arc::clone(&snapshot);
        drop(guard);
        info!(
            version = snapshot.version,
            assets = snapshot.store.asset_count(),
            relationships = snapshot.store.relationship_count(),
            "network snapshot published"
        );
        Ok(snapshot)
    }

    pub fn rebuild_catalogue(&self, catalogue: Catalogue) -> Result<Arc<NetworkSnapshot>, PipelineError> {
        self.rebuild(catalogue.assets, &catalogue.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{bond, equity, event};
    use crate::model::{parse_catalogue, RelationshipType};
    use rstest::rstest;
    use std::collections::HashSet;

    fn init_tracing() {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    }

    fn abc() -> Vec<Asset> {
        vec![equity("A", Some("Tech")), equity("B", Some("Tech")), bond("C", "A")]
    }

    #[test]
    fn test_abc_end_to_end() {
        init_tracing();
        let snapshot = build_snapshot(abc(), &[], &EngineConfig::default()).unwrap();
        assert_eq!(snapshot.store.relationship_count(), 2);
        assert_eq!(snapshot.metrics.total_relationships, 2);
        assert!((snapshot.metrics.network_density - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(snapshot.layout.len(), 3);

        let payload = snapshot.payload(&EngineConfig::default()).unwrap();
        assert_eq!(payload.nodes.len(), 3);
        assert_eq!(payload.edges.len(), 2);
    }

    #[test]
    fn test_rebuild_publishes_new_version() {
        init_tracing();
        let network = SharedNetwork::new(EngineConfig::default()).unwrap();
        assert_eq!(network.version(), 0);
        let before = network.current();

        let published = network.rebuild(abc(), &[]).unwrap();
        assert_eq!(published.version, 1);
        assert_eq!(network.current().store.asset_count(), 3);
        // Readers holding the old snapshot keep it.
        assert_eq!(before.store.asset_count(), 0);
    }

    #[test]
    fn test_failed_rebuild_keeps_current_snapshot() {
        init_tracing();
        let network = SharedNetwork::new(EngineConfig::default()).unwrap();
        network.rebuild(abc(), &[]).unwrap();

        let duplicate = vec![equity("A", None), equity("A", None)];
        let err = network.rebuild(duplicate, &[]).unwrap_err();
        assert!(matches!(err, PipelineError::Graph(GraphError::DuplicateIdentifier(_))));

        let unknown = network.rebuild(abc(), &[event("E1", &["A", "ZZZ"], 0.5)]).unwrap_err();
        assert!(matches!(unknown, PipelineError::Graph(GraphError::InvalidEndpoint { .. })));

        assert_eq!(network.version(), 1);
        assert_eq!(network.current().store.relationship_count(), 2);
    }

    #[test]
    fn test_event_naming_unknown_asset_aborts_build() {
        let config = EngineConfig::default();
        let single = build_snapshot(abc(), &[event("E1", &["ZZZ"], 0.5)], &config).unwrap_err();
        assert!(matches!(single, PipelineError::Graph(GraphError::InvalidEndpoint { ref missing, .. }) if missing == "ZZZ"));

        let repeated = build_snapshot(abc(), &[event("E2", &["A", "A"], 0.5), event("E3", &["ZZZ", "ZZZ"], 0.5)], &config);
        assert!(matches!(repeated, Err(PipelineError::Graph(GraphError::InvalidEndpoint { .. }))));

        // Known single-asset events add no relationship.
        let known = build_snapshot(abc(), &[event("E4", &["A"], 0.5)], &config).unwrap();
        assert_eq!(known.store.relationship_count(), 2);
    }

    /// `k` same-sector equities, a bond on the first one, and events naming
    /// the same pairs in both orders.
    fn sector_cluster(k: usize) -> (Vec<Asset>, Vec<RegulatoryEvent>) {
        let ids: Vec<String> = (0..k).map(|i| format!("EQ{:02}", i)).collect();
        let mut assets: Vec<Asset> = ids
            .iter()
            .enumerate()
            .map(|(i, id)| equity(id, Some(if i % 2 == 0 { "Tech" } else { "TECH" })))
            .collect();
        assets.push(bond("BND", &ids[0]));

        let mut events = Vec::new();
        for (i, j) in [(0, 1), (1, 0), (0, k - 1), (k - 1, 0), (0, 1)] {
            let name = format!("E{}{}", i, j);
            events.push(event(&name, &[ids[i].as_str(), ids[j].as_str()], 0.4));
        }
        (assets, events)
    }

    #[rstest]
    #[case(2, usize::MAX)]
    #[case(6, usize::MAX)]
    #[case(6, 1)]
    #[case(15, 1)]
    fn test_same_sector_pairs_linked_once_and_count_matches_triples(#[case] k: usize, #[case] parallel_threshold: usize) {
        let mut config = EngineConfig::default();
        config.inference.parallel_threshold = parallel_threshold;
        let (assets, events) = sector_cluster(k);

        let candidates = InferenceEngine::new(&config.inference).infer(&assets, &events).unwrap();
        let expected: HashSet<(String, String, RelationshipType)> = candidates
            .iter()
            .map(|r| {
                let (s, t) = (r.source().to_string(), r.target().to_string());
                if r.is_bidirectional() && t < s { (t, s, r.kind()) } else { (s, t, r.kind()) }
            })
            .collect();
        assert!(candidates.len() > expected.len());

        let snapshot = build_snapshot(assets, &events, &config).unwrap();
        let same_sector = snapshot
            .store
            .all_relationships()
            .iter()
            .filter(|r| r.kind() == RelationshipType::SameSector)
            .count();
        assert_eq!(same_sector, k * (k - 1) / 2);
        assert_eq!(snapshot.metrics.relationship_type_counts[&RelationshipType::SameSector], same_sector);
        assert_eq!(snapshot.metrics.total_relationships, expected.len());
        assert_eq!(snapshot.store.relationship_count(), expected.len());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = EngineConfig::default();
        config.layout.iterations = 0;
        assert!(matches!(SharedNetwork::new(config), Err(PipelineError::Config(_))));
    }

    #[test]
    fn test_rebuild_from_catalogue() {
        let json = r#"{
            "assets": [
                {"id": "XOM", "symbol": "XOM", "asset_class": "EQUITY", "sector": "Energy"},
                {"id": "CVX", "symbol": "CVX", "asset_class": "EQUITY", "sector": "energy"}
            ],
            "events": []
        }"#;
        let network = SharedNetwork::new(EngineConfig::default()).unwrap();
        let snapshot = network.rebuild_catalogue(parse_catalogue(json).unwrap()).unwrap();
        assert_eq!(snapshot.store.relationship_count(), 1);
        assert_eq!(snapshot.metrics.connected_components, 1);
    }
}
