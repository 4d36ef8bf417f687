//! Summary statistics of a built relationship graph.
use super::topology::Components;
use crate::model::{AssetClass, RelationshipType};
use crate::store::{GraphStore, NodeId};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NetworkMetrics {
    pub total_assets: usize,
    /// Stored edges, each counted once regardless of direction.
    pub total_relationships: usize,
    pub class_counts: BTreeMap<AssetClass, usize>,
    pub relationship_type_counts: BTreeMap<RelationshipType, usize>,
    pub average_degree: f64,
    pub max_degree: usize,
    /// Stored edges over `n(n-1)/2`, clamped to [0, 1]; 0 below two assets.
    pub network_density: f64,
    pub isolated_assets: usize,
    pub connected_components: usize,
    pub average_strength: f64,
}

/// Computes the metrics summary. Pure: the store is only read.
///
/// Every edge adds one to the degree of each endpoint, so
/// `average_degree == 2 * total_relationships / total_assets`.
/// Zero-node and zero-edge graphs resolve to zero values.
pub fn compute_metrics(store: &GraphStore) -> NetworkMetrics {
    let n = store.asset_count();
    let edges = store.relationship_count();

    let mut class_counts = BTreeMap::new();
    for asset in store.all_assets() {
        *class_counts.entry(asset.class()).or_insert(0) += 1;
    }

    let mut relationship_type_counts = BTreeMap::new();
    let mut strength_sum = 0.0;
    for rel in store.all_relationships() {
        *relationship_type_counts.entry(rel.kind()).or_insert(0) += 1;
        strength_sum += rel.strength();
    }

    let mut degree_sum = 0usize;
    let mut max_degree = 0usize;
    let mut isolated_assets = 0usize;
    for idx in 0..n {
        let degree = store.node_degree(NodeId::new(idx));
        degree_sum += degree;
        max_degree = max_degree.max(degree);
        if degree == 0 {
            isolated_assets += 1;
        }
    }

    NetworkMetrics {
        total_assets: n,
        total_relationships: edges,
        class_counts,
        relationship_type_counts,
        average_degree: ratio(degree_sum as f64, n as f64),
        max_degree,
        network_density: density(n, edges),
        isolated_assets,
        connected_components: Components::of(store).count(),
        average_strength: ratio(strength_sum, edges as f64),
    }
}

fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 { numerator / denominator } else { 0.0 }
}

fn density(n: usize, edges: usize) -> f64 {
    if n < 2 {
        return 0.0;
    }
    let possible = (n as f64) * (n as f64 - 1.0) / 2.0;
    // Several relationship types may link the same pair, so the raw ratio can pass 1.
    ratio(edges as f64, possible).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::InferenceConfig;
    use crate::fixtures::{bond, equity};
    use crate::inference::InferenceEngine;
    use crate::model::{AssetId, Relationship};
    use rstest::rstest;

    #[test]
    fn test_reference_example() {
        let assets = vec![
            equity("A", Some("Technology")),
            equity("B", Some("Technology")),
            bond("C", "A"),
        ];
        let config = InferenceConfig::default();
        let candidates = InferenceEngine::new(&config).infer(&assets, &[]).unwrap();
        let store = GraphStore::build(assets, candidates).unwrap();
        let m = compute_metrics(&store);

        assert_eq!(m.total_assets, 3);
        assert_eq!(m.total_relationships, 2);
        assert_eq!(m.class_counts[&AssetClass::Equity], 2);
        assert_eq!(m.class_counts[&AssetClass::FixedIncome], 1);
        assert_eq!(m.relationship_type_counts[&RelationshipType::SameSector], 1);
        assert_eq!(m.relationship_type_counts[&RelationshipType::Issuer], 1);
        assert!((m.average_degree - 4.0 / 3.0).abs() < 1e-12);
        assert_eq!(m.max_degree, 2);
        assert!((m.network_density - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(m.isolated_assets, 0);
        assert_eq!(m.connected_components, 1);
        assert!((m.average_strength - (0.8 + 0.95) / 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_empty_graph_is_all_zero() {
        let m = compute_metrics(&GraphStore::new());
        assert_eq!(m.total_assets, 0);
        assert_eq!(m.total_relationships, 0);
        assert_eq!(m.network_density, 0.0);
        assert_eq!(m.average_degree, 0.0);
        assert_eq!(m.average_strength, 0.0);
        assert!(m.class_counts.is_empty());
    }

    #[rstest]
    #[case(0, 0, 0.0)]
    #[case(1, 0, 0.0)]
    #[case(2, 1, 1.0)]
    #[case(4, 3, 0.5)]
    #[case(3, 9, 1.0)]
    fn test_density_bounds(#[case] n: usize, #[case] edges: usize, #[case] expected: f64) {
        assert!((density(n, edges) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_multi_type_pair_is_counted_per_edge_and_clamped() {
        let assets = vec![equity("A", None), equity("B", None)];
        let id = |s: &str| AssetId::new(s).unwrap();
        let rels = vec![
            Relationship::new(id("A"), id("B"), RelationshipType::SameSector, 0.8).unwrap(),
            Relationship::new(id("B"), id("A"), RelationshipType::SameSector, 0.8).unwrap(),
            Relationship::new(id("B"), id("A"), RelationshipType::RegulatoryCoimpact, 0.2).unwrap(),
        ];
        let store = GraphStore::build(assets, rels).unwrap();
        let m = compute_metrics(&store);
        assert_eq!(m.total_relationships, 2);
        assert_eq!(m.max_degree, 2);
        assert_eq!(m.network_density, 1.0);
    }

    #[test]
    fn test_idempotent() {
        let assets = vec![equity("A", Some("X")), equity("B", Some("X")), equity("C", None)];
        let config = InferenceConfig::default();
        let candidates = InferenceEngine::new(&config).infer(&assets, &[]).unwrap();
        let store = GraphStore::build(assets, candidates).unwrap();
        let first = compute_metrics(&store);
        assert_eq!(first, compute_metrics(&store));
        assert_eq!(first.isolated_assets, 1);
        assert_eq!(first.connected_components, 2);
    }
}
