use super::error::PayloadError;
use super::geometry::{edge_geometry, EdgeGeometry};
use super::palette::class_color;
use super::validation::validate_geometry;
use crate::config::{OverflowPolicy, PayloadConfig};
use crate::layout::{Layout, Position};
use crate::model::{AssetClass, AssetId, RelationshipType};
use crate::store::{EdgeId, GraphStore, NodeId};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeView {
    pub id: AssetId,
    pub name: String,
    pub symbol: String,
    pub class: AssetClass,
    pub position: Position,
    pub color: &'static str,
    pub size: f64,
    pub degree: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EdgeView {
    pub source: AssetId,
    pub target: AssetId,
    #[serde(rename = "type")]
    pub kind: RelationshipType,
    pub strength: f64,
    pub bidirectional: bool,
    pub geometry: EdgeGeometry,
}

/// Renderer-ready view of one graph version.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VisualizationPayload {
    pub nodes: Vec<NodeView>,
    pub edges: Vec<EdgeView>,
    /// Set when the capacity ceiling forced nodes or edges to be dropped.
    pub truncated: bool,
}

impl VisualizationPayload {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

pub struct PayloadBuilder<'a> {
    config: &'a PayloadConfig,
}

impl<'a> PayloadBuilder<'a> {
    pub fn new(config: &'a PayloadConfig) -> Self {
        Self { config }
    }

    pub fn build(&self, store: &GraphStore, layout: &Layout) -> Result<VisualizationPayload, PayloadError> {
        let (ids, coords) = layout.columns();
        self.build_with_geometry(store, Some(&ids[..]), Some(&coords[..]))
    }

    /// Builds a payload from caller-supplied geometry.
    ///
    /// Coordinates for identifiers absent from the store are ignored. Every
    /// stored asset must have one. The store is only read.
    pub fn build_with_geometry<S: AsRef<str>>(
        &self,
        store: &GraphStore,
        ids: Option<&[S]>,
        coords: Option<&[Vec<f64>]>,
    ) -> Result<VisualizationPayload, PayloadError> {
        let points = validate_geometry(ids, coords)?;
        let by_id: HashMap<&str, [f64; 3]> = ids
            .unwrap_or_default()
            .iter()
            .map(AsRef::as_ref)
            .zip(points)
            .collect();

        let mut positions = Vec::with_capacity(store.asset_count());
        for asset in store.all_assets() {
            match by_id.get(asset.id().as_str()) {
                Some(p) => positions.push(Position::from_array(*p)),
                None => {
                    return Err(PayloadError::InvalidInput(format!(
                        "asset '{}' has no coordinate",
                        asset.id()
                    )))
                }
            }
        }

        let (nodes, edges, truncated) = self.select(store)?;
        let max_degree = (0..store.asset_count())
            .map(|i| store.node_degree(NodeId::new(i)))
            .max()
            .unwrap_or(0);

        let node_views: Vec<NodeView> = nodes
            .iter()
            .map(|&n| {
                let asset = &store.all_assets()[n.index()];
                let degree = store.node_degree(n);
                NodeView {
                    id: asset.id().clone(),
                    name: asset.name().to_string(),
                    symbol: asset.symbol().to_string(),
                    class: asset.class(),
                    position: positions[n.index()],
                    color: class_color(asset.class()),
                    size: self.node_size(degree, max_degree),
                    degree,
                }
            })
            .collect();

        let mut edge_views = Vec::with_capacity(edges.len());
        for e in edges {
            let relationship = &store.all_relationships()[e.index()];
            let (source, target) = store.endpoints()[e.index()];
            let geometry = edge_geometry(
                positions[source.index()],
                positions[target.index()],
                !relationship.is_bidirectional(),
                self.config.arrow_offset,
            )?;
            edge_views.push(EdgeView {
                source: relationship.source().clone(),
                target: relationship.target().clone(),
                kind: relationship.kind(),
                strength: relationship.strength(),
                bidirectional: relationship.is_bidirectional(),
                geometry,
            });
        }

        debug!(nodes = node_views.len(), edges = edge_views.len(), truncated, "payload built");
        Ok(VisualizationPayload { nodes: node_views, edges: edge_views, truncated })
    }

    fn node_size(&self, degree: usize, max_degree: usize) -> f64 {
        if max_degree == 0 {
            return self.config.base_node_size;
        }
        self.config.base_node_size + self.config.degree_size_scale * degree as f64 / max_degree as f64
    }

    /// Picks the nodes and edges to render, honouring the capacity ceiling.
    fn select(&self, store: &GraphStore) -> Result<(Vec<NodeId>, Vec<EdgeId>, bool), PayloadError> {
        let (n, m) = (store.asset_count(), store.relationship_count());
        let all_nodes: Vec<NodeId> = (0..n).map(NodeId::new).collect();
        let all_edges: Vec<EdgeId> = (0..m).map(|i| EdgeId(i as u32)).collect();
        let (max_nodes, max_edges) = (self.config.max_nodes, self.config.max_edges);
        if n <= max_nodes && m <= max_edges {
            return Ok((all_nodes, all_edges, false));
        }

        match self.config.overflow {
            OverflowPolicy::Reject => Err(PayloadError::CapacityExceeded { nodes: n, edges: m, max_nodes, max_edges }),
            OverflowPolicy::Degrade => {
                let assets = store.all_assets();
                let mut ranked = all_nodes;
                ranked.sort_by(|a, b| {
                    store
                        .node_degree(*b)
                        .cmp(&store.node_degree(*a))
                        .then_with(|| assets[a.index()].id().cmp(assets[b.index()].id()))
                });
                ranked.truncate(max_nodes);
                let kept: HashSet<NodeId> = ranked.iter().copied().collect();

                let relationships = store.all_relationships();
                let mut edges: Vec<EdgeId> = all_edges
                    .into_iter()
                    .filter(|e| {
                        let (s, t) = store.endpoints()[e.index()];
                        kept.contains(&s) && kept.contains(&t)
                    })
                    .collect();
                edges.sort_by(|a, b| {
                    relationships[b.index()]
                        .strength()
                        .total_cmp(&relationships[a.index()].strength())
                        .then_with(|| a.cmp(b))
                });
                edges.truncate(max_edges);

                // Back to store order for stable output.
                ranked.sort();
                edges.sort();
                warn!(
                    nodes = n,
                    edges = m,
                    kept_nodes = ranked.len(),
                    kept_edges = edges.len(),
                    "payload exceeds capacity, degrading"
                );
                Ok((ranked, edges, true))
            }
        }
    }
}
