use super::error::GraphError;
use super::types::{EdgeId, NodeId};
use crate::model::{Asset, AssetId, RegulatoryEvent, Relationship, RelationshipType};
use smallvec::SmallVec;
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Dense, insertion-ordered storage for one graph version.
///
/// Assets and relationships live in parallel arrays addressed by `NodeId` and
/// `EdgeId`. Uniqueness is enforced on insert: asset identifiers are unique,
/// and so are normalized `(source, target, type)` triples.
#[derive(Debug, Clone, Default)]
pub struct GraphStore {
    // Columnar node arrays
    assets: Vec<Asset>,
    incident: Vec<SmallVec<[EdgeId; 4]>>,

    // Edge arrays
    relationships: Vec<Relationship>,
    endpoints: Vec<(NodeId, NodeId)>,

    // Lookup state
    index: HashMap<AssetId, NodeId>,
    triples: HashSet<(NodeId, NodeId, RelationshipType)>,
}

impl GraphStore {
    pub fn new() -> Self { Self::default() }

    /// Builds a complete store from validated assets and candidate relationships.
    ///
    /// Any error aborts the build; the partially filled store is dropped and
    /// never observable by the caller.
    pub fn build(
        assets: impl IntoIterator<Item = Asset>,
        candidates: impl IntoIterator<Item = Relationship>,
    ) -> Result<Self, GraphError> {
        let mut store = Self::new();
        for asset in assets {
            store.add_asset(asset)?;
        }
        let mut dropped = 0usize;
        for candidate in candidates {
            if !store.add_relationship(candidate)? {
                dropped += 1;
            }
        }
        debug!(
            assets = store.asset_count(),
            relationships = store.relationship_count(),
            duplicates_dropped = dropped,
            "graph store built"
        );
        Ok(store)
    }

    pub fn add_asset(&mut self, asset: Asset) -> Result<NodeId, GraphError> {
        if self.index.contains_key(asset.id()) {
            return Err(GraphError::DuplicateIdentifier(asset.id().to_string()));
        }
        let id = NodeId::new(self.assets.len());
        self.index.insert(asset.id().clone(), id);
        self.assets.push(asset);
        self.incident.push(SmallVec::new());
        Ok(id)
    }

    /// Stores a relationship unless an equivalent one already exists.
    ///
    /// Returns `Ok(true)` when stored and `Ok(false)` when dropped as a
    /// duplicate (the first candidate wins). Bidirectional relationships are
    /// normalized first, so A→B and B→A collapse.
    pub fn add_relationship(&mut self, relationship: Relationship) -> Result<bool, GraphError> {
        let relationship = relationship.normalized();
        let source = self.resolve_endpoint(&relationship, relationship.source())?;
        let target = self.resolve_endpoint(&relationship, relationship.target())?;

        if !self.triples.insert((source, target, relationship.kind())) {
            return Ok(false);
        }

        let edge = EdgeId(self.relationships.len() as u32);
        self.relationships.push(relationship);
        self.endpoints.push((source, target));
        self.incident[source.index()].push(edge);
        self.incident[target.index()].push(edge);
        Ok(true)
    }

    /// Fails on the first event asset that is not in the store.
    ///
    /// Events naming a single asset produce no relationship, so this is the
    /// only place their references are checked.
    pub fn check_event_references(&self, events: &[RegulatoryEvent]) -> Result<(), GraphError> {
        for event in events {
            if let Some(missing) = event.asset_ids().iter().find(|id| !self.index.contains_key(*id)) {
                return Err(GraphError::InvalidEndpoint {
                    source_id: event.id().to_string(),
                    target_id: missing.to_string(),
                    kind: RelationshipType::RegulatoryCoimpact.to_string(),
                    missing: missing.to_string(),
                });
            }
        }
        Ok(())
    }

    fn resolve_endpoint(&self, relationship: &Relationship, endpoint: &AssetId) -> Result<NodeId, GraphError> {
        self.index.get(endpoint).copied().ok_or_else(|| GraphError::InvalidEndpoint {
            source_id: relationship.source().to_string(),
            target_id: relationship.target().to_string(),
            kind: relationship.kind().to_string(),
            missing: endpoint.to_string(),
        })
    }

    // --- Queries ---

    pub fn asset_count(&self) -> usize { self.assets.len() }
    pub fn relationship_count(&self) -> usize { self.relationships.len() }
    pub fn all_assets(&self) -> &[Asset] { &self.assets }
    pub fn all_relationships(&self) -> &[Relationship] { &self.relationships }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn node_id(&self, id: &str) -> Option<NodeId> {
        self.index.get(id).copied()
    }

    pub fn asset(&self, id: &str) -> Option<&Asset> {
        self.node_id(id).map(|n| &self.assets[n.index()])
    }

    /// Relationships touching `id`, in insertion order.
    ///
    /// Every call returns a fresh iterator. Unknown ids yield nothing.
    pub fn adjacency<'a>(&'a self, id: &str) -> impl Iterator<Item = &'a Relationship> + 'a {
        let edges: &'a [EdgeId] = match self.node_id(id) {
            Some(node) => &self.incident[node.index()],
            None => &[],
        };
        edges.iter().map(move |e| &self.relationships[e.index()])
    }

    /// Number of stored relationships touching `id`.
    pub fn degree(&self, id: &str) -> usize {
        self.node_id(id).map_or(0, |n| self.node_degree(n))
    }

    #[inline(always)]
    pub fn node_degree(&self, node: NodeId) -> usize {
        self.incident[node.index()].len()
    }

    /// Dense `(source, target)` pairs, parallel to `all_relationships`.
    pub fn endpoints(&self) -> &[(NodeId, NodeId)] {
        &self.endpoints
    }
}
