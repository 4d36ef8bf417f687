use crate::store::{GraphStore, NodeId};
use petgraph::unionfind::UnionFind;

/// Weakly connected components of a built graph.
///
/// Edge direction is ignored: a directional issuer link joins its endpoints
/// into one component just like a bidirectional sector link.
#[derive(Debug, Clone, Default)]
pub struct Components {
    /// Component label per node, dense in `0..count`.
    labels: Vec<usize>,
    count: usize,
}

impl Components {
    pub fn of(store: &GraphStore) -> Self {
        let n = store.asset_count();
        let mut sets = UnionFind::<usize>::new(n);
        for &(source, target) in store.endpoints() {
            sets.union(source.index(), target.index());
        }

        // Relabel union-find representatives to 0..count in node order.
        let mut dense = vec![usize::MAX; n];
        let mut labels = Vec::with_capacity(n);
        let mut count = 0;
        for node in 0..n {
            let root = sets.find(node);
            if dense[root] == usize::MAX {
                dense[root] = count;
                count += 1;
            }
            labels.push(dense[root]);
        }
        Self { labels, count }
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn label(&self, node: NodeId) -> usize {
        self.labels[node.index()]
    }

    /// Members of every component, each in node order.
    pub fn groups(&self) -> Vec<Vec<NodeId>> {
        let mut groups = vec![Vec::new(); self.count];
        for (idx, &label) in self.labels.iter().enumerate() {
            groups[label].push(NodeId::new(idx));
        }
        groups
    }
}
