//! Assigns a deterministic 3-D position to every asset of a built graph.
use super::force::{self, ForceParams, Link};
use super::seed;
use super::{Layout, Position};
use crate::analysis::Components;
use crate::config::{LayoutConfig, LayoutStrategy};
use crate::model::AssetClass;
use crate::store::{GraphStore, NodeId};
use rand::Rng;
use std::collections::BTreeMap;
use std::f64::consts::PI;
use tracing::{debug, warn};

const GOLDEN_ANGLE: f64 = 2.399_963_229_728_653;
const MAX_SEPARATION_STEPS_PER_NODE: usize = 4;
/// Fraction of `spread` used for the initial per-node jitter.
const SEED_JITTER: f64 = 0.05;

pub struct LayoutGenerator<'a> {
    config: &'a LayoutConfig,
}

/// One weakly connected component, or the pool of isolated assets.
struct Group {
    /// Members sorted by asset identifier.
    members: Vec<NodeId>,
    /// Aggregated links between local indices, keyed `(low, high)`.
    links: BTreeMap<(usize, usize), f64>,
    relax: bool,
}

impl<'a> LayoutGenerator<'a> {
    pub fn new(config: &'a LayoutConfig) -> Self {
        Self { config }
    }

    /// Computes one position per asset.
    ///
    /// The result depends only on the identifier set and the topology, never
    /// on insertion order. Every identifier is visited in sorted order, and
    /// every random stream is seeded from identifier hashes.
    pub fn compute_positions(&self, store: &GraphStore) -> Layout {
        if store.asset_count() == 0 {
            return Layout::default();
        }
        let assets = store.all_assets();
        let graph_seed = seed::graph_seed(assets.iter().map(|a| a.id().as_str()));
        let groups = self.groups(store);

        let mut placed: Vec<(Vec<[f64; 3]>, f64)> = Vec::with_capacity(groups.len());
        for group in &groups {
            let mut local = self.seed_positions(store, group, graph_seed);
            if group.relax && self.config.strategy == LayoutStrategy::ForceDirected {
                let seeded = local.clone();
                let links: Vec<Link> = group
                    .links
                    .iter()
                    .map(|(&(a, b), &weight)| Link { a, b, weight })
                    .collect();
                let params = ForceParams { iterations: self.config.iterations, ideal_distance: self.config.spread };
                force::relax(&mut local, &links, &params);
                if local.iter().flatten().any(|v| !v.is_finite()) {
                    warn!(members = group.members.len(), "force layout diverged; keeping class-cluster seed");
                    local = seeded;
                }
            }
            force::recenter(&mut local);
            let radius = force::radius(&local);
            placed.push((local, radius));
        }

        let max_radius = placed.iter().map(|(_, r)| *r).fold(0.0, f64::max);
        let spacing = self.config.component_spacing + 2.0 * max_radius;
        let anchors = anchors(groups.len(), spacing);

        let mut positioned: Vec<(NodeId, [f64; 3])> = Vec::with_capacity(store.asset_count());
        for ((group, (local, _)), anchor) in groups.iter().zip(&placed).zip(&anchors) {
            for (node, p) in group.members.iter().zip(local) {
                positioned.push((*node, [anchor[0] + p[0], anchor[1] + p[1], anchor[2] + p[2]]));
            }
        }

        positioned.sort_by(|a, b| assets[a.0.index()].id().cmp(assets[b.0.index()].id()));
        let ids: Vec<&str> = positioned.iter().map(|(n, _)| assets[n.index()].id().as_str()).collect();
        let mut points: Vec<[f64; 3]> = positioned.iter().map(|(_, p)| *p).collect();
        if !enforce_separation(&ids, &mut points, self.config.min_separation) {
            warn!(
                min_separation = self.config.min_separation,
                "minimum separation not reached for every pair of assets"
            );
        }

        debug!(
            assets = points.len(),
            groups = groups.len(),
            strategy = ?self.config.strategy,
            "layout computed"
        );
        positioned
            .iter()
            .zip(points)
            .map(|((node, _), p)| (assets[node.index()].id().clone(), Position::from_array(p)))
            .collect()
    }

    /// Components with two or more members, largest first, then one pool of
    /// isolated assets. Members and groups are ordered by identifier.
    fn groups(&self, store: &GraphStore) -> Vec<Group> {
        let assets = store.all_assets();
        let by_id = |a: &NodeId, b: &NodeId| assets[a.index()].id().cmp(assets[b.index()].id());

        let mut connected = Vec::new();
        let mut isolated = Vec::new();
        for mut members in Components::of(store).groups() {
            members.sort_by(by_id);
            if members.len() == 1 {
                isolated.extend(members);
            } else {
                connected.push(members);
            }
        }
        connected.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| by_id(&a[0], &b[0])));
        isolated.sort_by(by_id);

        // Local index of every node inside its group.
        let mut slot = vec![(usize::MAX, usize::MAX); store.asset_count()];
        for (g, members) in connected.iter().enumerate() {
            for (i, node) in members.iter().enumerate() {
                slot[node.index()] = (g, i);
            }
        }

        let mut groups: Vec<Group> = connected
            .into_iter()
            .map(|members| Group { members, links: BTreeMap::new(), relax: true })
            .collect();

        // Parallel links between one pair add up; strength is ignored so the
        // layout follows topology only.
        for &(source, target) in store.endpoints() {
            let (g, a) = slot[source.index()];
            let (_, b) = slot[target.index()];
            if g == usize::MAX {
                continue;
            }
            let key = (a.min(b), a.max(b));
            *groups[g].links.entry(key).or_insert(0.0) += 1.0;
        }

        if !isolated.is_empty() {
            groups.push(Group { members: isolated, links: BTreeMap::new(), relax: false });
        }
        groups
    }

    /// Class-cluster placement: each asset class owns a fixed angular sector
    /// around the group centre, and its members sit on a small sphere there.
    fn seed_positions(&self, store: &GraphStore, group: &Group, graph_seed: u64) -> Vec<[f64; 3]> {
        let assets = store.all_assets();
        let spread = self.config.spread;

        let mut by_class: BTreeMap<AssetClass, Vec<usize>> = BTreeMap::new();
        for (local, node) in group.members.iter().enumerate() {
            by_class.entry(assets[node.index()].class()).or_default().push(local);
        }
        let single_class = by_class.len() == 1;

        let mut out = vec![[0.0; 3]; group.members.len()];
        for (class, locals) in &by_class {
            let center = if single_class {
                [0.0; 3]
            } else {
                let angle = 2.0 * PI * class.ordinal() as f64 / AssetClass::ALL.len() as f64;
                let ring = spread * (1.0 + (group.members.len() as f64).sqrt() / 4.0);
                [ring * angle.cos(), 0.0, ring * angle.sin()]
            };
            let m = locals.len();
            let inner = spread * 0.5 * (m as f64).cbrt();
            for (i, &local) in locals.iter().enumerate() {
                let id = assets[group.members[local].index()].id().as_str();
                let mut rng = seed::node_rng(graph_seed, id);
                let unit = fibonacci_point(i, m);
                let mut p = [0.0; 3];
                for axis in 0..3 {
                    let jitter: f64 = rng.gen_range(-SEED_JITTER..SEED_JITTER) * spread;
                    p[axis] = center[axis] + unit[axis] * inner + jitter;
                }
                out[local] = p;
            }
        }
        out
    }
}

/// Point `i` of `m` spread evenly over the unit sphere. A lone point sits at the origin.
fn fibonacci_point(i: usize, m: usize) -> [f64; 3] {
    if m <= 1 {
        return [0.0; 3];
    }
    let y = 1.0 - 2.0 * (i as f64 + 0.5) / m as f64;
    let r = (1.0 - y * y).max(0.0).sqrt();
    let theta = i as f64 * GOLDEN_ANGLE;
    [r * theta.cos(), y, r * theta.sin()]
}

/// Group anchors on a sphere sized so neighbouring anchors sit about `spacing` apart.
fn anchors(count: usize, spacing: f64) -> Vec<[f64; 3]> {
    if count <= 1 {
        return vec![[0.0; 3]; count];
    }
    let radius = spacing * (count as f64 / (4.0 * PI)).sqrt().max(0.5);
    (0..count)
        .map(|i| {
            let [x, y, z] = fibonacci_point(i, count);
            [x * radius, y * radius, z * radius]
        })
        .collect()
}

/// Pushes apart any point closer than `min_separation` to an earlier one.
///
/// `ids` and `points` are parallel and sorted by identifier. Each point is
/// checked against the already-settled points before it and, while it
/// conflicts, walks outward along a ray keyed by its identifier. A ray leaves
/// the neighbourhood of a finite point set, so every pair ends up separated.
/// Returns `false` only if the step budget runs out.
fn enforce_separation(ids: &[&str], points: &mut [[f64; 3]], min_separation: f64) -> bool {
    let budget = MAX_SEPARATION_STEPS_PER_NODE * points.len() + MAX_SEPARATION_STEPS_PER_NODE;
    let mut settled = true;
    for i in 1..points.len() {
        let dir = seed::jitter_direction(ids[i]);
        let mut steps = 0;
        while conflicts(points, i, min_separation) {
            if steps == budget {
                settled = false;
                break;
            }
            for axis in 0..3 {
                points[i][axis] += dir[axis] * min_separation;
            }
            steps += 1;
        }
    }
    settled
}

fn conflicts(points: &[[f64; 3]], i: usize, min_separation: f64) -> bool {
    let p = Position::from_array(points[i]);
    points[..i]
        .iter()
        .any(|q| p.distance(&Position::from_array(*q)) < min_separation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::InferenceConfig;
    use crate::fixtures::{bond, commodity_with_sector, currency, equity, equity_exposed, event};
    use crate::inference::InferenceEngine;
    use crate::model::{Asset, RegulatoryEvent};

    fn build(assets: Vec<Asset>, events: Vec<RegulatoryEvent>) -> GraphStore {
        let config = InferenceConfig::default();
        let candidates = InferenceEngine::new(&config).infer(&assets, &events).unwrap();
        GraphStore::build(assets, candidates).unwrap()
    }

    fn catalogue() -> (Vec<Asset>, Vec<RegulatoryEvent>) {
        let assets = vec![
            equity("AAPL", Some("Technology")),
            equity("MSFT", Some("Technology")),
            bond("AAPL-2031", "AAPL"),
            commodity_with_sector("WTI", "Energy"),
            equity_exposed("XOM", "Energy", &["WTI"]),
            currency("USD"),
            equity("LONE", None),
            equity("SOLO", None),
        ];
        let events = vec![event("E1", &["XOM", "MSFT"], 0.3), event("E2", &["XOM", "AAPL"], -0.8)];
        (assets, events)
    }

    #[test]
    fn test_every_asset_gets_a_finite_position() {
        let (assets, events) = catalogue();
        let store = build(assets, events);
        let layout = LayoutGenerator::new(&LayoutConfig::default()).compute_positions(&store);
        assert_eq!(layout.len(), store.asset_count());
        assert!(layout.iter().all(|(_, p)| p.is_finite()));
    }

    #[test]
    fn test_insertion_order_does_not_change_positions() {
        let (assets, events) = catalogue();
        let mut reversed_assets = assets.clone();
        reversed_assets.reverse();
        let mut reversed_events = events.clone();
        reversed_events.reverse();

        for strategy in [LayoutStrategy::ClassCluster, LayoutStrategy::ForceDirected] {
            let config = LayoutConfig { strategy, ..Default::default() };
            let a = LayoutGenerator::new(&config).compute_positions(&build(assets.clone(), events.clone()));
            let b = LayoutGenerator::new(&config)
                .compute_positions(&build(reversed_assets.clone(), reversed_events.clone()));
            assert_eq!(a, b, "strategy {:?}", strategy);
        }
    }

    #[test]
    fn test_repeated_runs_are_identical() {
        let (assets, events) = catalogue();
        let store = build(assets, events);
        let generator_config = LayoutConfig::default();
        let generator = LayoutGenerator::new(&generator_config);
        assert_eq!(generator.compute_positions(&store), generator.compute_positions(&store));
    }

    #[test]
    fn test_minimum_separation_holds() {
        // Ten isolated equities of one class would otherwise crowd one small sphere.
        let assets: Vec<Asset> = (0..10).map(|i| equity(&format!("EQ{}", i), None)).collect();
        let store = build(assets, Vec::new());
        let config = LayoutConfig { spread: 0.01, min_separation: 0.5, ..Default::default() };
        let layout = LayoutGenerator::new(&config).compute_positions(&store);
        let points: Vec<Position> = layout.iter().map(|(_, p)| *p).collect();
        for i in 0..points.len() {
            for j in 0..i {
                assert!(points[i] != points[j]);
                assert!(points[i].distance(&points[j]) >= 0.5 - 1e-9 || i == j);
            }
        }
    }

    #[test]
    fn test_components_are_separated() {
        let assets = vec![
            equity("A1", Some("Tech")),
            equity("A2", Some("Tech")),
            equity("B1", Some("Energy")),
            equity("B2", Some("Energy")),
        ];
        let store = build(assets, Vec::new());
        let config = LayoutConfig::default();
        let layout = LayoutGenerator::new(&config).compute_positions(&store);
        let p = |id: &str| layout.get(id).unwrap();
        let within = p("A1").distance(&p("A2")).max(p("B1").distance(&p("B2")));
        let across = p("A1").distance(&p("B1"));
        assert!(across > within, "across {} within {}", across, within);
    }

    #[test]
    fn test_empty_graph_has_empty_layout() {
        let layout = LayoutGenerator::new(&LayoutConfig::default()).compute_positions(&GraphStore::new());
        assert!(layout.is_empty());
    }
}
