//! Fruchterman–Reingold relaxation in three dimensions.
//!
//! The simulation is fully deterministic: nodes and links are visited in the
//! order given, and the cooling schedule depends only on the iteration count.

/// Smallest distance used when two points coincide.
const EPSILON: f64 = 1e-6;

#[derive(Debug, Clone, Copy)]
pub struct ForceParams {
    pub iterations: usize,
    /// Ideal link length `k`.
    pub ideal_distance: f64,
}

/// A link between two local node indices. `weight` scales attraction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Link {
    pub a: usize,
    pub b: usize,
    pub weight: f64,
}

/// Relaxes `positions` in place.
///
/// Repulsion `k²/d` acts between every pair, attraction `w·d²/k` along each
/// link. Displacement per step is capped by a linearly cooling temperature.
pub fn relax(positions: &mut [[f64; 3]], links: &[Link], params: &ForceParams) {
    let n = positions.len();
    if n < 2 || params.iterations == 0 {
        return;
    }
    let k = params.ideal_distance;
    let k2 = k * k;
    let initial_temperature = k;
    let mut displacement = vec![[0.0f64; 3]; n];

    for step in 0..params.iterations {
        for d in displacement.iter_mut() {
            *d = [0.0; 3];
        }

        // Repulsion
        for i in 0..n {
            for j in (i + 1)..n {
                let (delta, dist) = separation(&positions[i], &positions[j]);
                let force = k2 / dist;
                for axis in 0..3 {
                    let f = delta[axis] / dist * force;
                    displacement[i][axis] += f;
                    displacement[j][axis] -= f;
                }
            }
        }

        // Attraction
        for link in links {
            let (delta, dist) = separation(&positions[link.a], &positions[link.b]);
            let force = link.weight * dist * dist / k;
            for axis in 0..3 {
                let f = delta[axis] / dist * force;
                displacement[link.a][axis] -= f;
                displacement[link.b][axis] += f;
            }
        }

        let temperature = initial_temperature * (1.0 - step as f64 / params.iterations as f64) + EPSILON;
        for (p, d) in positions.iter_mut().zip(&displacement) {
            let len = (d[0] * d[0] + d[1] * d[1] + d[2] * d[2]).sqrt();
            if !len.is_finite() || len < EPSILON {
                continue;
            }
            let scale = len.min(temperature) / len;
            for axis in 0..3 {
                p[axis] += d[axis] * scale;
            }
        }
    }
}

/// `a - b` and its length, with coincident points nudged apart along x.
fn separation(a: &[f64; 3], b: &[f64; 3]) -> ([f64; 3], f64) {
    let delta = [a[0] - b[0], a[1] - b[1], a[2] - b[2]];
    let dist = (delta[0] * delta[0] + delta[1] * delta[1] + delta[2] * delta[2]).sqrt();
    if dist < EPSILON {
        ([EPSILON, 0.0, 0.0], EPSILON)
    } else {
        (delta, dist)
    }
}

/// Translates points so their centroid sits at the origin.
pub fn recenter(positions: &mut [[f64; 3]]) {
    if positions.is_empty() {
        return;
    }
    let n = positions.len() as f64;
    let mut centroid = [0.0; 3];
    for p in positions.iter() {
        for axis in 0..3 {
            centroid[axis] += p[axis] / n;
        }
    }
    for p in positions.iter_mut() {
        for axis in 0..3 {
            p[axis] -= centroid[axis];
        }
    }
}

/// Largest distance of any point from the origin.
pub fn radius(positions: &[[f64; 3]]) -> f64 {
    positions
        .iter()
        .map(|p| (p[0] * p[0] + p[1] * p[1] + p[2] * p[2]).sqrt())
        .fold(0.0, f64::max)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dist(a: &[f64; 3], b: &[f64; 3]) -> f64 {
        separation(a, b).1
    }

    #[test]
    fn test_linked_pair_settles_near_ideal_distance() {
        let mut positions = vec![[0.0, 0.0, 0.0], [30.0, 0.0, 0.0]];
        let links = [Link { a: 0, b: 1, weight: 1.0 }];
        relax(&mut positions, &links, &ForceParams { iterations: 300, ideal_distance: 5.0 });
        let d = dist(&positions[0], &positions[1]);
        // Equilibrium of k²/d = d²/k is d = k.
        assert!((d - 5.0).abs() < 0.5, "distance {}", d);
    }

    #[test]
    fn test_unlinked_nodes_push_apart() {
        let mut positions = vec![[0.0, 0.0, 0.0], [0.1, 0.0, 0.0], [0.0, 0.1, 0.0]];
        relax(&mut positions, &[], &ForceParams { iterations: 50, ideal_distance: 5.0 });
        assert!(dist(&positions[0], &positions[1]) > 1.0);
        assert!(positions.iter().flatten().all(|v| v.is_finite()));
    }

    #[test]
    fn test_relax_is_deterministic() {
        let start = vec![[1.0, 2.0, 3.0], [-1.0, 0.5, 0.0], [0.0, -2.0, 1.0], [4.0, 4.0, -4.0]];
        let links = [Link { a: 0, b: 1, weight: 1.0 }, Link { a: 2, b: 3, weight: 2.0 }];
        let params = ForceParams { iterations: 80, ideal_distance: 3.0 };
        let mut a = start.clone();
        let mut b = start;
        relax(&mut a, &links, &params);
        relax(&mut b, &links, &params);
        assert_eq!(a, b);
    }

    #[test]
    fn test_recenter_and_radius() {
        let mut positions = vec![[2.0, 0.0, 0.0], [4.0, 0.0, 0.0]];
        recenter(&mut positions);
        assert_eq!(positions, vec![[-1.0, 0.0, 0.0], [1.0, 0.0, 0.0]]);
        assert_eq!(radius(&positions), 1.0);
    }
}
