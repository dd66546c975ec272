use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::{Result, invalid};
use crate::grid::{Grid, Matrix};

/// Undirected simple graph on nodes `0..n`.
#[derive(Clone, Debug, PartialEq)]
pub struct Graph {
    nodes: usize,
    edges: Vec<(usize, usize)>,
}

pub type Layout = Vec<(f64, f64)>;

impl Graph {
    /// G(n, p): every unordered pair is joined independently with probability `p`.
    /// The same `seed` always produces the same graph.
    pub fn erdos_renyi(nodes: usize, p: f64, seed: u64) -> Result<Self> {
        if !(0.0..=1.0).contains(&p) {
            return Err(invalid(format!("edge probability {} outside [0, 1]", p)));
        }
        let mut rng = StdRng::seed_from_u64(seed);
        let mut edges = Vec::new();
        for i in 0..nodes {
            for j in (i + 1)..nodes {
                if rng.gen_bool(p) {
                    edges.push((i, j));
                }
            }
        }
        Ok(Graph { nodes, edges })
    }

    pub fn node_count(&self) -> usize {
        self.nodes
    }

    pub fn edges(&self) -> &[(usize, usize)] {
        &self.edges
    }

    /// Symmetric 0/1 matrix, `n x n`.
    pub fn adjacency_matrix(&self) -> Matrix {
        let n = self.nodes;
        let mut linked = vec![false; n * n];
        for &(i, j) in &self.edges {
            linked[i * n + j] = true;
            linked[j * n + i] = true;
        }
        Grid::from_fn(n, n, |i, j| if linked[i * n + j] { 1.0 } else { 0.0 })
    }

    /// Nodes evenly spaced on the unit circle, node 0 at angle 0.
    pub fn circular_layout(&self) -> Layout {
        let n = self.nodes;
        if n == 1 {
            return vec![(0.0, 0.0)];
        }
        (0..n)
            .map(|i| {
                let theta = 2.0 * std::f64::consts::PI * i as f64 / n as f64;
                (theta.cos(), theta.sin())
            })
            .collect()
    }

    /// Fruchterman-Reingold force layout rescaled into `[-1, 1]^2`.
    ///
    /// `k` is the optimal edge length. Starting positions are drawn from
    /// `seed`; the temperature starts at a tenth of the initial spread and
    /// cools linearly over `iterations`.
    pub fn spring_layout(&self, k: f64, iterations: usize, seed: u64) -> Layout {
        let n = self.nodes;
        let mut rng = StdRng::seed_from_u64(seed);
        let mut pos: Vec<(f64, f64)> = (0..n)
            .map(|_| (rng.gen_range(0.0..1.0), rng.gen_range(0.0..1.0)))
            .collect();
        if n <= 1 {
            return vec![(0.0, 0.0); n];
        }

        let adj = self.adjacency_matrix();
        let spread = |pos: &[(f64, f64)], axis: fn(&(f64, f64)) -> f64| {
            let lo = pos.iter().map(axis).fold(f64::INFINITY, f64::min);
            let hi = pos.iter().map(axis).fold(f64::NEG_INFINITY, f64::max);
            hi - lo
        };
        let mut t = spread(&pos, |p| p.0).max(spread(&pos, |p| p.1)) * 0.1;
        let dt = t / (iterations + 1) as f64;

        for _ in 0..iterations {
            let mut disp = vec![(0.0, 0.0); n];
            for i in 0..n {
                for j in 0..n {
                    if i == j {
                        continue;
                    }
                    let dx = pos[i].0 - pos[j].0;
                    let dy = pos[i].1 - pos[j].1;
                    let dist = dx.hypot(dy).max(0.01);
                    let a = adj.as_slice()[i * n + j];
                    let force = k * k / (dist * dist) - a * dist / k;
                    disp[i].0 += dx * force;
                    disp[i].1 += dy * force;
                }
            }
            for (p, d) in pos.iter_mut().zip(&disp) {
                let len = d.0.hypot(d.1).max(0.01);
                p.0 += d.0 * t / len;
                p.1 += d.1 * t / len;
            }
            t -= dt;
        }

        rescale(pos)
    }
}

/// Center on the mean and scale so the largest coordinate magnitude is 1.
fn rescale(mut pos: Layout) -> Layout {
    let n = pos.len() as f64;
    let (mx, my) = pos.iter().fold((0.0, 0.0), |acc, p| (acc.0 + p.0, acc.1 + p.1));
    let (mx, my) = (mx / n, my / n);
    let mut lim: f64 = 0.0;
    for p in pos.iter_mut() {
        p.0 -= mx;
        p.1 -= my;
        lim = lim.max(p.0.abs()).max(p.1.abs());
    }
    if lim > 0.0 {
        for p in pos.iter_mut() {
            p.0 /= lim;
            p.1 /= lim;
        }
    }
    pos
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_graph() {
        let a = Graph::erdos_renyi(30, 0.15, 42).unwrap();
        let b = Graph::erdos_renyi(30, 0.15, 42).unwrap();
        assert_eq!(a, b);
        assert!(a.edges().iter().all(|&(i, j)| i < j && j < 30));
    }

    #[test]
    fn probability_extremes() {
        assert!(Graph::erdos_renyi(10, 0.0, 1).unwrap().edges().is_empty());
        assert_eq!(Graph::erdos_renyi(10, 1.0, 1).unwrap().edges().len(), 45);
        assert!(Graph::erdos_renyi(10, 1.5, 1).is_err());
        assert!(Graph::erdos_renyi(10, f64::NAN, 1).is_err());
    }

    #[test]
    fn adjacency_is_symmetric_with_empty_diagonal() {
        let g = Graph::erdos_renyi(12, 0.25, 42).unwrap();
        let m = g.adjacency_matrix();
        assert_eq!(m.shape(), (12, 12));
        for i in 0..12 {
            assert_eq!(m.get(i, i), Some(&0.0));
            for j in 0..12 {
                assert_eq!(m.get(i, j), m.get(j, i));
            }
        }
        let ones = m.as_slice().iter().filter(|&&v| v == 1.0).count();
        assert_eq!(ones, 2 * g.edges().len());
    }

    #[test]
    fn circular_layout_on_unit_circle() {
        let g = Graph::erdos_renyi(12, 0.25, 42).unwrap();
        let layout = g.circular_layout();
        assert_eq!(layout.len(), 12);
        assert!((layout[0].0 - 1.0).abs() < 1e-12);
        for (x, y) in layout {
            assert!((x.hypot(y) - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn spring_layout_fits_unit_box() {
        let g = Graph::erdos_renyi(30, 0.15, 42).unwrap();
        let layout = g.spring_layout(0.5, 50, 42);
        assert_eq!(layout.len(), 30);
        let lim = layout.iter().fold(0.0f64, |m, p| m.max(p.0.abs()).max(p.1.abs()));
        assert!((lim - 1.0).abs() < 1e-9);
        assert!(layout.iter().all(|p| p.0.is_finite() && p.1.is_finite()));
        assert_eq!(layout, g.spring_layout(0.5, 50, 42));
    }

    #[test]
    fn tiny_graphs_layout() {
        let g = Graph::erdos_renyi(1, 0.5, 0).unwrap();
        assert_eq!(g.spring_layout(0.5, 10, 0), vec![(0.0, 0.0)]);
        assert_eq!(g.circular_layout(), vec![(0.0, 0.0)]);
        let empty = Graph::erdos_renyi(0, 0.5, 0).unwrap();
        assert!(empty.spring_layout(0.5, 10, 0).is_empty());
        assert!(empty.circular_layout().is_empty());
    }
}
