//! Scalar trajectories of one-dimensional maps.
//!
//! Non-finite values are ordinary output here: an unstable map yields a
//! trajectory full of `inf`/`NaN` and that trajectory is returned as-is.

use crate::maps::IteratedMap;

pub type Sequence = Vec<f64>;

/// Iterate `map` from `seed` for exactly `n_steps` steps.
/// The result holds `n_steps + 1` states, seed first.
pub fn generate_sequence<M: IteratedMap + ?Sized>(map: &M, r: f64, seed: f64, n_steps: usize) -> Sequence {
    let mut values = Vec::with_capacity(n_steps + 1);
    let mut x = seed;
    values.push(x);
    for _ in 0..n_steps {
        x = map.advance(r, x);
        values.push(x);
    }
    values
}

/// Last state of `generate_sequence` without keeping the intermediate ones.
pub fn final_state<M: IteratedMap + ?Sized>(map: &M, r: f64, seed: f64, n_steps: usize) -> f64 {
    (0..n_steps).fold(seed, |x, _| map.advance(r, x))
}

/// Final state after `n_steps` for every seed, paired with the seed.
pub fn long_term_sweep<M: IteratedMap + ?Sized>(map: &M, r: f64, seeds: &[f64], n_steps: usize) -> Vec<(f64, f64)> {
    seeds.iter()
        .map(|&x0| (x0, final_state(map, r, x0, n_steps)))
        .collect()
}

/// One application of `map` at each sample, for plotting the map itself.
pub fn map_curve<M: IteratedMap + ?Sized>(map: &M, r: f64, xs: &[f64]) -> Vec<(f64, f64)> {
    xs.iter().map(|&x| (x, map.advance(r, x))).collect()
}
