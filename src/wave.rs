use crate::grid::{Grid, Matrix};
use crate::math::linspace;

pub const WAVE_EXTENT: f64 = 3.0;

/// Interference of a centred radial wave with two off-centre sources,
/// sampled on `size x size` points over `[-3, 3]^2`. Row index is `y`.
pub fn wave_matrix(size: usize) -> Matrix {
    let axis = linspace(-WAVE_EXTENT, WAVE_EXTENT, size);
    Grid::from_fn(size, size, |row, col| wave_at(axis[col], axis[row]))
}

pub fn wave_at(x: f64, y: f64) -> f64 {
    let centre = x.hypot(y).sin() * x.cos() * y.cos();
    let upper = (2.0 * (x - 1.0).hypot(y - 1.0)).sin() * 0.5;
    let lower = (2.0 * (x + 1.0).hypot(y + 1.0)).sin() * 0.5;
    centre + upper + lower
}
