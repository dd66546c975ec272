/// Row-major 2-D array. Row `i` is the `i`-th vertical sample.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid<T> {
    width: usize,
    height: usize,
    data: Vec<T>,
}

/// Escape counts, one per sampled point.
pub type Field = Grid<u32>;

/// Real-valued matrix (adjacency, wave amplitude).
pub type Matrix = Grid<f64>;

impl<T> Grid<T> {
    /// Wraps `data` as a `height x width` grid; `None` if the length is wrong.
    pub fn from_vec(width: usize, height: usize, data: Vec<T>) -> Option<Self> {
        if data.len() != width * height {
            return None;
        }
        Some(Grid { width, height, data })
    }

    pub fn from_fn(width: usize, height: usize, mut f: impl FnMut(usize, usize) -> T) -> Self {
        let mut data = Vec::with_capacity(width * height);
        for row in 0..height {
            for col in 0..width {
                data.push(f(row, col));
            }
        }
        Grid { width, height, data }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// `(height, width)`, the usual matrix order.
    pub fn shape(&self) -> (usize, usize) {
        (self.height, self.width)
    }

    pub fn get(&self, row: usize, col: usize) -> Option<&T> {
        if row < self.height && col < self.width {
            self.data.get(row * self.width + col)
        } else {
            None
        }
    }

    pub fn row(&self, row: usize) -> &[T] {
        &self.data[row * self.width..(row + 1) * self.width]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[T]> {
        self.data.chunks_exact(self.width.max(1))
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn into_vec(self) -> Vec<T> {
        self.data
    }
}

impl<T: Copy + PartialOrd> Grid<T> {
    /// Smallest and largest entry, ignoring anything unordered (NaN).
    pub fn min_max(&self) -> Option<(T, T)> {
        let mut iter = self.data.iter().copied().filter(|v| v.partial_cmp(v).is_some());
        let first = iter.next()?;
        Some(iter.fold((first, first), |(lo, hi), v| {
            (if v < lo { v } else { lo }, if v > hi { v } else { hi })
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_fn_is_row_major() {
        let g = Grid::from_fn(3, 2, |r, c| r * 10 + c);
        assert_eq!(g.shape(), (2, 3));
        assert_eq!(g.as_slice(), &[0, 1, 2, 10, 11, 12]);
        assert_eq!(g.row(1), &[10, 11, 12]);
        assert_eq!(g.get(1, 2), Some(&12));
        assert_eq!(g.get(2, 0), None);
        assert_eq!(g.get(0, 3), None);
    }

    #[test]
    fn from_vec_checks_length() {
        assert!(Grid::from_vec(2, 2, vec![1, 2, 3]).is_none());
        assert!(Grid::from_vec(2, 2, vec![1, 2, 3, 4]).is_some());
    }

    #[test]
    fn min_max_skips_nan() {
        let g = Grid::from_vec(2, 2, vec![0.5, f64::NAN, -1.0, 3.0]).unwrap();
        assert_eq!(g.min_max(), Some((-1.0, 3.0)));
        let empty: Grid<f64> = Grid::from_vec(0, 0, vec![]).unwrap();
        assert_eq!(empty.min_max(), None);
    }
}
