//! Escape-time evaluation over a sampled rectangle of the complex plane.
//!
//! Every grid point runs its own trajectory from `Recurrence::initial`,
//! testing `Recurrence::diverged` before each step. The first step at
//! which the test holds is recorded; points that never diverge record the
//! iteration cap. Rows are independent, so they are evaluated in parallel
//! and each worker writes only its own row.

use std::time::Instant;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, invalid};
use crate::grid::{Field, Grid};
use crate::math::{C, linspace};

const ESCAPE_RADIUS: f64 = 2.0;

/// Largest grid a single field may allocate.
pub const MAX_SAMPLES: usize = 1 << 28;

/// Largest edge of a saved view image.
pub const MAX_OUTPUT_WIDTH: u32 = 16_384;

/// State update plus divergence predicate for one sample point `c`.
pub trait Recurrence: Sync {
    fn initial(&self, c: C) -> C;
    fn next(&self, z: C, c: C) -> C;
    fn diverged(&self, z: C) -> bool;
}

/// `z <- z^2 + c` from `z = 0`: the Mandelbrot set.
#[derive(Clone, Copy, Debug, Default)]
pub struct Quadratic;

impl Recurrence for Quadratic {
    fn initial(&self, _c: C) -> C {
        C::ZERO
    }

    fn next(&self, z: C, c: C) -> C {
        z.square().add(c)
    }

    fn diverged(&self, z: C) -> bool {
        z.abs() > ESCAPE_RADIUS
    }
}

/// `z <- z^2 + k` from `z = c`: the filled Julia set of `k`.
#[derive(Clone, Copy, Debug)]
pub struct Julia {
    pub k: C,
}

impl Recurrence for Julia {
    fn initial(&self, c: C) -> C {
        c
    }

    fn next(&self, z: C, _c: C) -> C {
        z.square().add(self.k)
    }

    fn diverged(&self, z: C) -> bool {
        z.abs() > ESCAPE_RADIUS
    }
}

/// Rectangle `[xmin, xmax] x [ymin, ymax]` sampled on a `width x height` grid.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub xmin: f64,
    pub xmax: f64,
    pub ymin: f64,
    pub ymax: f64,
    pub width: usize,
    pub height: usize,
}

impl Region {
    pub fn new(xmin: f64, xmax: f64, ymin: f64, ymax: f64, width: usize, height: usize) -> Self {
        Region { xmin, xmax, ymin, ymax, width, height }
    }

    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(invalid(format!(
                "grid must be at least 1x1, got {}x{}", self.width, self.height
            )));
        }
        match self.width.checked_mul(self.height) {
            Some(n) if n <= MAX_SAMPLES => {}
            _ => {
                return Err(invalid(format!(
                    "grid {}x{} exceeds {} samples", self.width, self.height, MAX_SAMPLES
                )));
            }
        }
        // Negated comparisons so NaN bounds are rejected too.
        if !(self.xmin < self.xmax) {
            return Err(invalid(format!("xmin {} must be below xmax {}", self.xmin, self.xmax)));
        }
        if !(self.ymin < self.ymax) {
            return Err(invalid(format!("ymin {} must be below ymax {}", self.ymin, self.ymax)));
        }
        Ok(())
    }

    /// Same rectangle, sample counts multiplied by `factor` (at least 1).
    pub fn scaled(&self, factor: f64) -> Self {
        let scale = |n: usize| ((n as f64 * factor).round() as usize).max(1);
        Region { width: scale(self.width), height: scale(self.height), ..*self }
    }

    /// Horizontal samples; these index the real part.
    pub fn xs(&self) -> Vec<f64> {
        linspace(self.xmin, self.xmax, self.width)
    }

    /// Vertical samples; these index the imaginary part.
    pub fn ys(&self) -> Vec<f64> {
        linspace(self.ymin, self.ymax, self.height)
    }
}

/// Step at which `recurrence` first diverges for `c`, or `max_iter`.
pub fn escape_time<R: Recurrence + ?Sized>(recurrence: &R, c: C, max_iter: u32) -> u32 {
    let mut z = recurrence.initial(c);
    for step in 0..max_iter {
        if recurrence.diverged(z) {
            return step;
        }
        z = recurrence.next(z, c);
    }
    max_iter
}

fn check_config(region: &Region, max_iter: u32) -> Result<()> {
    if max_iter == 0 {
        return Err(invalid("max_iter must be positive"));
    }
    region.validate()
}

/// Escape-count field of shape `(height, width)`, rows evaluated in parallel.
pub fn escape_field<R: Recurrence + ?Sized>(recurrence: &R, region: &Region, max_iter: u32) -> Result<Field> {
    check_config(region, max_iter)?;
    let started = Instant::now();

    let xs = region.xs();
    let ys = region.ys();
    let mut data = vec![0u32; region.width * region.height];

    data.par_chunks_mut(region.width)
        .zip(ys.par_iter())
        .for_each(|(row, &y)| {
            for (cell, &x) in row.iter_mut().zip(&xs) {
                *cell = escape_time(recurrence, C::new(x, y), max_iter);
            }
        });

    debug!(
        width = region.width,
        height = region.height,
        max_iter,
        elapsed = ?started.elapsed(),
        "escape field computed"
    );

    Grid::from_vec(region.width, region.height, data)
        .ok_or_else(|| invalid("field buffer does not match region size"))
}

/// Same result as `escape_field`, computed on the calling thread.
pub fn escape_field_sequential<R: Recurrence + ?Sized>(recurrence: &R, region: &Region, max_iter: u32) -> Result<Field> {
    check_config(region, max_iter)?;
    let xs = region.xs();
    let ys = region.ys();
    Ok(Grid::from_fn(region.width, region.height, |i, j| {
        escape_time(recurrence, C::new(xs[j], ys[i]), max_iter)
    }))
}

/// Mandelbrot escape counts over `region`.
pub fn generate_field(region: &Region, max_iter: u32) -> Result<Field> {
    escape_field(&Quadratic, region, max_iter)
}

/// A named region with its own iteration budget and output file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct View {
    pub name: String,
    pub region: Region,
    pub max_iter: u32,
    pub file: String,
    /// Width of the saved image, resampled bilinearly; the height keeps the
    /// grid's aspect. `None` saves one pixel per sample.
    #[serde(default)]
    pub output_width: Option<u32>,
}

const PRESET_OUTPUT_WIDTH: u32 = 1500;

impl View {
    fn preset(name: &str, bounds: [f64; 4], size: usize, max_iter: u32) -> Self {
        let [xmin, xmax, ymin, ymax] = bounds;
        View {
            name: name.to_string(),
            region: Region::new(xmin, xmax, ymin, ymax, size, size),
            max_iter,
            file: format!("mandelbrot_{}.png", name),
            output_width: Some(PRESET_OUTPUT_WIDTH),
        }
    }

    pub fn full() -> Self {
        View::preset("full", [-2.5, 1.5, -2.0, 2.0], 800, 256)
    }

    /// Edge detail above the main cardioid.
    pub fn zoom1() -> Self {
        View::preset("zoom1", [-0.8, 0.2, -0.2, 0.8], 800, 512)
    }

    /// Deep zoom into the seahorse valley.
    pub fn zoom2() -> Self {
        View::preset("zoom2", [-0.7, -0.4, -0.15, 0.15], 800, 1024)
    }

    /// Main cardioid and period-2 bulb.
    pub fn classic() -> Self {
        View::preset("classic", [-2.0, 0.5, -1.25, 1.25], 1000, 256)
    }

    pub fn presets() -> Vec<View> {
        vec![View::full(), View::zoom1(), View::zoom2(), View::classic()]
    }

    pub fn validate(&self) -> Result<()> {
        check_config(&self.region, self.max_iter).map_err(|e| invalid(format!("view '{}': {}", self.name, e)))?;
        if self.output_width.is_some() {
            let (w, h) = self.output_size();
            if w == 0 || w > MAX_OUTPUT_WIDTH || h > MAX_OUTPUT_WIDTH {
                return Err(invalid(format!(
                    "view '{}': output {}x{} outside 1..={} pixels per edge", self.name, w, h, MAX_OUTPUT_WIDTH
                )));
            }
        }
        Ok(())
    }

    /// Saved image size: `output_width` wide with the grid's aspect, or the grid itself.
    pub fn output_size(&self) -> (u32, u32) {
        let (w, h) = (self.region.width as f64, self.region.height as f64);
        match self.output_width {
            Some(out) => (out, ((out as f64 * h / w).round() as u32).max(1)),
            None => (self.region.width as u32, self.region.height as u32),
        }
    }

    pub fn field(&self) -> Result<Field> {
        generate_field(&self.region, self.max_iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn small(width: usize, height: usize) -> Region {
        Region::new(-2.0, 1.0, -1.5, 1.5, width, height)
    }

    #[test]
    fn divergence_is_checked_before_stepping() {
        // z: 0 -> 3, and |3| > 2 is seen at the start of step 1.
        assert_eq!(escape_time(&Quadratic, C::new(3.0, 0.0), 100), 1);
        // z: 0 -> 2 -> 6; |2| is not > 2, so the escape is step 2.
        assert_eq!(escape_time(&Quadratic, C::new(2.0, 0.0), 100), 2);
        assert_eq!(escape_time(&Quadratic, C::new(-2.0, 0.0), 100), 100);
    }

    #[test]
    fn cap_of_one_records_zero_or_one() {
        assert_eq!(escape_time(&Quadratic, C::new(5.0, 5.0), 1), 1);
        assert_eq!(escape_time(&Julia { k: C::ZERO }, C::new(5.0, 0.0), 1), 0);
    }

    #[test]
    fn julia_starts_from_the_sample() {
        let j = Julia { k: C::ZERO };
        // z = 0.5 squares towards 0 forever.
        assert_eq!(escape_time(&j, C::new(0.5, 0.0), 64), 64);
        // z: 1.5 -> 2.25
        assert_eq!(escape_time(&j, C::new(1.5, 0.0), 64), 1);
    }

    #[test]
    fn rows_follow_imaginary_axis() {
        let region = Region::new(-0.1, 0.1, 1.0, 3.0, 3, 3);
        let field = generate_field(&region, 20).unwrap();
        // Top row has |c| ~ 1, bottom row |c| ~ 3 escapes on step 1.
        assert!(field.row(2).iter().all(|&v| v == 1));
        assert!(field.row(0).iter().all(|&v| v > 1));
    }

    #[test]
    fn parallel_and_sequential_agree() {
        let region = small(37, 23);
        let a = escape_field(&Quadratic, &region, 80).unwrap();
        let b = escape_field_sequential(&Quadratic, &region, 80).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn single_sample_uses_lower_bounds() {
        let region = Region::new(0.0, 1.0, 0.0, 1.0, 1, 1);
        let field = generate_field(&region, 50).unwrap();
        assert_eq!(field.as_slice(), &[50]);
    }

    #[test]
    fn rejects_bad_configuration() {
        for (region, max_iter) in [
            (small(0, 10), 10),
            (small(10, 0), 10),
            (small(10, 10), 0),
            (Region::new(1.0, 1.0, 0.0, 1.0, 4, 4), 10),
            (Region::new(0.0, 1.0, 2.0, -2.0, 4, 4), 10),
            (Region::new(f64::NAN, 1.0, 0.0, 1.0, 4, 4), 10),
        ] {
            assert!(matches!(
                generate_field(&region, max_iter),
                Err(Error::InvalidConfiguration(_))
            ));
            assert!(matches!(
                escape_field_sequential(&Quadratic, &region, max_iter),
                Err(Error::InvalidConfiguration(_))
            ));
        }
    }

    #[test]
    fn oversized_grid_is_rejected_before_allocating() {
        let huge = Region::new(-2.0, 1.0, -1.0, 1.0, usize::MAX / 2, 4);
        assert!(matches!(huge.validate(), Err(Error::InvalidConfiguration(_))));
        assert!(matches!(generate_field(&huge, 10), Err(Error::InvalidConfiguration(_))));
        assert!(matches!(
            escape_field_sequential(&Quadratic, &huge, 10),
            Err(Error::InvalidConfiguration(_))
        ));
        let over_cap = Region::new(-2.0, 1.0, -1.0, 1.0, MAX_SAMPLES / 2 + 1, 2);
        assert!(over_cap.validate().is_err());
        let at_cap = Region::new(-2.0, 1.0, -1.0, 1.0, MAX_SAMPLES / 2, 2);
        assert!(at_cap.validate().is_ok());
    }

    #[test]
    fn huge_scale_factor_fails_validation() {
        let scaled = View::full().region.scaled(1e12);
        assert!(scaled.validate().is_err());
    }

    #[test]
    fn output_size_keeps_aspect() {
        let mut view = View::full();
        assert_eq!(view.output_size(), (1500, 1500));
        view.region = Region::new(-2.0, 1.0, -1.0, 1.0, 300, 200);
        assert_eq!(view.output_size(), (1500, 1000));
        view.output_width = None;
        assert_eq!(view.output_size(), (300, 200));
        view.output_width = Some(0);
        assert!(view.validate().is_err());
    }

    #[test]
    fn scaled_keeps_at_least_one_sample() {
        let r = small(800, 600).scaled(0.25);
        assert_eq!((r.width, r.height), (200, 150));
        let tiny = small(2, 2).scaled(0.01);
        assert_eq!((tiny.width, tiny.height), (1, 1));
    }

    #[test]
    fn presets_are_valid() {
        let views = View::presets();
        assert_eq!(views.len(), 4);
        for view in &views {
            view.validate().unwrap();
            assert!(view.max_iter > 0);
        }
        assert_eq!(views[2].max_iter, 1024);
        assert_eq!(views[3].region.width, 1000);
        assert_eq!(views[0].file, "mandelbrot_full.png");
    }
}
