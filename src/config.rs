use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, invalid};
use crate::fractal::View;

const MIN_PANEL: u32 = 64;
const MAX_PANEL: u32 = 8192;

/// Everything a batch run needs. Missing JSON keys take the defaults below.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub output_dir: PathBuf,
    pub views: Vec<View>,
    pub logistic: LogisticSettings,
    pub matrix: MatrixSettings,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            views: View::presets(),
            logistic: LogisticSettings::default(),
            matrix: MatrixSettings::default(),
        }
    }
}

/// One trajectory panel: where it starts and how long it runs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrajectorySettings {
    pub seed: f64,
    pub n_steps: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogisticSettings {
    pub r: f64,
    pub continuous: TrajectorySettings,
    pub floor: TrajectorySettings,
    /// Number of seeds spread over `[0, 1]` for the long-term panel.
    pub sweep_seeds: usize,
    pub sweep_steps: usize,
    /// Vertical window of the long-term panel; values outside are clipped when drawn.
    pub sweep_y_range: (f64, f64),
    pub curve_samples: usize,
    pub file: String,
    /// Pixel size of each of the four panels.
    pub panel_width: u32,
    pub panel_height: u32,
}

impl Default for LogisticSettings {
    fn default() -> Self {
        Self {
            r: 4.0,
            continuous: TrajectorySettings { seed: 0.4, n_steps: 50 },
            floor: TrajectorySettings { seed: 0.5, n_steps: 20 },
            sweep_seeds: 1000,
            sweep_steps: 1000,
            sweep_y_range: (-0.05, 0.05),
            curve_samples: 1000,
            file: "logistic_maps_comparison.png".to_string(),
            panel_width: 800,
            panel_height: 500,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatrixSettings {
    pub seed: u64,
    pub nodes: usize,
    pub edge_probability: f64,
    pub spring_k: f64,
    pub spring_iterations: usize,
    pub circular_nodes: usize,
    pub circular_edge_probability: f64,
    pub wave_size: usize,
    pub file: String,
    pub panel_size: u32,
}

impl Default for MatrixSettings {
    fn default() -> Self {
        Self {
            seed: 42,
            nodes: 30,
            edge_probability: 0.15,
            spring_k: 0.5,
            spring_iterations: 50,
            circular_nodes: 12,
            circular_edge_probability: 0.25,
            wave_size: 100,
            file: "matrix_graph_visualizations.png".to_string(),
            panel_size: 800,
        }
    }
}

impl RenderConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        let config: RenderConfig = serde_json::from_str(&text)?;
        Ok(config)
    }

    /// Multiply every view's sample counts by `factor`.
    pub fn scaled(mut self, factor: f64) -> Result<Self> {
        if !(factor.is_finite() && factor > 0.0) {
            return Err(invalid(format!("scale factor {} must be positive", factor)));
        }
        for view in &mut self.views {
            view.region = view.region.scaled(factor);
        }
        Ok(self)
    }

    /// Reject bad settings before any job starts.
    pub fn validate(&self) -> Result<()> {
        for view in &self.views {
            view.validate()?;
        }

        let l = &self.logistic;
        if l.sweep_seeds == 0 || l.curve_samples < 2 {
            return Err(invalid("logistic sweep needs seeds and the curve at least two samples"));
        }
        if !(l.sweep_y_range.0 < l.sweep_y_range.1) {
            return Err(invalid(format!("sweep y range {:?} is empty", l.sweep_y_range)));
        }
        if !(MIN_PANEL..=MAX_PANEL).contains(&l.panel_width) || !(MIN_PANEL..=MAX_PANEL).contains(&l.panel_height) {
            return Err(invalid(format!("logistic panels must be {}..={} pixels per edge", MIN_PANEL, MAX_PANEL)));
        }

        let m = &self.matrix;
        for p in [m.edge_probability, m.circular_edge_probability] {
            if !(0.0..=1.0).contains(&p) {
                return Err(invalid(format!("edge probability {} outside [0, 1]", p)));
            }
        }
        if m.nodes == 0 || m.circular_nodes == 0 || m.wave_size == 0 {
            return Err(invalid("graph and wave sizes must be positive"));
        }
        if !(m.spring_k > 0.0) {
            return Err(invalid("spring_k must be positive"));
        }
        if !(MIN_PANEL..=MAX_PANEL).contains(&m.panel_size) {
            return Err(invalid(format!("matrix panels must be {}..={} pixels", MIN_PANEL, MAX_PANEL)));
        }
        Ok(())
    }
}
