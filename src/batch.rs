//! The three batch jobs: logistic-map panels, Mandelbrot views and the
//! matrix/graph panels. Each computes its data with the engine, draws it
//! and writes one PNG per figure into `RenderConfig::output_dir`.

use std::fs;
use std::path::PathBuf;

use image::RgbImage;
use tracing::{info, warn};

use crate::config::{LogisticSettings, MatrixSettings, RenderConfig, TrajectorySettings};
use crate::error::{Result, invalid};
use crate::fractal::View;
use crate::graph::Graph;
use crate::maps::LogisticMap;
use crate::math::linspace;
use crate::render::{self, Axes, BLACK, BLUE, Colormap, GRAY, Mark, RED, Series, Theme, WHITE};
use crate::sequence::{generate_sequence, long_term_sweep, map_curve};
use crate::wave::{WAVE_EXTENT, wave_matrix};

pub fn run_all(config: &RenderConfig) -> Result<Vec<PathBuf>> {
    config.validate()?;
    let mut written = vec![render_logistic(config)?];
    written.extend(render_mandelbrot(config, None)?);
    written.push(render_matrix(config)?);
    Ok(written)
}

fn output_path(config: &RenderConfig, file: &str) -> Result<PathBuf> {
    fs::create_dir_all(&config.output_dir)?;
    Ok(config.output_dir.join(file))
}

/// Auto-scaled axis over the finite values with a 5% margin.
fn padded_range(values: impl IntoIterator<Item = f64>) -> (f64, f64) {
    let (lo, hi) = values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
    if lo > hi {
        return (0.0, 1.0);
    }
    // Keep the span representable; anything beyond is left out of view.
    let (lo, hi) = (lo.max(f64::MIN / 4.0), hi.min(f64::MAX / 4.0));
    if lo == hi {
        let half = (lo.abs() * 0.05).max(0.5);
        return (lo - half, hi + half);
    }
    let pad = (hi - lo) * 0.05;
    (lo - pad, hi + pad)
}

fn indexed(values: &[f64]) -> Vec<(f64, f64)> {
    values.iter().enumerate().map(|(i, &v)| (i as f64, v)).collect()
}

/// One chart of a figure: its axes and the series drawn on them.
#[derive(Clone, Debug, PartialEq)]
pub struct Panel {
    pub axes: Axes,
    pub series: Vec<Series>,
}

fn trajectory_panel(
    settings: &LogisticSettings,
    caption: String,
    map: LogisticMap,
    traj: TrajectorySettings,
    color: [u8; 3],
    marker: u32,
) -> Panel {
    let seq = generate_sequence(&map, settings.r, traj.seed, traj.n_steps);
    let points = indexed(&seq);
    let axes = Axes::new(
        caption,
        "Iteration",
        "x_n",
        padded_range(points.iter().map(|p| p.0)),
        padded_range(seq.iter().copied()),
    );
    Panel {
        axes,
        series: vec![
            Series::new(points.clone(), Mark::Line { width: 1 }, color),
            Series::new(points, Mark::Markers { radius: marker }, color),
        ],
    }
}

/// The four logistic panels: continuous and floor trajectories, the
/// floor map's long-term values per seed, and both maps against `y = x`.
pub fn logistic_panels(settings: &LogisticSettings) -> [Panel; 4] {
    let r = settings.r;
    let continuous = trajectory_panel(
        settings,
        format!("Continuous Logistic Map (r={}, x₀={})", r, settings.continuous.seed),
        LogisticMap::Continuous,
        settings.continuous,
        BLUE,
        2,
    );
    let floor = trajectory_panel(
        settings,
        format!("Floor-Logistic Map (r={}, x₀={})", r, settings.floor.seed),
        LogisticMap::Floor,
        settings.floor,
        RED,
        4,
    );

    let seeds = linspace(0.0, 1.0, settings.sweep_seeds);
    let sweep = long_term_sweep(&LogisticMap::Floor, r, &seeds, settings.sweep_steps);
    let non_finite = sweep.iter().filter(|(_, y)| !y.is_finite()).count();
    if non_finite > 0 {
        warn!(non_finite, "long-term sweep produced non-finite values, they are not drawn");
    }
    let long_term = Panel {
        axes: Axes::new(
            "Floor-Logistic Map: Long-term Behavior",
            "Initial Condition x₀",
            "Long-term Values",
            padded_range([0.0, 1.0]),
            settings.sweep_y_range,
        ),
        series: vec![Series::new(sweep, Mark::Markers { radius: 1 }, BLACK)],
    };

    let xs = linspace(0.0, 1.0, settings.curve_samples);
    let smooth = map_curve(&LogisticMap::Continuous, r, &xs);
    let stepped = map_curve(&LogisticMap::Floor, r, &xs);
    let identity: Vec<(f64, f64)> = xs.iter().map(|&x| (x, x)).collect();
    let y_range = padded_range(smooth.iter().chain(&stepped).chain(&identity).map(|p| p.1));
    let comparison = Panel {
        axes: Axes::new("Map Functions Comparison", "x_n", "x_{n+1}", padded_range([0.0, 1.0]), y_range),
        series: vec![
            Series::new(smooth, Mark::Line { width: 2 }, BLUE).labelled(format!("Continuous: {}x(1-x)", r)),
            Series::new(stepped, Mark::Line { width: 2 }, RED).labelled("Floor: ⌊4x(1-x)⌋"),
            Series::new(identity, Mark::Dashed { dash: 6 }, GRAY).labelled("y=x"),
        ],
    };

    [continuous, floor, long_term, comparison]
}

/// The 2x2 logistic figure on white.
pub fn logistic_figure(settings: &LogisticSettings) -> Result<RgbImage> {
    let panels = logistic_panels(settings)
        .iter()
        .map(|p| render::chart(settings.panel_width, settings.panel_height, &p.axes, &p.series, Theme::LIGHT))
        .collect::<Result<Vec<_>>>()?;
    Ok(render::compose(&panels, 2, WHITE))
}

pub fn render_logistic(config: &RenderConfig) -> Result<PathBuf> {
    let settings = &config.logistic;
    info!(r = settings.r, sweep_seeds = settings.sweep_seeds, "rendering logistic maps");
    let figure = logistic_figure(settings)?;
    let path = output_path(config, &settings.file)?;
    render::save_png(&figure, &path)?;
    Ok(path)
}

/// Escape counts colored and resampled to the view's output size.
pub fn mandelbrot_image(view: &View, cmap: &Colormap) -> Result<RgbImage> {
    view.validate()?;
    let img = render::heatmap(&view.field()?, cmap);
    let (width, height) = view.output_size();
    if img.dimensions() == (width, height) {
        return Ok(img);
    }
    Ok(render::resize(&img, width, height, true))
}

/// Every configured view, or only the one called `only`.
pub fn render_mandelbrot(config: &RenderConfig, only: Option<&str>) -> Result<Vec<PathBuf>> {
    let views: Vec<&View> = config
        .views
        .iter()
        .filter(|v| only.is_none_or(|name| v.name == name))
        .collect();
    if let (Some(name), true) = (only, views.is_empty()) {
        return Err(invalid(format!("no view named '{}'", name)));
    }

    let cmap = Colormap::mandelbrot();
    let mut written = Vec::with_capacity(views.len());
    for view in views {
        info!(
            view = %view.name,
            width = view.region.width,
            height = view.region.height,
            max_iter = view.max_iter,
            "generating mandelbrot"
        );
        let img = mandelbrot_image(view, &cmap)?;
        let path = output_path(config, &view.file)?;
        render::save_png(&img, &path)?;
        written.push(path);
    }
    Ok(written)
}

/// The 2x2 matrix figure on black: adjacency matrix, spring-layout
/// graph, wave interference matrix, circular-layout graph.
pub fn matrix_figure(settings: &MatrixSettings) -> Result<RgbImage> {
    let size = settings.panel_size;
    if size < 64 {
        return Err(invalid(format!("matrix panel size {} is below 64 pixels", size)));
    }
    let greens = Colormap::greens();

    let graph = Graph::erdos_renyi(settings.nodes, settings.edge_probability, settings.seed)?;
    let n = graph.node_count() as f64;
    let adjacency = render::matrix_chart(
        size,
        size,
        &Axes::new("Adjacency Matrix", "Node j", "Node i", (0.0, n), (0.0, n)),
        &graph.adjacency_matrix(),
        &greens,
        Theme::DARK,
        true,
    )?;

    let spring = graph.spring_layout(settings.spring_k, settings.spring_iterations, settings.seed);
    let spring_img = render::graph_chart(size, "Network Graph Structure", &graph, &spring, (size / 80).max(2), false, Theme::DARK)?;

    let wave = render::matrix_chart(
        size,
        size,
        &Axes::new("Wave Function Matrix", "x", "y", (-WAVE_EXTENT, WAVE_EXTENT), (-WAVE_EXTENT, WAVE_EXTENT)),
        &wave_matrix(settings.wave_size),
        &greens,
        Theme::DARK,
        false,
    )?;

    let small = Graph::erdos_renyi(settings.circular_nodes, settings.circular_edge_probability, settings.seed)?;
    let circle_img = render::graph_chart(
        size,
        "Circular Correlation Graph",
        &small,
        &small.circular_layout(),
        (size / 40).max(3),
        true,
        Theme::DARK,
    )?;

    info!(
        nodes = graph.node_count(),
        edges = graph.edges().len(),
        circular_edges = small.edges().len(),
        "rendering matrix and graph panels"
    );

    let grid = render::compose(&[adjacency, spring_img, wave, circle_img], 2, BLACK);
    render::titled(&grid, "Matrix Graph Visualizations", (size / 20).max(10), Theme::DARK)
}

pub fn render_matrix(config: &RenderConfig) -> Result<PathBuf> {
    let figure = matrix_figure(&config.matrix)?;
    let path = output_path(config, &config.matrix.file)?;
    render::save_png(&figure, &path)?;
    Ok(path)
}
