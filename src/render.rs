//! Raster output. Colormaps and heatmaps work on raw pixels; axis charts,
//! matrix panels and graph drawings go through plotters into an
//! in-memory RGB buffer so panels can be composed before saving.

use std::path::Path;

use image::{Rgb, RgbImage, imageops};
use plotters::coord::Shift;
use plotters::prelude::{
    BitMapBackend, ChartBuilder, Circle, DashedLineSeries, DrawingArea, IntoDrawingArea, IntoFont,
    LineSeries, PathElement, RGBColor, Rectangle, SeriesLabelPosition, Text, TextStyle,
};
use plotters::style::Color as _;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use tracing::info;

use crate::error::{Result, invalid};
use crate::graph::{Graph, Layout};
use crate::grid::Grid;

pub type Color = [u8; 3];

pub const BLACK: Color = [0, 0, 0];
pub const WHITE: Color = [255, 255, 255];
pub const LIME: Color = [0, 255, 0];
pub const RED: Color = [255, 0, 0];
pub const GRAY: Color = [128, 128, 128];
pub const LIGHT_GRAY: Color = [225, 225, 225];
pub const BLUE: Color = [31, 119, 180];

const FONT: &str = "sans-serif";

/// Lookup table built by linear interpolation between evenly spaced stops.
#[derive(Clone, Debug)]
pub struct Colormap {
    lut: Vec<Color>,
}

impl Colormap {
    pub fn from_stops(stops: &[Color], bins: usize) -> Self {
        let bins = bins.max(2);
        let lut = match stops {
            [] => vec![BLACK; bins],
            [only] => vec![*only; bins],
            _ => (0..bins)
                .map(|i| {
                    let pos = i as f64 / (bins - 1) as f64 * (stops.len() - 1) as f64;
                    let lo = (pos.floor() as usize).min(stops.len() - 2);
                    let frac = pos - lo as f64;
                    let (a, b) = (stops[lo], stops[lo + 1]);
                    let mix = |k: usize| (a[k] as f64 + (b[k] as f64 - a[k] as f64) * frac).round() as u8;
                    [mix(0), mix(1), mix(2)]
                })
                .collect(),
        };
        Colormap { lut }
    }

    /// black, dark blue, blue, cyan, yellow, white over 256 bins
    pub fn mandelbrot() -> Self {
        Colormap::from_stops(
            &[BLACK, [0, 0, 139], [0, 0, 255], [0, 255, 255], [255, 255, 0], WHITE],
            256,
        )
    }

    /// Sequential white-to-dark-green.
    pub fn greens() -> Self {
        Colormap::from_stops(
            &[
                [247, 252, 245], [229, 245, 224], [199, 233, 192],
                [161, 217, 155], [116, 196, 118], [65, 171, 93],
                [35, 139, 69], [0, 109, 44], [0, 68, 27],
            ],
            256,
        )
    }

    pub fn len(&self) -> usize {
        self.lut.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lut.is_empty()
    }

    /// Color for `t` in `[0, 1]`; out-of-range values clamp, NaN maps to the low end.
    pub fn color(&self, t: f64) -> Color {
        let n = self.lut.len();
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let idx = ((t * n as f64) as usize).min(n - 1);
        self.lut[idx]
    }
}

/// Row-major cell colors normalised between the grid's min and max.
/// Unordered cells (NaN) are black.
fn cell_colors<T>(grid: &Grid<T>, cmap: &Colormap) -> Vec<Color>
where
    T: Copy + PartialOrd + Into<f64>,
{
    let (lo, hi): (f64, f64) = match grid.min_max() {
        Some((lo, hi)) => (lo.into(), hi.into()),
        None => (0.0, 1.0),
    };
    let span = hi - lo;
    grid.as_slice()
        .iter()
        .map(|&v| {
            let v: f64 = v.into();
            if v.is_nan() {
                return BLACK;
            }
            let t = if span > 0.0 { (v - lo) / span } else { 0.0 };
            cmap.color(t)
        })
        .collect()
}

/// One pixel per cell, row 0 on top.
pub fn heatmap<T>(grid: &Grid<T>, cmap: &Colormap) -> RgbImage
where
    T: Copy + PartialOrd + Into<f64>,
{
    let colors = cell_colors(grid, cmap);
    let width = grid.width();
    RgbImage::from_fn(width as u32, grid.height() as u32, |x, y| {
        Rgb(colors[y as usize * width + x as usize])
    })
}

/// Resize with nearest-neighbour (`smooth == false`) or bilinear sampling.
pub fn resize(img: &RgbImage, width: u32, height: u32, smooth: bool) -> RgbImage {
    let filter = if smooth { imageops::FilterType::Triangle } else { imageops::FilterType::Nearest };
    imageops::resize(img, width.max(1), height.max(1), filter)
}

/// Paste panels left-to-right, top-to-bottom on a `cols`-wide grid of
/// equally sized cells (the largest panel decides the cell size).
pub fn compose(panels: &[RgbImage], cols: usize, background: Color) -> RgbImage {
    let cols = cols.max(1);
    let rows = panels.len().div_ceil(cols).max(1);
    let cell_w = panels.iter().map(|p| p.width()).max().unwrap_or(1);
    let cell_h = panels.iter().map(|p| p.height()).max().unwrap_or(1);

    let mut out = RgbImage::from_pixel(cell_w * cols as u32, cell_h * rows as u32, Rgb(background));
    for (i, panel) in panels.iter().enumerate() {
        let x = (i % cols) as i64 * cell_w as i64;
        let y = (i / cols) as i64 * cell_h as i64;
        imageops::replace(&mut out, panel, x, y);
    }
    out
}

pub fn save_png(img: &RgbImage, path: &Path) -> Result<()> {
    img.save(path)?;
    info!(path = %path.display(), width = img.width(), height = img.height(), "saved");
    Ok(())
}

/// Blend `color` towards `background`, `alpha = 1` keeps `color`.
pub fn dim(color: Color, background: Color, alpha: f64) -> Color {
    let mix = |k: usize| (background[k] as f64 + (color[k] as f64 - background[k] as f64) * alpha).round() as u8;
    [mix(0), mix(1), mix(2)]
}

fn rgb(c: Color) -> RGBColor {
    RGBColor(c[0], c[1], c[2])
}

fn font(size: u32, color: Color) -> TextStyle<'static> {
    (FONT, size).into_font().color(&rgb(color))
}

/// Panel colors: text and axes in `foreground`, mesh lines in `grid`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Theme {
    pub background: Color,
    pub foreground: Color,
    pub grid: Color,
}

impl Theme {
    pub const LIGHT: Theme = Theme { background: WHITE, foreground: BLACK, grid: LIGHT_GRAY };
    pub const DARK: Theme = Theme { background: BLACK, foreground: LIME, grid: [0, 70, 0] };
}

/// Font sizes and label areas derived from the panel height.
#[derive(Clone, Copy, Debug)]
struct Metrics {
    caption: u32,
    desc: u32,
    tick: u32,
    margin: u32,
    x_area: u32,
    y_area: u32,
}

impl Metrics {
    fn for_height(height: u32) -> Self {
        let caption = (height / 24).clamp(9, 40);
        let desc = (height / 32).clamp(8, 28);
        let tick = (height / 40).clamp(7, 22);
        Metrics {
            caption,
            desc,
            tick,
            margin: (height / 50).max(3),
            x_area: desc + tick * 2,
            y_area: desc + tick * 4,
        }
    }
}

/// Caption, axis descriptions and data ranges of one chart.
#[derive(Clone, Debug, PartialEq)]
pub struct Axes {
    pub caption: String,
    pub x_desc: String,
    pub y_desc: String,
    pub x_range: (f64, f64),
    pub y_range: (f64, f64),
}

impl Axes {
    pub fn new(caption: impl Into<String>, x_desc: &str, y_desc: &str, x_range: (f64, f64), y_range: (f64, f64)) -> Self {
        Axes {
            caption: caption.into(),
            x_desc: x_desc.to_string(),
            y_desc: y_desc.to_string(),
            x_range,
            y_range,
        }
    }

    fn check(&self) -> Result<()> {
        let ok = |(lo, hi): (f64, f64)| lo < hi && (hi - lo).is_finite();
        if !ok(self.x_range) || !ok(self.y_range) {
            return Err(invalid(format!(
                "chart '{}' has an empty range x={:?} y={:?}",
                self.caption, self.x_range, self.y_range
            )));
        }
        Ok(())
    }

    fn contains(&self, (x, y): (f64, f64)) -> bool {
        (self.x_range.0..=self.x_range.1).contains(&x) && (self.y_range.0..=self.y_range.1).contains(&y)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Mark {
    Line { width: u32 },
    Dashed { dash: u32 },
    Markers { radius: u32 },
}

/// One data series; a `label` puts it in the legend.
#[derive(Clone, Debug, PartialEq)]
pub struct Series {
    pub points: Vec<(f64, f64)>,
    pub mark: Mark,
    pub color: Color,
    pub label: Option<String>,
}

impl Series {
    pub fn new(points: Vec<(f64, f64)>, mark: Mark, color: Color) -> Self {
        Series { points, mark, color, label: None }
    }

    pub fn labelled(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// Runs of consecutive points inside the chart. Non-finite or
/// out-of-range points end a run.
fn visible_runs(points: &[(f64, f64)], axes: &Axes) -> Vec<Vec<(f64, f64)>> {
    let mut runs = Vec::new();
    let mut current = Vec::new();
    for &p in points {
        if p.0.is_finite() && p.1.is_finite() && axes.contains(p) {
            current.push(p);
        } else if !current.is_empty() {
            runs.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        runs.push(current);
    }
    runs
}

type Area<'a> = DrawingArea<BitMapBackend<'a>, Shift>;

/// Draw into a fresh `width x height` RGB buffer.
fn canvas<F>(width: u32, height: u32, draw: F) -> Result<RgbImage>
where
    F: FnOnce(&Area<'_>) -> Result<()>,
{
    let mut buf = vec![0u8; width as usize * height as usize * 3];
    {
        let root = BitMapBackend::with_buffer(&mut buf, (width, height)).into_drawing_area();
        draw(&root)?;
        root.present()?;
    }
    RgbImage::from_raw(width, height, buf).ok_or_else(|| invalid("chart buffer does not match its size"))
}

/// Cartesian chart with mesh, axis descriptions, numeric ticks and, when
/// any series is labelled, a legend in the upper left corner.
pub fn chart(width: u32, height: u32, axes: &Axes, series: &[Series], theme: Theme) -> Result<RgbImage> {
    axes.check()?;
    let m = Metrics::for_height(height);
    let fg = rgb(theme.foreground);
    let bg = rgb(theme.background);

    canvas(width, height, |root| {
        root.fill(&bg)?;
        let mut chart = ChartBuilder::on(root)
            .caption(&axes.caption, font(m.caption, theme.foreground))
            .margin(m.margin)
            .x_label_area_size(m.x_area)
            .y_label_area_size(m.y_area)
            .build_cartesian_2d(axes.x_range.0..axes.x_range.1, axes.y_range.0..axes.y_range.1)?;

        chart
            .configure_mesh()
            .x_desc(axes.x_desc.as_str())
            .y_desc(axes.y_desc.as_str())
            .axis_desc_style(font(m.desc, theme.foreground))
            .label_style(font(m.tick, theme.foreground))
            .axis_style(fg)
            .bold_line_style(rgb(theme.grid))
            .light_line_style(rgb(dim(theme.grid, theme.background, 0.4)))
            .draw()?;

        for s in series {
            let color = rgb(s.color);
            match s.mark {
                Mark::Line { width } => {
                    for run in visible_runs(&s.points, axes) {
                        chart.draw_series(LineSeries::new(run, color.stroke_width(width.max(1))))?;
                    }
                }
                Mark::Dashed { dash } => {
                    let dash = dash.max(1);
                    for run in visible_runs(&s.points, axes) {
                        chart.draw_series(DashedLineSeries::new(run, dash, dash, color.stroke_width(1)))?;
                    }
                }
                Mark::Markers { radius } => {
                    let radius = radius.max(1);
                    chart.draw_series(
                        s.points
                            .iter()
                            .copied()
                            .filter(|&p| p.0.is_finite() && p.1.is_finite() && axes.contains(p))
                            .map(|p| Circle::new(p, radius, color.filled())),
                    )?;
                }
            }
            if let Some(label) = &s.label {
                let mark = s.mark;
                chart
                    .draw_series(std::iter::empty::<PathElement<(f64, f64)>>())?
                    .label(label.as_str())
                    .legend(move |(x, y)| {
                        let (from, to, stroke) = match mark {
                            Mark::Line { width } => (x, x + 20, width),
                            Mark::Dashed { .. } => (x, x + 6, 1),
                            Mark::Markers { radius } => (x + 8, x + 12, radius * 2),
                        };
                        PathElement::new(vec![(from, y), (to, y)], color.stroke_width(stroke.max(1)))
                    });
            }
        }

        if series.iter().any(|s| s.label.is_some()) {
            chart
                .configure_series_labels()
                .position(SeriesLabelPosition::UpperLeft)
                .label_font(font(m.tick, theme.foreground))
                .background_style(bg.mix(0.8))
                .border_style(fg)
                .draw()?;
        }
        Ok(())
    })
}

fn tick_label(span: f64, v: f64) -> String {
    match span.abs() {
        s if s >= 10.0 => format!("{:.0}", v),
        s if s >= 1.0 => format!("{:.1}", v),
        _ => format!("{:.2}", v),
    }
}

/// `grid` drawn as filled cells over `axes`. With `rows_down` row 0 sits
/// along the top edge and the vertical ticks count downwards, as matrix
/// indices do; otherwise row 0 sits along the bottom edge.
pub fn matrix_chart<T>(
    width: u32,
    height: u32,
    axes: &Axes,
    grid: &Grid<T>,
    cmap: &Colormap,
    theme: Theme,
    rows_down: bool,
) -> Result<RgbImage>
where
    T: Copy + PartialOrd + Into<f64>,
{
    axes.check()?;
    let m = Metrics::for_height(height);
    let colors = cell_colors(grid, cmap);
    let (x0, x1) = axes.x_range;
    let (y0, y1) = axes.y_range;
    let dx = (x1 - x0) / grid.width().max(1) as f64;
    let dy = (y1 - y0) / grid.height().max(1) as f64;
    let x_fmt = |v: &f64| tick_label(x1 - x0, *v);
    let y_fmt = |v: &f64| tick_label(y1 - y0, if rows_down { y1 - (*v - y0) } else { *v });

    canvas(width, height, |root| {
        root.fill(&rgb(theme.background))?;
        let mut chart = ChartBuilder::on(root)
            .caption(&axes.caption, font(m.caption, theme.foreground))
            .margin(m.margin)
            .x_label_area_size(m.x_area)
            .y_label_area_size(m.y_area)
            .build_cartesian_2d(x0..x1, y0..y1)?;

        chart
            .configure_mesh()
            .disable_mesh()
            .x_desc(axes.x_desc.as_str())
            .y_desc(axes.y_desc.as_str())
            .x_label_formatter(&x_fmt)
            .y_label_formatter(&y_fmt)
            .axis_desc_style(font(m.desc, theme.foreground))
            .label_style(font(m.tick, theme.foreground))
            .axis_style(rgb(theme.foreground))
            .draw()?;

        chart.draw_series(colors.iter().enumerate().map(|(idx, &c)| {
            let (i, j) = (idx / grid.width(), idx % grid.width());
            let left = x0 + j as f64 * dx;
            let top = if rows_down { y1 - i as f64 * dy } else { y0 + (i + 1) as f64 * dy };
            Rectangle::new([(left, top), (left + dx, top - dy)], rgb(c).filled())
        }))?;
        Ok(())
    })
}

/// Node-link drawing of `graph` with node positions from `layout`
/// (coordinates in `[-1, 1]`), no axes. Labels are node indices.
pub fn graph_chart(
    size: u32,
    caption: &str,
    graph: &Graph,
    layout: &Layout,
    node_radius: u32,
    labels: bool,
    theme: Theme,
) -> Result<RgbImage> {
    let m = Metrics::for_height(size);
    let node = rgb(theme.foreground);
    let edge = rgb(dim(theme.foreground, theme.background, 0.6));
    let label_style = font((node_radius * 6 / 5).max(6), theme.background).pos(Pos::new(HPos::Center, VPos::Center));

    canvas(size, size, |root| {
        root.fill(&rgb(theme.background))?;
        let mut chart = ChartBuilder::on(root)
            .caption(caption, font(m.caption, theme.foreground))
            .margin(m.margin + node_radius)
            .build_cartesian_2d(-1.0f64..1.0f64, -1.0f64..1.0f64)?;

        chart.draw_series(graph.edges().iter().filter_map(|&(i, j)| {
            let (a, b) = (*layout.get(i)?, *layout.get(j)?);
            Some(PathElement::new(vec![a, b], edge.stroke_width(1)))
        }))?;
        chart.draw_series(layout.iter().map(|&p| Circle::new(p, node_radius, node.filled())))?;
        if labels {
            chart.draw_series(
                layout
                    .iter()
                    .enumerate()
                    .map(|(idx, &p)| Text::new(idx.to_string(), p, label_style.clone())),
            )?;
        }
        Ok(())
    })
}

/// `content` placed under a centred `title` strip on a `theme` background.
pub fn titled(content: &RgbImage, title: &str, size: u32, theme: Theme) -> Result<RgbImage> {
    let header = size * 2;
    let width = content.width();
    let strip = canvas(width, header, |root| {
        root.fill(&rgb(theme.background))?;
        root.draw(&Text::new(
            title.to_string(),
            ((width / 2) as i32, (header / 2) as i32),
            font(size, theme.foreground).pos(Pos::new(HPos::Center, VPos::Center)),
        ))?;
        Ok(())
    })?;
    let mut out = RgbImage::from_pixel(width, content.height() + header, Rgb(theme.background));
    imageops::replace(&mut out, &strip, 0, 0);
    imageops::replace(&mut out, content, 0, header as i64);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::GenericImageView;

    fn unit_axes() -> Axes {
        Axes::new("unit", "x", "y", (0.0, 1.0), (0.0, 1.0))
    }

    fn count(img: &RgbImage, pred: impl Fn([u8; 3]) -> bool) -> usize {
        img.pixels().filter(|p| pred(p.0)).count()
    }

    fn reddish(p: [u8; 3]) -> bool {
        p[0] > 200 && p[1] < 80 && p[2] < 80
    }

    fn greenish(p: [u8; 3]) -> bool {
        p[1] > 200 && p[0] < 80 && p[2] < 80
    }

    #[test]
    fn colormap_endpoints() {
        let cmap = Colormap::mandelbrot();
        assert_eq!(cmap.len(), 256);
        assert_eq!(cmap.color(0.0), BLACK);
        assert_eq!(cmap.color(1.0), WHITE);
        assert_eq!(cmap.color(7.0), WHITE);
        assert_eq!(cmap.color(f64::NAN), BLACK);
    }

    #[test]
    fn colormap_interpolates_between_two_stops() {
        let cmap = Colormap::from_stops(&[BLACK, [200, 100, 0]], 3);
        assert_eq!(cmap.color(0.5), [100, 50, 0]);
    }

    #[test]
    fn heatmap_keeps_grid_orientation() {
        let grid = Grid::from_vec(2, 2, vec![0u32, 10, 10, 10]).unwrap();
        let img = heatmap(&grid, &Colormap::mandelbrot());
        assert_eq!(img.dimensions(), (2, 2));
        assert_eq!(img.get_pixel(0, 0).0, BLACK);
        assert_eq!(img.get_pixel(1, 1).0, WHITE);
    }

    #[test]
    fn constant_grid_maps_to_low_end() {
        let grid = Grid::from_vec(3, 1, vec![5.0f64, 5.0, 5.0]).unwrap();
        let img = heatmap(&grid, &Colormap::mandelbrot());
        assert!(img.pixels().all(|p| p.0 == BLACK));
    }

    #[test]
    fn runs_break_on_non_finite_and_out_of_range() {
        let points = [(0.0, 0.0), (0.1, 0.1), (f64::NAN, 0.5), (0.5, 0.5), (0.6, 2.0), (0.7, 0.7), (0.8, 0.8)];
        let runs = visible_runs(&points, &unit_axes());
        assert_eq!(runs, vec![vec![(0.0, 0.0), (0.1, 0.1)], vec![(0.5, 0.5)], vec![(0.7, 0.7), (0.8, 0.8)]]);
    }

    #[test]
    fn chart_draws_series_inside_the_plot() {
        let series = [
            Series::new(vec![(0.0, 0.0), (f64::NAN, 0.5), (1.0, 1.0)], Mark::Line { width: 2 }, RED),
            Series::new(vec![(0.5, 0.5), (0.5, 2.0), (f64::INFINITY, 0.5)], Mark::Markers { radius: 3 }, RED),
        ];
        let img = chart(240, 160, &unit_axes(), &series, Theme::LIGHT).unwrap();
        assert_eq!(img.dimensions(), (240, 160));
        assert!(count(&img, reddish) > 0);
        // Margins stay clean.
        assert!((0..img.width()).all(|x| img.get_pixel(x, img.height() - 1).0 == WHITE));
    }

    #[test]
    fn chart_rejects_empty_range() {
        let axes = Axes::new("flat", "x", "y", (1.0, 1.0), (0.0, 1.0));
        assert!(chart(100, 100, &axes, &[], Theme::LIGHT).is_err());
        let axes = Axes::new("inf", "x", "y", (0.0, 1.0), (0.0, f64::INFINITY));
        assert!(chart(100, 100, &axes, &[], Theme::LIGHT).is_err());
    }

    #[test]
    fn legend_is_drawn_for_labelled_series() {
        let line = Series::new(vec![(0.2, 0.2), (0.8, 0.8)], Mark::Line { width: 1 }, BLUE);
        let plain = chart(320, 200, &unit_axes(), &[line.clone()], Theme::LIGHT).unwrap();
        let legend = chart(320, 200, &unit_axes(), &[line.labelled("diagonal")], Theme::LIGHT).unwrap();
        assert_ne!(plain, legend);
    }

    #[test]
    fn axis_descriptions_are_drawn() {
        let bare = Axes::new("unit", "", "", (0.0, 1.0), (0.0, 1.0));
        let a = chart(320, 200, &bare, &[], Theme::LIGHT).unwrap();
        let b = chart(320, 200, &unit_axes(), &[], Theme::LIGHT).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn matrix_chart_paints_cells() {
        let grid = Grid::from_vec(2, 2, vec![0.0f64, 1.0, 1.0, 0.0]).unwrap();
        let axes = Axes::new("m", "j", "i", (0.0, 2.0), (0.0, 2.0));
        let cmap = Colormap::from_stops(&[RED, BLUE], 2);
        let img = matrix_chart(200, 200, &axes, &grid, &cmap, Theme::DARK, true).unwrap();
        assert!(count(&img, |p| p == RED) > 0);
        assert!(count(&img, |p| p == BLUE) > 0);
    }

    #[test]
    fn vertical_ticks_can_count_down() {
        assert_eq!(tick_label(30.0, 12.4), "12");
        assert_eq!(tick_label(6.0, -2.96), "-3.0");
        assert_eq!(tick_label(0.1, 0.049), "0.05");
    }

    #[test]
    fn compose_two_by_two() {
        let panels: Vec<RgbImage> = (0..4)
            .map(|i| RgbImage::from_pixel(10, 8, Rgb([i as u8 * 60, 0, 0])))
            .collect();
        let out = compose(&panels, 2, BLACK);
        assert_eq!(out.dimensions(), (20, 16));
        assert_eq!(out.get_pixel(15, 12).0, [180, 0, 0]);
    }

    #[test]
    fn graph_drawing_paints_nodes() {
        let g = Graph::erdos_renyi(6, 0.5, 7).unwrap();
        let img = graph_chart(160, "ring", &g, &g.circular_layout(), 6, true, Theme::DARK).unwrap();
        assert_eq!(img.dimensions(), (160, 160));
        assert!(count(&img, greenish) > 0);
    }

    #[test]
    fn titled_adds_header() {
        let content = RgbImage::from_pixel(120, 40, Rgb(RED));
        let out = titled(&content, "header", 10, Theme::DARK).unwrap();
        assert_eq!(out.dimensions(), (120, 60));
        assert_eq!(out.get_pixel(5, 59).0, RED);
        let header = out.view(0, 0, 120, 20).to_image();
        assert!(count(&header, |p| p != BLACK) > 0);
    }
}
