use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt};

use iterviz::RenderConfig;
use iterviz::batch::{render_logistic, render_mandelbrot, render_matrix, run_all};

#[derive(Parser, Debug)]
#[command(version, about = "static plots of iterated maps, escape-time fractals and graph matrices")]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,

    /// JSON file overriding the built-in settings
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Directory the PNG files are written to
    #[arg(short, long, global = true)]
    out: Option<PathBuf>,

    /// Multiply every Mandelbrot view's resolution (e.g. 0.25 for a preview)
    #[arg(short, long, global = true)]
    scale: Option<f64>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Every figure
    All,
    /// Logistic and floor-logistic map panels
    Logistic,
    /// Mandelbrot views
    Mandelbrot {
        /// Render only the view with this name (full, zoom1, zoom2, classic)
        #[arg(short, long)]
        view: Option<String>,
    },
    /// Adjacency matrix, graph layouts and wave matrix
    Matrix,
}

fn main() -> Result<()> {
    let args = Args::parse();

    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("iterviz=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut config = match &args.config {
        Some(path) => RenderConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => RenderConfig::default(),
    };
    if let Some(out) = args.out {
        config.output_dir = out;
    }
    if let Some(scale) = args.scale {
        config = config.scaled(scale).context("applying --scale")?;
    }
    config.validate().context("checking configuration")?;

    let started = Instant::now();
    let written = match args.command.unwrap_or(Command::All) {
        Command::All => run_all(&config)?,
        Command::Logistic => vec![render_logistic(&config)?],
        Command::Mandelbrot { view } => render_mandelbrot(&config, view.as_deref())?,
        Command::Matrix => vec![render_matrix(&config)?],
    };

    for path in &written {
        println!("saved: {}", path.display());
    }
    tracing::info!(files = written.len(), elapsed = ?started.elapsed(), "done");
    Ok(())
}
