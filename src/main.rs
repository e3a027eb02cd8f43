use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use speaker_graph::session::load_batch;
use speaker_graph::{AnalysisConfig, EngineSettings, LayoutOrchestrator};

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    #[arg(long)]
    input: PathBuf,

    #[arg(long)]
    settings: Option<PathBuf>,

    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long)]
    width: Option<f32>,

    #[arg(long)]
    height: Option<f32>,

    #[arg(long)]
    iterations: Option<usize>,

    #[arg(long)]
    pretty: bool,

    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: &Path) -> Result<AnalysisConfig> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read analysis config {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("invalid analysis config {}", path.display()))
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let mut settings = match &args.settings {
        Some(path) => EngineSettings::load(path)?,
        None => EngineSettings::default(),
    };
    if let Some(width) = args.width {
        settings.viewport.width = width;
    }
    if let Some(height) = args.height {
        settings.viewport.height = height;
    }
    if let Some(iterations) = args.iterations {
        settings.simulation.iterations = iterations;
    }

    let batch = load_batch(&args.input)?;
    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => batch.config.unwrap_or_default(),
    };

    let mut orchestrator = LayoutOrchestrator::new(config, settings);
    let frame = orchestrator
        .ingest_batch(batch.speakers, batch.interactions)
        .context("layout did not complete")?;

    let json = if args.pretty {
        serde_json::to_string_pretty(&frame)
    } else {
        serde_json::to_string(&frame)
    }
    .context("failed to serialize layout frame")?;

    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{json}").context("failed to write layout frame")?;
    Ok(())
}
