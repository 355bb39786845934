use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;
use vaa_matching::{Dataset, VaaConfig};

/// Match a reference entity against the targets of a JSON dataset.
#[derive(Parser)]
#[command(name = "vaa-match", version, about)]
struct Cli {
    /// JSON dataset with questions, reference and targets
    dataset: PathBuf,

    /// YAML matcher configuration
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Order results by ascending distance instead of target order
    #[arg(long)]
    sorted: bool,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.json_logs);

    let config = match &cli.config {
        Some(path) => VaaConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => VaaConfig::default(),
    };
    let algorithm = config.matching_algorithm()?;

    let raw = fs::read_to_string(&cli.dataset)
        .with_context(|| format!("reading dataset {}", cli.dataset.display()))?;
    let dataset = Dataset::from_json(&raw).context("parsing dataset")?;
    info!(
        questions = dataset.questions.len(),
        targets = dataset.targets.len(),
        metric = %config.matcher.distance_metric,
        "dataset_loaded"
    );

    let results = dataset.run(&algorithm, cli.sorted)?;
    info!(results = results.len(), sorted = cli.sorted, "dataset_matched");
    println!("{}", serde_json::to_string_pretty(&results)?);
    Ok(())
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}
