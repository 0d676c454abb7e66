use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use iris_export::{
    fetch::UCI_API_URL, run, DatasetSource, ExportConfig, LocalCsv, TestSize, UciRepository,
};

/// Download a dataset, split it into train and test partitions and write them as JSON records.
#[derive(Parser, Debug)]
#[command(name = "iris-export", version, about)]
struct Cli {
    /// Id of the dataset in the UCI repository
    #[arg(long, default_value_t = 53)]
    dataset_id: u32,

    /// Rows reserved for testing: a fraction such as 0.2 or a row count such as 30
    #[arg(long, default_value = "0.2")]
    test_size: TestSize,

    /// Seed of the row shuffle
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Keep rows in source order; the test partition is the tail
    #[arg(long)]
    no_shuffle: bool,

    /// Directory the four JSON files are written to
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,

    /// File name prefix of the JSON files
    #[arg(long, default_value = "iris")]
    prefix: String,

    /// Rows shown per partition in the preview
    #[arg(long, default_value_t = 5)]
    preview_rows: usize,

    /// Spaces per indentation level in the JSON files
    #[arg(long, default_value_t = 4)]
    indent: usize,

    /// Dataset endpoint of the repository API
    #[arg(long, env = "UCI_API_URL", default_value = UCI_API_URL)]
    api_url: String,

    /// Read the dataset from a local CSV file instead of the repository
    #[arg(long)]
    data_file: Option<PathBuf>,

    /// Target column of --data-file; may be repeated (default: last column)
    #[arg(long = "target", requires = "data_file")]
    targets: Vec<String>,
}

impl From<&Cli> for ExportConfig {
    fn from(cli: &Cli) -> Self {
        ExportConfig {
            dataset_id: cli.dataset_id,
            test_size: cli.test_size,
            seed: (!cli.no_shuffle).then_some(cli.seed),
            output_dir: cli.output_dir.clone(),
            prefix: cli.prefix.clone(),
            preview_rows: cli.preview_rows,
            indent: cli.indent,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("iris_export=info")),
        )
        .init();

    let cli = Cli::parse();
    let config = ExportConfig::from(&cli);

    let source: Box<dyn DatasetSource> = match &cli.data_file {
        Some(path) => Box::new(LocalCsv::new(path).targets(cli.targets.clone())),
        None => Box::new(
            UciRepository::new()
                .context("failed to build HTTP client")?
                .with_api_url(&cli.api_url),
        ),
    };

    let summary = run(&config, source.as_ref())
        .with_context(|| format!("failed to export dataset {}", config.dataset_id))?;
    tracing::info!(
        "exported `{}`: {} training rows, {} testing rows",
        summary.dataset,
        summary.n_train,
        summary.n_test
    );
    Ok(())
}
