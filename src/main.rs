use anyhow::{Context, Result};
use clap::Parser;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use bs_option_scraper::cli::Cli;
use bs_option_scraper::config::RunConfig;
use bs_option_scraper::http::HttpClient;
use bs_option_scraper::pipeline::{self, sink::CsvSink};

/// `--verbose` picks the default level; `RUST_LOG` directives replace it.
fn log_filter(verbose: bool, directives: &str) -> EnvFilter {
    let level = if verbose { LevelFilter::INFO } else { LevelFilter::WARN };
    EnvFilter::builder()
        .with_default_directive(level.into())
        .parse_lossy(directives)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = RunConfig::from_cli(&cli)?;

    let directives = std::env::var(EnvFilter::DEFAULT_ENV).unwrap_or_default();
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(config.verbose, &directives))
        .with_target(false)
        .init();

    let client = HttpClient::new(config.request_timeout).context("creating HTTP client")?;
    let mut sink = CsvSink::open(&config.output)
        .with_context(|| format!("opening output file {}", config.output.display()))?;

    let summary = pipeline::run(&config, &client, &mut sink)?;

    tracing::info!(
        batches = summary.batches,
        tickers = summary.tickers,
        rows = summary.rows,
        skipped = summary.skipped,
        output = %sink.path().display(),
        "done"
    );
    Ok(())
}
