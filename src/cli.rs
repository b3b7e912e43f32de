use clap::builder::BoolishValueParser;
use clap::{ArgAction, Parser, ValueEnum};
use std::path::PathBuf;

/// Scrape S&P 500 call option chains into a flat CSV of Black-Scholes inputs.
#[derive(Parser, Debug)]
#[command(name = "bs-option-scraper", version, about)]
pub struct Cli {
    /// Number of batches to extract data from
    #[arg(long, default_value = "5")]
    pub batches: usize,

    /// Number of companies whose data will be extracted in a batch
    #[arg(long = "bs", default_value = "10")]
    pub batch_size: usize,

    /// Current risk-free rate, applied to every row of the run
    #[arg(long = "rf", default_value = "0.0088", allow_negative_numbers = true)]
    pub risk_free_rate: f64,

    /// Seconds to wait between batches to avoid server denial
    #[arg(long, default_value = "500", allow_negative_numbers = true)]
    pub wait: f64,

    /// Print progress (true/false)
    #[arg(long, default_value = "true", action = ArgAction::Set, value_parser = BoolishValueParser::new())]
    pub verbose: bool,

    /// Company index to start scraping from
    #[arg(long = "startIdx", default_value = "0")]
    pub start_idx: usize,

    /// CSV file rows are appended to
    #[arg(long, short = 'o', default_value = "SNP.csv")]
    pub output: PathBuf,

    /// Per-request HTTP timeout in seconds
    #[arg(long, default_value = "30")]
    pub timeout: f64,

    /// What to do when a ticker fails to scrape
    #[arg(long = "on-error", value_enum, default_value = "abort")]
    pub on_error: OnError,

    /// When to write accumulated rows to the output file
    #[arg(long, value_enum, default_value = "batch")]
    pub flush: Flush,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OnError {
    /// Stop the run on the first failing ticker
    Abort,
    /// Log the failing ticker and continue with the next one
    Skip,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flush {
    /// Write once at the end of each batch
    Batch,
    /// Write after every ticker
    Ticker,
}
