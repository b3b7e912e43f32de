use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Result, bail};

use crate::cli::{Cli, Flush, OnError};
use crate::pipeline::batch::{FailurePolicy, FlushPolicy};

/// Validated settings for one scraping run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub batches: usize,
    pub batch_size: usize,
    pub start_index: usize,
    pub risk_free_rate: f64,
    pub wait: Duration,
    pub verbose: bool,
    pub output: PathBuf,
    pub request_timeout: Duration,
    pub failure_policy: FailurePolicy,
    pub flush_policy: FlushPolicy,
}

impl RunConfig {
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        if cli.batch_size == 0 {
            bail!("--bs must be at least 1");
        }
        if !cli.risk_free_rate.is_finite() {
            bail!("--rf must be a finite number, got {}", cli.risk_free_rate);
        }
        if !cli.wait.is_finite() || cli.wait < 0.0 {
            bail!("--wait must be a non-negative number of seconds, got {}", cli.wait);
        }
        if !cli.timeout.is_finite() || cli.timeout <= 0.0 {
            bail!("--timeout must be a positive number of seconds, got {}", cli.timeout);
        }

        Ok(RunConfig {
            batches: cli.batches,
            batch_size: cli.batch_size,
            start_index: cli.start_idx,
            risk_free_rate: cli.risk_free_rate,
            wait: Duration::from_secs_f64(cli.wait),
            verbose: cli.verbose,
            output: cli.output.clone(),
            request_timeout: Duration::from_secs_f64(cli.timeout),
            failure_policy: match cli.on_error {
                OnError::Abort => FailurePolicy::Abort,
                OnError::Skip => FailurePolicy::Skip,
            },
            flush_policy: match cli.flush {
                Flush::Batch => FlushPolicy::EndOfBatch,
                Flush::Ticker => FlushPolicy::PerTicker,
            },
        })
    }
}
