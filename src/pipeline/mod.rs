pub mod batch;
pub mod sink;

use tracing::info;

use crate::config::RunConfig;
use crate::error::ScrapeResult;
use crate::http::PageSource;
use crate::sources::wikipedia;

use batch::{BatchReport, BatchRequest};
use sink::RowSink;

/// Totals over all batches of a run.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RunSummary {
    pub batches: usize,
    pub tickers: usize,
    pub rows: usize,
    pub skipped: usize,
}

impl RunSummary {
    fn add(&mut self, report: &BatchReport) {
        self.batches += 1;
        self.tickers += report.tickers;
        self.rows += report.rows;
        self.skipped += report.skipped.len();
    }
}

/// Run the configured batches back to back, pausing between them.
///
/// The ticker universe is listed once and shared by every batch. The run
/// stops early when the next batch would reach past the end of the universe.
pub fn run(config: &RunConfig, source: &dyn PageSource, sink: &mut dyn RowSink) -> ScrapeResult<RunSummary> {
    let universe = wikipedia::list_tickers(source)?;
    info!(tickers = universe.len(), "ticker universe loaded");

    let mut summary = RunSummary::default();
    for i in 0..config.batches {
        let start_index = i
            .checked_mul(config.batch_size)
            .and_then(|offset| config.start_index.checked_add(offset));
        let end = start_index.and_then(|start| start.checked_add(config.batch_size));
        let (Some(start_index), Some(end)) = (start_index, end) else {
            info!(batch = i + 1, "next batch offset overflows; stopping");
            break;
        };
        if end > universe.len() {
            info!(start_index, "next batch would run past the ticker universe; stopping");
            break;
        }

        let request = BatchRequest {
            start_index,
            batch_size: config.batch_size,
            risk_free_rate: config.risk_free_rate,
            as_of: chrono::Utc::now().timestamp(),
            failure_policy: config.failure_policy,
            flush_policy: config.flush_policy,
        };
        let report = batch::run_batch(source, &universe, &request, sink)?;
        info!(
            batch = i + 1,
            of = config.batches,
            tickers = report.tickers,
            rows = report.rows,
            skipped = report.skipped.len(),
            "batch written"
        );
        summary.add(&report);

        if i + 1 < config.batches && !config.wait.is_zero() {
            info!(seconds = config.wait.as_secs_f64(), "waiting to avoid server denial");
            std::thread::sleep(config.wait);
        }
    }

    Ok(summary)
}
