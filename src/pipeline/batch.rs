//! One batch: a contiguous slice of the ticker universe scraped into rows.

use tracing::{debug, info, warn};

use crate::error::{ScrapeError, ScrapeResult};
use crate::http::PageSource;
use crate::model::{ContractQuote, Expiry, OutputRow, QuoteSnapshot, Ticker};
use crate::sources::yahoo;

use super::sink::RowSink;

pub const SECONDS_PER_YEAR: f64 = 365.25 * 86_400.0;

/// Maturity given to series that expire now or have already expired.
pub const MIN_MATURITY_YEARS: f64 = 1e-5;

/// Years from `now` to `expiry`, never below `MIN_MATURITY_YEARS`.
pub fn maturity_years(expiry: Expiry, now: i64) -> f64 {
    let years = (expiry.timestamp() - now) as f64 / SECONDS_PER_YEAR;
    if years <= 0.0 { MIN_MATURITY_YEARS } else { years }
}

/// What to do when one ticker of a batch fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Stop the run and surface the error.
    #[default]
    Abort,
    /// Log the failure, drop the ticker's rows, continue with the next one.
    Skip,
}

/// When accumulated rows are handed to the sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlushPolicy {
    /// Once, after the whole slice has been scraped.
    #[default]
    EndOfBatch,
    /// After every ticker.
    PerTicker,
}

#[derive(Debug, Clone)]
pub struct BatchRequest {
    pub start_index: usize,
    pub batch_size: usize,
    pub risk_free_rate: f64,
    /// Unix seconds all maturities in the batch are measured from.
    pub as_of: i64,
    pub failure_policy: FailurePolicy,
    pub flush_policy: FlushPolicy,
}

/// Result of scraping a single ticker.
#[derive(Debug)]
pub enum TickerOutcome {
    Scraped(Vec<OutputRow>),
    Failed(ScrapeError),
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct BatchReport {
    pub tickers: usize,
    pub rows: usize,
    /// Tickers dropped under `FailurePolicy::Skip`, with the reason.
    pub skipped: Vec<(Ticker, String)>,
}

/// Rows gathered during one batch, waiting to be flushed.
#[derive(Debug, Default)]
pub struct RowAccumulator {
    rows: Vec<OutputRow>,
}

impl RowAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn extend(&mut self, rows: Vec<OutputRow>) {
        self.rows.extend(rows);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Append everything held so far to `sink` and empty the accumulator.
    pub fn flush(&mut self, sink: &mut dyn RowSink) -> ScrapeResult<usize> {
        let count = self.rows.len();
        if count > 0 {
            sink.append(&self.rows)?;
            self.rows.clear();
        }
        Ok(count)
    }
}

/// Scrape `universe[start_index..start_index + batch_size]` and append the rows to `sink`.
///
/// The slice is clipped at the end of the universe. Under
/// `FailurePolicy::Abort` a failing ticker ends the batch with its error and
/// rows that were not yet flushed are lost.
pub fn run_batch(
    source: &dyn PageSource,
    universe: &[Ticker],
    request: &BatchRequest,
    sink: &mut dyn RowSink,
) -> ScrapeResult<BatchReport> {
    if request.start_index >= universe.len() {
        return Err(ScrapeError::InvalidRange {
            start: request.start_index,
            universe: universe.len(),
        });
    }
    let end = request
        .start_index
        .saturating_add(request.batch_size)
        .min(universe.len());

    let mut accumulator = RowAccumulator::new();
    let mut report = BatchReport::default();

    for (offset, ticker) in universe[request.start_index..end].iter().enumerate() {
        let index = request.start_index + offset;
        info!(%ticker, index, "scraping ticker");

        match scrape_ticker(source, ticker, request.risk_free_rate, request.as_of) {
            TickerOutcome::Scraped(rows) => {
                debug!(%ticker, rows = rows.len(), "ticker done");
                accumulator.extend(rows);
                if request.flush_policy == FlushPolicy::PerTicker {
                    report.rows += accumulator.flush(sink)?;
                }
            }
            TickerOutcome::Failed(err) => match request.failure_policy {
                FailurePolicy::Abort => return Err(err),
                FailurePolicy::Skip => {
                    warn!(%ticker, index, error = %err, "skipping ticker");
                    report.skipped.push((ticker.clone(), err.to_string()));
                }
            },
        }
        report.tickers += 1;
    }

    report.rows += accumulator.flush(sink)?;
    Ok(report)
}

/// Snapshot, expiries and every chain of one ticker, flattened into rows.
pub fn scrape_ticker(
    source: &dyn PageSource,
    ticker: &Ticker,
    risk_free_rate: f64,
    as_of: i64,
) -> TickerOutcome {
    match collect_ticker_rows(source, ticker, risk_free_rate, as_of) {
        Ok(rows) => TickerOutcome::Scraped(rows),
        Err(err) => TickerOutcome::Failed(err),
    }
}

fn collect_ticker_rows(
    source: &dyn PageSource,
    ticker: &Ticker,
    risk_free_rate: f64,
    as_of: i64,
) -> ScrapeResult<Vec<OutputRow>> {
    let snapshot = yahoo::fetch_snapshot(source, ticker)?;

    let options = yahoo::fetch_default_options(source, ticker)?;
    let Some((&nearest, later)) = options.expiries.split_first() else {
        info!(%ticker, "no option series listed");
        return Ok(Vec::new());
    };

    let mut rows = Vec::new();

    info!(url = %yahoo::options_url(ticker, None), "nearest series");
    let nearest_chain = default_series_chain(source, ticker, &options, nearest)?;
    push_chain(&mut rows, &snapshot, &nearest_chain, maturity_years(nearest, as_of), risk_free_rate);

    for &expiry in later {
        info!(url = %yahoo::options_url(ticker, Some(expiry)), "series");
        let chain = yahoo::fetch_chain(source, ticker, Some(expiry))?;
        push_chain(&mut rows, &snapshot, &chain, maturity_years(expiry, as_of), risk_free_rate);
    }

    Ok(rows)
}

/// Chain of the default options page, cross-checked against the first listed expiry.
///
/// If the page marks a different series as displayed, the nearest expiry is
/// requested again with an explicit date.
fn default_series_chain(
    source: &dyn PageSource,
    ticker: &Ticker,
    options: &yahoo::DefaultOptions,
    nearest: Expiry,
) -> ScrapeResult<Vec<ContractQuote>> {
    let page = options.chain()?;
    match page.displayed_expiry {
        Some(displayed) if displayed != nearest => {
            warn!(
                %ticker,
                %displayed,
                %nearest,
                "default series is not the nearest expiry; requesting it by date"
            );
            yahoo::fetch_chain(source, ticker, Some(nearest))
        }
        _ => Ok(page.quotes),
    }
}

fn push_chain(
    rows: &mut Vec<OutputRow>,
    snapshot: &QuoteSnapshot,
    chain: &[ContractQuote],
    maturity: f64,
    risk_free_rate: f64,
) {
    rows.extend(
        chain
            .iter()
            .map(|contract| OutputRow::new(snapshot, contract, maturity, risk_free_rate)),
    );
}
