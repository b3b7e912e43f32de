use crate::error::{ScrapeError, ScrapeResult};
use crate::html::Document;
use crate::http::PageSource;
use crate::model::Ticker;

use super::layout::WIKIPEDIA_DIRECTORY;

pub const DIRECTORY_URL: &str = "https://en.wikipedia.org/wiki/List_of_S%26P_500_companies";

/// List the index constituents in the order the listing table shows them.
pub fn list_tickers(source: &dyn PageSource) -> ScrapeResult<Vec<Ticker>> {
    let body = source.get(DIRECTORY_URL)?;
    parse_directory(&body)
}

pub(crate) fn parse_directory(body: &str) -> ScrapeResult<Vec<Ticker>> {
    let doc = Document::parse(body);
    let table = doc
        .first_table()
        .ok_or_else(|| ScrapeError::upstream(DIRECTORY_URL, "no constituents table"))?;

    let tickers = table
        .rows()
        .iter()
        .filter_map(|row| row.cells().get(WIKIPEDIA_DIRECTORY.symbol_column).cloned())
        .filter(|symbol| !symbol.is_empty())
        .map(Ticker::new)
        .collect();
    Ok(tickers)
}
