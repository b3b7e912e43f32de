use crate::error::ScrapeResult;
use crate::html::Document;
use crate::http::PageSource;
use crate::model::Ticker;
use crate::normalize;

use super::layout::ALPHAQUERY_VOLATILITY;

pub fn volatility_url(ticker: &Ticker) -> String {
    format!(
        "https://www.alphaquery.com/stock/{}/volatility-option-statistics/30-day/iv-mean",
        ticker.quote_symbol()
    )
}

/// 30-day mean implied volatility for `ticker`.
pub fn fetch_volatility(source: &dyn PageSource, ticker: &Ticker) -> ScrapeResult<f64> {
    let url = volatility_url(ticker);
    let body = source.get(&url)?;
    let doc = Document::parse(&body);
    let raw = ALPHAQUERY_VOLATILITY.iv_mean.read(&doc, &url)?;
    normalize::parse_non_negative("implied volatility", &raw)
}
