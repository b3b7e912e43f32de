//! Text normalization for scraped fields.
//!
//! Every numeric quantity read off an upstream page goes through these
//! helpers: thousands separators are stripped, sentinels are mapped, and
//! anything that is not a finite decimal becomes a `ScrapeError::Parse`.

use crate::error::{ScrapeError, ScrapeResult};

/// Marker the chain page shows for a price that is not available.
pub const UNAVAILABLE: &str = "-";

/// Marker the quote page shows in place of a dividend yield.
pub const NOT_APPLICABLE: &str = "N/A";

pub fn strip_thousands(raw: &str) -> String {
    raw.trim().replace(',', "")
}

/// Parse a decimal after stripping thousands separators.
pub fn parse_decimal(field: &str, raw: &str) -> ScrapeResult<f64> {
    let cleaned = strip_thousands(raw);
    let value: f64 = cleaned
        .parse()
        .map_err(|e| ScrapeError::parse(field, raw, format!("{e}")))?;
    if !value.is_finite() {
        return Err(ScrapeError::parse(field, raw, "not a finite number"));
    }
    Ok(value)
}

/// Like `parse_decimal`, but rejects values `<= 0`.
pub fn parse_positive(field: &str, raw: &str) -> ScrapeResult<f64> {
    let value = parse_decimal(field, raw)?;
    if value <= 0.0 {
        return Err(ScrapeError::parse(field, raw, "expected a positive value"));
    }
    Ok(value)
}

/// Like `parse_decimal`, but rejects negative values.
pub fn parse_non_negative(field: &str, raw: &str) -> ScrapeResult<f64> {
    let value = parse_decimal(field, raw)?;
    if value < 0.0 {
        return Err(ScrapeError::parse(field, raw, "expected a non-negative value"));
    }
    Ok(value)
}

/// Read the price out of a `"<price>x<size>"` bid/ask field.
pub fn parse_bid_ask_price(raw: &str) -> ScrapeResult<f64> {
    let (price, _size) = raw
        .split_once('x')
        .ok_or_else(|| ScrapeError::parse("stock price", raw, "missing `x` separator"))?;
    parse_positive("stock price", price)
}

/// Read the yield out of a `"<amount> (<percent>%)"` field as a fraction.
///
/// `"0.88 (1.25%)"` → 0.0125, `"0.00 (N/A)"` → 0.
pub fn parse_dividend_yield(raw: &str) -> ScrapeResult<f64> {
    let open = raw
        .find('(')
        .ok_or_else(|| ScrapeError::parse("dividend yield", raw, "missing `(`"))?;
    let inner = &raw[open + 1..];
    let inner = match inner.rfind(')') {
        Some(close) => &inner[..close],
        None => inner,
    };
    let body = inner.trim();
    if body.eq_ignore_ascii_case(NOT_APPLICABLE) {
        return Ok(0.0);
    }
    let percent = body.strip_suffix('%').unwrap_or(body);
    Ok(parse_non_negative("dividend yield", percent)? / 100.0)
}

/// Read one ask/bid/last candidate; the unavailable marker reads as 0.
pub fn parse_price_candidate(field: &str, raw: &str) -> ScrapeResult<f64> {
    if raw.trim() == UNAVAILABLE {
        return Ok(0.0);
    }
    parse_non_negative(field, raw)
}

/// First non-zero of ask, bid, last; 0 when the contract has no price at all.
pub fn select_trade_price(ask: f64, bid: f64, last: f64) -> f64 {
    [ask, bid, last]
        .into_iter()
        .find(|p| *p != 0.0)
        .unwrap_or(0.0)
}
