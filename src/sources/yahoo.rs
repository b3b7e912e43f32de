//! Quote summary and options pages.

use crate::error::{ScrapeError, ScrapeResult};
use crate::html::Document;
use crate::http::PageSource;
use crate::model::{ContractQuote, Expiry, QuoteSnapshot, Ticker};
use crate::normalize;

use super::alphaquery;
use super::layout::{YAHOO_CHAIN, YAHOO_QUOTE};

const BASE_URL: &str = "https://finance.yahoo.com/quote";

pub fn quote_url(ticker: &Ticker) -> String {
    format!("{BASE_URL}/{}", ticker.quote_symbol())
}

/// Options page URL. `None` asks for the default (nearest) series.
pub fn options_url(ticker: &Ticker, expiry: Option<Expiry>) -> String {
    match expiry {
        Some(e) => format!("{BASE_URL}/{}/options?date={}", ticker.quote_symbol(), e.timestamp()),
        None => format!("{BASE_URL}/{}/options", ticker.quote_symbol()),
    }
}

/// Price, dividend yield and implied volatility for `ticker`.
pub fn fetch_snapshot(source: &dyn PageSource, ticker: &Ticker) -> ScrapeResult<QuoteSnapshot> {
    let url = quote_url(ticker);
    let body = source.get(&url)?;
    let doc = Document::parse(&body);

    let price = normalize::parse_bid_ask_price(&YAHOO_QUOTE.ask.read(&doc, &url)?)?;
    let dividend_yield =
        normalize::parse_dividend_yield(&YAHOO_QUOTE.dividend_yield.read(&doc, &url)?)?;
    let implied_volatility = alphaquery::fetch_volatility(source, ticker)?;

    Ok(QuoteSnapshot {
        price,
        dividend_yield,
        implied_volatility,
    })
}

/// Expiries offered on the options page, in the order the page lists them.
///
/// An empty list means no active option series.
pub fn list_expiries(source: &dyn PageSource, ticker: &Ticker) -> ScrapeResult<Vec<Expiry>> {
    fetch_default_options(source, ticker).map(|page| page.expiries)
}

/// The undated options page, parsed once for its expiry list and its chain.
pub struct DefaultOptions {
    pub expiries: Vec<Expiry>,
    url: String,
    doc: Document,
}

impl DefaultOptions {
    /// Calls of the series the page displays by default.
    pub fn chain(&self) -> ScrapeResult<OptionChain> {
        parse_chain(&self.doc, &self.url)
    }
}

pub fn fetch_default_options(source: &dyn PageSource, ticker: &Ticker) -> ScrapeResult<DefaultOptions> {
    let url = options_url(ticker, None);
    let body = source.get(&url)?;
    let doc = Document::parse(&body);
    let expiries = parse_expiries(&doc, &url)?;
    Ok(DefaultOptions { expiries, url, doc })
}

fn parse_expiries(doc: &Document, url: &str) -> ScrapeResult<Vec<Expiry>> {
    let select = doc
        .first_select()
        .ok_or_else(|| ScrapeError::upstream(url, "no expiry selector"))?;

    select
        .options()
        .into_iter()
        .map(|option| {
            let value = option.value.ok_or_else(|| {
                ScrapeError::upstream(url, format!("expiry option `{}` has no value", option.text))
            })?;
            value
                .parse::<i64>()
                .map(Expiry)
                .map_err(|e| ScrapeError::parse("expiry timestamp", value.as_str(), e.to_string()))
        })
        .collect()
}

/// One options page worth of calls.
#[derive(Debug, Clone, PartialEq)]
pub struct OptionChain {
    /// Series the page marks as displayed, if it marks one.
    pub displayed_expiry: Option<Expiry>,
    pub quotes: Vec<ContractQuote>,
}

/// Calls for one expiry; `None` requests the default series.
pub fn fetch_chain(
    source: &dyn PageSource,
    ticker: &Ticker,
    expiry: Option<Expiry>,
) -> ScrapeResult<Vec<ContractQuote>> {
    fetch_chain_page(source, ticker, expiry).map(|chain| chain.quotes)
}

pub fn fetch_chain_page(
    source: &dyn PageSource,
    ticker: &Ticker,
    expiry: Option<Expiry>,
) -> ScrapeResult<OptionChain> {
    let url = options_url(ticker, expiry);
    let body = source.get(&url)?;
    parse_chain(&Document::parse(&body), &url)
}

fn parse_chain(doc: &Document, url: &str) -> ScrapeResult<OptionChain> {
    let table = doc
        .first_table()
        .ok_or_else(|| ScrapeError::upstream(url, "no calls table"))?;

    let layout = YAHOO_CHAIN;
    let mut quotes = Vec::new();
    for row in table.rows() {
        let cells = row.cells();
        if cells.len() < layout.min_cells() {
            continue;
        }
        let strike = normalize::parse_positive("strike", &cells[layout.strike])?;
        let ask = normalize::parse_price_candidate("ask", &cells[layout.ask])?;
        let bid = normalize::parse_price_candidate("bid", &cells[layout.bid])?;
        let last = normalize::parse_price_candidate("last price", &cells[layout.last])?;
        quotes.push(ContractQuote {
            strike,
            trade_price: normalize::select_trade_price(ask, bid, last),
        });
    }

    let displayed_expiry = doc
        .first_select()
        .and_then(|select| select.options().into_iter().find(|o| o.selected))
        .and_then(|o| o.value)
        .and_then(|v| v.parse::<i64>().ok())
        .map(Expiry);

    Ok(OptionChain {
        displayed_expiry,
        quotes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::StaticPages;

    fn quote_page(ask: &str, dividend: &str) -> String {
        let filler = "<tr><td>x</td><td>1</td></tr>";
        format!(
            "<table>{filler}{filler}{filler}<tr><td>Ask</td><td>{ask}</td></tr></table>\
             <table>{filler}{filler}{filler}{filler}{filler}\
             <tr><td>Forward Dividend &amp; Yield</td><td>{dividend}</td></tr></table>"
        )
    }

    fn vol_page(iv: &str) -> String {
        let filler = "<tr><td>x</td><td>1</td></tr>";
        format!("<table>{filler}{filler}{filler}{filler}{filler}<tr><td>IV</td><td>{iv}</td></tr></table>")
    }

    fn chain_page(rows: &[(&str, &str, &str, &str)], selected: Option<i64>) -> String {
        let mut body = String::from(
            "<select><option value=\"1700179200\">Nov 17</option>\
             <option value=\"1700784000\">Nov 24</option></select>",
        );
        if let Some(ts) = selected {
            body = format!("<select><option value=\"{ts}\" selected>Selected</option></select>");
        }
        body.push_str("<table><tr><th>Contract</th><th>Date</th><th>Strike</th></tr>");
        for (strike, last, bid, ask) in rows {
            body.push_str(&format!(
                "<tr><td>C</td><td>D</td><td>{strike}</td><td>{last}</td><td>{bid}</td><td>{ask}</td><td>+0.1</td></tr>"
            ));
        }
        body.push_str("</table>");
        body
    }

    #[test]
    fn test_options_url() {
        let t = Ticker::new("BRK.B");
        assert_eq!(options_url(&t, None), "https://finance.yahoo.com/quote/BRK-B/options");
        assert_eq!(
            options_url(&t, Some(Expiry(1700784000))),
            "https://finance.yahoo.com/quote/BRK-B/options?date=1700784000"
        );
    }

    #[test]
    fn test_fetch_snapshot() {
        let t = Ticker::new("MMM");
        let pages = StaticPages::new()
            .with_page(quote_url(&t), quote_page("1,152.34 x 300", "5.96 (5.62%)"))
            .with_page(alphaquery::volatility_url(&t), vol_page("0.2543"));
        let snap = fetch_snapshot(&pages, &t).unwrap();
        assert_eq!(snap.price, 1152.34);
        assert!((snap.dividend_yield - 0.0562).abs() < 1e-12);
        assert_eq!(snap.implied_volatility, 0.2543);
        assert_eq!(pages.requests(), vec![quote_url(&t), alphaquery::volatility_url(&t)]);
    }

    #[test]
    fn test_fetch_snapshot_without_dividend() {
        let t = Ticker::new("AMZN");
        let pages = StaticPages::new()
            .with_page(quote_url(&t), quote_page("130.10x1000", "N/A (N/A)"))
            .with_page(alphaquery::volatility_url(&t), vol_page("0.35"));
        assert_eq!(fetch_snapshot(&pages, &t).unwrap().dividend_yield, 0.0);
    }

    #[test]
    fn test_fetch_snapshot_missing_table() {
        let t = Ticker::new("MMM");
        let pages = StaticPages::new().with_page(quote_url(&t), "<table></table>");
        assert!(matches!(
            fetch_snapshot(&pages, &t),
            Err(ScrapeError::UpstreamFormat { .. })
        ));
    }

    #[test]
    fn test_list_expiries() {
        let t = Ticker::new("MMM");
        let pages = StaticPages::new().with_page(options_url(&t, None), chain_page(&[], None));
        assert_eq!(
            list_expiries(&pages, &t).unwrap(),
            vec![Expiry(1700179200), Expiry(1700784000)]
        );
    }

    #[test]
    fn test_list_expiries_empty_and_missing() {
        let t = Ticker::new("MMM");
        let pages = StaticPages::new().with_page(options_url(&t, None), "<select></select>");
        assert!(list_expiries(&pages, &t).unwrap().is_empty());

        let pages = StaticPages::new().with_page(options_url(&t, None), "<table></table>");
        assert!(matches!(
            list_expiries(&pages, &t),
            Err(ScrapeError::UpstreamFormat { .. })
        ));

        let pages = StaticPages::new()
            .with_page(options_url(&t, None), "<select><option value=\"soon\">?</option></select>");
        assert!(matches!(list_expiries(&pages, &t), Err(ScrapeError::Parse { .. })));
    }

    #[test]
    fn test_fetch_chain_price_fallback() {
        let t = Ticker::new("MMM");
        let page = chain_page(
            &[
                ("90.00", "3.00", "5.00", "-"),
                ("95.00", "7.00", "-", "0.00"),
                ("100.00", "-", "-", "-"),
                ("1,005.00", "1.00", "2.00", "9.00"),
            ],
            None,
        );
        let pages = StaticPages::new().with_page(options_url(&t, None), page);
        let chain = fetch_chain(&pages, &t, None).unwrap();
        assert_eq!(
            chain,
            vec![
                ContractQuote { strike: 90.0, trade_price: 5.0 },
                ContractQuote { strike: 95.0, trade_price: 7.0 },
                ContractQuote { strike: 100.0, trade_price: 0.0 },
                ContractQuote { strike: 1005.0, trade_price: 9.0 },
            ]
        );
    }

    #[test]
    fn test_fetch_chain_malformed_strike_aborts_chain() {
        let t = Ticker::new("MMM");
        let page = chain_page(&[("90.00", "1", "1", "1"), ("n/a", "1", "1", "1")], None);
        let pages = StaticPages::new().with_page(options_url(&t, Some(Expiry(1))), page);
        assert!(matches!(
            fetch_chain(&pages, &t, Some(Expiry(1))),
            Err(ScrapeError::Parse { .. })
        ));
    }

    #[test]
    fn test_fetch_chain_page_reports_displayed_expiry() {
        let t = Ticker::new("MMM");
        let pages = StaticPages::new()
            .with_page(options_url(&t, None), chain_page(&[("90", "1", "1", "1")], Some(1700179200)));
        let chain = fetch_chain_page(&pages, &t, None).unwrap();
        assert_eq!(chain.displayed_expiry, Some(Expiry(1700179200)));
        assert_eq!(chain.quotes.len(), 1);
    }

    #[test]
    fn test_default_options_reads_expiries_and_chain_from_one_request() {
        let t = Ticker::new("MMM");
        let pages = StaticPages::new()
            .with_page(options_url(&t, None), chain_page(&[("90", "1", "1", "1"), ("95", "2", "-", "-")], None));
        let page = fetch_default_options(&pages, &t).unwrap();
        assert_eq!(page.expiries, vec![Expiry(1700179200), Expiry(1700784000)]);
        let chain = page.chain().unwrap();
        assert_eq!(chain.quotes.len(), 2);
        assert_eq!(chain.displayed_expiry, None);
        assert_eq!(pages.requests(), vec![options_url(&t, None)]);
    }
}
