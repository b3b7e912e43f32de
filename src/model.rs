use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Symbol of one underlying equity, as listed by the ticker directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Ticker(String);

impl Ticker {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self(symbol.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Symbol as the quote site spells it in URLs ("BRK.B" → "BRK-B").
    pub fn quote_symbol(&self) -> String {
        self.0.replace('.', "-")
    }
}

impl fmt::Display for Ticker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Per-ticker market inputs, broadcast to every row of that ticker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuoteSnapshot {
    pub price: f64,
    pub dividend_yield: f64,
    pub implied_volatility: f64,
}

/// Settlement instant of one contract series, in unix seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Expiry(pub i64);

impl Expiry {
    pub fn timestamp(&self) -> i64 {
        self.0
    }

    pub fn as_datetime(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.0, 0)
    }
}

impl fmt::Display for Expiry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_datetime() {
            Some(dt) => write!(f, "{} ({})", self.0, dt.format("%Y-%m-%d")),
            None => write!(f, "{}", self.0),
        }
    }
}

/// One call contract of a chain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContractQuote {
    pub strike: f64,
    pub trade_price: f64,
}

/// Column names of the output dataset, in order.
pub const OUTPUT_HEADER: [&str; 7] = [
    "Stock Price",
    "Strike Price",
    "Maturity",
    "Dividends",
    "Volatility",
    "Risk-free",
    "Call Price",
];

/// Persisted row. Field order matches `OUTPUT_HEADER`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OutputRow {
    #[serde(rename = "Stock Price")]
    pub stock_price: f64,
    #[serde(rename = "Strike Price")]
    pub strike_price: f64,
    #[serde(rename = "Maturity")]
    pub maturity_years: f64,
    #[serde(rename = "Dividends")]
    pub dividend_yield: f64,
    #[serde(rename = "Volatility")]
    pub volatility: f64,
    #[serde(rename = "Risk-free")]
    pub risk_free_rate: f64,
    #[serde(rename = "Call Price")]
    pub call_price: f64,
}

impl OutputRow {
    pub fn new(
        snapshot: &QuoteSnapshot,
        contract: &ContractQuote,
        maturity_years: f64,
        risk_free_rate: f64,
    ) -> Self {
        Self {
            stock_price: snapshot.price,
            strike_price: contract.strike,
            maturity_years,
            dividend_yield: snapshot.dividend_yield,
            volatility: snapshot.implied_volatility,
            risk_free_rate,
            call_price: contract.trade_price,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_symbol_uses_dashes() {
        assert_eq!(Ticker::new("BRK.B").quote_symbol(), "BRK-B");
        assert_eq!(Ticker::new("AAPL").quote_symbol(), "AAPL");
    }

    #[test]
    fn test_row_broadcasts_snapshot() {
        let snapshot = QuoteSnapshot {
            price: 152.34,
            dividend_yield: 0.0125,
            implied_volatility: 0.31,
        };
        let contract = ContractQuote {
            strike: 150.0,
            trade_price: 4.2,
        };
        let row = OutputRow::new(&snapshot, &contract, 0.25, 0.0088);
        assert_eq!(row.stock_price, 152.34);
        assert_eq!(row.strike_price, 150.0);
        assert_eq!(row.maturity_years, 0.25);
        assert_eq!(row.dividend_yield, 0.0125);
        assert_eq!(row.volatility, 0.31);
        assert_eq!(row.risk_free_rate, 0.0088);
        assert_eq!(row.call_price, 4.2);
    }
}
