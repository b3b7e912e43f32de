//! Scrape current call option chains for S&P 500 constituents into a flat,
//! append-only CSV of Black-Scholes calibration inputs.
//!
//! Per ticker the pipeline reads a quote snapshot (price, dividend yield,
//! implied volatility), lists the option expiries, extracts every call
//! chain and emits one row per contract. Batches of tickers are scraped
//! strictly sequentially with a pause between batches.

pub mod cli;
pub mod config;
pub mod error;
pub mod html;
pub mod http;
pub mod model;
pub mod normalize;
pub mod pipeline;
pub mod sources;

pub use error::{ScrapeError, ScrapeResult};
