//! Where each scraped field sits on its page.
//!
//! The upstream pages have no stable ids, so fields are addressed by
//! position. All positions live here; a layout change upstream is fixed by
//! editing one table.

use crate::error::{ScrapeError, ScrapeResult};
use crate::html::{Document, Table};

/// Position of a single cell: nth table, nth row in it, nth `<td>` in that row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRef {
    pub table: usize,
    pub row: usize,
    pub column: usize,
}

impl CellRef {
    /// Read the cell's trimmed text from `doc`.
    pub fn read(&self, doc: &Document, page: &str) -> ScrapeResult<String> {
        let tables = doc.tables();
        let table = tables.get(self.table).ok_or_else(|| {
            ScrapeError::upstream(page, format!("no table #{} (found {})", self.table, tables.len()))
        })?;
        read_row_cell(table, self.row, self.column, page)
    }
}

fn read_row_cell(table: &Table<'_>, row: usize, column: usize, page: &str) -> ScrapeResult<String> {
    let rows = table.rows();
    let cells = rows
        .get(row)
        .ok_or_else(|| ScrapeError::upstream(page, format!("no row #{row} (found {})", rows.len())))?
        .cells();
    cells.get(column).cloned().ok_or_else(|| {
        ScrapeError::upstream(page, format!("row #{row} has no cell #{column}"))
    })
}

/// Index listing page: first table, one constituent per data row.
#[derive(Debug, Clone, Copy)]
pub struct DirectoryLayout {
    pub symbol_column: usize,
}

/// Quote summary page.
#[derive(Debug, Clone, Copy)]
pub struct QuoteLayout {
    /// `"<price>x<size>"` ask field.
    pub ask: CellRef,
    /// `"<amount> (<percent>%)"` forward dividend & yield field.
    pub dividend_yield: CellRef,
}

/// Volatility analytics page.
#[derive(Debug, Clone, Copy)]
pub struct VolatilityLayout {
    pub iv_mean: CellRef,
}

/// Column positions in a calls table row.
#[derive(Debug, Clone, Copy)]
pub struct ChainLayout {
    pub strike: usize,
    pub last: usize,
    pub bid: usize,
    pub ask: usize,
}

impl ChainLayout {
    /// Rows with fewer cells than this are headers or separators.
    pub fn min_cells(&self) -> usize {
        [self.strike, self.last, self.bid, self.ask]
            .into_iter()
            .max()
            .unwrap_or(0)
            + 1
    }
}

pub const WIKIPEDIA_DIRECTORY: DirectoryLayout = DirectoryLayout { symbol_column: 0 };

pub const YAHOO_QUOTE: QuoteLayout = QuoteLayout {
    ask: CellRef {
        table: 0,
        row: 3,
        column: 1,
    },
    dividend_yield: CellRef {
        table: 1,
        row: 5,
        column: 1,
    },
};

pub const ALPHAQUERY_VOLATILITY: VolatilityLayout = VolatilityLayout {
    iv_mean: CellRef {
        table: 0,
        row: 5,
        column: 1,
    },
};

pub const YAHOO_CHAIN: ChainLayout = ChainLayout {
    strike: 2,
    last: 3,
    bid: 4,
    ask: 5,
};
