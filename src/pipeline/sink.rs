use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use crate::error::{ScrapeError, ScrapeResult};
use crate::model::{OUTPUT_HEADER, OutputRow};

/// Destination for finished rows.
pub trait RowSink {
    fn append(&mut self, rows: &[OutputRow]) -> ScrapeResult<()>;
}

impl RowSink for Vec<OutputRow> {
    fn append(&mut self, rows: &[OutputRow]) -> ScrapeResult<()> {
        self.extend_from_slice(rows);
        Ok(())
    }
}

/// Append-only CSV file with the fixed 7-column header.
pub struct CsvSink {
    path: PathBuf,
}

impl CsvSink {
    /// Open `path`, writing the header if the file is missing or empty.
    ///
    /// An existing file must already start with the header; it is never truncated.
    pub fn open(path: impl Into<PathBuf>) -> ScrapeResult<Self> {
        let path = path.into();
        if has_content(&path)? {
            check_header(&path)?;
        } else {
            let file = OpenOptions::new().create(true).append(true).open(&path)?;
            let mut wtr = csv::WriterBuilder::new().has_headers(false).from_writer(file);
            wtr.write_record(OUTPUT_HEADER)?;
            wtr.flush()?;
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RowSink for CsvSink {
    fn append(&mut self, rows: &[OutputRow]) -> ScrapeResult<()> {
        let file = OpenOptions::new().append(true).open(&self.path)?;
        let mut wtr = csv::WriterBuilder::new().has_headers(false).from_writer(file);
        for row in rows {
            wtr.serialize(row)?;
        }
        wtr.flush()?;
        Ok(())
    }
}

fn has_content(path: &Path) -> ScrapeResult<bool> {
    match std::fs::metadata(path) {
        Ok(meta) => Ok(meta.len() > 0),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e.into()),
    }
}

fn check_header(path: &Path) -> ScrapeResult<()> {
    let mut first = String::new();
    BufReader::new(File::open(path)?).read_line(&mut first)?;
    if first.trim_end() != OUTPUT_HEADER.join(",") {
        return Err(ScrapeError::SchemaMismatch {
            path: path.display().to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn row(strike: f64) -> OutputRow {
        OutputRow {
            stock_price: 152.5,
            strike_price: strike,
            maturity_years: 0.25,
            dividend_yield: 0.0125,
            volatility: 0.3,
            risk_free_rate: 0.0088,
            call_price: 4.0,
        }
    }

    #[test]
    fn test_creates_header_then_appends() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("SNP.csv");

        let mut sink = CsvSink::open(&path).unwrap();
        sink.append(&[row(150.0), row(155.0)]).unwrap();

        let mut sink = CsvSink::open(&path).unwrap();
        sink.append(&[row(160.0)]).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(
            lines[0],
            "Stock Price,Strike Price,Maturity,Dividends,Volatility,Risk-free,Call Price"
        );
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[1], "152.5,150.0,0.25,0.0125,0.3,0.0088,4.0");
        assert_eq!(lines[3], "152.5,160.0,0.25,0.0125,0.3,0.0088,4.0");
    }

    #[test]
    fn test_empty_file_gets_header() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("SNP.csv");
        std::fs::write(&path, "").unwrap();
        CsvSink::open(&path).unwrap();
        assert!(std::fs::read_to_string(&path).unwrap().starts_with("Stock Price,"));
    }

    #[test]
    fn test_foreign_file_is_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("SNP.csv");
        std::fs::write(&path, "a,b,c\n1,2,3\n").unwrap();
        assert!(matches!(
            CsvSink::open(&path),
            Err(ScrapeError::SchemaMismatch { .. })
        ));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "a,b,c\n1,2,3\n");
    }
}
