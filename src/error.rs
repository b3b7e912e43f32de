use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScrapeError {
    /// An expected structural element is missing from an upstream page.
    #[error("Upstream format error on {page}: {detail}")]
    UpstreamFormat { page: String, detail: String },

    /// A field was found but is not in the expected lexical form.
    #[error("Parse error in {field}: cannot read `{raw}` ({reason})")]
    Parse {
        field: String,
        raw: String,
        reason: String,
    },

    #[error("Network error fetching {url}: {reason}")]
    Network { url: String, reason: String },

    #[error("Start index {start} outside ticker universe of {universe} symbols")]
    InvalidRange { start: usize, universe: usize },

    #[error("Output file {path} does not start with the expected header")]
    SchemaMismatch { path: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

pub type ScrapeResult<T> = Result<T, ScrapeError>;

impl ScrapeError {
    pub fn upstream(page: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::UpstreamFormat {
            page: page.into(),
            detail: detail.into(),
        }
    }

    pub fn parse(field: impl Into<String>, raw: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Parse {
            field: field.into(),
            raw: raw.into(),
            reason: reason.into(),
        }
    }

    pub fn network(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Network {
            url: url.into(),
            reason: reason.into(),
        }
    }
}
