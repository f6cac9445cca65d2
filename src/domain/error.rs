//! Domain error types.

use chrono::NaiveDate;

/// Failure reported by an order sink when it refuses an order.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum OrderError {
    #[error("order rejected: {reason}")]
    Rejected { reason: String },

    #[error("insufficient cash: need {needed:.2}, have {available:.2}")]
    InsufficientCash { needed: f64, available: f64 },

    #[error("insufficient shares: requested {requested}, holding {held}")]
    InsufficientShares { requested: u64, held: u64 },
}

/// Top-level error type for bandtrader.
#[derive(Debug, thiserror::Error)]
pub enum BandtraderError {
    #[error("data source error: {reason}")]
    Data { reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("no data for {instrument} between {start} and {end}")]
    NoData {
        instrument: String,
        start: NaiveDate,
        end: NaiveDate,
    },

    #[error("bars out of order at index {index}: {date} does not follow {previous}")]
    UnorderedBars {
        index: usize,
        previous: NaiveDate,
        date: NaiveDate,
    },

    #[error("invalid bar on {date}: {reason}")]
    InvalidBar { date: NaiveDate, reason: String },

    #[error("invalid position snapshot: {reason}")]
    InvalidSnapshot { reason: String },

    #[error("bar index {index} out of range for history of {len} bars")]
    BarOutOfRange { index: usize, len: usize },

    #[error("order for {date} failed: {source}")]
    Order {
        date: NaiveDate,
        #[source]
        source: OrderError,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&BandtraderError> for std::process::ExitCode {
    fn from(err: &BandtraderError) -> Self {
        let code: u8 = match err {
            BandtraderError::Io(_) => 1,
            BandtraderError::ConfigParse { .. }
            | BandtraderError::ConfigMissing { .. }
            | BandtraderError::ConfigInvalid { .. }
            | BandtraderError::InvalidSnapshot { .. } => 2,
            BandtraderError::Data { .. } => 3,
            BandtraderError::Order { .. } | BandtraderError::BarOutOfRange { .. } => 4,
            BandtraderError::NoData { .. }
            | BandtraderError::UnorderedBars { .. }
            | BandtraderError::InvalidBar { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
