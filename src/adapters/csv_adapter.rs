//! CSV file price source.
//!
//! One file per instrument, `<base_path>/<instrument>.csv`, with a header row
//! naming at least `date,open,high,low,close,volume` in any order. Extra
//! columns (for example a `code` column) are ignored. Rows are returned in
//! file order; ordering is checked later by `PriceHistory`.

use crate::domain::bar::Bar;
use crate::domain::error::BandtraderError;
use crate::ports::data_port::PriceSource;
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;

const COLUMNS: [&str; 6] = ["date", "open", "high", "low", "close", "volume"];

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, instrument: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", instrument))
    }

    fn read_all(&self, instrument: &str) -> Result<Vec<Bar>, BandtraderError> {
        let path = self.csv_path(instrument);
        let content = fs::read_to_string(&path).map_err(|e| BandtraderError::Data {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let headers = rdr.headers().map_err(|e| BandtraderError::Data {
            reason: format!("CSV header error: {}", e),
        })?;

        let mut index = [0usize; 6];
        for (slot, name) in index.iter_mut().zip(COLUMNS) {
            *slot = headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
                .ok_or_else(|| BandtraderError::Data {
                    reason: format!("missing {} column in {}", name, path.display()),
                })?;
        }
        let [date_col, open_col, high_col, low_col, close_col, volume_col] = index;

        let mut bars = Vec::new();
        for (row, result) in rdr.records().enumerate() {
            let record = result.map_err(|e| BandtraderError::Data {
                reason: format!("CSV parse error: {}", e),
            })?;
            let line = row + 1;

            let date = NaiveDate::parse_from_str(field(&record, date_col, "date", line)?, "%Y-%m-%d")
                .map_err(|e| BandtraderError::Data {
                    reason: format!("row {}: invalid date format: {}", line, e),
                })?;
            let volume = parse_volume(field(&record, volume_col, "volume", line)?).ok_or_else(|| {
                BandtraderError::Data {
                    reason: format!("row {}: invalid volume value", line),
                }
            })?;

            bars.push(Bar {
                date,
                open: price(&record, open_col, "open", line)?,
                high: price(&record, high_col, "high", line)?,
                low: price(&record, low_col, "low", line)?,
                close: price(&record, close_col, "close", line)?,
                volume,
            });
        }

        Ok(bars)
    }
}

fn field<'r>(
    record: &'r csv::StringRecord,
    col: usize,
    name: &str,
    line: usize,
) -> Result<&'r str, BandtraderError> {
    record
        .get(col)
        .map(str::trim)
        .ok_or_else(|| BandtraderError::Data {
            reason: format!("row {}: missing {} value", line, name),
        })
}

fn price(
    record: &csv::StringRecord,
    col: usize,
    name: &str,
    line: usize,
) -> Result<f64, BandtraderError> {
    field(record, col, name, line)?
        .parse()
        .map_err(|e| BandtraderError::Data {
            reason: format!("row {}: invalid {} value: {}", line, name, e),
        })
}

/// Accepts integer volumes and the `12345.0` form some exporters write.
/// Float forms must be whole and below 2^64.
fn parse_volume(raw: &str) -> Option<u64> {
    if let Ok(v) = raw.parse::<u64>() {
        return Some(v);
    }
    let v: f64 = raw.parse().ok()?;
    // `u64::MAX as f64` rounds up to 2^64, which is already out of range.
    if v.is_finite() && v >= 0.0 && v.fract() == 0.0 && v < u64::MAX as f64 {
        Some(v as u64)
    } else {
        None
    }
}

impl PriceSource for CsvAdapter {
    fn fetch_bars(
        &self,
        instrument: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<Bar>, BandtraderError> {
        Ok(self
            .read_all(instrument)?
            .into_iter()
            .filter(|b| b.date >= start_date && b.date <= end_date)
            .collect())
    }

    fn data_range(
        &self,
        instrument: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, BandtraderError> {
        let bars = self.read_all(instrument)?;
        let min = bars.iter().map(|b| b.date).min();
        let max = bars.iter().map(|b| b.date).max();
        Ok(min.zip(max).map(|(min, max)| (min, max, bars.len())))
    }
}
