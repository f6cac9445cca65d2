//! Daily OHLCV bar.

use chrono::NaiveDate;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

impl Bar {
    /// Returns a description of the first malformed field, if any.
    ///
    /// A bar is well formed when every price is finite and positive and
    /// `low <= high`.
    pub fn malformation(&self) -> Option<String> {
        let prices = [
            ("open", self.open),
            ("high", self.high),
            ("low", self.low),
            ("close", self.close),
        ];
        for (name, value) in prices {
            if !value.is_finite() || value <= 0.0 {
                return Some(format!("{name} must be a positive price, got {value}"));
            }
        }
        if self.low > self.high {
            return Some(format!("low {} exceeds high {}", self.low, self.high));
        }
        None
    }
}
