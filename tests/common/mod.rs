#![allow(dead_code)]

use bandtrader::domain::bar::Bar;
use bandtrader::domain::error::{BandtraderError, OrderError};
use bandtrader::domain::history::PriceHistory;
use bandtrader::domain::order::Order;
use bandtrader::ports::data_port::PriceSource;
use bandtrader::ports::order_port::OrderSink;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::fmt::Write as _;
use std::path::Path;

pub struct MockPriceSource {
    pub data: HashMap<String, Vec<Bar>>,
    pub errors: HashMap<String, String>,
}

impl MockPriceSource {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_bars(mut self, instrument: &str, bars: Vec<Bar>) -> Self {
        self.data.insert(instrument.to_string(), bars);
        self
    }

    pub fn with_error(mut self, instrument: &str, reason: &str) -> Self {
        self.errors.insert(instrument.to_string(), reason.to_string());
        self
    }
}

impl PriceSource for MockPriceSource {
    fn fetch_bars(
        &self,
        instrument: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<Bar>, BandtraderError> {
        if let Some(reason) = self.errors.get(instrument) {
            return Err(BandtraderError::Data {
                reason: reason.clone(),
            });
        }
        Ok(self
            .data
            .get(instrument)
            .map(|bars| {
                bars.iter()
                    .filter(|b| b.date >= start_date && b.date <= end_date)
                    .copied()
                    .collect()
            })
            .unwrap_or_default())
    }

    fn data_range(
        &self,
        instrument: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, BandtraderError> {
        match self.data.get(instrument) {
            Some(bars) if !bars.is_empty() => {
                let min = bars.iter().map(|b| b.date).min().unwrap();
                let max = bars.iter().map(|b| b.date).max().unwrap();
                Ok(Some((min, max, bars.len())))
            }
            _ => Ok(None),
        }
    }
}

/// Accepts every order, or rejects them all when `reject` is set.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub orders: Vec<Order>,
    pub marked: Vec<Bar>,
    pub reject: bool,
}

impl RecordingSink {
    pub fn rejecting() -> Self {
        Self {
            reject: true,
            ..Self::default()
        }
    }
}

impl OrderSink for RecordingSink {
    fn place(&mut self, order: &Order) -> Result<(), OrderError> {
        if self.reject {
            return Err(OrderError::Rejected {
                reason: "market closed".to_string(),
            });
        }
        self.orders.push(*order);
        Ok(())
    }

    fn on_bar(&mut self, bar: &Bar) {
        self.marked.push(*bar);
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn make_bar(date_str: &str, close: f64) -> Bar {
    Bar {
        date: NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap(),
        open: close,
        high: close,
        low: close,
        close,
        volume: 1000,
    }
}

/// One bar per calendar day from 2020-01-01, `low == close`.
pub fn bars_from_closes(closes: &[f64]) -> Vec<Bar> {
    let start = date(2020, 1, 1);
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| Bar {
            date: start + chrono::Duration::days(i as i64),
            open: close,
            high: close,
            low: close,
            close,
            volume: 1000,
        })
        .collect()
}

pub fn history_from_closes(closes: &[f64]) -> PriceHistory {
    PriceHistory::new("TEST", bars_from_closes(closes)).unwrap()
}

/// 50 flat bars at 100, a breakout to 110, a short rally and a slide back
/// through the adaptive average.
pub fn breakout_then_reversal() -> Vec<f64> {
    let mut closes = vec![100.0; 50];
    closes.extend([110.0, 111.0, 112.0, 113.0, 105.0, 100.0, 95.0, 90.0]);
    closes
}

pub fn write_csv(dir: &Path, instrument: &str, bars: &[Bar]) {
    let mut content = String::from("date,open,high,low,close,volume\n");
    for b in bars {
        writeln!(
            content,
            "{},{},{},{},{},{}",
            b.date.format("%Y-%m-%d"),
            b.open,
            b.high,
            b.low,
            b.close,
            b.volume
        )
        .unwrap();
    }
    std::fs::write(dir.join(format!("{}.csv", instrument)), content).unwrap();
}
