//! Validated, read-only price history with bounded lookback windows.
//!
//! Every lookback goes through [`PriceHistory::window`] or
//! [`PriceHistory::trend`], which return `None` when the history before a bar
//! is too short. Nothing here wraps around or indexes from the end.

use crate::domain::bar::Bar;
use crate::domain::error::BandtraderError;
use chrono::NaiveDate;

#[derive(Debug, Clone)]
pub struct PriceHistory {
    instrument: String,
    bars: Vec<Bar>,
}

impl PriceHistory {
    /// Builds a history, rejecting bars that are not in strictly increasing
    /// date order or that carry malformed prices.
    pub fn new(instrument: impl Into<String>, bars: Vec<Bar>) -> Result<Self, BandtraderError> {
        for (index, bar) in bars.iter().enumerate() {
            if let Some(reason) = bar.malformation() {
                return Err(BandtraderError::InvalidBar {
                    date: bar.date,
                    reason,
                });
            }
            if index > 0 {
                let previous = bars[index - 1].date;
                if bar.date <= previous {
                    return Err(BandtraderError::UnorderedBars {
                        index,
                        previous,
                        date: bar.date,
                    });
                }
            }
        }
        Ok(Self {
            instrument: instrument.into(),
            bars,
        })
    }

    pub fn instrument(&self) -> &str {
        &self.instrument
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn bar(&self, t: usize) -> Option<&Bar> {
        self.bars.get(t)
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.bars.first().map(|b| b.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.bars.last().map(|b| b.date)
    }

    /// The `n` bars ending at (and including) bar `t`.
    pub fn window(&self, t: usize, n: usize) -> Option<&[Bar]> {
        if n == 0 || t >= self.bars.len() || t + 1 < n {
            return None;
        }
        Some(&self.bars[t + 1 - n..=t])
    }

    /// `close[t] - close[t - period]`, or `None` without `period` prior bars.
    pub fn trend(&self, t: usize, period: usize) -> Option<f64> {
        let current = self.bars.get(t)?;
        let past = self.bars.get(t.checked_sub(period)?)?;
        Some(current.close - past.close)
    }
}
