//! Deviation band over closing prices.
//!
//! - Mean: arithmetic mean of the last n closes
//! - Upper: mean + (k × stddev)
//! - Lower: mean - (k × stddev)
//!
//! StdDev is the population standard deviation (divides by n, not n-1).
//! Undefined for the first (n-1) bars.

use crate::domain::bar::Bar;
use crate::domain::history::PriceHistory;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Band {
    pub mean: f64,
    pub upper: f64,
    pub lower: f64,
}

#[cfg(test)]
impl Band {
    /// Distance from the mean to either edge.
    fn half_width(&self) -> f64 {
        self.upper - self.mean
    }
}

/// Population standard deviation of closes around `mean`.
pub fn population_stddev(window: &[Bar], mean: f64) -> f64 {
    let variance = window
        .iter()
        .map(|b| {
            let diff = b.close - mean;
            diff * diff
        })
        .sum::<f64>()
        / window.len() as f64;
    variance.sqrt()
}

/// Band over an already-selected window. An empty window has no band.
pub fn band_of(window: &[Bar], dev_factor: f64) -> Option<Band> {
    if window.is_empty() {
        return None;
    }
    let mean = window.iter().map(|b| b.close).sum::<f64>() / window.len() as f64;
    let spread = dev_factor * population_stddev(window, mean);
    Some(Band {
        mean,
        upper: mean + spread,
        lower: mean - spread,
    })
}

pub fn band_at(history: &PriceHistory, t: usize, period: usize, dev_factor: f64) -> Option<Band> {
    history
        .window(t, period)
        .and_then(|window| band_of(window, dev_factor))
}
