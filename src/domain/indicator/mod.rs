//! Indicator engine.
//!
//! Provides the per-bar indicator values the signal engine consults:
//! - `Band`: mean ± k·stddev over a fixed window of closes (see [`band`])
//! - adaptive average: simple average of closes over a caller-chosen window (see [`sma`])
//!
//! Both are pure functions of the history window ending at a bar and return
//! `None` while the window is not yet filled.

pub mod band;
pub mod sma;

pub use band::Band;

use crate::domain::history::PriceHistory;

/// Indicator values for a single bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndicatorSnapshot {
    pub band: Option<Band>,
    pub adaptive_average: Option<f64>,
}

/// Computes the band and the adaptive average for bar `t`.
///
/// `window` is the adaptive-average length currently chosen by the signal
/// engine.
pub fn snapshot_at(
    history: &PriceHistory,
    t: usize,
    band_period: usize,
    band_dev_factor: f64,
    window: usize,
) -> IndicatorSnapshot {
    IndicatorSnapshot {
        band: band::band_at(history, t, band_period, band_dev_factor),
        adaptive_average: sma::adaptive_average_at(history, t, window),
    }
}
