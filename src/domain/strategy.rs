//! Strategy parameters for the band-breakout / adaptive-average system.

pub const DEFAULT_LOT_SIZE: u64 = 100;
pub const DEFAULT_BAND_PERIOD: usize = 20;
pub const DEFAULT_BAND_DEV_FACTOR: f64 = 2.0;
pub const DEFAULT_TREND_PERIOD: usize = 20;
pub const DEFAULT_ADAPTIVE_WINDOW_MAX: usize = 50;
pub const DEFAULT_ADAPTIVE_WINDOW_MIN: usize = 10;
pub const DEFAULT_ADAPTIVE_STEP: usize = 2;

#[derive(Debug, Clone, PartialEq)]
pub struct StrategyParams {
    pub lot_size: u64,
    pub band_period: usize,
    pub band_dev_factor: f64,
    pub trend_period: usize,
    pub adaptive_window_max: usize,
    pub adaptive_window_min: usize,
    pub adaptive_step: usize,
}

impl Default for StrategyParams {
    fn default() -> Self {
        StrategyParams {
            lot_size: DEFAULT_LOT_SIZE,
            band_period: DEFAULT_BAND_PERIOD,
            band_dev_factor: DEFAULT_BAND_DEV_FACTOR,
            trend_period: DEFAULT_TREND_PERIOD,
            adaptive_window_max: DEFAULT_ADAPTIVE_WINDOW_MAX,
            adaptive_window_min: DEFAULT_ADAPTIVE_WINDOW_MIN,
            adaptive_step: DEFAULT_ADAPTIVE_STEP,
        }
    }
}

impl StrategyParams {
    /// Bars needed before both the band and the trend lookback are defined.
    pub fn warmup_bars(&self) -> usize {
        self.band_period.max(self.trend_period + 1)
    }

    /// `lot_size` as a signed position. Validated params never exceed
    /// `i64::MAX`.
    pub fn lot_position(&self) -> i64 {
        i64::try_from(self.lot_size).unwrap_or(i64::MAX)
    }
}
