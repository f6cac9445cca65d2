//! Configuration validation.
//!
//! Checks every parameter before a run so that bad values surface as a
//! configuration error at setup rather than as odd behaviour mid-run.

use crate::domain::error::BandtraderError;
use crate::domain::run::RunConfig;
use crate::domain::strategy::StrategyParams;

/// Positions are stored as `i64`.
pub const MAX_LOT_SIZE: u64 = i64::MAX as u64;

pub fn validate_run_config(config: &RunConfig) -> Result<(), BandtraderError> {
    if config.instrument.trim().is_empty() {
        return Err(BandtraderError::ConfigMissing {
            section: "backtest".to_string(),
            key: "instrument".to_string(),
        });
    }
    if config.start_date >= config.end_date {
        return Err(invalid(
            "backtest",
            "start_date",
            "start_date must be before end_date",
        ));
    }
    if !(config.initial_capital > 0.0) {
        return Err(invalid(
            "backtest",
            "initial_capital",
            "initial_capital must be positive",
        ));
    }
    if !(config.commission_rate >= 0.0 && config.commission_rate < 1.0) {
        return Err(invalid(
            "backtest",
            "commission_rate",
            "commission_rate must be in [0, 1)",
        ));
    }
    Ok(())
}

pub fn validate_strategy_params(params: &StrategyParams) -> Result<(), BandtraderError> {
    if params.lot_size < 1 {
        return Err(invalid("strategy", "lot_size", "lot_size must be at least 1"));
    }
    if params.lot_size > MAX_LOT_SIZE {
        return Err(invalid(
            "strategy",
            "lot_size",
            "lot_size must fit a signed position size",
        ));
    }
    if params.band_period < 1 {
        return Err(invalid(
            "strategy",
            "band_period",
            "band_period must be at least 1",
        ));
    }
    if !(params.band_dev_factor >= 0.0) || !params.band_dev_factor.is_finite() {
        return Err(invalid(
            "strategy",
            "band_dev_factor",
            "band_dev_factor must be a non-negative number",
        ));
    }
    if params.trend_period < 1 {
        return Err(invalid(
            "strategy",
            "trend_period",
            "trend_period must be at least 1",
        ));
    }
    if params.adaptive_window_min < 1 {
        return Err(invalid(
            "strategy",
            "adaptive_window_min",
            "adaptive_window_min must be at least 1",
        ));
    }
    if params.adaptive_window_min > params.adaptive_window_max {
        return Err(invalid(
            "strategy",
            "adaptive_window_min",
            "adaptive_window_min must not exceed adaptive_window_max",
        ));
    }
    if params.adaptive_step < 1 {
        return Err(invalid(
            "strategy",
            "adaptive_step",
            "adaptive_step must be at least 1",
        ));
    }
    Ok(())
}

fn invalid(section: &str, key: &str, reason: &str) -> BandtraderError {
    BandtraderError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.to_string(),
    }
}
