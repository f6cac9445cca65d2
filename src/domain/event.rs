//! Structured decision events recorded alongside each emitted order.

use crate::domain::order::OrderAction;
use chrono::NaiveDate;
use std::fmt;

/// The rule that produced an action, with the values it compared.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Trigger {
    /// Close touched or broke the upper band during an uptrend.
    BandBreakout { upper: f64, trend: f64 },
    /// Low touched the adaptive average while it sat below the upper band.
    AdaptiveAverageTouch {
        average: f64,
        upper: f64,
        window: usize,
    },
}

impl Trigger {
    pub fn name(&self) -> &'static str {
        match self {
            Trigger::BandBreakout { .. } => "band_breakout",
            Trigger::AdaptiveAverageTouch { .. } => "adaptive_average_touch",
        }
    }
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trigger::BandBreakout { upper, trend } => {
                write!(f, "band_breakout(upper={upper:.4}, trend={trend:.4})")
            }
            Trigger::AdaptiveAverageTouch {
                average,
                upper,
                window,
            } => write!(
                f,
                "adaptive_average_touch(average={average:.4}, upper={upper:.4}, window={window})"
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignalEvent {
    pub date: NaiveDate,
    pub action: OrderAction,
    pub price: f64,
    pub size: u64,
    pub trigger: Trigger,
}
