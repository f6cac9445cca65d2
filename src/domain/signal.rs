//! Signal/position engine.
//!
//! Steps one bar at a time:
//! 1. Skip the bar entirely while the trend lookback is unavailable
//! 2. Flat: buy `lot_size` when the trend is up and close >= upper band
//! 3. Move the adaptive window: reset to max while flat, otherwise shrink by
//!    `adaptive_step` down to `adaptive_window_min`
//! 4. Long: sell everything when low <= adaptive average < upper band
//!
//! The window update and the exit rule look at the position held coming into
//! the bar, so a bar never carries both an entry and an exit and the window
//! starts shrinking on the bar after an entry.
//!
//! State is committed only after the order sink accepts the order. A rejected
//! order leaves the engine exactly as it was before the step.

use tracing::{debug, info, warn};

use crate::domain::bar::Bar;
use crate::domain::config_validation::validate_strategy_params;
use crate::domain::error::BandtraderError;
use crate::domain::event::{SignalEvent, Trigger};
use crate::domain::history::PriceHistory;
use crate::domain::indicator::{self, IndicatorSnapshot};
use crate::domain::order::{Order, OrderAction};
use crate::domain::position_state::PositionState;
use crate::domain::strategy::StrategyParams;
use crate::ports::order_port::OrderSink;

/// What a single step did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Not enough history for the trend lookback; state untouched.
    Skipped,
    Hold,
    Entered(Order),
    Exited(Order),
}

impl StepOutcome {
    pub fn order(&self) -> Option<&Order> {
        match self {
            StepOutcome::Entered(order) | StepOutcome::Exited(order) => Some(order),
            StepOutcome::Skipped | StepOutcome::Hold => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SignalEngine {
    params: StrategyParams,
    state: PositionState,
    events: Vec<SignalEvent>,
}

impl SignalEngine {
    pub fn new(params: StrategyParams) -> Result<Self, BandtraderError> {
        validate_strategy_params(&params)?;
        let state = PositionState::initial(params.adaptive_window_max);
        Ok(Self {
            params,
            state,
            events: Vec::new(),
        })
    }

    /// Resumes from a previously taken [`snapshot`](Self::snapshot).
    pub fn from_snapshot(
        params: StrategyParams,
        state: PositionState,
    ) -> Result<Self, BandtraderError> {
        validate_strategy_params(&params)?;
        if state.size != 0 && state.size != params.lot_position() {
            return Err(BandtraderError::InvalidSnapshot {
                reason: format!(
                    "size {} is neither flat nor one lot of {}",
                    state.size, params.lot_size
                ),
            });
        }
        if state.adaptive_window_length < params.adaptive_window_min
            || state.adaptive_window_length > params.adaptive_window_max
        {
            return Err(BandtraderError::InvalidSnapshot {
                reason: format!(
                    "adaptive window {} outside [{}, {}]",
                    state.adaptive_window_length,
                    params.adaptive_window_min,
                    params.adaptive_window_max
                ),
            });
        }
        if state.short_entry_count != 0 {
            return Err(BandtraderError::InvalidSnapshot {
                reason: "short entries are not supported".to_string(),
            });
        }
        Ok(Self {
            params,
            state,
            events: Vec::new(),
        })
    }

    pub fn params(&self) -> &StrategyParams {
        &self.params
    }

    pub fn state(&self) -> &PositionState {
        &self.state
    }

    pub fn snapshot(&self) -> PositionState {
        self.state
    }

    /// Events recorded for every accepted order, oldest first.
    pub fn events(&self) -> &[SignalEvent] {
        &self.events
    }

    pub fn take_events(&mut self) -> Vec<SignalEvent> {
        std::mem::take(&mut self.events)
    }

    /// Processes bar `t` of `history`, placing at most one order on `sink`.
    pub fn step<S: OrderSink + ?Sized>(
        &mut self,
        history: &PriceHistory,
        t: usize,
        sink: &mut S,
    ) -> Result<StepOutcome, BandtraderError> {
        let bar = history.bar(t).ok_or(BandtraderError::BarOutOfRange {
            index: t,
            len: history.len(),
        })?;

        let Some(trend) = history.trend(t, self.params.trend_period) else {
            debug!(date = %bar.date, "trend lookback unavailable, skipping bar");
            return Ok(StepOutcome::Skipped);
        };

        let before = self.state;
        let mut next = before;
        next.adaptive_window_length = before.next_window(
            self.params.adaptive_window_min,
            self.params.adaptive_window_max,
            self.params.adaptive_step,
        );

        // Entry never reads the adaptive average, so the updated window is
        // safe to use for the whole snapshot.
        let indicators = indicator::snapshot_at(
            history,
            t,
            self.params.band_period,
            self.params.band_dev_factor,
            next.adaptive_window_length,
        );

        let signal = if before.is_flat() {
            self.entry_signal(bar, trend, &indicators)
        } else {
            exit_signal(bar, &before, next.adaptive_window_length, &indicators)
        };

        let Some((order, trigger)) = signal else {
            self.state = next;
            return Ok(StepOutcome::Hold);
        };

        if let Err(source) = sink.place(&order) {
            warn!(
                date = %bar.date,
                action = %order.action,
                size = order.size,
                error = %source,
                "order rejected, state left unchanged"
            );
            return Err(BandtraderError::Order {
                date: bar.date,
                source,
            });
        }

        let outcome = match order.action {
            OrderAction::Buy => {
                next.size = self.params.lot_position();
                next.long_entry_count += 1;
                StepOutcome::Entered(order)
            }
            OrderAction::Sell => {
                next.size = 0;
                StepOutcome::Exited(order)
            }
        };
        self.state = next;

        let event = SignalEvent {
            date: bar.date,
            action: order.action,
            price: bar.close,
            size: order.size,
            trigger,
        };
        info!(
            instrument = history.instrument(),
            date = %event.date,
            action = %event.action,
            price = event.price,
            size = event.size,
            trigger = %event.trigger,
            "signal"
        );
        self.events.push(event);

        Ok(outcome)
    }

    fn entry_signal(
        &self,
        bar: &Bar,
        trend: f64,
        indicators: &IndicatorSnapshot,
    ) -> Option<(Order, Trigger)> {
        let band = indicators.band?;
        if trend > 0.0 && bar.close >= band.upper {
            Some((
                Order::buy(self.params.lot_size, bar.date),
                Trigger::BandBreakout {
                    upper: band.upper,
                    trend,
                },
            ))
        } else {
            None
        }
    }
}

fn exit_signal(
    bar: &Bar,
    held: &PositionState,
    window: usize,
    indicators: &IndicatorSnapshot,
) -> Option<(Order, Trigger)> {
    if !held.is_long() {
        return None;
    }
    let band = indicators.band?;
    let average = indicators.adaptive_average?;
    if bar.low <= average && average < band.upper {
        Some((
            Order::sell(held.size.unsigned_abs(), bar.date),
            Trigger::AdaptiveAverageTouch {
                average,
                upper: band.upper,
                window,
            },
        ))
    } else {
        None
    }
}
