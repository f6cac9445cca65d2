//! Run driver: feeds a price history through a signal engine bar by bar.
//!
//! RunConfig holds the run-level settings read from `[backtest]`.

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::domain::error::BandtraderError;
use crate::domain::history::PriceHistory;
use crate::domain::signal::{SignalEngine, StepOutcome};
use crate::ports::data_port::PriceSource;
use crate::ports::order_port::OrderSink;

#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub instrument: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub initial_capital: f64,
    pub commission_rate: f64,
}

/// End-of-run figures for reporting.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub instrument: String,
    pub long_entry_count: u64,
    pub short_entry_count: u64,
    pub final_size: i64,
    pub final_window_length: usize,
    pub bars_processed: usize,
    pub bars_skipped: usize,
    pub orders_placed: usize,
    /// Orders the sink refused. The engine state was left as it was and the
    /// run moved on to the next bar.
    pub orders_rejected: usize,
    /// As reported by the order sink; the engine does not value positions.
    pub portfolio_value: Option<f64>,
}

/// Loads and validates the history for `config`'s instrument and date range.
pub fn load_history(
    source: &dyn PriceSource,
    config: &RunConfig,
) -> Result<PriceHistory, BandtraderError> {
    let bars = source.fetch_bars(&config.instrument, config.start_date, config.end_date)?;
    if bars.is_empty() {
        return Err(BandtraderError::NoData {
            instrument: config.instrument.clone(),
            start: config.start_date,
            end: config.end_date,
        });
    }
    PriceHistory::new(config.instrument.clone(), bars)
}

/// Steps every bar of `history` in order.
pub fn run<S: OrderSink + ?Sized>(
    history: &PriceHistory,
    engine: &mut SignalEngine,
    sink: &mut S,
) -> Result<RunSummary, BandtraderError> {
    run_from(history, 0, engine, sink)
}

/// Steps bars `start..` of `history`, for resuming from a snapshot taken
/// after bar `start - 1`.
///
/// A rejected order costs only that bar's decision. Any other error ends the
/// run.
pub fn run_from<S: OrderSink + ?Sized>(
    history: &PriceHistory,
    start: usize,
    engine: &mut SignalEngine,
    sink: &mut S,
) -> Result<RunSummary, BandtraderError> {
    let mut bars_skipped = 0;
    let mut orders_placed = 0;
    let mut orders_rejected = 0;

    for t in start..history.len() {
        let bar = &history.bars()[t];
        sink.on_bar(bar);
        match engine.step(history, t, sink) {
            Ok(StepOutcome::Skipped) => bars_skipped += 1,
            Ok(StepOutcome::Hold) => {}
            Ok(StepOutcome::Entered(_) | StepOutcome::Exited(_)) => orders_placed += 1,
            Err(BandtraderError::Order { date, source }) => {
                warn!(
                    instrument = history.instrument(),
                    %date,
                    error = %source,
                    "order rejected, continuing with next bar"
                );
                orders_rejected += 1;
            }
            Err(e) => return Err(e),
        }
    }

    let state = engine.snapshot();
    let bars_processed = history.len().saturating_sub(start);
    debug!(
        instrument = history.instrument(),
        bars_processed,
        bars_skipped,
        orders_placed,
        orders_rejected,
        "run finished"
    );

    Ok(RunSummary {
        instrument: history.instrument().to_string(),
        long_entry_count: state.long_entry_count,
        short_entry_count: state.short_entry_count,
        final_size: state.size,
        final_window_length: state.adaptive_window_length,
        bars_processed,
        bars_skipped,
        orders_placed,
        orders_rejected,
        portfolio_value: sink.portfolio_value(),
    })
}
