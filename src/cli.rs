//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::warn;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::csv_order_log;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::paper_broker::{
    DEFAULT_COMMISSION_RATE, DEFAULT_INITIAL_CAPITAL, Fill, PaperBroker,
};
use crate::domain::config_validation::{validate_run_config, validate_strategy_params};
use crate::domain::error::BandtraderError;
use crate::domain::event::SignalEvent;
use crate::domain::run::{self as run_driver, RunConfig, RunSummary};
use crate::domain::signal::SignalEngine;
use crate::domain::strategy::{self, StrategyParams};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::PriceSource;

const DEFAULT_DATA_DIR: &str = "data";

#[derive(Parser, Debug)]
#[command(
    name = "bandtrader",
    about = "Band-breakout strategy with an adaptive trailing exit"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a backtest over CSV daily bars
    Backtest {
        #[arg(short, long)]
        config: PathBuf,
        /// Overrides `[backtest] instrument`
        #[arg(long)]
        instrument: Option<String>,
        /// Write broker fills as CSV
        #[arg(long)]
        orders: Option<PathBuf>,
        /// Write decision events as CSV
        #[arg(long)]
        events: Option<PathBuf>,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Show data range for an instrument
    Info {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        instrument: Option<String>,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Backtest {
            config,
            instrument,
            orders,
            events,
        } => run_backtest(
            &config,
            instrument.as_deref(),
            orders.as_deref(),
            events.as_deref(),
        ),
        Command::Validate { config } => run_validate(&config),
        Command::Info { config, instrument } => run_info(&config, instrument.as_deref()),
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|err| {
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

fn report(err: &BandtraderError) -> ExitCode {
    eprintln!("error: {err}");
    err.into()
}

/// Everything a backtest produces, for printing and for the CSV logs.
#[derive(Debug, Clone)]
pub struct BacktestOutput {
    pub summary: RunSummary,
    pub fills: Vec<Fill>,
    pub events: Vec<SignalEvent>,
    pub initial_capital: f64,
    pub total_commission: f64,
}

fn run_backtest(
    config_path: &Path,
    instrument_override: Option<&str>,
    orders_path: Option<&Path>,
    events_path: Option<&Path>,
) -> ExitCode {
    // Stage 1: Load config
    eprintln!("Loading config from {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    // Stage 2: Build and validate run and strategy settings
    let mut run_config = match build_run_config(&adapter) {
        Ok(c) => c,
        Err(e) => return report(&e),
    };
    if let Some(instrument) = instrument_override {
        run_config.instrument = instrument.trim().to_string();
    }
    if let Err(e) = validate_run_config(&run_config) {
        return report(&e);
    }
    let params = match build_strategy_params(&adapter) {
        Ok(p) => p,
        Err(e) => return report(&e),
    };

    // Stage 3: Run
    let source = CsvAdapter::new(data_dir(&adapter));
    eprintln!(
        "Running backtest: {} from {} to {}",
        run_config.instrument, run_config.start_date, run_config.end_date
    );
    let output = match run_backtest_pipeline(&source, &run_config, params) {
        Ok(o) => o,
        Err(e) => return report(&e),
    };

    // Stage 4: Console summary
    print_summary(&output);

    // Stage 5: Logs
    if let Some(path) = orders_path {
        if let Err(e) = csv_order_log::write_fills_to_path(path, &output.fills) {
            return report(&e);
        }
        eprintln!("Orders written to: {}", path.display());
    }
    if let Some(path) = events_path {
        if let Err(e) = csv_order_log::write_events_to_path(path, &output.events) {
            return report(&e);
        }
        eprintln!("Events written to: {}", path.display());
    }

    ExitCode::SUCCESS
}

/// Loads the history, runs the engine against a paper broker and collects
/// the results.
pub fn run_backtest_pipeline(
    source: &dyn PriceSource,
    run_config: &RunConfig,
    params: StrategyParams,
) -> Result<BacktestOutput, BandtraderError> {
    let history = run_driver::load_history(source, run_config)?;
    let warmup = params.warmup_bars();
    if history.len() < warmup {
        warn!(
            instrument = history.instrument(),
            bars = history.len(),
            warmup,
            "history shorter than warmup, no signals possible"
        );
    }
    eprintln!("  Processing: {} bars", history.len());

    let mut engine = SignalEngine::new(params)?;
    let mut broker = PaperBroker::new(run_config.initial_capital, run_config.commission_rate);
    let summary = run_driver::run(&history, &mut engine, &mut broker)?;

    Ok(BacktestOutput {
        summary,
        events: engine.take_events(),
        initial_capital: broker.initial_capital(),
        total_commission: broker.total_commission(),
        fills: broker.fills().to_vec(),
    })
}

fn print_summary(output: &BacktestOutput) {
    let summary = &output.summary;
    eprintln!("\n=== Results: {} ===", summary.instrument);
    eprintln!("Bars Processed:   {}", summary.bars_processed);
    eprintln!("Bars Skipped:     {}", summary.bars_skipped);
    eprintln!("Orders Placed:    {}", summary.orders_placed);
    eprintln!("Orders Rejected:  {}", summary.orders_rejected);
    eprintln!("Long Entries:     {}", summary.long_entry_count);
    eprintln!("Short Entries:    {}", summary.short_entry_count);
    eprintln!("Final Position:   {}", summary.final_size);
    eprintln!("Final Window:     {}", summary.final_window_length);
    eprintln!("Commission Paid:  {:.2}", output.total_commission);
    if let Some(value) = summary.portfolio_value {
        let ret = (value / output.initial_capital - 1.0) * 100.0;
        eprintln!("Portfolio Value:  {:.2}", value);
        eprintln!("Total Return:     {:.2}%", ret);
    }
}

fn run_validate(config_path: &Path) -> ExitCode {
    eprintln!("Validating config: {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let run_config = match build_run_config(&adapter).and_then(|c| {
        validate_run_config(&c)?;
        Ok(c)
    }) {
        Ok(c) => c,
        Err(e) => return report(&e),
    };
    let params = match build_strategy_params(&adapter) {
        Ok(p) => p,
        Err(e) => return report(&e),
    };

    eprintln!("\nBacktest:");
    eprintln!("  instrument:      {}", run_config.instrument);
    eprintln!(
        "  range:           {} to {}",
        run_config.start_date, run_config.end_date
    );
    eprintln!("  initial_capital: {:.2}", run_config.initial_capital);
    eprintln!("  commission_rate: {}", run_config.commission_rate);
    eprintln!("\nStrategy:");
    eprintln!("  lot_size:        {}", params.lot_size);
    eprintln!(
        "  band:            period {}, dev {}",
        params.band_period, params.band_dev_factor
    );
    eprintln!("  trend_period:    {}", params.trend_period);
    eprintln!(
        "  adaptive window: {} down to {}, step {}",
        params.adaptive_window_max, params.adaptive_window_min, params.adaptive_step
    );
    eprintln!("  warmup bars:     {}", params.warmup_bars());

    eprintln!("\nConfiguration is valid.");
    ExitCode::SUCCESS
}

fn run_info(config_path: &Path, instrument: Option<&str>) -> ExitCode {
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    let instrument = match instrument
        .map(str::to_string)
        .or_else(|| config.get_string("backtest", "instrument"))
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
    {
        Some(i) => i,
        None => {
            return report(&BandtraderError::ConfigMissing {
                section: "backtest".into(),
                key: "instrument".into(),
            });
        }
    };

    let source = CsvAdapter::new(data_dir(&config));
    match source.data_range(&instrument) {
        Ok(Some((min_date, max_date, count))) => {
            println!("{}: {} bars, {} to {}", instrument, count, min_date, max_date);
            ExitCode::SUCCESS
        }
        Ok(None) => {
            eprintln!("{}: no data found", instrument);
            ExitCode::from(5)
        }
        Err(e) => report(&e),
    }
}

pub fn data_dir(config: &dyn ConfigPort) -> PathBuf {
    PathBuf::from(
        config
            .get_string("backtest", "data_dir")
            .unwrap_or_else(|| DEFAULT_DATA_DIR.to_string()),
    )
}

pub fn build_run_config(config: &dyn ConfigPort) -> Result<RunConfig, BandtraderError> {
    let instrument = config
        .get_string("backtest", "instrument")
        .map(|s| s.trim().to_string())
        .unwrap_or_default();

    Ok(RunConfig {
        instrument,
        start_date: config.get_date("backtest", "start_date")?,
        end_date: config.get_date("backtest", "end_date")?,
        initial_capital: config.get_double(
            "backtest",
            "initial_capital",
            DEFAULT_INITIAL_CAPITAL,
        )?,
        commission_rate: config.get_double(
            "backtest",
            "commission_rate",
            DEFAULT_COMMISSION_RATE,
        )?,
    })
}

pub fn build_strategy_params(config: &dyn ConfigPort) -> Result<StrategyParams, BandtraderError> {
    let params = StrategyParams {
        lot_size: count(config, "lot_size", strategy::DEFAULT_LOT_SIZE as usize)? as u64,
        band_period: count(config, "band_period", strategy::DEFAULT_BAND_PERIOD)?,
        band_dev_factor: config.get_double(
            "strategy",
            "band_dev_factor",
            strategy::DEFAULT_BAND_DEV_FACTOR,
        )?,
        trend_period: count(config, "trend_period", strategy::DEFAULT_TREND_PERIOD)?,
        adaptive_window_max: count(
            config,
            "adaptive_window_max",
            strategy::DEFAULT_ADAPTIVE_WINDOW_MAX,
        )?,
        adaptive_window_min: count(
            config,
            "adaptive_window_min",
            strategy::DEFAULT_ADAPTIVE_WINDOW_MIN,
        )?,
        adaptive_step: count(config, "adaptive_step", strategy::DEFAULT_ADAPTIVE_STEP)?,
    };
    validate_strategy_params(&params)?;
    Ok(params)
}

/// Non-negative `[strategy]` integer, or `default` when absent.
fn count(config: &dyn ConfigPort, key: &str, default: usize) -> Result<usize, BandtraderError> {
    let raw = config.get_int("strategy", key, default as i64)?;
    usize::try_from(raw).map_err(|_| BandtraderError::ConfigInvalid {
        section: "strategy".into(),
        key: key.into(),
        reason: format!("{key} must be a non-negative integer, got {raw}"),
    })
}
