//! Property tests for the signal engine over random price paths.

mod common;

use bandtrader::domain::bar::Bar;
use bandtrader::domain::event::Trigger;
use bandtrader::domain::history::PriceHistory;
use bandtrader::domain::order::OrderAction;
use bandtrader::domain::signal::{SignalEngine, StepOutcome};
use bandtrader::domain::strategy::StrategyParams;
use common::*;
use proptest::prelude::*;

/// Random walk from 100 with intrabar lows below the close.
fn price_path() -> impl Strategy<Value = Vec<(f64, f64)>> {
    prop::collection::vec((-3.0f64..3.0, 0.0f64..2.0), 30..160)
}

fn params_strategy() -> impl Strategy<Value = StrategyParams> {
    (1usize..30, 0.0f64..3.0, 1usize..25, 1usize..20, 1usize..40, 1usize..5).prop_map(
        |(band_period, band_dev_factor, trend_period, adaptive_window_min, extra, adaptive_step)| {
            StrategyParams {
                lot_size: 100,
                band_period,
                band_dev_factor,
                trend_period,
                adaptive_window_min,
                adaptive_window_max: adaptive_window_min + extra,
                adaptive_step,
            }
        },
    )
}

fn build_history(path: &[(f64, f64)]) -> PriceHistory {
    let start = date(2020, 1, 1);
    let mut close = 100.0f64;
    let bars = path
        .iter()
        .enumerate()
        .map(|(i, &(change, dip))| {
            close = (close + change).max(1.0);
            let low = (close - dip).max(0.5);
            Bar {
                date: start + chrono::Duration::days(i as i64),
                open: close,
                high: close,
                low,
                close,
                volume: 1000,
            }
        })
        .collect();
    PriceHistory::new("PROP", bars).unwrap()
}

proptest! {
    #[test]
    fn position_is_flat_or_one_lot(path in price_path(), params in params_strategy()) {
        let history = build_history(&path);
        let mut engine = SignalEngine::new(params.clone()).unwrap();
        let mut sink = RecordingSink::default();

        for t in 0..history.len() {
            engine.step(&history, t, &mut sink).unwrap();
            let size = engine.state().size;
            prop_assert!(size == 0 || size == params.lot_size as i64);
            prop_assert_eq!(engine.state().short_entry_count, 0);
        }
    }

    #[test]
    fn orders_alternate_starting_with_buy(path in price_path(), params in params_strategy()) {
        let history = build_history(&path);
        let mut engine = SignalEngine::new(params).unwrap();
        let mut sink = RecordingSink::default();

        for t in 0..history.len() {
            let before = sink.orders.len();
            engine.step(&history, t, &mut sink).unwrap();
            prop_assert!(sink.orders.len() <= before + 1);
        }

        for (i, order) in sink.orders.iter().enumerate() {
            let expected = if i % 2 == 0 { OrderAction::Buy } else { OrderAction::Sell };
            prop_assert_eq!(order.action, expected);
        }
        let buys = sink.orders.iter().filter(|o| o.action == OrderAction::Buy).count();
        prop_assert_eq!(engine.state().long_entry_count, buys as u64);
    }

    #[test]
    fn window_resets_when_flat_and_contracts_when_held(
        path in price_path(),
        params in params_strategy()
    ) {
        let history = build_history(&path);
        let mut engine = SignalEngine::new(params.clone()).unwrap();
        let mut sink = RecordingSink::default();

        for t in 0..history.len() {
            let before = *engine.state();
            let outcome = engine.step(&history, t, &mut sink).unwrap();
            let after = engine.state().adaptive_window_length;

            prop_assert!(after >= params.adaptive_window_min);
            prop_assert!(after <= params.adaptive_window_max);
            match outcome {
                StepOutcome::Skipped => prop_assert_eq!(*engine.state(), before),
                _ if before.is_flat() => prop_assert_eq!(after, params.adaptive_window_max),
                _ => prop_assert_eq!(
                    after,
                    before
                        .adaptive_window_length
                        .saturating_sub(params.adaptive_step)
                        .max(params.adaptive_window_min)
                ),
            }
        }
    }

    #[test]
    fn every_event_satisfies_its_rule(path in price_path(), params in params_strategy()) {
        let history = build_history(&path);
        let mut engine = SignalEngine::new(params).unwrap();
        let mut sink = RecordingSink::default();

        for t in 0..history.len() {
            engine.step(&history, t, &mut sink).unwrap();
        }

        for event in engine.events() {
            let bar = history.bars().iter().find(|b| b.date == event.date).unwrap();
            prop_assert_eq!(event.price, bar.close);
            match (event.action, event.trigger) {
                (OrderAction::Buy, Trigger::BandBreakout { upper, trend }) => {
                    prop_assert!(trend > 0.0);
                    prop_assert!(bar.close >= upper);
                }
                (OrderAction::Sell, Trigger::AdaptiveAverageTouch { average, upper, .. }) => {
                    prop_assert!(bar.low <= average);
                    prop_assert!(average < upper);
                }
                (action, trigger) => {
                    prop_assert!(false, "{} paired with {}", action, trigger);
                }
            }
        }
    }

    #[test]
    fn replay_is_deterministic(path in price_path(), params in params_strategy()) {
        let history = build_history(&path);

        let mut first = SignalEngine::new(params.clone()).unwrap();
        let mut first_sink = RecordingSink::default();
        let mut second = SignalEngine::new(params).unwrap();
        let mut second_sink = RecordingSink::default();
        for t in 0..history.len() {
            engine_step(&mut first, &history, t, &mut first_sink);
            engine_step(&mut second, &history, t, &mut second_sink);
        }

        prop_assert_eq!(first.snapshot(), second.snapshot());
        prop_assert_eq!(first.events(), second.events());
        prop_assert_eq!(first_sink.orders, second_sink.orders);
    }

    #[test]
    fn resume_matches_uninterrupted(
        path in price_path(),
        params in params_strategy(),
        split in 0.0f64..1.0
    ) {
        let history = build_history(&path);
        let cut = ((history.len() as f64) * split) as usize;

        let mut whole = SignalEngine::new(params.clone()).unwrap();
        let mut whole_sink = RecordingSink::default();
        for t in 0..history.len() {
            engine_step(&mut whole, &history, t, &mut whole_sink);
        }

        let mut head = SignalEngine::new(params.clone()).unwrap();
        let mut split_sink = RecordingSink::default();
        for t in 0..cut {
            engine_step(&mut head, &history, t, &mut split_sink);
        }
        let mut tail = SignalEngine::from_snapshot(params, head.snapshot()).unwrap();
        for t in cut..history.len() {
            engine_step(&mut tail, &history, t, &mut split_sink);
        }

        prop_assert_eq!(tail.snapshot(), whole.snapshot());
        prop_assert_eq!(split_sink.orders, whole_sink.orders);
    }
}

fn engine_step(engine: &mut SignalEngine, history: &PriceHistory, t: usize, sink: &mut RecordingSink) {
    engine.step(history, t, sink).unwrap();
}
