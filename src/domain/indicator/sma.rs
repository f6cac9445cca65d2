//! Simple moving average over a variable window.
//!
//! SMA(w)[t] = sum(C[t-j] for j in 0..w) / w. The window is not fixed: the
//! signal engine passes its current adaptive length on every call, and the
//! average is recomputed from scratch.

use crate::domain::history::PriceHistory;

pub fn adaptive_average_at(history: &PriceHistory, t: usize, window: usize) -> Option<f64> {
    let bars = history.window(t, window)?;
    Some(bars.iter().map(|b| b.close).sum::<f64>() / window as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::bar::Bar;
    use chrono::NaiveDate;

    fn make_history(prices: &[f64]) -> PriceHistory {
        let start = NaiveDate::from_ymd_opt(2019, 5, 1).unwrap();
        let bars = prices
            .iter()
            .enumerate()
            .map(|(i, &close)| Bar {
                date: start + chrono::Duration::days(i as i64),
                open: close,
                high: close,
                low: close,
                close,
                volume: 1000,
            })
            .collect();
        PriceHistory::new("TEST", bars).unwrap()
    }

    #[test]
    fn average_warmup() {
        let h = make_history(&[1.0, 2.0, 3.0]);
        assert_eq!(adaptive_average_at(&h, 1, 3), None);
        assert_eq!(adaptive_average_at(&h, 2, 3), Some(2.0));
    }

    #[test]
    fn average_follows_window_length() {
        let h = make_history(&[10.0, 20.0, 30.0, 40.0, 50.0]);
        assert_eq!(adaptive_average_at(&h, 4, 5), Some(30.0));
        assert_eq!(adaptive_average_at(&h, 4, 2), Some(45.0));
        assert_eq!(adaptive_average_at(&h, 4, 1), Some(50.0));
    }

    #[test]
    fn zero_window_is_undefined() {
        let h = make_history(&[10.0, 20.0]);
        assert_eq!(adaptive_average_at(&h, 1, 0), None);
    }
}
