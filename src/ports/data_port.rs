//! Price history source port trait.

use crate::domain::bar::Bar;
use crate::domain::error::BandtraderError;
use chrono::NaiveDate;

pub trait PriceSource {
    /// Bars for `instrument` with dates in `[start_date, end_date]`, oldest first.
    ///
    /// Non-trading days are simply absent. Calling this again with the same
    /// arguments yields the same sequence.
    fn fetch_bars(
        &self,
        instrument: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<Bar>, BandtraderError>;

    /// First date, last date and bar count available for `instrument`.
    fn data_range(
        &self,
        instrument: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, BandtraderError>;
}
