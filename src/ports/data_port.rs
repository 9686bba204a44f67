//! Price history source.
//!
//! Retrieval, symbol validation and caching belong to implementors; the
//! backtest only sees the returned bars.

use crate::domain::error::MacrossError;
use crate::domain::ohlcv::OhlcvBar;
use chrono::NaiveDate;

pub trait DataPort {
    /// Daily bars for `code`, ascending by date. `None` bounds are open.
    fn fetch_ohlcv(
        &self,
        code: &str,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Vec<OhlcvBar>, MacrossError>;

    fn list_symbols(&self) -> Result<Vec<String>, MacrossError>;

    /// First date, last date and bar count, `None` when nothing is stored.
    fn get_data_range(
        &self,
        code: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, MacrossError>;
}
