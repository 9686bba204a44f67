//! OHLCV bar as delivered by a data source.

use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq)]
pub struct OhlcvBar {
    pub code: String,
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// First and last date plus bar count, `None` when `bars` is empty.
pub fn data_range(bars: &[OhlcvBar]) -> Option<(NaiveDate, NaiveDate, usize)> {
    let first = bars.iter().map(|b| b.date).min()?;
    let last = bars.iter().map(|b| b.date).max()?;
    Some((first, last, bars.len()))
}
