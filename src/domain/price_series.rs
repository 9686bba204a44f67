//! Daily close-price series consumed by the backtest pipeline.
//!
//! Invariants: strictly increasing dates, finite positive closes. Both are
//! checked once at construction so downstream stages can index freely.

use crate::domain::error::MacrossError;
use crate::domain::ohlcv::OhlcvBar;
use chrono::NaiveDate;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    dates: Vec<NaiveDate>,
    closes: Vec<f64>,
}

impl PriceSeries {
    pub fn new(points: Vec<PricePoint>) -> Result<Self, MacrossError> {
        let mut dates = Vec::with_capacity(points.len());
        let mut closes = Vec::with_capacity(points.len());

        for point in points {
            if !point.close.is_finite() || point.close <= 0.0 {
                return Err(MacrossError::MalformedSeries {
                    reason: format!(
                        "close {} on {} is not a positive number",
                        point.close, point.date
                    ),
                });
            }
            if let Some(&prev) = dates.last() {
                if point.date <= prev {
                    return Err(MacrossError::MalformedSeries {
                        reason: format!("date {} does not follow {}", point.date, prev),
                    });
                }
            }
            dates.push(point.date);
            closes.push(point.close);
        }

        Ok(Self { dates, closes })
    }

    /// Builds a series from the closes of `bars`, which must already be sorted.
    pub fn from_bars(bars: &[OhlcvBar]) -> Result<Self, MacrossError> {
        Self::new(
            bars.iter()
                .map(|b| PricePoint {
                    date: b.date,
                    close: b.close,
                })
                .collect(),
        )
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn closes(&self) -> &[f64] {
        &self.closes
    }

    pub fn len(&self) -> usize {
        self.closes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.closes.is_empty()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.dates.first().copied()
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.dates.last().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(day: u32, close: f64) -> PricePoint {
        PricePoint {
            date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            close,
        }
    }

    #[test]
    fn new_splits_columns() {
        let series = PriceSeries::new(vec![point(1, 100.0), point(2, 101.5)]).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.closes(), &[100.0, 101.5]);
        assert_eq!(series.first_date(), NaiveDate::from_ymd_opt(2024, 1, 1));
        assert_eq!(series.last_date(), NaiveDate::from_ymd_opt(2024, 1, 2));
    }

    #[test]
    fn empty_series_is_allowed() {
        let series = PriceSeries::new(vec![]).unwrap();
        assert!(series.is_empty());
        assert_eq!(series.first_date(), None);
    }

    #[test]
    fn rejects_duplicate_dates() {
        let err = PriceSeries::new(vec![point(1, 100.0), point(1, 101.0)]).unwrap_err();
        assert!(matches!(err, MacrossError::MalformedSeries { .. }));
    }

    #[test]
    fn rejects_descending_dates() {
        let err = PriceSeries::new(vec![point(2, 100.0), point(1, 101.0)]).unwrap_err();
        assert!(matches!(err, MacrossError::MalformedSeries { .. }));
    }

    #[test]
    fn rejects_non_positive_close() {
        let err = PriceSeries::new(vec![point(1, 100.0), point(2, 0.0)]).unwrap_err();
        assert!(matches!(err, MacrossError::MalformedSeries { .. }));
    }

    #[test]
    fn rejects_nan_close() {
        let err = PriceSeries::new(vec![point(1, f64::NAN)]).unwrap_err();
        assert!(matches!(err, MacrossError::MalformedSeries { .. }));
    }

    #[test]
    fn from_bars_uses_close() {
        let bars = vec![OhlcvBar {
            code: "SPY".into(),
            date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            open: 99.0,
            high: 102.0,
            low: 98.0,
            close: 101.0,
            volume: 5_000.0,
        }];
        let series = PriceSeries::from_bars(&bars).unwrap();
        assert_eq!(series.closes(), &[101.0]);
    }
}
