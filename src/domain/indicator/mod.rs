//! Technical indicator implementations.
//!
//! - `IndicatorType`: indicator identity + parameters
//! - `IndicatorSeries`: one value per bar, `None` during warmup
//! - `IndicatorSet`: the fast/slow pair the crossover compares

pub mod sma;

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndicatorType {
    Sma(usize),
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorSeries {
    pub indicator_type: IndicatorType,
    pub values: Vec<Option<f64>>,
}

impl IndicatorSeries {
    /// Number of leading bars without a value.
    pub fn warmup(&self) -> usize {
        self.values.iter().take_while(|v| v.is_none()).count()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorSet {
    pub fast: IndicatorSeries,
    pub slow: IndicatorSeries,
}

impl fmt::Display for IndicatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorType::Sma(period) => write!(f, "SMA({})", period),
        }
    }
}
