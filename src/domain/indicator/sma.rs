//! Simple Moving Average.
//!
//! SMA(n)[i] = sum(C[i-j] for j in 0..n) / n
//! Warmup: first (n-1) bars have no value.

use crate::domain::error::MacrossError;
use crate::domain::indicator::{IndicatorSeries, IndicatorType};

pub fn compute_sma(prices: &[f64], window: usize) -> Result<Vec<Option<f64>>, MacrossError> {
    if window == 0 {
        return Err(MacrossError::invalid_parameter(
            "window",
            "must be at least 1",
        ));
    }

    let warmup = window - 1;
    let values = (0..prices.len())
        .map(|i| {
            if i < warmup {
                None
            } else {
                let start = i + 1 - window;
                let sum: f64 = prices[start..=i].iter().sum();
                Some(sum / window as f64)
            }
        })
        .collect();

    Ok(values)
}

pub fn calculate_sma(prices: &[f64], window: usize) -> Result<IndicatorSeries, MacrossError> {
    Ok(IndicatorSeries {
        indicator_type: IndicatorType::Sma(window),
        values: compute_sma(prices, window)?,
    })
}
