//! Backtest entry point.
//!
//! PriceSeries -> indicators -> signal -> {returns, trades} -> report.
//! Parameters and history length are checked before any computation.

use crate::domain::error::MacrossError;
use crate::domain::indicator::IndicatorSet;
use crate::domain::indicator::sma::calculate_sma;
use crate::domain::metrics::{AnnualizationMethod, PerformanceReport, TRADING_DAYS_PER_YEAR};
use crate::domain::price_series::PriceSeries;
use crate::domain::returns::{StrategyReturns, compute_returns};
use crate::domain::signal::{Position, generate_signal};
use crate::domain::trade::{Trade, extract_trades};
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestConfig {
    pub fast_window: usize,
    pub slow_window: usize,
    /// Subtracted from every trade's fractional profit.
    pub commission: f64,
    pub periods_per_year: u32,
    pub annualization: AnnualizationMethod,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl BacktestConfig {
    pub fn new(fast_window: usize, slow_window: usize) -> Self {
        Self {
            fast_window,
            slow_window,
            commission: 0.0,
            periods_per_year: TRADING_DAYS_PER_YEAR,
            annualization: AnnualizationMethod::default(),
            start_date: None,
            end_date: None,
        }
    }

    pub fn validate(&self) -> Result<(), MacrossError> {
        if self.fast_window == 0 {
            return Err(MacrossError::invalid_parameter(
                "fast_window",
                "must be at least 1",
            ));
        }
        if self.slow_window == 0 {
            return Err(MacrossError::invalid_parameter(
                "slow_window",
                "must be at least 1",
            ));
        }
        if !self.commission.is_finite() || self.commission < 0.0 {
            return Err(MacrossError::invalid_parameter(
                "commission",
                "must be a non-negative number",
            ));
        }
        if self.periods_per_year == 0 {
            return Err(MacrossError::invalid_parameter(
                "periods_per_year",
                "must be at least 1",
            ));
        }
        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            if start > end {
                return Err(MacrossError::invalid_parameter(
                    "start_date",
                    "must not be after end_date",
                ));
            }
        }
        Ok(())
    }

    /// Bars needed for the slower average to produce one value.
    pub fn minimum_history(&self) -> usize {
        self.fast_window.max(self.slow_window)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestResult {
    pub indicators: IndicatorSet,
    pub signal: Vec<Position>,
    pub returns: StrategyReturns,
    pub trades: Vec<Trade>,
    pub performance: PerformanceReport,
}

impl BacktestResult {
    pub fn strategic_returns(&self) -> &[Option<f64>] {
        &self.returns.strategic
    }
}

pub fn run_backtest(
    series: &PriceSeries,
    config: &BacktestConfig,
) -> Result<BacktestResult, MacrossError> {
    config.validate()?;

    let minimum = config.minimum_history();
    if series.len() < minimum {
        return Err(MacrossError::InsufficientHistory {
            bars: series.len(),
            minimum,
        });
    }

    if config.fast_window >= config.slow_window {
        tracing::warn!(
            fast = config.fast_window,
            slow = config.slow_window,
            "fast window is not shorter than slow window"
        );
    }

    let closes = series.closes();
    let indicators = IndicatorSet {
        fast: calculate_sma(closes, config.fast_window)?,
        slow: calculate_sma(closes, config.slow_window)?,
    };

    let signal = generate_signal(&indicators.fast.values, &indicators.slow.values)?;
    let returns = compute_returns(closes, &signal)?;
    let trades = extract_trades(&signal, closes, series.dates(), config.commission)?;

    let performance = PerformanceReport::aggregate(
        &trades,
        &returns.strategic,
        config.periods_per_year,
        config.annualization,
    );

    tracing::info!(
        bars = series.len(),
        fast = %indicators.fast.indicator_type,
        slow = %indicators.slow.indicator_type,
        trades = trades.len(),
        "backtest complete"
    );

    Ok(BacktestResult {
        indicators,
        signal,
        returns,
        trades,
        performance,
    })
}

/// Fetches `code` through `data_port` and backtests it.
pub fn run_backtest_for_code(
    data_port: &dyn DataPort,
    code: &str,
    config: &BacktestConfig,
) -> Result<(PriceSeries, BacktestResult), MacrossError> {
    config.validate()?;

    let bars = data_port.fetch_ohlcv(code, config.start_date, config.end_date)?;
    if bars.is_empty() {
        return Err(MacrossError::NoData {
            code: code.to_string(),
        });
    }
    tracing::info!(code, bars = bars.len(), "loaded price history");

    let series = PriceSeries::from_bars(&bars)?;
    let result = run_backtest(&series, config)?;
    Ok((series, result))
}
