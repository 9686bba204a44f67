//! Performance metrics and statistics.

use super::error::UndefinedMetric;
use super::returns::equity_curve;
use super::trade::Trade;
use std::fmt;
use std::str::FromStr;

pub const TRADING_DAYS_PER_YEAR: u32 = 252;

/// A statistic, or the reason it has no value.
pub type Metric = Result<f64, UndefinedMetric>;

/// Numerator used for the Sharpe ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnnualizationMethod {
    /// `(1 + mean^periods) - 1`: the mean return raised to the number of
    /// periods. Kept for parity with existing results; it is not compounding.
    #[default]
    MeanPower,
    /// `prod(1 + r)^(periods / n) - 1`: geometric compounding.
    Compounded,
}

impl FromStr for AnnualizationMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mean_power" => Ok(AnnualizationMethod::MeanPower),
            "compounded" => Ok(AnnualizationMethod::Compounded),
            other => Err(format!(
                "unknown annualization '{}' (expected mean_power or compounded)",
                other
            )),
        }
    }
}

impl fmt::Display for AnnualizationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnnualizationMethod::MeanPower => write!(f, "mean_power"),
            AnnualizationMethod::Compounded => write!(f, "compounded"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PerformanceReport {
    pub trade_count: usize,
    pub win_rate: Metric,
    pub profit_factor: Metric,
    /// Mean-power formula, see [`AnnualizationMethod::MeanPower`].
    pub annual_return: Metric,
    /// Geometric alternative to `annual_return`.
    pub compounded_annual_return: Metric,
    pub volatility: Metric,
    pub sharpe_ratio: Metric,
    /// Last equity curve value minus one.
    pub total_return: Metric,
    pub max_drawdown: Metric,
}

impl PerformanceReport {
    pub fn aggregate(
        trades: &[Trade],
        strategic_returns: &[Option<f64>],
        periods_per_year: u32,
        annualization: AnnualizationMethod,
    ) -> Self {
        let periods = f64::from(periods_per_year);
        let returns: Vec<f64> = strategic_returns.iter().flatten().copied().collect();

        let annual_return = mean_power_annual_return(&returns, periods);
        let compounded_annual_return = compounded_annual_return(&returns, periods);
        let volatility = annualized_volatility(&returns, periods);

        let numerator = match annualization {
            AnnualizationMethod::MeanPower => annual_return,
            AnnualizationMethod::Compounded => compounded_annual_return,
        };
        let sharpe_ratio = sharpe(numerator, volatility);

        let curve: Vec<f64> = equity_curve(strategic_returns)
            .into_iter()
            .flatten()
            .collect();
        let total_return = curve
            .last()
            .map(|v| v - 1.0)
            .ok_or(UndefinedMetric::NoReturns);
        let max_drawdown = compute_drawdown(&curve);

        PerformanceReport {
            trade_count: trades.len(),
            win_rate: win_rate(trades),
            profit_factor: profit_factor(trades),
            annual_return,
            compounded_annual_return,
            volatility,
            sharpe_ratio,
            total_return,
            max_drawdown,
        }
    }
}

fn win_rate(trades: &[Trade]) -> Metric {
    if trades.is_empty() {
        return Err(UndefinedMetric::NoTrades);
    }
    let wins = trades.iter().filter(|t| t.is_win()).count();
    Ok(wins as f64 / trades.len() as f64)
}

fn profit_factor(trades: &[Trade]) -> Metric {
    if trades.is_empty() {
        return Err(UndefinedMetric::NoTrades);
    }

    let mut gross_profit = 0.0_f64;
    let mut gross_loss = 0.0_f64;
    for trade in trades {
        if trade.profit > 0.0 {
            gross_profit += trade.profit;
        } else if trade.profit < 0.0 {
            gross_loss += trade.profit;
        }
    }

    if gross_loss == 0.0 {
        return Err(UndefinedMetric::NoLosingTrades);
    }
    Ok(-gross_profit / gross_loss)
}

fn mean(returns: &[f64]) -> Option<f64> {
    if returns.is_empty() {
        None
    } else {
        Some(returns.iter().sum::<f64>() / returns.len() as f64)
    }
}

fn mean_power_annual_return(returns: &[f64], periods: f64) -> Metric {
    let mean = mean(returns).ok_or(UndefinedMetric::NoReturns)?;
    Ok((1.0 + mean.powf(periods)) - 1.0)
}

fn compounded_annual_return(returns: &[f64], periods: f64) -> Metric {
    if returns.is_empty() {
        return Err(UndefinedMetric::NoReturns);
    }
    let growth: f64 = returns.iter().map(|r| 1.0 + r).product();
    Ok(growth.powf(periods / returns.len() as f64) - 1.0)
}

/// Sample standard deviation (n - 1) scaled by sqrt(periods).
fn annualized_volatility(returns: &[f64], periods: f64) -> Metric {
    if returns.len() < 2 {
        return Err(UndefinedMetric::InsufficientReturns);
    }
    let mean = mean(returns).ok_or(UndefinedMetric::NoReturns)?;
    let variance =
        returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / (returns.len() - 1) as f64;
    Ok(variance.sqrt() * periods.sqrt())
}

fn sharpe(annual_return: Metric, volatility: Metric) -> Metric {
    let volatility = volatility?;
    let annual_return = annual_return?;
    if volatility == 0.0 {
        return Err(UndefinedMetric::ZeroVolatility);
    }
    Ok(annual_return / volatility)
}

/// Largest peak-to-trough decline as a fraction of the peak.
fn compute_drawdown(equity_curve: &[f64]) -> Metric {
    let (first, rest) = equity_curve
        .split_first()
        .ok_or(UndefinedMetric::NoReturns)?;

    let mut peak = *first;
    let mut max_dd = 0.0_f64;
    for &equity in rest {
        if equity > peak {
            peak = equity;
        } else if peak > 0.0 {
            max_dd = max_dd.max((peak - equity) / peak);
        }
    }
    Ok(max_dd)
}
