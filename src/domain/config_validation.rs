//! Configuration validation.
//!
//! Validates all config fields before a backtest runs. The `parse_*` helpers
//! are shared with config building so a value is judged the same way in both
//! places.

use crate::domain::error::MacrossError;
use crate::domain::metrics::{AnnualizationMethod, TRADING_DAYS_PER_YEAR};
use crate::ports::config_port::ConfigPort;
use chrono::NaiveDate;

pub fn validate_backtest_config(config: &dyn ConfigPort) -> Result<(), MacrossError> {
    validate_code(config)?;
    parse_window(config, "fast_window")?;
    parse_window(config, "slow_window")?;
    parse_commission(config)?;
    parse_periods_per_year(config)?;
    parse_annualization(config)?;
    validate_dates(config)?;
    Ok(())
}

pub fn validate_data_config(config: &dyn ConfigPort) -> Result<(), MacrossError> {
    match config.get_string("data", "dir") {
        Some(s) if !s.trim().is_empty() => Ok(()),
        _ => Err(MacrossError::ConfigMissing {
            section: "data".to_string(),
            key: "dir".to_string(),
        }),
    }
}

fn validate_code(config: &dyn ConfigPort) -> Result<(), MacrossError> {
    match config.get_string("backtest", "code") {
        Some(s) if !s.trim().is_empty() => Ok(()),
        _ => Err(MacrossError::ConfigMissing {
            section: "backtest".to_string(),
            key: "code".to_string(),
        }),
    }
}

fn non_empty(config: &dyn ConfigPort, key: &str) -> Option<String> {
    config
        .get_string("backtest", key)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Required positive integer window length.
pub fn parse_window(config: &dyn ConfigPort, key: &str) -> Result<usize, MacrossError> {
    let raw = non_empty(config, key).ok_or_else(|| MacrossError::ConfigMissing {
        section: "backtest".to_string(),
        key: key.to_string(),
    })?;
    let value: i64 = raw
        .parse()
        .map_err(|_| MacrossError::invalid_parameter(key, format!("'{}' is not an integer", raw)))?;
    if value < 1 {
        return Err(MacrossError::invalid_parameter(key, "must be at least 1"));
    }
    usize::try_from(value).map_err(|_| MacrossError::invalid_parameter(key, "is too large"))
}

/// Optional non-negative commission, default 0.
pub fn parse_commission(config: &dyn ConfigPort) -> Result<f64, MacrossError> {
    let Some(raw) = non_empty(config, "commission") else {
        return Ok(0.0);
    };
    let value: f64 = raw.parse().map_err(|_| {
        MacrossError::invalid_parameter("commission", format!("'{}' is not a number", raw))
    })?;
    if !value.is_finite() || value < 0.0 {
        return Err(MacrossError::invalid_parameter(
            "commission",
            "must be a non-negative number",
        ));
    }
    Ok(value)
}

/// Optional periods per year, default 252.
pub fn parse_periods_per_year(config: &dyn ConfigPort) -> Result<u32, MacrossError> {
    let Some(raw) = non_empty(config, "periods_per_year") else {
        return Ok(TRADING_DAYS_PER_YEAR);
    };
    match raw.parse::<u32>() {
        Ok(value) if value >= 1 => Ok(value),
        _ => Err(MacrossError::invalid_parameter(
            "periods_per_year",
            format!("'{}' is not a positive integer", raw),
        )),
    }
}

pub fn parse_annualization(config: &dyn ConfigPort) -> Result<AnnualizationMethod, MacrossError> {
    let Some(raw) = non_empty(config, "annualization") else {
        return Ok(AnnualizationMethod::default());
    };
    raw.parse().map_err(|reason| MacrossError::ConfigInvalid {
        section: "backtest".to_string(),
        key: "annualization".to_string(),
        reason,
    })
}

pub fn parse_optional_date(
    config: &dyn ConfigPort,
    field: &str,
) -> Result<Option<NaiveDate>, MacrossError> {
    match non_empty(config, field) {
        None => Ok(None),
        Some(s) => NaiveDate::parse_from_str(&s, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| MacrossError::ConfigInvalid {
                section: "backtest".to_string(),
                key: field.to_string(),
                reason: format!("invalid {} format, expected YYYY-MM-DD", field),
            }),
    }
}

fn validate_dates(config: &dyn ConfigPort) -> Result<(), MacrossError> {
    let start_date = parse_optional_date(config, "start_date")?;
    let end_date = parse_optional_date(config, "end_date")?;

    if let (Some(start), Some(end)) = (start_date, end_date) {
        if start > end {
            return Err(MacrossError::ConfigInvalid {
                section: "backtest".to_string(),
                key: "start_date".to_string(),
                reason: "start_date must not be after end_date".to_string(),
            });
        }
    }
    Ok(())
}
