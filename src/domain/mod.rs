//! Core domain types and logic.

pub mod backtest;
pub mod config_validation;
pub mod error;
pub mod indicator;
pub mod metrics;
pub mod ohlcv;
pub mod price_series;
pub mod returns;
pub mod signal;
pub mod trade;
