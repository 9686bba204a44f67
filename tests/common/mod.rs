#![allow(dead_code)]

use chrono::NaiveDate;
use macross::domain::error::MacrossError;
pub use macross::domain::ohlcv::OhlcvBar;
use macross::domain::ohlcv::data_range;
use macross::domain::price_series::{PricePoint, PriceSeries};
use macross::ports::data_port::DataPort;
use std::collections::HashMap;

pub struct MockDataPort {
    pub data: HashMap<String, Vec<OhlcvBar>>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_bars(mut self, code: &str, bars: Vec<OhlcvBar>) -> Self {
        self.data.insert(code.to_string(), bars);
        self
    }

    pub fn with_error(mut self, code: &str, reason: &str) -> Self {
        self.errors.insert(code.to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_ohlcv(
        &self,
        code: &str,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Vec<OhlcvBar>, MacrossError> {
        if let Some(reason) = self.errors.get(code) {
            return Err(MacrossError::DataSource {
                reason: reason.clone(),
            });
        }
        Ok(self
            .data
            .get(code)
            .map(|bars| {
                bars.iter()
                    .filter(|b| start_date.is_none_or(|s| b.date >= s))
                    .filter(|b| end_date.is_none_or(|e| b.date <= e))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    fn list_symbols(&self) -> Result<Vec<String>, MacrossError> {
        let mut symbols: Vec<String> = self.data.keys().cloned().collect();
        symbols.sort();
        Ok(symbols)
    }

    fn get_data_range(
        &self,
        code: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, MacrossError> {
        if let Some(reason) = self.errors.get(code) {
            return Err(MacrossError::DataSource {
                reason: reason.clone(),
            });
        }
        Ok(self.data.get(code).and_then(|bars| data_range(bars)))
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn make_bar(code: &str, date: &str, close: f64) -> OhlcvBar {
    OhlcvBar {
        code: code.to_string(),
        date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        open: close - 1.0,
        high: close + 1.0,
        low: close - 2.0,
        close,
        volume: 1000.0,
    }
}

/// One bar per calendar day starting at `start_date`.
pub fn bars_from_closes(code: &str, start_date: &str, closes: &[f64]) -> Vec<OhlcvBar> {
    let start = NaiveDate::parse_from_str(start_date, "%Y-%m-%d").unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| OhlcvBar {
            date: start + chrono::Duration::days(i as i64),
            ..make_bar(code, start_date, close)
        })
        .collect()
}

pub fn series_from_closes(closes: &[f64]) -> PriceSeries {
    let start = date(2024, 1, 1);
    PriceSeries::new(
        closes
            .iter()
            .enumerate()
            .map(|(i, &close)| PricePoint {
                date: start + chrono::Duration::days(i as i64),
                close,
            })
            .collect(),
    )
    .unwrap()
}

/// Writes `<code>.csv` with a standard header into `dir`.
pub fn write_csv(dir: &std::path::Path, code: &str, start_date: &str, closes: &[f64]) {
    let mut content = String::from("Date,Open,High,Low,Close,Volume\n");
    for bar in bars_from_closes(code, start_date, closes) {
        content.push_str(&format!(
            "{},{},{},{},{},{}\n",
            bar.date, bar.open, bar.high, bar.low, bar.close, bar.volume
        ));
    }
    std::fs::write(dir.join(format!("{}.csv", code)), content).unwrap();
}
