//! CSV file data adapter.
//!
//! One `<CODE>.csv` per symbol with a `Date,Open,High,Low,Close,Volume`
//! header, as exported by common daily-price downloads. Columns are found by
//! name (case-insensitive), so extra columns such as `Adj Close` are ignored.

use crate::domain::error::MacrossError;
use crate::domain::ohlcv::{OhlcvBar, data_range};
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use csv::StringRecord;
use std::fs;
use std::path::PathBuf;

pub struct CsvAdapter {
    base_path: PathBuf,
}

struct Columns {
    date: usize,
    open: usize,
    high: usize,
    low: usize,
    close: usize,
    volume: usize,
}

impl Columns {
    fn from_headers(headers: &StringRecord) -> Result<Self, MacrossError> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
                .ok_or_else(|| MacrossError::DataSource {
                    reason: format!("missing {} column", name),
                })
        };
        Ok(Self {
            date: find("date")?,
            open: find("open")?,
            high: find("high")?,
            low: find("low")?,
            close: find("close")?,
            volume: find("volume")?,
        })
    }
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    /// `<code>.csv`, falling back to a case-insensitive match in the
    /// directory so `spy.csv` serves `SPY`.
    fn csv_path(&self, code: &str) -> PathBuf {
        let exact = self.base_path.join(format!("{}.csv", code));
        if exact.exists() {
            return exact;
        }
        fs::read_dir(&self.base_path)
            .into_iter()
            .flatten()
            .flatten()
            .map(|entry| entry.path())
            .find(|path| {
                path.extension().is_some_and(|ext| ext == "csv")
                    && path
                        .file_stem()
                        .and_then(|stem| stem.to_str())
                        .is_some_and(|stem| stem.eq_ignore_ascii_case(code))
            })
            .unwrap_or(exact)
    }
}

/// Accepts `YYYY-MM-DD`, optionally followed by a time part.
fn parse_date(value: &str) -> Result<NaiveDate, MacrossError> {
    let trimmed = value.trim();
    let day = trimmed.get(..10).unwrap_or(trimmed);
    NaiveDate::parse_from_str(day, "%Y-%m-%d").map_err(|e| MacrossError::DataSource {
        reason: format!("invalid date '{}': {}", value, e),
    })
}

fn parse_field(record: &StringRecord, index: usize, name: &str) -> Result<f64, MacrossError> {
    let raw = record.get(index).ok_or_else(|| MacrossError::DataSource {
        reason: format!("missing {} value", name),
    })?;
    raw.trim().parse().map_err(|e| MacrossError::DataSource {
        reason: format!("invalid {} value '{}': {}", name, raw, e),
    })
}

fn is_missing(value: Option<&str>) -> bool {
    match value.map(str::trim) {
        None | Some("") => true,
        Some(v) => v.eq_ignore_ascii_case("null") || v.eq_ignore_ascii_case("nan"),
    }
}

impl DataPort for CsvAdapter {
    fn fetch_ohlcv(
        &self,
        code: &str,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Vec<OhlcvBar>, MacrossError> {
        let path = self.csv_path(code);
        let content = fs::read_to_string(&path).map_err(|e| MacrossError::DataSource {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let headers = rdr.headers().map_err(|e| MacrossError::DataSource {
            reason: format!("CSV header error: {}", e),
        })?;
        let cols = Columns::from_headers(headers)?;

        let mut bars = Vec::new();
        let mut skipped = 0usize;

        for result in rdr.records() {
            let record = result.map_err(|e| MacrossError::DataSource {
                reason: format!("CSV parse error: {}", e),
            })?;

            let date_str = record.get(cols.date).ok_or_else(|| MacrossError::DataSource {
                reason: "missing date value".into(),
            })?;
            let date = parse_date(date_str)?;

            if start_date.is_some_and(|start| date < start)
                || end_date.is_some_and(|end| date > end)
            {
                continue;
            }

            if is_missing(record.get(cols.close)) {
                skipped += 1;
                continue;
            }

            bars.push(OhlcvBar {
                code: code.to_string(),
                date,
                open: parse_field(&record, cols.open, "open")?,
                high: parse_field(&record, cols.high, "high")?,
                low: parse_field(&record, cols.low, "low")?,
                close: parse_field(&record, cols.close, "close")?,
                volume: parse_field(&record, cols.volume, "volume")?,
            });
        }

        if skipped > 0 {
            tracing::warn!(code, skipped, "skipped rows without a close price");
        }

        bars.sort_by_key(|b| b.date);
        Ok(bars)
    }

    fn list_symbols(&self) -> Result<Vec<String>, MacrossError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| MacrossError::DataSource {
            reason: format!(
                "failed to read directory {}: {}",
                self.base_path.display(),
                e
            ),
        })?;

        let mut symbols = Vec::new();

        for entry in entries {
            let entry = entry.map_err(|e| MacrossError::DataSource {
                reason: format!("directory entry error: {}", e),
            })?;

            let name = entry.file_name();
            let name_str = name.to_string_lossy();

            if let Some(code) = name_str.strip_suffix(".csv") {
                symbols.push(code.to_string());
            }
        }

        symbols.sort();
        Ok(symbols)
    }

    fn get_data_range(
        &self,
        code: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, MacrossError> {
        if !self.csv_path(code).exists() {
            return Ok(None);
        }
        let bars = self.fetch_ohlcv(code, None, None)?;
        Ok(data_range(&bars))
    }
}
