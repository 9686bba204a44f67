//! Domain error types.

/// Why a performance statistic has no value.
///
/// Carried inside [`crate::domain::metrics::PerformanceReport`] so the
/// well-defined statistics stay usable when one of them is not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum UndefinedMetric {
    #[error("no trades")]
    NoTrades,

    #[error("no losing trades")]
    NoLosingTrades,

    #[error("no defined returns")]
    NoReturns,

    #[error("fewer than two defined returns")]
    InsufficientReturns,

    #[error("zero volatility")]
    ZeroVolatility,
}

/// Top-level error type for macross.
#[derive(Debug, thiserror::Error)]
pub enum MacrossError {
    #[error("invalid parameter {name}: {reason}")]
    InvalidParameter { name: String, reason: String },

    #[error("insufficient history: have {bars} bars, need {minimum}")]
    InsufficientHistory { bars: usize, minimum: usize },

    #[error("malformed signal sequence: {reason}")]
    MalformedSignalSequence { reason: String },

    #[error("undefined metric: {0}")]
    UndefinedMetric(#[from] UndefinedMetric),

    #[error("malformed price series: {reason}")]
    MalformedSeries { reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("data source error: {reason}")]
    DataSource { reason: String },

    #[error("no data for {code}")]
    NoData { code: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl MacrossError {
    pub(crate) fn invalid_parameter(name: &str, reason: impl Into<String>) -> Self {
        MacrossError::InvalidParameter {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<&MacrossError> for std::process::ExitCode {
    fn from(err: &MacrossError) -> Self {
        let code: u8 = match err {
            MacrossError::Io(_) => 1,
            MacrossError::ConfigParse { .. }
            | MacrossError::ConfigMissing { .. }
            | MacrossError::ConfigInvalid { .. } => 2,
            MacrossError::DataSource { .. } | MacrossError::NoData { .. } => 3,
            MacrossError::InvalidParameter { .. } => 4,
            MacrossError::InsufficientHistory { .. } | MacrossError::MalformedSeries { .. } => 5,
            MacrossError::MalformedSignalSequence { .. } => 6,
            MacrossError::UndefinedMetric(_) => 7,
        };
        std::process::ExitCode::from(code)
    }
}
