//! Crossover signal: long while the fast average is above the slow one.
//!
//! A bar where either average is still warming up is `Flat`. This is a rule,
//! not a side effect of float comparison: no position is taken until both
//! averages exist.

use crate::domain::error::MacrossError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Position {
    Flat = 0,
    Long = 1,
}

impl Position {
    /// Fraction of capital exposed to the next bar's return.
    pub fn exposure(self) -> f64 {
        match self {
            Position::Flat => 0.0,
            Position::Long => 1.0,
        }
    }

    pub fn is_long(self) -> bool {
        self == Position::Long
    }
}

/// Compares one pair of indicator values.
pub fn crossover_position(fast: Option<f64>, slow: Option<f64>) -> Position {
    match (fast, slow) {
        (Some(f), Some(s)) if f > s => Position::Long,
        _ => Position::Flat,
    }
}

pub fn generate_signal(
    fast: &[Option<f64>],
    slow: &[Option<f64>],
) -> Result<Vec<Position>, MacrossError> {
    if fast.len() != slow.len() {
        return Err(MacrossError::invalid_parameter(
            "indicators",
            format!(
                "fast has {} values but slow has {}",
                fast.len(),
                slow.len()
            ),
        ));
    }

    Ok(fast
        .iter()
        .zip(slow)
        .map(|(&f, &s)| crossover_position(f, s))
        .collect())
}
