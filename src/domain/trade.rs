//! Round-trip trade reconstruction from signal transitions.
//!
//! Steps, each a separate function:
//! 1. `detect_transitions`: every bar where the signal changes. Bar 0 always
//!    counts, its prior state being unknown.
//! 2. `drop_leading_exit`: a first transition to `Flat` closes nothing.
//! 3. `drop_trailing_entry`: a last transition to `Long` is still open.
//! 4. `pair_transitions`: the rest must alternate `Long, Flat, ...`; the k-th
//!    entry pairs with the k-th exit.

use crate::domain::error::MacrossError;
use crate::domain::signal::Position;
use chrono::NaiveDate;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    pub date: NaiveDate,
    pub position: Position,
    pub close: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Trade {
    pub entry_date: NaiveDate,
    pub entry_price: f64,
    pub exit_date: NaiveDate,
    pub exit_price: f64,
    /// exit / entry - 1 - commission
    pub profit: f64,
}

impl Trade {
    pub fn is_win(&self) -> bool {
        self.profit > 0.0
    }

    pub fn holding_days(&self) -> i64 {
        (self.exit_date - self.entry_date).num_days()
    }
}

pub fn detect_transitions(
    signal: &[Position],
    closes: &[f64],
    dates: &[NaiveDate],
) -> Vec<Transition> {
    let mut transitions = Vec::new();
    let mut prev: Option<Position> = None;

    for ((&position, &close), &date) in signal.iter().zip(closes).zip(dates) {
        if prev != Some(position) {
            transitions.push(Transition {
                date,
                position,
                close,
            });
        }
        prev = Some(position);
    }

    transitions
}

pub fn drop_leading_exit(transitions: &[Transition]) -> &[Transition] {
    match transitions.split_first() {
        Some((first, rest)) if first.position == Position::Flat => rest,
        _ => transitions,
    }
}

pub fn drop_trailing_entry(transitions: &[Transition]) -> &[Transition] {
    match transitions.split_last() {
        Some((last, rest)) if last.position == Position::Long => rest,
        _ => transitions,
    }
}

pub fn pair_transitions(
    transitions: &[Transition],
    commission: f64,
) -> Result<Vec<Trade>, MacrossError> {
    let (entries, exits): (Vec<&Transition>, Vec<&Transition>) =
        transitions.iter().partition(|t| t.position.is_long());

    if entries.len() != exits.len() {
        return Err(MacrossError::MalformedSignalSequence {
            reason: format!("{} entries but {} exits", entries.len(), exits.len()),
        });
    }

    for (i, pair) in transitions.chunks(2).enumerate() {
        if pair[0].position != Position::Long || pair[1].position != Position::Flat {
            return Err(MacrossError::MalformedSignalSequence {
                reason: format!("transitions do not alternate at trade {} ({})", i, pair[0].date),
            });
        }
    }

    Ok(entries
        .iter()
        .zip(&exits)
        .map(|(entry, exit)| Trade {
            entry_date: entry.date,
            entry_price: entry.close,
            exit_date: exit.date,
            exit_price: exit.close,
            profit: exit.close / entry.close - 1.0 - commission,
        })
        .collect())
}

pub fn extract_trades(
    signal: &[Position],
    closes: &[f64],
    dates: &[NaiveDate],
    commission: f64,
) -> Result<Vec<Trade>, MacrossError> {
    if signal.len() != closes.len() || signal.len() != dates.len() {
        return Err(MacrossError::invalid_parameter(
            "signal",
            format!(
                "{} signal values for {} closes and {} dates",
                signal.len(),
                closes.len(),
                dates.len()
            ),
        ));
    }

    let transitions = detect_transitions(signal, closes, dates);
    let trimmed = drop_trailing_entry(drop_leading_exit(&transitions));

    tracing::debug!(
        transitions = transitions.len(),
        trimmed = trimmed.len(),
        "signal transitions detected"
    );

    pair_transitions(trimmed, commission)
}
