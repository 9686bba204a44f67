//! Strategy returns and equity curve.
//!
//! The position held over bar `i` is the signal of bar `i-1`: a cross seen at
//! a close can only be acted on from that close onward.

use crate::domain::error::MacrossError;
use crate::domain::signal::Position;

#[derive(Debug, Clone, PartialEq)]
pub struct StrategyReturns {
    /// close[i] / close[i-1] - 1
    pub daily: Vec<Option<f64>>,
    /// daily[i] * signal[i-1]
    pub strategic: Vec<Option<f64>>,
    pub equity_curve: Vec<Option<f64>>,
}

impl StrategyReturns {
    /// Strategic returns with the undefined leading bar skipped.
    pub fn defined(&self) -> impl Iterator<Item = f64> + '_ {
        self.strategic.iter().flatten().copied()
    }
}

pub fn daily_returns(closes: &[f64]) -> Vec<Option<f64>> {
    let mut out = Vec::with_capacity(closes.len());
    if closes.is_empty() {
        return out;
    }
    out.push(None);
    out.extend(closes.windows(2).map(|w| Some(w[1] / w[0] - 1.0)));
    out
}

/// `exp` of the running sum of defined returns. Undefined bars stay `None`
/// and do not reset the sum.
pub fn equity_curve(strategic: &[Option<f64>]) -> Vec<Option<f64>> {
    let mut cumulative = 0.0_f64;
    strategic
        .iter()
        .map(|r| {
            r.map(|r| {
                cumulative += r;
                cumulative.exp()
            })
        })
        .collect()
}

pub fn compute_returns(
    closes: &[f64],
    signal: &[Position],
) -> Result<StrategyReturns, MacrossError> {
    if closes.len() != signal.len() {
        return Err(MacrossError::invalid_parameter(
            "signal",
            format!(
                "{} signal values for {} closes",
                signal.len(),
                closes.len()
            ),
        ));
    }

    let daily = daily_returns(closes);

    let mut strategic = Vec::with_capacity(daily.len());
    for (i, ret) in daily.iter().enumerate() {
        let held = i.checked_sub(1).map(|prev| signal[prev]);
        strategic.push(match (ret, held) {
            (Some(r), Some(position)) => Some(r * position.exposure()),
            _ => None,
        });
    }

    let equity_curve = equity_curve(&strategic);

    Ok(StrategyReturns {
        daily,
        strategic,
        equity_curve,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;
    use crate::domain::signal::Position::{Flat, Long};

    #[test]
    fn first_bar_is_undefined() {
        let r = compute_returns(&[100.0, 110.0], &[Long, Long]).unwrap();
        assert_eq!(r.daily[0], None);
        assert_eq!(r.strategic[0], None);
        assert_eq!(r.equity_curve[0], None);
    }

    #[test]
    fn uses_previous_bar_signal() {
        // Going long on bar 1 must not earn bar 1's move.
        let r = compute_returns(&[100.0, 110.0, 121.0], &[Flat, Long, Long]).unwrap();
        assert_eq!(r.strategic[1], Some(0.0));
        assert_relative_eq!(r.strategic[2].unwrap(), 0.1, epsilon = 1e-12);
    }

    #[test]
    fn exit_bar_still_earns_its_move() {
        let r = compute_returns(&[100.0, 110.0, 99.0], &[Long, Flat, Flat]).unwrap();
        assert_relative_eq!(r.strategic[1].unwrap(), 0.1, epsilon = 1e-12);
        assert_eq!(r.strategic[2], Some(0.0));
    }

    #[test]
    fn equity_curve_is_exp_of_cumulative_sum() {
        let strategic = vec![None, Some(0.1), Some(-0.05), Some(0.0)];
        let curve = equity_curve(&strategic);
        assert_eq!(curve[0], None);
        assert_relative_eq!(curve[1].unwrap(), 0.1f64.exp());
        assert_relative_eq!(curve[2].unwrap(), 0.05f64.exp(), epsilon = 1e-12);
        assert_relative_eq!(curve[3].unwrap(), 0.05f64.exp(), epsilon = 1e-12);
    }

    #[test]
    fn empty_input() {
        let r = compute_returns(&[], &[]).unwrap();
        assert!(r.daily.is_empty());
        assert!(r.strategic.is_empty());
        assert!(r.equity_curve.is_empty());
    }

    #[test]
    fn length_mismatch_rejected() {
        let err = compute_returns(&[1.0, 2.0], &[Flat]).unwrap_err();
        assert!(matches!(err, MacrossError::InvalidParameter { name, .. } if name == "signal"));
    }

    #[test]
    fn defined_skips_leading_none() {
        let r = compute_returns(&[100.0, 110.0, 99.0], &[Long, Long, Long]).unwrap();
        assert_eq!(r.defined().count(), 2);
    }

    proptest! {
        #[test]
        fn strategic_is_lagged_daily_times_signal(
            bars in prop::collection::vec((1.0f64..500.0, any::<bool>()), 1..80),
        ) {
            let closes: Vec<f64> = bars.iter().map(|b| b.0).collect();
            let signal: Vec<Position> = bars
                .iter()
                .map(|b| if b.1 { Long } else { Flat })
                .collect();
            let r = compute_returns(&closes, &signal).unwrap();

            prop_assert_eq!(r.strategic.len(), closes.len());
            prop_assert!(r.strategic[0].is_none());
            for i in 1..closes.len() {
                let expected = (closes[i] / closes[i - 1] - 1.0) * signal[i - 1].exposure();
                prop_assert_eq!(r.strategic[i], Some(expected));
            }
        }
    }
}
