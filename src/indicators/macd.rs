// =============================================================================
// Moving Average Convergence Divergence (MACD)
// =============================================================================
//
// MACD line   = EMA(fast) - EMA(slow) of the closes.
// Signal line = EMA(signal) of the MACD line itself.
//
// All three EMAs use first-value seeding (see `ema.rs`), so both output
// series are aligned one-to-one with the input and defined from index 0.
// A crossover of the MACD line above the signal line is the classic
// bullish-momentum trigger.
// =============================================================================

use crate::indicators::ema::calculate_ema;

/// Compute the MACD line and its signal line for `closes`.
///
/// Returns `(macd, signal)`, both the same length as the input (possibly
/// truncated if a non-finite value poisons an underlying EMA).  Empty when
/// the input is empty or any span is zero.
pub fn calculate_macd(
    closes: &[f64],
    fast: usize,
    slow: usize,
    signal: usize,
) -> (Vec<f64>, Vec<f64>) {
    if closes.is_empty() || fast == 0 || slow == 0 || signal == 0 {
        return (Vec::new(), Vec::new());
    }

    let ema_fast = calculate_ema(closes, fast);
    let ema_slow = calculate_ema(closes, slow);

    let macd: Vec<f64> = ema_fast
        .iter()
        .zip(ema_slow.iter())
        .map(|(f, s)| f - s)
        .collect();

    let signal_line = calculate_ema(&macd, signal);

    (macd, signal_line)
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn macd_empty_input() {
        let (macd, signal) = calculate_macd(&[], 12, 26, 9);
        assert!(macd.is_empty());
        assert!(signal.is_empty());
    }

    #[test]
    fn macd_zero_span_guard() {
        let closes = vec![1.0, 2.0, 3.0];
        let (macd, signal) = calculate_macd(&closes, 0, 26, 9);
        assert!(macd.is_empty());
        assert!(signal.is_empty());
    }

    #[test]
    fn macd_full_length_output() {
        let closes: Vec<f64> = (1..=40).map(|x| x as f64).collect();
        let (macd, signal) = calculate_macd(&closes, 12, 26, 9);
        assert_eq!(macd.len(), 40);
        assert_eq!(signal.len(), 40);
    }

    #[test]
    fn macd_starts_at_zero() {
        // Both EMAs are seeded with the same first close, so the MACD line
        // starts at exactly zero.
        let closes = vec![50.0, 51.0, 49.5, 52.0];
        let (macd, signal) = calculate_macd(&closes, 12, 26, 9);
        assert!(macd[0].abs() < f64::EPSILON);
        assert!(signal[0].abs() < f64::EPSILON);
    }

    #[test]
    fn macd_constant_series_is_zero() {
        let closes = vec![100.0; 40];
        let (macd, signal) = calculate_macd(&closes, 12, 26, 9);
        for (&m, &s) in macd.iter().zip(signal.iter()) {
            assert!(m.abs() < 1e-10);
            assert!(s.abs() < 1e-10);
        }
    }

    #[test]
    fn macd_positive_and_above_signal_on_rising_series() {
        // On a monotonically rising series the fast EMA pulls ahead of the
        // slow EMA, and the signal line lags the rising MACD line.
        let closes: Vec<f64> = (10..=24).map(|x| x as f64).collect();
        let (macd, signal) = calculate_macd(&closes, 12, 26, 9);
        let m = *macd.last().unwrap();
        let s = *signal.last().unwrap();
        assert!(m > 0.0, "MACD should be positive, got {m}");
        assert!(m > s, "MACD {m} should be above signal {s}");
    }
}
