// =============================================================================
// Suggestion Rule — maps an indicator snapshot to a default action
// =============================================================================
//
// A pure function: no state, no side effects, deterministic, total over any
// snapshot the calculator can emit.  It only ever returns Buy or Hold; Skip
// and None exist purely as manual annotation choices.
//
// Branch order matters: the oversold check wins over the momentum crossover.
// =============================================================================

use crate::indicators::IndicatorSnapshot;
use crate::runtime_config::IndicatorParams;
use crate::types::Suggestion;

/// Rationale shown when the oversold branch fires.
pub const RATIONALE_OVERSOLD: &str = "RSI is low - may be oversold.";
/// Rationale shown when the momentum-crossover branch fires.
pub const RATIONALE_CROSSOVER: &str = "MACD crossed above signal.";
/// Rationale shown when neither buy branch fires.
pub const RATIONALE_NO_SIGNAL: &str = "No clear signal.";

/// Derive the default action and its human-readable rationale from the
/// latest indicator snapshot.
pub fn suggest(snapshot: &IndicatorSnapshot, params: &IndicatorParams) -> (Suggestion, &'static str) {
    if snapshot.rsi < params.rsi_buy_threshold {
        (Suggestion::Buy, RATIONALE_OVERSOLD)
    } else if snapshot.macd > snapshot.signal {
        (Suggestion::Buy, RATIONALE_CROSSOVER)
    } else {
        (Suggestion::Hold, RATIONALE_NO_SIGNAL)
    }
}

// =============================================================================
// Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(rsi: f64, macd: f64, signal: f64) -> IndicatorSnapshot {
        IndicatorSnapshot {
            close: 100.0,
            rsi,
            macd,
            signal,
        }
    }

    #[test]
    fn oversold_suggests_buy() {
        let (s, why) = suggest(&snapshot(25.0, -1.0, 0.5), &IndicatorParams::default());
        assert_eq!(s, Suggestion::Buy);
        assert_eq!(why, RATIONALE_OVERSOLD);
    }

    #[test]
    fn oversold_branch_wins_over_crossover() {
        // Both conditions true: the RSI branch is checked first.
        let (s, why) = suggest(&snapshot(30.0, 2.0, 1.0), &IndicatorParams::default());
        assert_eq!(s, Suggestion::Buy);
        assert_eq!(why, RATIONALE_OVERSOLD);
    }

    #[test]
    fn crossover_suggests_buy() {
        let (s, why) = suggest(&snapshot(55.0, 1.2, 0.8), &IndicatorParams::default());
        assert_eq!(s, Suggestion::Buy);
        assert_eq!(why, RATIONALE_CROSSOVER);
    }

    #[test]
    fn no_signal_suggests_hold() {
        let (s, why) = suggest(&snapshot(55.0, 0.5, 0.8), &IndicatorParams::default());
        assert_eq!(s, Suggestion::Hold);
        assert_eq!(why, RATIONALE_NO_SIGNAL);
    }

    #[test]
    fn threshold_is_strict() {
        // RSI exactly at the threshold is not oversold.
        let (s, why) = suggest(&snapshot(40.0, 0.0, 0.0), &IndicatorParams::default());
        assert_eq!(s, Suggestion::Hold);
        assert_eq!(why, RATIONALE_NO_SIGNAL);
    }

    #[test]
    fn macd_equal_to_signal_is_hold() {
        let (s, _) = suggest(&snapshot(60.0, 1.0, 1.0), &IndicatorParams::default());
        assert_eq!(s, Suggestion::Hold);
    }

    #[test]
    fn rule_is_pure() {
        let snap = snapshot(35.0, 0.3, 0.1);
        let params = IndicatorParams::default();
        let first = suggest(&snap, &params);
        for _ in 0..10 {
            assert_eq!(suggest(&snap, &params), first);
        }
    }
}
