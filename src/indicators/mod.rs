// =============================================================================
// Technical Indicators Module
// =============================================================================
//
// Pure, side-effect-free implementations of the indicators shown on the
// dashboard.  The snapshot builder refuses to emit a partially-defined
// snapshot: callers either get all four values or a typed error.

pub mod ema;
pub mod macd;
pub mod rsi;

use serde::Serialize;
use thiserror::Error;

use crate::runtime_config::IndicatorParams;

/// Read-only indicator values at the most recent row where every series is
/// defined.  Recomputed from scratch on every refresh, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IndicatorSnapshot {
    pub close: f64,
    pub rsi: f64,
    pub macd: f64,
    pub signal: f64,
}

/// Why a snapshot could not be produced from a price series.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AnalysisError {
    #[error("no data returned")]
    NoData,

    #[error("insufficient history: {rows} rows, need at least {needed}")]
    InsufficientWindow { rows: usize, needed: usize },
}

/// Compute the indicator snapshot for a chronologically ordered close series.
///
/// With first-value-seeded EMAs the MACD and signal lines are defined from
/// row 0, so the RSI warm-up (`rsi_period` deltas) is the binding
/// constraint: the snapshot is taken at the last close, which is the last
/// row where RSI is defined.
///
/// Returns [`AnalysisError::NoData`] for an empty series and
/// [`AnalysisError::InsufficientWindow`] when fewer than `rsi_period + 1`
/// rows are available — never a snapshot with undefined fields.
pub fn compute_snapshot(
    closes: &[f64],
    params: &IndicatorParams,
) -> Result<IndicatorSnapshot, AnalysisError> {
    if closes.is_empty() {
        return Err(AnalysisError::NoData);
    }

    let needed = params.rsi_period + 1;
    if closes.len() < needed {
        return Err(AnalysisError::InsufficientWindow {
            rows: closes.len(),
            needed,
        });
    }

    let rsi_series = rsi::calculate_rsi(closes, params.rsi_period);
    let (macd_series, signal_series) =
        macd::calculate_macd(closes, params.macd_fast, params.macd_slow, params.macd_signal);

    // A non-finite close can truncate any of the series below the expected
    // length; treat that the same as a too-short window.
    let last = closes.len() - 1;
    let rsi_at_last = rsi_series.len().checked_sub(1).map(|i| rsi_series[i]);
    match (
        rsi_at_last,
        macd_series.get(last).copied(),
        signal_series.get(last).copied(),
    ) {
        (Some(rsi), Some(macd), Some(signal))
            if rsi_series.len() == closes.len() - params.rsi_period =>
        {
            Ok(IndicatorSnapshot {
                close: closes[last],
                rsi,
                macd,
                signal,
            })
        }
        _ => Err(AnalysisError::InsufficientWindow {
            rows: closes.len(),
            needed,
        }),
    }
}
