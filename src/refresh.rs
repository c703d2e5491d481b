// =============================================================================
// Refresh Pipeline — fetch → compute → suggest, per symbol
// =============================================================================
//
// Each refresh cycle walks the watchlist and produces one SymbolPanel per
// symbol.  A panel is either Ready (snapshot + suggestion) or Failed
// (inline error message).  Failures never cross the per-symbol boundary:
// one symbol erroring out leaves every other panel intact.
//
// Cycles are fresh computations from freshly fetched data.  Nothing is
// cached between cycles and there are no retries; the next tick is the
// retry.
// =============================================================================

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::app_state::AppState;
use crate::indicators::{compute_snapshot, IndicatorSnapshot};
use crate::market_data::PriceProvider;
use crate::runtime_config::IndicatorParams;
use crate::suggestion::suggest;
use crate::types::Suggestion;

// =============================================================================
// SymbolPanel
// =============================================================================

/// The per-symbol outcome of one refresh cycle.  This is the
/// result-per-item collection the dashboard renders: success and failure
/// are both first-class values, never exceptions crossing the batch.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SymbolPanel {
    Ready {
        symbol: String,
        snapshot: IndicatorSnapshot,
        suggestion: Suggestion,
        rationale: String,
        /// Number of daily rows the snapshot was computed from.
        points: usize,
        /// ISO 8601 timestamp of when this panel was built.
        as_of: String,
    },
    Failed {
        symbol: String,
        error: String,
        as_of: String,
    },
}

impl SymbolPanel {
    pub fn symbol(&self) -> &str {
        match self {
            Self::Ready { symbol, .. } | Self::Failed { symbol, .. } => symbol,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready { .. })
    }
}

// =============================================================================
// Per-symbol evaluation
// =============================================================================

/// Run the full pipeline for one symbol.  Every error — retrieval, empty
/// series, insufficient window — is folded into a `Failed` panel here.
pub async fn evaluate_symbol(
    provider: &dyn PriceProvider,
    symbol: &str,
    range: &str,
    params: &IndicatorParams,
) -> SymbolPanel {
    let as_of = Utc::now().to_rfc3339();

    let series = match provider.fetch_daily_history(symbol, range).await {
        Ok(series) => series,
        Err(e) => {
            warn!(symbol, error = %e, "price history fetch failed");
            return SymbolPanel::Failed {
                symbol: symbol.to_string(),
                error: e.to_string(),
                as_of,
            };
        }
    };

    let closes: Vec<f64> = series.iter().map(|p| p.close).collect();

    match compute_snapshot(&closes, params) {
        Ok(snapshot) => {
            let (suggestion, rationale) = suggest(&snapshot, params);
            debug!(
                symbol,
                close = snapshot.close,
                rsi = snapshot.rsi,
                macd = snapshot.macd,
                signal = snapshot.signal,
                suggestion = %suggestion,
                "panel ready"
            );
            SymbolPanel::Ready {
                symbol: symbol.to_string(),
                snapshot,
                suggestion,
                rationale: rationale.to_string(),
                points: closes.len(),
                as_of,
            }
        }
        Err(e) => {
            warn!(symbol, error = %e, rows = closes.len(), "indicator calculation failed");
            SymbolPanel::Failed {
                symbol: symbol.to_string(),
                error: e.to_string(),
                as_of,
            }
        }
    }
}

// =============================================================================
// Refresh cycle
// =============================================================================

/// Evaluate every configured symbol and swap the fresh panel set into
/// shared state.  Also clears all manual annotations: widget state is
/// ephemeral per refresh.
pub async fn run_refresh_cycle(state: &Arc<AppState>, provider: &dyn PriceProvider) {
    let started = std::time::Instant::now();
    let (symbols, range, params) = {
        let config = state.runtime_config.read();
        (
            config.symbols.clone(),
            config.lookback_range.clone(),
            config.indicator_params.clone(),
        )
    };

    let mut panels = Vec::with_capacity(symbols.len());
    for symbol in &symbols {
        let panel = evaluate_symbol(provider, symbol, &range, &params).await;
        if let SymbolPanel::Failed { error, .. } = &panel {
            state.push_error(format!("{symbol}: {error}"));
        }
        panels.push(panel);
    }

    let ready = panels.iter().filter(|p| p.is_ready()).count();
    let elapsed_ms = started.elapsed().as_millis() as u64;

    *state.panels.write() = panels;
    state.actions.write().clear();
    *state.last_refresh_at.write() = Some(Utc::now().to_rfc3339());
    *state.last_refresh_ms.write() = Some(elapsed_ms);
    state.increment_version();

    info!(
        total = symbols.len(),
        ready,
        failed = symbols.len() - ready,
        elapsed_ms,
        "refresh cycle complete"
    );
}

/// Drive refresh cycles forever: one immediately on startup, then one per
/// configured interval, plus out-of-band cycles whenever the API fires the
/// refresh notify.  The interval is re-read every iteration so config
/// changes take effect without a restart.
pub async fn run_refresh_loop(state: Arc<AppState>, provider: Arc<dyn PriceProvider>) {
    info!("refresh loop starting");
    loop {
        run_refresh_cycle(&state, provider.as_ref()).await;

        let interval_secs = state.runtime_config.read().refresh_interval_secs.max(1);
        tokio::select! {
            _ = tokio::time::sleep(tokio::time::Duration::from_secs(interval_secs)) => {
                debug!(interval_secs, "refresh timer elapsed");
            }
            _ = state.refresh_notify.notified() => {
                info!("manual refresh requested");
            }
        }
    }
}
