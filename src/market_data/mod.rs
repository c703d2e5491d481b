// =============================================================================
// Market Data — daily price history providers
// =============================================================================
//
// The dashboard only needs one call: a trailing window of daily closes for
// a symbol.  The trait seam exists so the refresh loop can be exercised in
// tests with scripted providers instead of the network.

pub mod yahoo;

use async_trait::async_trait;
use thiserror::Error;

use crate::types::PricePoint;

/// Errors a provider can surface for a single symbol.  All of these are
/// caught at the per-symbol boundary and rendered as an inline panel error;
/// none of them abort the refresh cycle.
#[derive(Debug, Clone, Error)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(String),

    #[error("bad response: {0}")]
    BadResponse(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("rate limited")]
    RateLimited,

    #[error("no data returned")]
    NoData,
}

/// Source of daily OHLC history.  `range` is a provider-style lookback
/// string such as "3mo" or "1y".
///
/// Implementations must return a chronologically ascending series with no
/// duplicate dates, and [`FetchError::NoData`] instead of an empty vec.
#[async_trait]
pub trait PriceProvider: Send + Sync {
    async fn fetch_daily_history(
        &self,
        symbol: &str,
        range: &str,
    ) -> Result<Vec<PricePoint>, FetchError>;
}
