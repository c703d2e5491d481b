// =============================================================================
// Yahoo Finance Chart API Client
// =============================================================================
//
// Fetches daily closes from the public v8 chart endpoint:
//
//   GET https://query1.finance.yahoo.com/v8/finance/chart/{symbol}
//       ?range={range}&interval=1d
//
// No API key is required.  The response carries parallel arrays: one of
// UNIX timestamps and one of (nullable) closes; rows with a null close are
// holiday/half-day artefacts and are skipped.  Parsing is split out from
// the HTTP call so it can be unit-tested against fixture JSON.
// =============================================================================

use async_trait::async_trait;
use chrono::DateTime;
use serde::Deserialize;
use tracing::debug;

use crate::market_data::{FetchError, PriceProvider};
use crate::types::PricePoint;

/// Yahoo Finance provider for daily price history.
#[derive(Clone)]
pub struct YahooProvider {
    base_url: String,
    client: reqwest::Client,
}

impl YahooProvider {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .user_agent("ticker-desk/1.0")
            .build()
            .expect("failed to build reqwest client");

        Self {
            base_url: "https://query1.finance.yahoo.com".to_string(),
            client,
        }
    }
}

impl Default for YahooProvider {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Response shapes (only the fields we need)
// =============================================================================

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    result: Option<Vec<ChartResult>>,
    error: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<Quote>,
}

#[derive(Debug, Deserialize)]
struct Quote {
    close: Vec<Option<f64>>,
}

// =============================================================================
// Parsing
// =============================================================================

/// Convert a chart response into an ascending, deduplicated price series.
///
/// Rows with a null or non-finite close are skipped.  Duplicate dates keep
/// the last occurrence (intraday rows collapse onto the trading day).
fn parse_chart(body: ChartResponse) -> Result<Vec<PricePoint>, FetchError> {
    if let Some(err) = body.chart.error {
        if !err.is_null() {
            return Err(FetchError::BadResponse(err.to_string()));
        }
    }

    let result = body
        .chart
        .result
        .and_then(|mut r| r.pop())
        .ok_or_else(|| FetchError::BadResponse("missing result".into()))?;

    let quote = result
        .indicators
        .quote
        .into_iter()
        .next()
        .ok_or_else(|| FetchError::BadResponse("missing quote".into()))?;

    let mut out: Vec<PricePoint> = Vec::with_capacity(result.timestamp.len());

    for (i, &ts) in result.timestamp.iter().enumerate() {
        let Some(close) = quote.close.get(i).copied().flatten() else {
            continue;
        };
        if !close.is_finite() {
            continue;
        }

        let date = DateTime::from_timestamp(ts, 0)
            .ok_or_else(|| FetchError::Parse(format!("bad timestamp {ts}")))?
            .date_naive();

        out.push(PricePoint { date, close });
    }

    // Ascending by date, last row wins for duplicates.
    out.sort_by_key(|p| p.date);
    out.dedup_by(|later, earlier| {
        if later.date == earlier.date {
            earlier.close = later.close;
            true
        } else {
            false
        }
    });

    if out.is_empty() {
        return Err(FetchError::NoData);
    }

    Ok(out)
}

// =============================================================================
// PriceProvider impl
// =============================================================================

#[async_trait]
impl PriceProvider for YahooProvider {
    async fn fetch_daily_history(
        &self,
        symbol: &str,
        range: &str,
    ) -> Result<Vec<PricePoint>, FetchError> {
        let url = format!(
            "{}/v8/finance/chart/{symbol}?range={range}&interval=1d",
            self.base_url
        );

        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        if resp.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(FetchError::RateLimited);
        }
        if !resp.status().is_success() {
            return Err(FetchError::BadResponse(format!(
                "HTTP {} from chart endpoint",
                resp.status()
            )));
        }

        let body = resp
            .json::<ChartResponse>()
            .await
            .map_err(|e| FetchError::Parse(e.to_string()))?;

        let points = parse_chart(body)?;
        debug!(symbol, range, rows = points.len(), "price history fetched");
        Ok(points)
    }
}
