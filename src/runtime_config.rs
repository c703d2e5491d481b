// =============================================================================
// Runtime Configuration — Hot-reloadable dashboard settings with atomic save
// =============================================================================
//
// Every tunable for the dashboard lives here: the watchlist, the lookback
// range sent to the market-data provider, the refresh cadence, and the
// indicator parameters.
//
// Persistence uses an atomic tmp + rename pattern to prevent corruption on
// crash.  All fields carry `#[serde(default)]` so that adding new fields
// never breaks loading an older config file.
//
// =============================================================================

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Where the config file lives, relative to the working directory.
pub const CONFIG_PATH: &str = "desk_config.json";

// =============================================================================
// Default-value helpers (required by serde `default = "..."` attribute)
// =============================================================================

fn default_symbols() -> Vec<String> {
    vec!["EAT".to_string(), "CART".to_string(), "LLOY.L".to_string()]
}

fn default_lookback_range() -> String {
    "3mo".to_string()
}

fn default_refresh_interval_secs() -> u64 {
    600
}

fn default_rsi_period() -> usize {
    14
}

fn default_rsi_buy_threshold() -> f64 {
    40.0
}

fn default_macd_fast() -> usize {
    12
}

fn default_macd_slow() -> usize {
    26
}

fn default_macd_signal() -> usize {
    9
}

// =============================================================================
// IndicatorParams
// =============================================================================

/// Tunable parameters for the indicator calculator and suggestion rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndicatorParams {
    /// Trailing window for the RSI gain/loss averages.
    #[serde(default = "default_rsi_period")]
    pub rsi_period: usize,

    /// RSI below this value is treated as oversold and suggests a buy.
    #[serde(default = "default_rsi_buy_threshold")]
    pub rsi_buy_threshold: f64,

    /// Span of the fast EMA in the MACD line.
    #[serde(default = "default_macd_fast")]
    pub macd_fast: usize,

    /// Span of the slow EMA in the MACD line.
    #[serde(default = "default_macd_slow")]
    pub macd_slow: usize,

    /// Span of the EMA applied to the MACD line to form the signal line.
    #[serde(default = "default_macd_signal")]
    pub macd_signal: usize,
}

impl Default for IndicatorParams {
    fn default() -> Self {
        Self {
            rsi_period: default_rsi_period(),
            rsi_buy_threshold: default_rsi_buy_threshold(),
            macd_fast: default_macd_fast(),
            macd_slow: default_macd_slow(),
            macd_signal: default_macd_signal(),
        }
    }
}

// =============================================================================
// RuntimeConfig
// =============================================================================

/// Top-level runtime configuration for the dashboard.
///
/// Every field has a serde default so that older JSON files missing new
/// fields will still deserialise correctly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Symbols shown on the dashboard, one panel each.
    #[serde(default = "default_symbols")]
    pub symbols: Vec<String>,

    /// Lookback range passed to the provider (e.g. "3mo", "6mo", "1y").
    /// Three months comfortably exceeds the indicator warm-up.
    #[serde(default = "default_lookback_range")]
    pub lookback_range: String,

    /// Seconds between automatic refresh cycles.
    #[serde(default = "default_refresh_interval_secs")]
    pub refresh_interval_secs: u64,

    /// Indicator and suggestion-rule parameters.
    #[serde(default)]
    pub indicator_params: IndicatorParams,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            symbols: default_symbols(),
            lookback_range: default_lookback_range(),
            refresh_interval_secs: default_refresh_interval_secs(),
            indicator_params: IndicatorParams::default(),
        }
    }
}

impl RuntimeConfig {
    /// Load configuration from a JSON file at `path`.
    ///
    /// If the file does not exist, returns an error so the caller can fall
    /// back to defaults with a warning.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read runtime config from {}", path.display()))?;

        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse runtime config from {}", path.display()))?;

        info!(
            path = %path.display(),
            symbols = ?config.symbols,
            refresh_interval_secs = config.refresh_interval_secs,
            "runtime config loaded"
        );

        Ok(config)
    }

    /// Persist the current configuration to `path` using an atomic write
    /// (write to `.tmp`, then rename).
    ///
    /// This prevents corruption if the process crashes mid-write.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        let content = serde_json::to_string_pretty(self)
            .context("failed to serialise runtime config to JSON")?;

        // Atomic write: write to a temporary sibling file, then rename.
        let tmp_path = path.with_extension("json.tmp");

        std::fs::write(&tmp_path, &content)
            .with_context(|| format!("failed to write tmp config to {}", tmp_path.display()))?;

        std::fs::rename(&tmp_path, path)
            .with_context(|| format!("failed to rename tmp config to {}", path.display()))?;

        info!(path = %path.display(), "runtime config saved (atomic)");
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_expected_values() {
        let cfg = RuntimeConfig::default();
        assert_eq!(cfg.symbols, vec!["EAT", "CART", "LLOY.L"]);
        assert_eq!(cfg.lookback_range, "3mo");
        assert_eq!(cfg.refresh_interval_secs, 600);
        assert_eq!(cfg.indicator_params.rsi_period, 14);
        assert!((cfg.indicator_params.rsi_buy_threshold - 40.0).abs() < f64::EPSILON);
        assert_eq!(cfg.indicator_params.macd_fast, 12);
        assert_eq!(cfg.indicator_params.macd_slow, 26);
        assert_eq!(cfg.indicator_params.macd_signal, 9);
    }

    #[test]
    fn deserialise_empty_json_uses_defaults() {
        let cfg: RuntimeConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg.symbols.len(), 3);
        assert_eq!(cfg.refresh_interval_secs, 600);
        assert_eq!(cfg.indicator_params.rsi_period, 14);
    }

    #[test]
    fn deserialise_partial_json_fills_defaults() {
        let json = r#"{ "symbols": ["AAPL"], "refresh_interval_secs": 60 }"#;
        let cfg: RuntimeConfig = serde_json::from_str(json).unwrap();
        assert_eq!(cfg.symbols, vec!["AAPL"]);
        assert_eq!(cfg.refresh_interval_secs, 60);
        assert_eq!(cfg.lookback_range, "3mo");
        assert_eq!(cfg.indicator_params.macd_slow, 26);
    }

    #[test]
    fn roundtrip_serialisation() {
        let cfg = RuntimeConfig::default();
        let json = serde_json::to_string(&cfg).unwrap();
        let cfg2: RuntimeConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(cfg.symbols, cfg2.symbols);
        assert_eq!(cfg.refresh_interval_secs, cfg2.refresh_interval_secs);
        assert_eq!(cfg.indicator_params.rsi_period, cfg2.indicator_params.rsi_period);
    }
}
