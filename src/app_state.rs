// =============================================================================
// Central Application State — Ticker Desk
// =============================================================================
//
// The single source of truth for the dashboard.  The refresh loop writes
// panels into it, the API reads snapshots out of it, and the WebSocket feed
// watches its version counter.
//
// Thread safety:
//   - Atomic counters for lock-free version tracking.
//   - parking_lot::RwLock for all mutable shared collections.
//   - tokio::sync::Notify for the manual-refresh trigger.
// =============================================================================

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use parking_lot::RwLock;
use serde::Serialize;
use tokio::sync::Notify;

use crate::refresh::SymbolPanel;
use crate::runtime_config::RuntimeConfig;
use crate::types::UserAction;

/// Maximum number of recent errors to retain.
const MAX_RECENT_ERRORS: usize = 50;

/// A recorded error event for the dashboard error log.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorRecord {
    /// Human-readable error message.
    pub message: String,
    /// ISO 8601 timestamp.
    pub at: String,
}

// =============================================================================
// AppState
// =============================================================================

/// Central application state shared across all async tasks via `Arc<AppState>`.
pub struct AppState {
    // ── Version tracking ────────────────────────────────────────────────
    /// Monotonically increasing version counter.  Incremented on every
    /// meaningful state mutation.  The WebSocket feed uses this to detect
    /// changes and push updates.
    pub state_version: AtomicU64,

    /// WebSocket message sequence number (incremented per message sent).
    pub ws_sequence_number: AtomicU64,

    // ── Configuration ───────────────────────────────────────────────────
    pub runtime_config: RwLock<RuntimeConfig>,

    // ── Dashboard content ───────────────────────────────────────────────
    /// One panel per configured symbol, replaced wholesale on every cycle.
    pub panels: RwLock<Vec<SymbolPanel>>,

    /// Manual annotations keyed by symbol.  Cleared on every refresh.
    pub actions: RwLock<HashMap<String, UserAction>>,

    // ── Error Log ───────────────────────────────────────────────────────
    pub recent_errors: RwLock<Vec<ErrorRecord>>,

    // ── Refresh bookkeeping ─────────────────────────────────────────────
    pub refresh_notify: Notify,
    pub last_refresh_at: RwLock<Option<String>>,
    pub last_refresh_ms: RwLock<Option<u64>>,

    // ── Timing ──────────────────────────────────────────────────────────
    /// Instant when the server was started.  Used for uptime calculations.
    pub start_time: std::time::Instant,
}

impl AppState {
    /// Construct a new `AppState` from the given runtime configuration.
    /// The returned value is typically wrapped in `Arc` immediately.
    pub fn new(config: RuntimeConfig) -> Self {
        Self {
            state_version: AtomicU64::new(1),
            ws_sequence_number: AtomicU64::new(0),

            runtime_config: RwLock::new(config),

            panels: RwLock::new(Vec::new()),
            actions: RwLock::new(HashMap::new()),

            recent_errors: RwLock::new(Vec::new()),

            refresh_notify: Notify::new(),
            last_refresh_at: RwLock::new(None),
            last_refresh_ms: RwLock::new(None),

            start_time: std::time::Instant::now(),
        }
    }

    // ── Version Management ──────────────────────────────────────────────

    /// Atomically increment the state version.  Call this after every
    /// meaningful mutation to signal WebSocket clients that fresh data is
    /// available.
    pub fn increment_version(&self) -> u64 {
        self.state_version.fetch_add(1, Ordering::SeqCst)
    }

    /// Read the current state version without modifying it.
    pub fn current_state_version(&self) -> u64 {
        self.state_version.load(Ordering::SeqCst)
    }

    // ── Error Logging ───────────────────────────────────────────────────

    /// Record an error message.  The ring buffer is capped at
    /// [`MAX_RECENT_ERRORS`]; oldest entries are evicted when the limit is
    /// reached.
    pub fn push_error(&self, msg: String) {
        let record = ErrorRecord {
            message: msg,
            at: Utc::now().to_rfc3339(),
        };

        let mut errors = self.recent_errors.write();
        errors.push(record);
        while errors.len() > MAX_RECENT_ERRORS {
            errors.remove(0);
        }

        self.increment_version();
    }

    // ── Annotations ─────────────────────────────────────────────────────

    /// Record a manual annotation for `symbol`.  Returns false (and stores
    /// nothing) when the symbol is not on the watchlist.
    pub fn set_action(&self, action: UserAction) -> bool {
        let known = self
            .runtime_config
            .read()
            .symbols
            .iter()
            .any(|s| s == &action.symbol);
        if !known {
            return false;
        }

        self.actions.write().insert(action.symbol.clone(), action);
        self.increment_version();
        true
    }

    // ── Snapshot Builder ────────────────────────────────────────────────

    /// Build a complete, serialisable snapshot of the dashboard state.
    ///
    /// This is the payload served by `GET /api/v1/dashboard` and pushed
    /// over the WebSocket feed.
    pub fn build_snapshot(&self) -> DashboardSnapshot {
        let config = self.runtime_config.read();

        DashboardSnapshot {
            state_version: self.current_state_version(),
            server_time: Utc::now().timestamp_millis(),
            uptime_secs: self.start_time.elapsed().as_secs(),
            symbols: config.symbols.clone(),
            refresh_interval_secs: config.refresh_interval_secs,
            last_refresh_at: self.last_refresh_at.read().clone(),
            last_refresh_ms: *self.last_refresh_ms.read(),
            panels: self.panels.read().clone(),
            actions: self.actions.read().clone(),
            recent_errors: self.recent_errors.read().clone(),
        }
    }
}

// =============================================================================
// DashboardSnapshot
// =============================================================================

/// Everything the frontend needs to render the dashboard in one payload.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSnapshot {
    pub state_version: u64,
    pub server_time: i64,
    pub uptime_secs: u64,
    pub symbols: Vec<String>,
    pub refresh_interval_secs: u64,
    pub last_refresh_at: Option<String>,
    pub last_refresh_ms: Option<u64>,
    pub panels: Vec<SymbolPanel>,
    pub actions: HashMap<String, UserAction>,
    pub recent_errors: Vec<ErrorRecord>,
}

// =============================================================================
// Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Suggestion;

    fn state() -> AppState {
        AppState::new(RuntimeConfig::default())
    }

    fn action(symbol: &str, choice: Suggestion) -> UserAction {
        UserAction {
            symbol: symbol.to_string(),
            choice,
            noted_at: Utc::now().to_rfc3339(),
        }
    }

    #[test]
    fn version_increments() {
        let s = state();
        let v0 = s.current_state_version();
        s.increment_version();
        assert_eq!(s.current_state_version(), v0 + 1);
    }

    #[test]
    fn error_ring_buffer_is_capped() {
        let s = state();
        for i in 0..(MAX_RECENT_ERRORS + 10) {
            s.push_error(format!("error {i}"));
        }
        let errors = s.recent_errors.read();
        assert_eq!(errors.len(), MAX_RECENT_ERRORS);
        // Oldest entries were evicted.
        assert_eq!(errors[0].message, "error 10");
    }

    #[test]
    fn set_action_rejects_unknown_symbol() {
        let s = state();
        assert!(!s.set_action(action("ZZZZ", Suggestion::Buy)));
        assert!(s.actions.read().is_empty());
    }

    #[test]
    fn set_action_stores_watchlist_symbol() {
        let s = state();
        assert!(s.set_action(action("EAT", Suggestion::Skip)));
        assert_eq!(s.actions.read().get("EAT").unwrap().choice, Suggestion::Skip);
    }

    #[test]
    fn set_action_overwrites_previous_choice() {
        let s = state();
        assert!(s.set_action(action("EAT", Suggestion::Buy)));
        assert!(s.set_action(action("EAT", Suggestion::None)));
        assert_eq!(s.actions.read().len(), 1);
        assert_eq!(s.actions.read().get("EAT").unwrap().choice, Suggestion::None);
    }

    #[test]
    fn snapshot_reflects_state() {
        let s = state();
        s.push_error("boom".to_string());
        let snap = s.build_snapshot();
        assert_eq!(snap.symbols, vec!["EAT", "CART", "LLOY.L"]);
        assert_eq!(snap.refresh_interval_secs, 600);
        assert!(snap.panels.is_empty());
        assert_eq!(snap.recent_errors.len(), 1);
        assert_eq!(snap.state_version, s.current_state_version());
    }
}
