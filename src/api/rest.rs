// =============================================================================
// REST API Endpoints — Axum 0.7
// =============================================================================
//
// All endpoints live under `/api/v1/`.  This is a single-user personal
// dashboard, so there is no authentication layer.
//
// CORS is configured permissively for development; tighten
// `allowed_origins` in production.
// =============================================================================

use std::sync::Arc;

use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

use crate::app_state::AppState;
use crate::runtime_config::CONFIG_PATH;
use crate::types::{Suggestion, UserAction};

// =============================================================================
// Router construction
// =============================================================================

/// Build the full REST API router with CORS middleware and shared state.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/v1/health", get(health))
        .route("/api/v1/dashboard", get(dashboard))
        .route("/api/v1/refresh", post(trigger_refresh))
        .route("/api/v1/actions", get(get_actions))
        .route("/api/v1/actions", post(set_action))
        .route("/api/v1/config", get(get_config))
        .route("/api/v1/config", post(set_config))
        // ── WebSocket (handled in the ws module but mounted here) ────
        .route("/api/v1/ws", get(crate::api::ws::ws_handler))
        .layer(cors)
        .with_state(state)
}

// =============================================================================
// Health
// =============================================================================

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    state_version: u64,
    server_time: i64,
}

async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let resp = HealthResponse {
        status: "ok",
        state_version: state.current_state_version(),
        server_time: chrono::Utc::now().timestamp_millis(),
    };
    Json(resp)
}

// =============================================================================
// Dashboard snapshot
// =============================================================================

async fn dashboard(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let snapshot = state.build_snapshot();
    Json(snapshot)
}

// =============================================================================
// Manual refresh
// =============================================================================

async fn trigger_refresh(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    state.refresh_notify.notify_one();
    info!("refresh triggered via API");

    Json(serde_json::json!({
        "status": "refresh scheduled",
        "state_version": state.current_state_version(),
    }))
}

// =============================================================================
// Annotations
// =============================================================================

async fn get_actions(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let actions = state.actions.read().clone();
    Json(actions)
}

#[derive(Deserialize)]
struct ActionRequest {
    symbol: String,
    choice: Suggestion,
}

async fn set_action(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ActionRequest>,
) -> Result<impl IntoResponse, (StatusCode, Json<serde_json::Value>)> {
    let action = UserAction {
        symbol: req.symbol.clone(),
        choice: req.choice,
        noted_at: chrono::Utc::now().to_rfc3339(),
    };

    if !state.set_action(action) {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({
                "error": format!("Symbol '{}' is not on the watchlist", req.symbol),
            })),
        ));
    }

    info!(symbol = %req.symbol, choice = %req.choice, "annotation recorded");

    Ok(Json(serde_json::json!({
        "symbol": req.symbol,
        "choice": req.choice,
    })))
}

// =============================================================================
// Config endpoints
// =============================================================================

#[derive(Serialize)]
struct ConfigResponse {
    symbols: Vec<String>,
    lookback_range: String,
    refresh_interval_secs: u64,
}

async fn get_config(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let config = state.runtime_config.read();
    Json(ConfigResponse {
        symbols: config.symbols.clone(),
        lookback_range: config.lookback_range.clone(),
        refresh_interval_secs: config.refresh_interval_secs,
    })
}

#[derive(Deserialize)]
struct ConfigUpdate {
    #[serde(default)]
    symbols: Option<Vec<String>>,
    #[serde(default)]
    refresh_interval_secs: Option<u64>,
}

async fn set_config(
    State(state): State<Arc<AppState>>,
    Json(update): Json<ConfigUpdate>,
) -> Result<impl IntoResponse, (StatusCode, Json<serde_json::Value>)> {
    if let Some(symbols) = &update.symbols {
        if symbols.is_empty() {
            return Err((
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({ "error": "watchlist cannot be empty" })),
            ));
        }
    }
    if let Some(secs) = update.refresh_interval_secs {
        if secs == 0 {
            return Err((
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({ "error": "refresh interval must be at least 1 second" })),
            ));
        }
    }

    let mut changes = Vec::new();
    let config_clone = {
        let mut config = state.runtime_config.write();

        if let Some(symbols) = update.symbols {
            if config.symbols != symbols {
                changes.push(format!("symbols: {:?} -> {:?}", config.symbols, symbols));
                config.symbols = symbols;
            }
        }
        if let Some(secs) = update.refresh_interval_secs {
            if config.refresh_interval_secs != secs {
                changes.push(format!(
                    "refresh_interval_secs: {} -> {}",
                    config.refresh_interval_secs, secs
                ));
                config.refresh_interval_secs = secs;
            }
        }

        config.clone()
    };

    if !changes.is_empty() {
        info!(changes = ?changes, "config updated via API");

        // Save to disk (best-effort).
        if let Err(e) = config_clone.save(CONFIG_PATH) {
            warn!(error = %e, "failed to save config to disk");
        }

        state.increment_version();
        // Re-run the pipeline against the new watchlist right away.
        state.refresh_notify.notify_one();
    }

    Ok(Json(serde_json::json!({
        "symbols": config_clone.symbols,
        "lookback_range": config_clone.lookback_range,
        "refresh_interval_secs": config_clone.refresh_interval_secs,
        "changes": changes,
    })))
}
