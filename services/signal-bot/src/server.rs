//! HTTP wiring for the control surface and the dashboard read model

use crate::control::{ControlResponse, handle_action};
use crate::orchestrator::Orchestrator;
use anyhow::{Context, Result};
use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::Json,
    routing::{get, post, put},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use services_common::constants::{DASHBOARD_SIGNAL_LIMIT, TRADING_ENABLED_KEY};
use services_common::{ConfigStore, PersistenceGateway, PriceRecord, TradeSignal, trading_enabled};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<Orchestrator>,
    pub store: Arc<dyn PersistenceGateway>,
    pub config: Arc<dyn ConfigStore>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ActionRequest {
    pub action: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ConfigUpdate {
    pub enabled: bool,
}

/// Dashboard snapshot
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    pub running: bool,
    pub trading_enabled: bool,
    pub latest_price: Option<PriceRecord>,
    /// Most recent first
    pub recent_signals: Vec<TradeSignal>,
}

type ErrorReply = (StatusCode, Json<ControlResponse>);

fn internal(context: &str, err: impl std::fmt::Display) -> ErrorReply {
    error!(error = %err, "{}", context);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ControlResponse::server_error(err.to_string())),
    )
}

/// Build the router with all routes and tracing
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/bot", post(control))
        .route("/api/bot/status", get(status))
        .route("/api/bot/config", put(update_config))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Bind and serve until `shutdown` resolves
pub async fn serve(
    address: &str,
    state: AppState,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<()> {
    let addr: SocketAddr = address
        .parse()
        .with_context(|| format!("Invalid server address '{address}'"))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to address {addr}"))?;

    info!("Control surface listening on {}", addr);
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await
        .context("Server error")
}

async fn control(
    State(state): State<AppState>,
    Json(request): Json<ActionRequest>,
) -> (StatusCode, Json<ControlResponse>) {
    let (status, response) = handle_action(&state.orchestrator, &request.action);
    (status, Json(response))
}

async fn status(State(state): State<AppState>) -> Result<Json<StatusResponse>, ErrorReply> {
    let trading_enabled = trading_enabled(state.config.as_ref())
        .await
        .map_err(|e| internal("Failed to read runtime config", e))?;
    let latest_price = state
        .store
        .latest_price()
        .await
        .map_err(|e| internal("Failed to read latest price", e))?;
    let recent_signals = state
        .store
        .recent_signals(DASHBOARD_SIGNAL_LIMIT)
        .await
        .map_err(|e| internal("Failed to read recent signals", e))?;

    Ok(Json(StatusResponse {
        running: state.orchestrator.is_running(),
        trading_enabled,
        latest_price,
        recent_signals,
    }))
}

async fn update_config(
    State(state): State<AppState>,
    Json(update): Json<ConfigUpdate>,
) -> Result<Json<ControlResponse>, ErrorReply> {
    state
        .config
        .set(TRADING_ENABLED_KEY, Value::Bool(update.enabled))
        .await
        .map_err(|e| internal("Failed to update runtime config", e))?;

    info!(enabled = update.enabled, "Trading toggle updated");
    let message = if update.enabled {
        "trading enabled"
    } else {
        "trading disabled"
    };
    Ok(Json(ControlResponse::ok(message)))
}
