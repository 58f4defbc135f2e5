//! REST API over a live panel.
//!
//! Read endpoints:
//! - `GET /state`: panel state plus derived metrics
//! - `GET /metrics`: derived metrics only
//!
//! Mutation endpoints:
//! - `POST /main-switch/toggle`
//! - `POST /loads/{id}/toggle`
//! - `PUT /loads/{id}/power`
//! - `POST /consumption`
//! - `PUT /tariff`

mod handlers;
mod types;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post, put};
use tracing::info;

use crate::handle::SharedPanel;
use crate::panel::billing::Clock;

/// Application state shared across all request handlers.
///
/// The panel handle serializes mutations; the clock supplies "now" for
/// billing metrics.
#[derive(Clone)]
pub struct AppState {
    /// Live panel.
    pub panel: SharedPanel,
    /// Time source for cycle calculations.
    pub clock: Arc<dyn Clock>,
}

/// Builds the axum router with all API routes.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/state", get(handlers::get_state))
        .route("/metrics", get(handlers::get_metrics))
        .route("/main-switch/toggle", post(handlers::toggle_main_switch))
        .route("/loads/{id}/toggle", post(handlers::toggle_load))
        .route("/loads/{id}/power", put(handlers::set_load_power))
        .route("/consumption", post(handlers::append_consumption))
        .route("/tariff", put(handlers::set_tariff))
        .with_state(state)
}

/// Binds to the given address and serves the API until the server stops.
///
/// # Errors
///
/// Returns an `io::Error` if the listener cannot bind or the server fails.
pub async fn serve(state: AppState, addr: SocketAddr) -> std::io::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "API server listening");
    axum::serve(listener, app).await
}
