//! Request handlers for the API endpoints.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::{debug, info};

use super::AppState;
use super::types::{
    ConsumptionRequest, ErrorResponse, MainSwitchResponse, SetPowerRequest, StateResponse,
    TariffRequest, ToggleResponse,
};
use crate::error::PanelError;
use crate::metrics::PanelReport;
use crate::panel::billing::Clock;

/// Maps a rejected mutation to an HTTP error.
///
/// Unknown loads are `404`; every other validation failure is `400`.
pub struct ApiError(PanelError);

impl From<PanelError> for ApiError {
    fn from(err: PanelError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = if self.0.is_unknown_load() {
            StatusCode::NOT_FOUND
        } else {
            StatusCode::BAD_REQUEST
        };
        debug!(error = %self.0, %status, "request rejected");
        (
            status,
            Json(ErrorResponse {
                error: self.0.to_string(),
            }),
        )
            .into_response()
    }
}

/// Returns the panel state together with freshly derived metrics.
///
/// `GET /state` → 200 + `StateResponse` JSON
pub async fn get_state(State(app): State<AppState>) -> Json<StateResponse> {
    let now = app.clock.now();
    let (state, metrics) = app
        .panel
        .read(|s| (s.clone(), PanelReport::at(s, now)));
    Json(StateResponse { state, metrics })
}

/// Returns only the derived metrics.
///
/// `GET /metrics` → 200 + `PanelReport` JSON
pub async fn get_metrics(State(app): State<AppState>) -> Json<PanelReport> {
    let now = app.clock.now();
    Json(app.panel.read(|s| PanelReport::at(s, now)))
}

/// Flips the main breaker and applies its cascade.
///
/// `POST /main-switch/toggle` → 200 + `MainSwitchResponse`
pub async fn toggle_main_switch(State(app): State<AppState>) -> Json<MainSwitchResponse> {
    let main_switch = app.panel.mutate(|s| s.toggle_main_switch());
    Json(MainSwitchResponse { main_switch })
}

/// Flips one load.
///
/// `POST /loads/{id}/toggle` → 200 + `ToggleResponse` (including the
/// suppressed outcome while the main switch is off), 404 for unknown ids.
pub async fn toggle_load(
    State(app): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ToggleResponse>, ApiError> {
    let outcome = app.panel.mutate(|s| s.toggle_load(&id))?;
    Ok(Json(ToggleResponse { id, outcome }))
}

/// Changes a load's rated power.
///
/// `PUT /loads/{id}/power` → 204, 400 on negative power, 404 for unknown ids.
pub async fn set_load_power(
    State(app): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<SetPowerRequest>,
) -> Result<StatusCode, ApiError> {
    app.panel.mutate(|s| s.set_load_power(&id, req.power_w))?;
    Ok(StatusCode::NO_CONTENT)
}

/// Records a day of consumption.
///
/// `POST /consumption` → 204, 400 on negative energy.
pub async fn append_consumption(
    State(app): State<AppState>,
    Json(req): Json<ConsumptionRequest>,
) -> Result<StatusCode, ApiError> {
    app.panel.mutate(|s| s.append_daily_consumption(req.kwh))?;
    Ok(StatusCode::NO_CONTENT)
}

/// Replaces the tariff.
///
/// `PUT /tariff` → 204, 400 unless the rate is positive.
pub async fn set_tariff(
    State(app): State<AppState>,
    Json(req): Json<TariffRequest>,
) -> Result<StatusCode, ApiError> {
    app.panel.mutate(|s| s.set_tariff_rate(req.rate))?;
    info!(rate = req.rate, "tariff changed via api");
    Ok(StatusCode::NO_CONTENT)
}
