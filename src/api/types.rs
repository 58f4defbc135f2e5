//! API request and response types.

use serde::{Deserialize, Serialize};

use crate::metrics::PanelReport;
use crate::panel::ops::ToggleOutcome;
use crate::panel::state::SystemState;

/// Full panel state plus the metrics derived from it at request time.
#[derive(Debug, Serialize)]
pub struct StateResponse {
    /// Raw panel state.
    pub state: SystemState,
    /// Derived metrics.
    pub metrics: PanelReport,
}

/// Result of a load toggle request.
#[derive(Debug, Serialize)]
pub struct ToggleResponse {
    /// Load that was addressed.
    pub id: String,
    /// Whether the toggle took effect.
    #[serde(flatten)]
    pub outcome: ToggleOutcome,
}

/// Result of a main switch toggle.
#[derive(Debug, Serialize)]
pub struct MainSwitchResponse {
    /// New switch position.
    pub main_switch: bool,
}

/// Body for `PUT /loads/{id}/power`.
#[derive(Debug, Deserialize)]
pub struct SetPowerRequest {
    /// Rated power in watts.
    pub power_w: f64,
}

/// Body for `POST /consumption`.
#[derive(Debug, Deserialize)]
pub struct ConsumptionRequest {
    /// Energy used on the day being recorded (kWh).
    pub kwh: f64,
}

/// Body for `PUT /tariff`.
#[derive(Debug, Deserialize)]
pub struct TariffRequest {
    /// Price per kWh.
    pub rate: f64,
}

/// Error response body for 4xx errors.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_response_flattens_outcome() {
        let resp = ToggleResponse {
            id: "fan".to_string(),
            outcome: ToggleOutcome::Toggled { is_on: true },
        };
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["id"], "fan");
        assert_eq!(json["outcome"], "toggled");
        assert_eq!(json["is_on"], true);

        let resp = ToggleResponse {
            id: "fan".to_string(),
            outcome: ToggleOutcome::SuppressedMainSwitchOff,
        };
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["outcome"], "suppressed_main_switch_off");
    }
}
