//! Shared test fixtures for integration tests.

#![allow(dead_code)]

use chrono::NaiveDate;

use panel_sim::config::PanelConfig;
use panel_sim::panel::state::StateParams;
use panel_sim::panel::{FixedClock, Load};
use panel_sim::SystemState;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid calendar date")
}

/// Noon on 2024-10-25, which falls in the cycle anchored on the 16th.
pub fn late_cycle_clock() -> FixedClock {
    FixedClock::at_noon(date(2024, 10, 25))
}

/// The reference household preset, built at [`late_cycle_clock`].
pub fn household_state() -> SystemState {
    PanelConfig::household()
        .build_state(&late_cycle_clock())
        .expect("household preset should build")
}

/// Two loads: a 1500 W heater switched on and an 800 W oven switched off.
pub fn heater_and_oven() -> Vec<Load> {
    vec![
        Load::new("heater", "Heater", 1500.0, true).expect("valid load"),
        Load::new("oven", "Oven", 800.0, false).expect("valid load"),
    ]
}

/// Default parameters with a flat 20 x 20 kWh history.
pub fn flat_history_params() -> StateParams {
    StateParams {
        history_kwh: vec![20.0; 20],
        ..StateParams::default()
    }
}

pub fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-6
}
