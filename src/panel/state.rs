//! The aggregate panel state.

use std::collections::BTreeSet;

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::error::PanelError;

use super::billing::{Clock, cycle_anchor_for};
use super::history::{ConsumptionHistory, DEFAULT_HISTORY_DAYS};
use super::load::{Load, LoadRegistry};

/// Loads that come back on by themselves whenever the main switch closes.
pub const DEFAULT_ESSENTIAL_LOADS: &[&str] = &["refrigerator", "lighting"];

/// Scalar parameters and history used to construct a [`SystemState`].
///
/// `Default` yields the reference household values: 230 V, 50 Hz, 8.5 per
/// kWh, main switch on and a flat 20-day history of zeros.
#[derive(Debug, Clone, PartialEq)]
pub struct StateParams {
    pub main_switch: bool,
    pub voltage_v: f64,
    pub frequency_hz: f64,
    pub tariff_rate: f64,
    pub history_kwh: Vec<f64>,
    pub essential_loads: Vec<String>,
}

impl Default for StateParams {
    fn default() -> Self {
        Self {
            main_switch: true,
            voltage_v: 230.0,
            frequency_hz: 50.0,
            tariff_rate: 8.5,
            history_kwh: vec![0.0; DEFAULT_HISTORY_DAYS],
            essential_loads: DEFAULT_ESSENTIAL_LOADS
                .iter()
                .map(|id| (*id).to_string())
                .collect(),
        }
    }
}

/// Everything the panel knows: breaker, supply, tariff, history and loads.
///
/// Fields are only reachable through accessors; changes go through the
/// mutation methods in [`crate::panel::ops`], which keep these invariants:
///
/// - main switch open ⇒ every load is off
/// - history length never changes
/// - voltage, frequency and tariff stay finite and positive
/// - every rated power stays finite and non-negative
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SystemState {
    pub(crate) main_switch: bool,
    pub(crate) voltage_v: f64,
    pub(crate) frequency_hz: f64,
    pub(crate) tariff_rate: f64,
    pub(crate) consumption_history: ConsumptionHistory,
    pub(crate) cycle_anchor: NaiveDate,
    pub(crate) essential_loads: BTreeSet<String>,
    pub(crate) loads: LoadRegistry,
}

impl SystemState {
    /// Builds a validated state whose cycle anchor is derived from `clock`.
    ///
    /// If `params.main_switch` is `false`, every load is stored switched off.
    /// Essential ids that name no registered load are kept but have no effect.
    ///
    /// # Errors
    ///
    /// Returns a [`PanelError`] if any scalar parameter is out of range, the
    /// history is empty or holds a negative day, or two loads share an id.
    pub fn new(
        params: StateParams,
        loads: impl IntoIterator<Item = Load>,
        clock: &dyn Clock,
    ) -> Result<Self, PanelError> {
        check_positive("voltage_v", params.voltage_v)?;
        check_positive("frequency_hz", params.frequency_hz)?;
        if !(params.tariff_rate.is_finite() && params.tariff_rate > 0.0) {
            return Err(PanelError::NonPositiveTariff {
                rate: params.tariff_rate,
            });
        }
        let consumption_history = ConsumptionHistory::new(params.history_kwh)?;

        let mut registry = LoadRegistry::new();
        for mut load in loads {
            if !params.main_switch {
                load.is_on = false;
            }
            registry.insert(load)?;
        }

        Ok(Self {
            main_switch: params.main_switch,
            voltage_v: params.voltage_v,
            frequency_hz: params.frequency_hz,
            tariff_rate: params.tariff_rate,
            consumption_history,
            cycle_anchor: cycle_anchor_for(clock.today()),
            essential_loads: params.essential_loads.into_iter().collect(),
            loads: registry,
        })
    }

    pub fn main_switch(&self) -> bool {
        self.main_switch
    }

    /// Supply voltage in volts.
    pub fn voltage_v(&self) -> f64 {
        self.voltage_v
    }

    /// Supply frequency in hertz.
    pub fn frequency_hz(&self) -> f64 {
        self.frequency_hz
    }

    /// Price per kWh.
    pub fn tariff_rate(&self) -> f64 {
        self.tariff_rate
    }

    pub fn consumption_history(&self) -> &ConsumptionHistory {
        &self.consumption_history
    }

    /// First day of the current billing cycle.
    pub fn cycle_anchor(&self) -> NaiveDate {
        self.cycle_anchor
    }

    pub fn essential_loads(&self) -> impl Iterator<Item = &str> {
        self.essential_loads.iter().map(String::as_str)
    }

    pub fn is_essential(&self, id: &str) -> bool {
        self.essential_loads.contains(id)
    }

    pub fn loads(&self) -> &LoadRegistry {
        &self.loads
    }

    pub fn load(&self, id: &str) -> Option<&Load> {
        self.loads.get(id)
    }

    /// Recomputes the cycle anchor for the date of `now`.
    pub fn refresh_cycle_anchor(&mut self, now: NaiveDateTime) {
        self.cycle_anchor = cycle_anchor_for(now.date());
    }
}

fn check_positive(field: &'static str, value: f64) -> Result<(), PanelError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(PanelError::InvalidParameter {
            field,
            message: format!("must be a finite value > 0, got {value}"),
        })
    }
}
