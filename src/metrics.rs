//! Derived electrical and billing quantities.
//!
//! Every function here is pure: it reads a [`SystemState`] and returns a
//! number. Nothing is cached, so results always reflect the state passed in.
//! Load-dependent quantities never trust `is_on` flags while the main switch
//! is open.

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::panel::billing::days_since_anchor;
use crate::panel::state::SystemState;

/// Days used when extrapolating the monthly bill.
pub const DAYS_PER_BILLING_MONTH: f64 = 30.0;

/// Load at or above which the power factor rises from 0.85 to 0.90 (W).
pub const PF_MEDIUM_LOAD_W: f64 = 1000.0;

/// Load at or above which the power factor rises from 0.90 to 0.95 (W).
pub const PF_HEAVY_LOAD_W: f64 = 3000.0;

/// Sum of rated power over switched-on loads, in watts. Zero while the main switch is open.
pub fn total_live_load(state: &SystemState) -> f64 {
    if !state.main_switch() {
        return 0.0;
    }
    state
        .loads()
        .iter()
        .filter(|load| load.is_on)
        .map(|load| load.rated_power_w())
        .sum()
}

/// Live load extrapolated over a full day at constant draw, in kWh/day.
pub fn current_consumption_rate(state: &SystemState) -> f64 {
    (total_live_load(state) / 1000.0) * 24.0
}

/// Mean of every retained history day, in kWh.
pub fn daily_average_units(state: &SystemState) -> f64 {
    let history = state.consumption_history();
    if history.is_empty() {
        return 0.0;
    }
    history.total() / history.len() as f64
}

/// Days elapsed in the current billing cycle, capped at the retained history length.
pub fn cycle_days_elapsed(state: &SystemState, now: NaiveDateTime) -> usize {
    let days = days_since_anchor(state.cycle_anchor(), now);
    let cap = state.consumption_history().len();
    usize::try_from(days).map_or(cap, |d| d.min(cap))
}

/// Cost of the most recent `cycle_days_elapsed` history days at the current tariff.
pub fn cycle_bill_to_date(state: &SystemState, now: NaiveDateTime) -> f64 {
    let days = cycle_days_elapsed(state, now);
    if days == 0 {
        return 0.0;
    }
    state.consumption_history().recent_total(days) * state.tariff_rate()
}

/// Average day cost scaled to a 30-day month.
pub fn projected_monthly_expense(state: &SystemState) -> f64 {
    daily_average_units(state) * DAYS_PER_BILLING_MONTH * state.tariff_rate()
}

/// Power factor as a step function of live load.
///
/// | load (W)            | factor |
/// |---------------------|--------|
/// | `0`                 | 0.00   |
/// | `0 < load < 1000`   | 0.85   |
/// | `1000 <= load < 3000` | 0.90 |
/// | `load >= 3000`      | 0.95   |
///
/// Band edges are half-open: exactly 1000 W reads 0.90 and exactly 3000 W
/// reads 0.95.
pub fn power_factor(state: &SystemState) -> f64 {
    power_factor_for_load(total_live_load(state))
}

/// The [`power_factor`] step function applied to a raw load in watts.
pub fn power_factor_for_load(load_w: f64) -> f64 {
    if load_w <= 0.0 {
        0.0
    } else if load_w < PF_MEDIUM_LOAD_W {
        0.85
    } else if load_w < PF_HEAVY_LOAD_W {
        0.90
    } else {
        0.95
    }
}

/// Live load divided by power factor, in VA. Zero when the factor is zero.
pub fn apparent_power(state: &SystemState) -> f64 {
    let pf = power_factor(state);
    if pf > 0.0 {
        total_live_load(state) / pf
    } else {
        0.0
    }
}

/// Apparent power divided by supply voltage, in amperes.
pub fn current(state: &SystemState) -> f64 {
    let voltage = state.voltage_v();
    if voltage > 0.0 {
        apparent_power(state) / voltage
    } else {
        0.0
    }
}

/// All derived quantities for one state at one instant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PanelReport {
    pub main_switch: bool,
    pub loads_on: usize,
    pub total_live_load_w: f64,
    pub current_consumption_kwh_per_day: f64,
    pub daily_average_kwh: f64,
    pub cycle_anchor: NaiveDate,
    pub cycle_days_elapsed: usize,
    pub cycle_bill_to_date: f64,
    pub projected_monthly_expense: f64,
    pub power_factor: f64,
    pub apparent_power_va: f64,
    pub current_a: f64,
    pub voltage_v: f64,
    pub frequency_hz: f64,
    pub tariff_rate: f64,
}

impl PanelReport {
    /// Evaluates every metric against `state` as of `now`.
    pub fn at(state: &SystemState, now: NaiveDateTime) -> Self {
        let loads_on = if state.main_switch() {
            state.loads().iter().filter(|l| l.is_on).count()
        } else {
            0
        };
        Self {
            main_switch: state.main_switch(),
            loads_on,
            total_live_load_w: total_live_load(state),
            current_consumption_kwh_per_day: current_consumption_rate(state),
            daily_average_kwh: daily_average_units(state),
            cycle_anchor: state.cycle_anchor(),
            cycle_days_elapsed: cycle_days_elapsed(state, now),
            cycle_bill_to_date: cycle_bill_to_date(state, now),
            projected_monthly_expense: projected_monthly_expense(state),
            power_factor: power_factor(state),
            apparent_power_va: apparent_power(state),
            current_a: current(state),
            voltage_v: state.voltage_v(),
            frequency_hz: state.frequency_hz(),
            tariff_rate: state.tariff_rate(),
        }
    }
}

impl fmt::Display for PanelReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Panel Report ---")?;
        writeln!(
            f,
            "Main switch:           {} ({} loads on)",
            if self.main_switch { "ON" } else { "OFF" },
            self.loads_on
        )?;
        writeln!(
            f,
            "Supply:                {:.0} V / {:.0} Hz",
            self.voltage_v, self.frequency_hz
        )?;
        writeln!(
            f,
            "Live load:             {:.2} kW",
            self.total_live_load_w / 1000.0
        )?;
        writeln!(
            f,
            "Consumption rate:      {:.2} kWh/day",
            self.current_consumption_kwh_per_day
        )?;
        writeln!(f, "Power factor:          {:.2}", self.power_factor)?;
        writeln!(f, "Apparent power:        {:.1} VA", self.apparent_power_va)?;
        writeln!(f, "Current:               {:.2} A", self.current_a)?;
        writeln!(f, "Daily average:         {:.2} kWh", self.daily_average_kwh)?;
        writeln!(
            f,
            "Cycle:                 since {} ({} days)",
            self.cycle_anchor, self.cycle_days_elapsed
        )?;
        writeln!(f, "Bill to date:          {:.2}", self.cycle_bill_to_date)?;
        write!(
            f,
            "Projected monthly:     {:.2} (at {:.2}/kWh)",
            self.projected_monthly_expense, self.tariff_rate
        )
    }
}
