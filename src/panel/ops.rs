//! Mutation operations.
//!
//! Each method checks all of its preconditions before touching the state, so
//! an `Err` always means nothing changed.

use serde::Serialize;
use tracing::{debug, info};

use crate::error::PanelError;

use super::load::{Load, check_power};
use super::state::SystemState;

/// Result of a successful [`SystemState::toggle_load`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ToggleOutcome {
    /// The load was flipped; `is_on` is its new state.
    Toggled { is_on: bool },
    /// The main switch is open, so the request was ignored.
    SuppressedMainSwitchOff,
}

impl SystemState {
    /// Flips one load, provided the main switch is closed.
    ///
    /// # Errors
    ///
    /// Returns [`PanelError::UnknownLoad`] if `id` is not registered, whatever
    /// the main switch position.
    pub fn toggle_load(&mut self, id: &str) -> Result<ToggleOutcome, PanelError> {
        let main_switch = self.main_switch;
        let load = self
            .loads
            .get_mut(id)
            .ok_or_else(|| PanelError::UnknownLoad { id: id.to_string() })?;

        if !main_switch {
            debug!(load = id, "toggle ignored, main switch is off");
            return Ok(ToggleOutcome::SuppressedMainSwitchOff);
        }

        load.is_on = !load.is_on;
        debug!(load = id, is_on = load.is_on, "load toggled");
        Ok(ToggleOutcome::Toggled { is_on: load.is_on })
    }

    /// Flips the main switch and applies its cascade. Returns the new position.
    ///
    /// Opening switches every load off. Closing switches the essential loads
    /// on and leaves the others as they are.
    pub fn toggle_main_switch(&mut self) -> bool {
        self.main_switch = !self.main_switch;
        if self.main_switch {
            for load in self.loads.iter_mut() {
                if self.essential_loads.contains(&load.id) {
                    load.is_on = true;
                }
            }
        } else {
            for load in self.loads.iter_mut() {
                load.is_on = false;
            }
        }
        info!(main_switch = self.main_switch, "main switch toggled");
        self.main_switch
    }

    /// Changes a load's rated power.
    ///
    /// # Errors
    ///
    /// Fails on an unknown id or a negative / non-finite power.
    pub fn set_load_power(&mut self, id: &str, power_w: f64) -> Result<(), PanelError> {
        let load = self
            .loads
            .get_mut(id)
            .ok_or_else(|| PanelError::UnknownLoad { id: id.to_string() })?;
        load.set_rated_power_w(power_w)?;
        debug!(load = id, power_w, "rated power updated");
        Ok(())
    }

    /// Records a new day of consumption, evicting the oldest day.
    ///
    /// # Errors
    ///
    /// Fails on a negative / non-finite value.
    pub fn append_daily_consumption(&mut self, kwh: f64) -> Result<(), PanelError> {
        self.consumption_history.push(kwh)?;
        debug!(kwh, "daily consumption appended");
        Ok(())
    }

    /// Replaces the tariff rate.
    ///
    /// # Errors
    ///
    /// Fails unless `rate` is finite and strictly positive.
    pub fn set_tariff_rate(&mut self, rate: f64) -> Result<(), PanelError> {
        if !(rate.is_finite() && rate > 0.0) {
            return Err(PanelError::NonPositiveTariff { rate });
        }
        self.tariff_rate = rate;
        info!(rate, "tariff rate updated");
        Ok(())
    }

    /// Adds a new load to the panel.
    ///
    /// A load registered while the main switch is open is stored switched off.
    ///
    /// # Errors
    ///
    /// Fails if the id is already taken or the power is invalid.
    pub fn register_load(&mut self, mut load: Load) -> Result<(), PanelError> {
        check_power(&load.id, load.rated_power_w())?;
        if !self.main_switch {
            load.is_on = false;
        }
        let id = load.id.clone();
        self.loads.insert(load)?;
        info!(load = %id, "load registered");
        Ok(())
    }
}
