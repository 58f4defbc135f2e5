//! TOML-based panel configuration and preset definitions.

use std::collections::BTreeSet;
use std::fmt;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::PanelError;
use crate::panel::billing::Clock;
use crate::panel::history::DEFAULT_HISTORY_DAYS;
use crate::panel::load::Load;
use crate::panel::state::{DEFAULT_ESSENTIAL_LOADS, StateParams, SystemState};

/// Daily consumption (kWh) for the last 20 days of the reference household.
pub const HOUSEHOLD_HISTORY_KWH: [f64; DEFAULT_HISTORY_DAYS] = [
    22.5, 21.8, 23.2, 20.1, 24.5, 19.8, 25.1, 22.9, 21.5, 23.8, 20.5, 22.1, 24.2, 21.7, 23.5, 22.8,
    21.2, 24.1, 20.9, 23.6,
];

/// Top-level panel configuration parsed from TOML.
///
/// All fields have defaults matching the reference household. Load from
/// TOML with [`PanelConfig::from_toml_file`] or use
/// [`PanelConfig::household`] for the built-in default.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PanelConfig {
    /// Supply, tariff, and breaker settings.
    #[serde(default)]
    pub panel: PanelSection,
    /// Consumption history seed.
    #[serde(default)]
    pub history: HistorySection,
    /// Switchable loads. Omitting the table keeps the household set.
    #[serde(default = "household_loads")]
    pub loads: Vec<LoadConfig>,
}

/// Supply, tariff, and breaker settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PanelSection {
    /// Initial main switch position.
    pub main_switch: bool,
    /// Supply voltage (V, > 0).
    pub voltage_v: f64,
    /// Supply frequency (Hz, > 0).
    pub frequency_hz: f64,
    /// Price per kWh (> 0).
    pub tariff_rate: f64,
    /// Load ids forced on whenever the main switch closes.
    pub essential_loads: Vec<String>,
}

impl Default for PanelSection {
    fn default() -> Self {
        Self {
            main_switch: true,
            voltage_v: 230.0,
            frequency_hz: 50.0,
            tariff_rate: 8.5,
            essential_loads: DEFAULT_ESSENTIAL_LOADS
                .iter()
                .map(|id| (*id).to_string())
                .collect(),
        }
    }
}

/// Consumption history seed.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HistorySection {
    /// Daily totals in kWh, oldest first. Its length fixes the retained window.
    pub daily_kwh: Vec<f64>,
}

impl Default for HistorySection {
    fn default() -> Self {
        Self {
            daily_kwh: HOUSEHOLD_HISTORY_KWH.to_vec(),
        }
    }
}

/// One switchable load.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoadConfig {
    /// Unique identifier.
    pub id: String,
    /// Display label.
    pub name: String,
    /// Rated power (W, >= 0).
    pub power_w: f64,
    /// Initial on/off state.
    #[serde(default)]
    pub on: bool,
}

impl LoadConfig {
    fn new(id: &str, name: &str, power_w: f64, on: bool) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            power_w,
            on,
        }
    }
}

fn household_loads() -> Vec<LoadConfig> {
    vec![
        LoadConfig::new("airConditioner", "Air Conditioner", 1500.0, true),
        LoadConfig::new("refrigerator", "Refrigerator", 200.0, true),
        LoadConfig::new("washingMachine", "Washing Machine", 800.0, false),
        LoadConfig::new("waterHeater", "Water Heater", 2000.0, true),
        LoadConfig::new("lighting", "House Lighting", 300.0, true),
        LoadConfig::new("television", "Television", 150.0, true),
        LoadConfig::new("microwave", "Microwave", 1000.0, false),
        LoadConfig::new("dishwasher", "Dishwasher", 1200.0, false),
        LoadConfig::new("fan", "Ceiling Fans", 75.0, true),
        LoadConfig::new("computer", "Computer Setup", 400.0, true),
    ]
}

/// Configuration error with field path and constraint description.
#[derive(Debug, thiserror::Error)]
#[error("config error: {field}: {message}")]
pub struct ConfigError {
    /// Dotted field path (e.g., `"panel.tariff_rate"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl ConfigError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Wraps a list of validation failures for `?` propagation.
#[derive(Debug)]
pub struct ConfigErrors(pub Vec<ConfigError>);

impl fmt::Display for ConfigErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lines: Vec<String> = self.0.iter().map(ToString::to_string).collect();
        write!(f, "{}", lines.join("\n"))
    }
}

impl std::error::Error for ConfigErrors {}

impl PanelConfig {
    /// The reference household: ten appliances, 230 V / 50 Hz, 8.5 per kWh.
    pub fn household() -> Self {
        Self {
            panel: PanelSection::default(),
            history: HistorySection::default(),
            loads: household_loads(),
        }
    }

    /// A small flat: few loads, shorter two-week history, cheaper tariff.
    pub fn studio() -> Self {
        Self {
            panel: PanelSection {
                tariff_rate: 6.0,
                ..PanelSection::default()
            },
            history: HistorySection {
                daily_kwh: vec![
                    6.2, 5.8, 7.1, 6.4, 5.9, 6.8, 7.3, 6.0, 5.5, 6.6, 6.9, 6.1, 5.7, 6.3,
                ],
            },
            loads: vec![
                LoadConfig::new("refrigerator", "Refrigerator", 120.0, true),
                LoadConfig::new("lighting", "Lighting", 90.0, true),
                LoadConfig::new("induction", "Induction Hob", 1800.0, false),
                LoadConfig::new("laptop", "Laptop", 65.0, true),
                LoadConfig::new("kettle", "Kettle", 2000.0, false),
            ],
        }
    }

    /// A large all-electric home with heat pump and EV charger.
    pub fn all_electric() -> Self {
        let mut loads = household_loads();
        loads.push(LoadConfig::new("heatPump", "Heat Pump", 3500.0, true));
        loads.push(LoadConfig::new("evCharger", "EV Charger", 7200.0, false));
        Self {
            panel: PanelSection {
                tariff_rate: 9.75,
                essential_loads: vec![
                    "refrigerator".to_string(),
                    "lighting".to_string(),
                    "heatPump".to_string(),
                ],
                ..PanelSection::default()
            },
            history: HistorySection {
                daily_kwh: HOUSEHOLD_HISTORY_KWH.iter().map(|kwh| kwh * 2.4).collect(),
            },
            loads,
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["household", "studio", "all_electric"];

    /// Loads a configuration from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "household" => Ok(Self::household()),
            "studio" => Ok(Self::studio()),
            "all_electric" => Ok(Self::all_electric()),
            _ => Err(ConfigError::new(
                "preset",
                format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            )),
        }
    }

    /// Parses a configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| {
            ConfigError::new("config", format!("cannot read \"{}\": {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::new("toml", e.to_string()))
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        let p = &self.panel;

        for (field, value) in [
            ("panel.voltage_v", p.voltage_v),
            ("panel.frequency_hz", p.frequency_hz),
            ("panel.tariff_rate", p.tariff_rate),
        ] {
            if !(value.is_finite() && value > 0.0) {
                errors.push(ConfigError::new(field, "must be > 0"));
            }
        }

        let h = &self.history;
        if h.daily_kwh.is_empty() {
            errors.push(ConfigError::new("history.daily_kwh", "must hold at least one day"));
        }
        if let Some(idx) = h.daily_kwh.iter().position(|kwh| !(kwh.is_finite() && *kwh >= 0.0)) {
            errors.push(ConfigError::new(
                format!("history.daily_kwh[{idx}]"),
                "must be >= 0",
            ));
        }

        let mut seen = BTreeSet::new();
        for (idx, load) in self.loads.iter().enumerate() {
            if load.id.is_empty() {
                errors.push(ConfigError::new(format!("loads[{idx}].id"), "must not be empty"));
            }
            if !seen.insert(load.id.as_str()) {
                errors.push(ConfigError::new(
                    format!("loads[{idx}].id"),
                    format!("duplicate id \"{}\"", load.id),
                ));
            }
            if !(load.power_w.is_finite() && load.power_w >= 0.0) {
                errors.push(ConfigError::new(
                    format!("loads[{idx}].power_w"),
                    "must be >= 0",
                ));
            }
        }

        for id in &p.essential_loads {
            if !seen.contains(id.as_str()) {
                errors.push(ConfigError::new(
                    "panel.essential_loads",
                    format!("\"{id}\" is not a configured load"),
                ));
            }
        }

        errors
    }

    /// Validates the configuration and builds the initial panel state.
    ///
    /// # Errors
    ///
    /// Returns every validation failure at once, or the first construction
    /// error from the panel model.
    pub fn build_state(&self, clock: &dyn Clock) -> Result<SystemState, ConfigErrors> {
        let errors = self.validate();
        if !errors.is_empty() {
            return Err(ConfigErrors(errors));
        }

        let to_config_error =
            |e: PanelError| ConfigErrors(vec![ConfigError::new("panel", e.to_string())]);

        let loads = self
            .loads
            .iter()
            .map(|l| Load::new(l.id.clone(), l.name.clone(), l.power_w, l.on))
            .collect::<Result<Vec<_>, _>>()
            .map_err(to_config_error)?;

        let params = StateParams {
            main_switch: self.panel.main_switch,
            voltage_v: self.panel.voltage_v,
            frequency_hz: self.panel.frequency_hz,
            tariff_rate: self.panel.tariff_rate,
            history_kwh: self.history.daily_kwh.clone(),
            essential_loads: self.panel.essential_loads.clone(),
        };
        SystemState::new(params, loads, clock).map_err(to_config_error)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::panel::billing::FixedClock;

    fn clock() -> FixedClock {
        FixedClock::at_noon(NaiveDate::from_ymd_opt(2024, 6, 5).unwrap())
    }

    #[test]
    fn household_preset_valid() {
        let cfg = PanelConfig::household();
        let errors = cfg.validate();
        assert!(errors.is_empty(), "household should be valid: {errors:?}");
    }

    #[test]
    fn from_preset_unknown() {
        let err = PanelConfig::from_preset("castle");
        assert!(err.is_err());
        let e = err.unwrap_err();
        assert!(e.message.contains("unknown preset"));
    }

    #[test]
    fn all_presets_are_valid_and_build() {
        for name in PanelConfig::PRESETS {
            let cfg = PanelConfig::from_preset(name);
            assert!(cfg.is_ok(), "preset \"{name}\" should load");
            let state = cfg.as_ref().map(|c| c.build_state(&clock()));
            assert!(
                matches!(state, Ok(Ok(_))),
                "preset \"{name}\" should build a state"
            );
        }
    }

    #[test]
    fn household_state_matches_reference() {
        let state = PanelConfig::household().build_state(&clock()).unwrap();
        assert_eq!(state.loads().len(), 10);
        assert_eq!(state.consumption_history().len(), 20);
        assert_eq!(state.voltage_v(), 230.0);
        assert_eq!(state.frequency_hz(), 50.0);
        assert_eq!(state.tariff_rate(), 8.5);
        assert!(state.is_essential("refrigerator"));
        assert!(state.is_essential("lighting"));
    }

    #[test]
    fn valid_toml_parses() {
        let toml = r#"
[panel]
main_switch = false
voltage_v = 120.0
frequency_hz = 60.0
tariff_rate = 0.18
essential_loads = ["fridge"]

[history]
daily_kwh = [10.0, 11.5, 9.0]

[[loads]]
id = "fridge"
name = "Fridge"
power_w = 150.0
on = true

[[loads]]
id = "dryer"
name = "Dryer"
power_w = 3000.0
"#;
        let cfg = PanelConfig::from_toml_str(toml);
        assert!(cfg.is_ok(), "valid TOML should parse: {:?}", cfg.err());
        let cfg = cfg.ok();
        assert_eq!(cfg.as_ref().map(|c| c.loads.len()), Some(2));
        assert_eq!(cfg.as_ref().map(|c| c.history.daily_kwh.len()), Some(3));

        let state = cfg.map(|c| c.build_state(&clock()));
        let state = match state {
            Some(Ok(s)) => s,
            other => panic!("state should build: {other:?}"),
        };
        assert!(!state.main_switch());
        assert!(state.loads().iter().all(|l| !l.is_on));
        assert_eq!(state.consumption_history().len(), 3);
    }

    #[test]
    fn invalid_toml_unknown_field() {
        let toml = r#"
[panel]
voltage_v = 230.0
bogus_field = true
"#;
        assert!(PanelConfig::from_toml_str(toml).is_err());
    }

    #[test]
    fn partial_toml_uses_defaults() {
        let toml = r#"
[panel]
tariff_rate = 11.0
"#;
        let cfg = PanelConfig::from_toml_str(toml).unwrap();
        assert_eq!(cfg.panel.tariff_rate, 11.0);
        assert_eq!(cfg.panel.voltage_v, 230.0);
        assert_eq!(cfg.loads.len(), 10);
        assert_eq!(cfg.history.daily_kwh.len(), 20);
    }

    #[test]
    fn validation_catches_bad_values() {
        let mut cfg = PanelConfig::household();
        cfg.panel.tariff_rate = 0.0;
        cfg.history.daily_kwh[3] = -2.0;
        cfg.loads[0].power_w = -5.0;
        cfg.loads[1].id = cfg.loads[2].id.clone();
        let errors = cfg.validate();
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert!(fields.contains(&"panel.tariff_rate"));
        assert!(fields.contains(&"history.daily_kwh[3]"));
        assert!(fields.contains(&"loads[0].power_w"));
        assert!(fields.contains(&"loads[2].id"));
        // refrigerator was renamed away, so it is no longer a known load
        assert!(fields.contains(&"panel.essential_loads"));
    }

    #[test]
    fn build_state_reports_all_errors() {
        let mut cfg = PanelConfig::household();
        cfg.panel.voltage_v = -1.0;
        cfg.panel.frequency_hz = 0.0;
        let err = cfg.build_state(&clock()).unwrap_err();
        assert_eq!(err.0.len(), 2);
    }
}
