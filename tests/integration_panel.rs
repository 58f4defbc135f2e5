//! End-to-end scenarios against the public panel API.

mod common;

use panel_sim::metrics::{
    apparent_power, current, cycle_bill_to_date, cycle_days_elapsed, daily_average_units,
    power_factor, projected_monthly_expense, total_live_load,
};
use panel_sim::panel::state::StateParams;
use panel_sim::panel::{Clock, Load};
use panel_sim::{PanelError, SystemState, ToggleOutcome};

use common::{approx_eq, date, flat_history_params, heater_and_oven, late_cycle_clock};

#[test]
fn scenario_live_load_and_electrical_quantities() {
    let state = SystemState::new(StateParams::default(), heater_and_oven(), &late_cycle_clock())
        .expect("state should build");

    assert_eq!(total_live_load(&state), 1500.0);
    assert_eq!(power_factor(&state), 0.90);
    assert!(approx_eq(apparent_power(&state), 1500.0 / 0.90));
    assert!(
        (current(&state) - 7.246).abs() < 1e-3,
        "current was {}",
        current(&state)
    );
}

#[test]
fn scenario_main_switch_cascade() {
    let clock = late_cycle_clock();
    let loads = vec![
        Load::new("refrigerator", "Refrigerator", 150.0, false).unwrap(),
        Load::new("lighting", "Lighting", 200.0, false).unwrap(),
        Load::new("heater", "Heater", 1500.0, true).unwrap(),
    ];
    let mut state = SystemState::new(StateParams::default(), loads, &clock).unwrap();

    assert!(!state.toggle_main_switch());
    assert!(state.loads().iter().all(|l| !l.is_on));
    assert_eq!(total_live_load(&state), 0.0);

    assert!(state.toggle_main_switch());
    assert!(state.load("refrigerator").unwrap().is_on);
    assert!(state.load("lighting").unwrap().is_on);
    assert!(!state.load("heater").unwrap().is_on);
    assert_eq!(total_live_load(&state), 350.0);
}

#[test]
fn scenario_billing_cycle() {
    let clock = late_cycle_clock();
    let state = SystemState::new(flat_history_params(), Vec::new(), &clock).unwrap();
    let now = clock.now();

    assert_eq!(state.cycle_anchor(), date(2024, 10, 16));
    assert_eq!(cycle_days_elapsed(&state, now), 10);
    assert!(approx_eq(cycle_bill_to_date(&state, now), 1700.0));
    assert!(approx_eq(daily_average_units(&state), 20.0));
    assert!(approx_eq(projected_monthly_expense(&state), 5100.0));
}

#[test]
fn scenario_history_rotation() {
    let mut state =
        SystemState::new(flat_history_params(), Vec::new(), &late_cycle_clock()).unwrap();

    state.append_daily_consumption(30.0).unwrap();

    let history = state.consumption_history();
    assert_eq!(history.len(), 20);
    assert_eq!(history.latest(), Some(30.0));
    assert!(approx_eq(history.total(), 19.0 * 20.0 + 30.0));
    assert!(approx_eq(daily_average_units(&state), 20.5));
}

#[test]
fn scenario_rejected_mutations_leave_state_untouched() {
    let mut state =
        SystemState::new(StateParams::default(), heater_and_oven(), &late_cycle_clock()).unwrap();
    let before = state.clone();

    assert_eq!(
        state.toggle_load("jacuzzi"),
        Err(PanelError::UnknownLoad {
            id: "jacuzzi".to_string()
        })
    );
    assert!(state.set_load_power("heater", -5.0).is_err());
    assert!(state.set_load_power("jacuzzi", 5.0).is_err());
    assert!(state.append_daily_consumption(-1.0).is_err());
    assert!(state.set_tariff_rate(0.0).is_err());
    assert!(state.set_tariff_rate(-3.0).is_err());

    assert_eq!(state, before);
}

#[test]
fn unknown_load_is_reported_even_with_main_switch_open() {
    let mut state =
        SystemState::new(StateParams::default(), heater_and_oven(), &late_cycle_clock()).unwrap();
    state.toggle_main_switch();

    let err = state.toggle_load("jacuzzi").unwrap_err();
    assert!(err.is_unknown_load());
    assert_eq!(
        state.toggle_load("oven"),
        Ok(ToggleOutcome::SuppressedMainSwitchOff)
    );
    assert!(!state.load("oven").unwrap().is_on);
}

#[test]
fn toggling_twice_restores_load() {
    let mut state =
        SystemState::new(StateParams::default(), heater_and_oven(), &late_cycle_clock()).unwrap();
    let before = state.clone();

    assert_eq!(
        state.toggle_load("oven"),
        Ok(ToggleOutcome::Toggled { is_on: true })
    );
    assert_eq!(total_live_load(&state), 2300.0);
    assert_eq!(
        state.toggle_load("oven"),
        Ok(ToggleOutcome::Toggled { is_on: false })
    );
    assert_eq!(state, before);
}

#[test]
fn tariff_change_rescales_projection() {
    let mut state =
        SystemState::new(flat_history_params(), Vec::new(), &late_cycle_clock()).unwrap();

    state.set_tariff_rate(10.0).unwrap();
    assert!(approx_eq(projected_monthly_expense(&state), 6000.0));

    state.set_tariff_rate(8.5).unwrap();
    assert!(approx_eq(projected_monthly_expense(&state), 5100.0));
}

#[test]
fn power_change_is_only_live_while_on() {
    let mut state =
        SystemState::new(StateParams::default(), heater_and_oven(), &late_cycle_clock()).unwrap();

    state.set_load_power("oven", 2500.0).unwrap();
    assert_eq!(total_live_load(&state), 1500.0);

    state.set_load_power("heater", 3000.0).unwrap();
    assert_eq!(total_live_load(&state), 3000.0);
    assert_eq!(power_factor(&state), 0.95);
}

#[test]
fn early_month_cycle_anchors_on_the_first() {
    let clock = panel_sim::panel::FixedClock::at_noon(date(2024, 11, 3));
    let state = SystemState::new(flat_history_params(), Vec::new(), &clock).unwrap();

    assert_eq!(state.cycle_anchor(), date(2024, 11, 1));
    assert_eq!(cycle_days_elapsed(&state, clock.now()), 3);
    assert!(approx_eq(cycle_bill_to_date(&state, clock.now()), 3.0 * 20.0 * 8.5));
}

#[test]
fn registered_loads_and_essentials_are_visible() {
    let now = date(2024, 10, 25).and_hms_opt(7, 30, 0).unwrap();
    let clock = panel_sim::panel::FixedClock::new(now);
    let mut state = SystemState::new(StateParams::default(), heater_and_oven(), &clock).unwrap();

    let essentials: Vec<&str> = state.essential_loads().collect();
    assert_eq!(essentials, vec!["lighting", "refrigerator"]);

    state
        .register_load(Load::new("refrigerator", "Refrigerator", 150.0, true).unwrap())
        .unwrap();
    assert!(state.loads().contains("refrigerator"));
    assert!(!state.loads().contains("lighting"));
    assert_eq!(
        state.register_load(Load::new("oven", "Oven", 900.0, false).unwrap()),
        Err(PanelError::DuplicateLoad {
            id: "oven".to_string()
        })
    );
}
