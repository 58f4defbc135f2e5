//! Property-based tests for the panel state invariants.
//!
//! Random operation sequences, including invalid ones, are applied to the
//! household preset; the structural invariants must hold after every step.

mod common;

use panel_sim::metrics::{apparent_power, current, power_factor, total_live_load};
use panel_sim::SystemState;
use proptest::prelude::*;

const LOAD_IDS: &[&str] = &[
    "refrigerator",
    "lighting",
    "airConditioner",
    "fan",
    "washingMachine",
    "jacuzzi",
];

#[derive(Debug, Clone)]
enum PanelOp {
    ToggleMain,
    ToggleLoad(usize),
    SetPower(usize, f64),
    Append(f64),
    SetTariff(f64),
}

fn arb_ops(max_ops: usize) -> impl Strategy<Value = Vec<PanelOp>> {
    proptest::collection::vec(
        prop_oneof![
            Just(PanelOp::ToggleMain),
            (0..LOAD_IDS.len()).prop_map(PanelOp::ToggleLoad),
            (0..LOAD_IDS.len(), -500.0..5000.0f64).prop_map(|(i, w)| PanelOp::SetPower(i, w)),
            (-5.0..60.0f64).prop_map(PanelOp::Append),
            (-2.0..20.0f64).prop_map(PanelOp::SetTariff),
        ],
        1..=max_ops,
    )
}

fn apply(state: &mut SystemState, op: &PanelOp) {
    // Rejections are expected for some generated values; only invariants matter here.
    let _ = match *op {
        PanelOp::ToggleMain => {
            state.toggle_main_switch();
            Ok(())
        }
        PanelOp::ToggleLoad(i) => state.toggle_load(LOAD_IDS[i]).map(|_| ()),
        PanelOp::SetPower(i, w) => state.set_load_power(LOAD_IDS[i], w),
        PanelOp::Append(kwh) => state.append_daily_consumption(kwh),
        PanelOp::SetTariff(rate) => state.set_tariff_rate(rate),
    };
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn open_main_switch_means_every_load_off(ops in arb_ops(40)) {
        let mut state = common::household_state();
        for op in &ops {
            apply(&mut state, op);
            if !state.main_switch() {
                prop_assert!(state.loads().iter().all(|l| !l.is_on));
                prop_assert_eq!(total_live_load(&state), 0.0);
                prop_assert_eq!(current(&state), 0.0);
            }
        }
    }

    #[test]
    fn history_length_and_value_ranges_are_preserved(ops in arb_ops(40)) {
        let mut state = common::household_state();
        let len = state.consumption_history().len();
        for op in &ops {
            apply(&mut state, op);
            prop_assert_eq!(state.consumption_history().len(), len);
            prop_assert!(state.consumption_history().iter().all(|kwh| kwh >= 0.0));
            prop_assert!(state.tariff_rate() > 0.0);
            prop_assert!(state.loads().iter().all(|l| l.rated_power_w() >= 0.0));
        }
    }

    #[test]
    fn accepted_tariff_reads_back_exactly(
        ops in arb_ops(30),
        rates in proptest::collection::vec(1e-6..1e4f64, 1..10),
    ) {
        let mut state = common::household_state();
        for op in &ops {
            apply(&mut state, op);
        }
        for rate in rates {
            prop_assert!(state.set_tariff_rate(rate).is_ok());
            prop_assert_eq!(state.tariff_rate(), rate);
        }
        let before = state.tariff_rate();
        prop_assert!(state.set_tariff_rate(0.0).is_err());
        prop_assert!(state.set_tariff_rate(-1.0).is_err());
        prop_assert_eq!(state.tariff_rate(), before);
    }

    #[test]
    fn every_accepted_tariff_change_is_stored(ops in arb_ops(40)) {
        let mut state = common::household_state();
        for op in &ops {
            let before = state.tariff_rate();
            apply(&mut state, op);
            if let PanelOp::SetTariff(rate) = *op {
                if rate > 0.0 {
                    prop_assert_eq!(state.tariff_rate(), rate);
                } else {
                    prop_assert_eq!(state.tariff_rate(), before);
                }
            }
        }
    }

    #[test]
    fn electrical_quantities_are_consistent(ops in arb_ops(30)) {
        let mut state = common::household_state();
        for op in &ops {
            apply(&mut state, op);
        }
        let load = total_live_load(&state);
        let pf = power_factor(&state);
        if load > 0.0 {
            prop_assert!((0.85..=0.95).contains(&pf));
            prop_assert!((apparent_power(&state) * pf - load).abs() < 1e-6);
        } else {
            prop_assert_eq!(pf, 0.0);
            prop_assert_eq!(apparent_power(&state), 0.0);
        }
    }
}
