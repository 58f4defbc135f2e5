//! Whole-day advancement of a panel.

use std::fmt;

use chrono::NaiveDate;
use rand::{Rng, SeedableRng, rngs::StdRng};
use serde::Serialize;
use tracing::debug;

use crate::error::PanelError;
use crate::metrics::{current_consumption_rate, cycle_bill_to_date, cycle_days_elapsed};
use crate::panel::billing::Clock;
use crate::panel::state::SystemState;

use super::calendar::SimCalendar;

/// Relative spread applied to a day's extrapolated consumption by default.
pub const DEFAULT_DAILY_SPREAD: f64 = 0.08;

/// One simulated day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayRecord {
    pub date: NaiveDate,
    /// Energy appended to the history for this day (kWh).
    pub kwh: f64,
    /// Days elapsed in the billing cycle at the end of the day.
    pub cycle_days_elapsed: usize,
    /// Cycle bill at the end of the day.
    pub bill_to_date: f64,
}

impl fmt::Display for DayRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} | used={:>6.2} kWh | cycle day {:>2} | bill to date={:>9.2}",
            self.date, self.kwh, self.cycle_days_elapsed, self.bill_to_date
        )
    }
}

/// Advances a panel day by day, recording each day's consumption.
///
/// A day's energy is the live consumption rate (the current load held for
/// 24 h) scaled by `1 + N(0, spread)` and clamped at zero. The load
/// configuration is not changed by the simulator.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use panel_sim::config::PanelConfig;
/// use panel_sim::panel::FixedClock;
/// use panel_sim::sim::{DaySimulator, SimCalendar};
///
/// let start = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
/// let mut state = PanelConfig::household()
///     .build_state(&FixedClock::at_noon(start))
///     .unwrap();
///
/// let mut sim = DaySimulator::new(0.0, 7);
/// let days = sim.run(&mut state, &mut SimCalendar::new(start, 3)).unwrap();
/// assert_eq!(days.len(), 3);
/// assert_eq!(state.consumption_history().len(), 20);
/// ```
#[derive(Debug, Clone)]
pub struct DaySimulator {
    /// Relative standard deviation of daily consumption
    pub spread: f64,
    rng: StdRng,
}

impl DaySimulator {
    /// Creates a simulator with the given relative spread and seed.
    ///
    /// Negative or non-finite spreads are treated as zero.
    pub fn new(spread: f64, seed: u64) -> Self {
        let spread = if spread.is_finite() { spread.max(0.0) } else { 0.0 };
        Self {
            spread,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Draws the energy the panel would use over one day at its current load.
    pub fn estimate_day_kwh(&mut self, state: &SystemState) -> f64 {
        let base = current_consumption_rate(state);
        let factor = 1.0 + gaussian_noise(&mut self.rng, self.spread);
        (base * factor).max(0.0)
    }

    /// Records one day on `state` and re-anchors its billing cycle to `clock`.
    ///
    /// # Errors
    ///
    /// Propagates a [`PanelError`] if the history rejects the value.
    pub fn step(
        &mut self,
        state: &mut SystemState,
        clock: &dyn Clock,
    ) -> Result<DayRecord, PanelError> {
        let kwh = self.estimate_day_kwh(state);
        state.append_daily_consumption(kwh)?;

        let now = clock.now();
        state.refresh_cycle_anchor(now);

        let record = DayRecord {
            date: now.date(),
            kwh,
            cycle_days_elapsed: cycle_days_elapsed(state, now),
            bill_to_date: cycle_bill_to_date(state, now),
        };
        debug!(date = %record.date, kwh, bill = record.bill_to_date, "simulated day");
        Ok(record)
    }

    /// Simulates every remaining day of `calendar`.
    ///
    /// # Errors
    ///
    /// Stops at and returns the first [`PanelError`].
    pub fn run(
        &mut self,
        state: &mut SystemState,
        calendar: &mut SimCalendar,
    ) -> Result<Vec<DayRecord>, PanelError> {
        let mut records = Vec::with_capacity(calendar.remaining());
        while calendar.tick().is_some() {
            records.push(self.step(state, &*calendar)?);
        }
        Ok(records)
    }
}

/// Gaussian noise with mean 0 via the Box-Muller transform.
///
/// Returns 0.0 when `std_dev <= 0`.
pub fn gaussian_noise(rng: &mut StdRng, std_dev: f64) -> f64 {
    if std_dev <= 0.0 {
        return 0.0;
    }

    let u1: f64 = rng.random::<f64>().clamp(1e-12, 1.0);
    let u2: f64 = rng.random::<f64>();
    let z0 = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
    z0 * std_dev
}
