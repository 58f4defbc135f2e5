//! Billing calendar: the cycle anchor rule and the time source it reads.

use chrono::{Datelike, Local, NaiveDate, NaiveDateTime};

/// Last day-of-month that still belongs to the cycle starting on the 1st.
pub const FIRST_HALF_LAST_DAY: u32 = 15;

/// Day-of-month on which the second billing cycle begins.
pub const SECOND_HALF_START_DAY: u32 = 16;

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Source of "now" for anything calendar dependent.
///
/// Injected so tests and simulations can pin the date instead of reading the
/// wall clock.
pub trait Clock: Send + Sync {
    /// Current local date and time.
    fn now(&self) -> NaiveDateTime;

    /// Current local date.
    fn today(&self) -> NaiveDate {
        self.now().date()
    }
}

/// Reads the host's local wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// A clock stuck at one instant.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use panel_sim::panel::billing::{Clock, FixedClock};
///
/// let clock = FixedClock::at_noon(NaiveDate::from_ymd_opt(2024, 3, 20).unwrap());
/// assert_eq!(clock.today().to_string(), "2024-03-20");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub NaiveDateTime);

impl FixedClock {
    pub fn new(now: NaiveDateTime) -> Self {
        Self(now)
    }

    /// Pins the clock to 12:00 on `date`.
    pub fn at_noon(date: NaiveDate) -> Self {
        Self(date.and_hms_opt(12, 0, 0).unwrap_or_default())
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

/// First day of the billing cycle containing `date`.
///
/// Days 1 through 15 belong to the cycle anchored on the 1st; days 16 onward
/// to the cycle anchored on the 16th.
pub fn cycle_anchor_for(date: NaiveDate) -> NaiveDate {
    let anchor_day = if date.day() <= FIRST_HALF_LAST_DAY {
        1
    } else {
        SECOND_HALF_START_DAY
    };
    date.with_day(anchor_day).unwrap_or(date)
}

/// Whole days from midnight on `anchor` up to `now`, rounded up.
///
/// Any fraction of a day counts as a full day. Instants at or before the
/// anchor yield zero.
pub fn days_since_anchor(anchor: NaiveDate, now: NaiveDateTime) -> u64 {
    let Some(start) = anchor.and_hms_opt(0, 0, 0) else {
        return 0;
    };
    let elapsed_ms = now.signed_duration_since(start).num_milliseconds();
    if elapsed_ms <= 0 {
        return 0;
    }
    // positive, so the cast is lossless
    ((elapsed_ms + MILLIS_PER_DAY - 1) / MILLIS_PER_DAY) as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn anchor_first_half_of_month() {
        assert_eq!(cycle_anchor_for(date(2024, 5, 1)), date(2024, 5, 1));
        assert_eq!(cycle_anchor_for(date(2024, 5, 15)), date(2024, 5, 1));
    }

    #[test]
    fn anchor_second_half_of_month() {
        assert_eq!(cycle_anchor_for(date(2024, 5, 16)), date(2024, 5, 16));
        assert_eq!(cycle_anchor_for(date(2024, 2, 29)), date(2024, 2, 16));
    }

    #[test]
    fn days_since_anchor_rounds_up() {
        let anchor = date(2024, 5, 16);
        let midnight = anchor.and_hms_opt(0, 0, 0).unwrap();
        assert_eq!(days_since_anchor(anchor, midnight), 0);
        assert_eq!(
            days_since_anchor(anchor, anchor.and_hms_opt(0, 0, 1).unwrap()),
            1
        );
        assert_eq!(
            days_since_anchor(anchor, date(2024, 5, 25).and_hms_opt(12, 0, 0).unwrap()),
            10
        );
    }

    #[test]
    fn days_since_anchor_before_anchor_is_zero() {
        let anchor = date(2024, 5, 16);
        let earlier = date(2024, 5, 10).and_hms_opt(9, 0, 0).unwrap();
        assert_eq!(days_since_anchor(anchor, earlier), 0);
    }

    #[test]
    fn fixed_clock_reports_its_instant() {
        let clock = FixedClock::at_noon(date(2024, 1, 20));
        assert_eq!(clock.today(), date(2024, 1, 20));
        assert_eq!(clock.now().format("%H:%M").to_string(), "12:00");
    }
}
