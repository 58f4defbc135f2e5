use chrono::{Days, NaiveDate, NaiveDateTime};

use crate::panel::billing::Clock;

/// A simulated calendar that advances one day at a time over a fixed span.
///
/// Implements [`Clock`] so billing metrics can be evaluated against the
/// simulated date. The reported instant is 23:00 on the current day, i.e.
/// after that day's consumption has been recorded.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use panel_sim::sim::calendar::SimCalendar;
///
/// let start = NaiveDate::from_ymd_opt(2024, 1, 30).unwrap();
/// let mut calendar = SimCalendar::new(start, 3);
/// let mut days = Vec::new();
///
/// calendar.run(|day| days.push(day.to_string()));
/// assert_eq!(days, vec!["2024-01-30", "2024-01-31", "2024-02-01"]);
/// ```
#[derive(Debug, Clone)]
pub struct SimCalendar {
    /// Day the next tick will return
    next: NaiveDate,
    /// Day most recently returned by `tick`
    current: NaiveDate,
    /// Days left to simulate
    remaining: usize,
}

impl SimCalendar {
    /// Creates a calendar that will yield `days` consecutive dates from `start`.
    pub fn new(start: NaiveDate, days: usize) -> Self {
        Self {
            next: start,
            current: start,
            remaining: days,
        }
    }

    /// Advances by one day.
    ///
    /// # Returns
    ///
    /// * `Some(date)` - The simulated date now in effect
    /// * `None` - If every day has been simulated or the calendar overflowed
    pub fn tick(&mut self) -> Option<NaiveDate> {
        if self.remaining == 0 {
            return None;
        }
        let day = self.next;
        self.next = day.checked_add_days(Days::new(1))?;
        self.current = day;
        self.remaining -= 1;
        Some(day)
    }

    /// Runs a function for each remaining day.
    pub fn run(&mut self, mut f: impl FnMut(NaiveDate)) {
        while let Some(day) = self.tick() {
            f(day);
        }
    }

    pub fn remaining(&self) -> usize {
        self.remaining
    }
}

impl Clock for SimCalendar {
    fn now(&self) -> NaiveDateTime {
        self.current.and_hms_opt(23, 0, 0).unwrap_or_default()
    }
}
