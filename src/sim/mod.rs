/// Simulated day-by-day calendar.
pub mod calendar;
/// Day simulator that feeds the consumption history.
pub mod day;

pub use calendar::SimCalendar;
pub use day::{DayRecord, DaySimulator};
