//! Fixed-capacity record of daily energy totals.

use std::collections::VecDeque;

use serde::Serialize;

use crate::error::PanelError;

/// Number of days retained by the reference household panel.
pub const DEFAULT_HISTORY_DAYS: usize = 20;

/// Daily consumption totals in kWh, oldest first, most recent last.
///
/// The length is fixed at construction. [`ConsumptionHistory::push`] evicts
/// the oldest entry so the sequence never grows or shrinks.
///
/// # Examples
///
/// ```
/// use panel_sim::panel::history::ConsumptionHistory;
///
/// let mut history = ConsumptionHistory::new(vec![1.0, 2.0, 3.0]).unwrap();
/// history.push(4.0).unwrap();
/// assert_eq!(history.to_vec(), vec![2.0, 3.0, 4.0]);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ConsumptionHistory {
    days: VecDeque<f64>,
}

impl ConsumptionHistory {
    /// Builds a history from existing daily totals.
    ///
    /// # Errors
    ///
    /// Fails if `days` is empty or any entry is negative or non-finite.
    pub fn new(days: Vec<f64>) -> Result<Self, PanelError> {
        if days.is_empty() {
            return Err(PanelError::InvalidParameter {
                field: "consumption_history",
                message: "must hold at least one day".to_string(),
            });
        }
        for &kwh in &days {
            check_kwh(kwh)?;
        }
        Ok(Self { days: days.into() })
    }

    /// A history of `len` days that all read `kwh`.
    ///
    /// # Errors
    ///
    /// Fails if `len` is zero or `kwh` is invalid.
    pub fn filled(len: usize, kwh: f64) -> Result<Self, PanelError> {
        Self::new(vec![kwh; len])
    }

    /// Appends the newest day and drops the oldest.
    ///
    /// # Errors
    ///
    /// Returns [`PanelError::NegativeConsumption`] and leaves the history
    /// unchanged if `kwh` is negative or non-finite.
    pub fn push(&mut self, kwh: f64) -> Result<(), PanelError> {
        check_kwh(kwh)?;
        self.days.pop_front();
        self.days.push_back(kwh);
        Ok(())
    }

    /// Number of retained days (N).
    pub fn len(&self) -> usize {
        self.days.len()
    }

    /// Always `false`; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = f64> + '_ {
        self.days.iter().copied()
    }

    /// Sum of all retained days.
    pub fn total(&self) -> f64 {
        self.days.iter().sum()
    }

    /// Sum of the most recent `days` entries (all of them if `days > len`).
    pub fn recent_total(&self, days: usize) -> f64 {
        self.days.iter().rev().take(days).sum()
    }

    pub fn latest(&self) -> Option<f64> {
        self.days.back().copied()
    }

    pub fn to_vec(&self) -> Vec<f64> {
        self.days.iter().copied().collect()
    }
}

fn check_kwh(kwh: f64) -> Result<(), PanelError> {
    if kwh.is_finite() && kwh >= 0.0 {
        Ok(())
    } else {
        Err(PanelError::NegativeConsumption { kwh })
    }
}
