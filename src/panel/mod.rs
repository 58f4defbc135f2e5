//! Panel model: loads, history, billing calendar, and the mutations that
//! keep them consistent.

/// Billing cycle anchor rule and clock abstraction.
pub mod billing;
/// Fixed-length daily consumption history.
pub mod history;
/// Loads and the load registry.
pub mod load;
/// Mutation operations on [`SystemState`].
pub mod ops;
pub mod state;

pub use billing::{Clock, FixedClock, SystemClock};
pub use history::ConsumptionHistory;
pub use load::{Load, LoadRegistry};
pub use ops::ToggleOutcome;
pub use state::{StateParams, SystemState};
