//! Household electrical panel: load registry, breaker state, billing, and
//! the metrics derived from them.

#[cfg(feature = "api")]
pub mod api;
pub mod config;
pub mod error;
/// Thread-safe panel handle.
pub mod handle;
pub mod io;
pub mod metrics;
pub mod panel;
/// Day-by-day consumption simulation.
pub mod sim;
pub mod telemetry;

pub use error::PanelError;
pub use handle::SharedPanel;
pub use panel::{Load, SystemState, ToggleOutcome};
