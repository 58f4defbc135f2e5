//! Validation errors raised by panel mutations.
//!
//! Every variant is local and recoverable: the operation that returned it
//! left the panel untouched.

/// A rejected mutation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PanelError {
    #[error("unknown load \"{id}\"")]
    UnknownLoad { id: String },

    #[error("load \"{id}\" is already registered")]
    DuplicateLoad { id: String },

    #[error("rated power for \"{id}\" must be a finite value >= 0, got {power_w}")]
    NegativePower { id: String, power_w: f64 },

    #[error("daily consumption must be a finite value >= 0, got {kwh}")]
    NegativeConsumption { kwh: f64 },

    #[error("tariff rate must be a finite value > 0, got {rate}")]
    NonPositiveTariff { rate: f64 },

    #[error("{field} {message}")]
    InvalidParameter { field: &'static str, message: String },
}

impl PanelError {
    /// Returns `true` for errors caused by referencing a load that does not exist.
    pub fn is_unknown_load(&self) -> bool {
        matches!(self, Self::UnknownLoad { .. })
    }
}
