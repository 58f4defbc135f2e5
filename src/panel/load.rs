//! Controllable loads and the registry that holds them.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::PanelError;

/// A single switchable appliance on the panel.
///
/// # Examples
///
/// ```
/// use panel_sim::panel::load::Load;
///
/// let kettle = Load::new("kettle", "Kettle", 2200.0, false).unwrap();
/// assert_eq!(kettle.rated_power_w(), 2200.0);
/// assert!(!kettle.is_on);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Load {
    /// Stable identifier, unique within a registry.
    pub id: String,
    /// Human-readable label.
    pub display_name: String,
    /// Nameplate draw in watts. Never negative.
    rated_power_w: f64,
    /// Whether the appliance is switched on.
    pub is_on: bool,
}

impl Load {
    /// Creates a load, rejecting negative or non-finite power.
    ///
    /// # Errors
    ///
    /// Returns [`PanelError::NegativePower`] if `rated_power_w` is not a finite value `>= 0`.
    pub fn new(
        id: impl Into<String>,
        display_name: impl Into<String>,
        rated_power_w: f64,
        is_on: bool,
    ) -> Result<Self, PanelError> {
        let id = id.into();
        check_power(&id, rated_power_w)?;
        Ok(Self {
            id,
            display_name: display_name.into(),
            rated_power_w,
            is_on,
        })
    }

    /// Rated power in watts.
    pub fn rated_power_w(&self) -> f64 {
        self.rated_power_w
    }

    pub(crate) fn set_rated_power_w(&mut self, power_w: f64) -> Result<(), PanelError> {
        check_power(&self.id, power_w)?;
        self.rated_power_w = power_w;
        Ok(())
    }
}

pub(crate) fn check_power(id: &str, power_w: f64) -> Result<(), PanelError> {
    if power_w.is_finite() && power_w >= 0.0 {
        Ok(())
    } else {
        Err(PanelError::NegativePower {
            id: id.to_string(),
            power_w,
        })
    }
}

/// Mapping from load id to [`Load`].
///
/// Iteration is ordered by id so reports and exports are deterministic.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct LoadRegistry {
    loads: BTreeMap<String, Load>,
}

impl LoadRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a load.
    ///
    /// # Errors
    ///
    /// Returns [`PanelError::DuplicateLoad`] if the id is already present.
    pub fn insert(&mut self, load: Load) -> Result<(), PanelError> {
        if self.contains(&load.id) {
            return Err(PanelError::DuplicateLoad { id: load.id });
        }
        self.loads.insert(load.id.clone(), load);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&Load> {
        self.loads.get(id)
    }

    pub(crate) fn get_mut(&mut self, id: &str) -> Option<&mut Load> {
        self.loads.get_mut(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.loads.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.loads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loads.is_empty()
    }

    /// Iterates over all loads in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Load> {
        self.loads.values()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Load> {
        self.loads.values_mut()
    }
}

impl<'a> IntoIterator for &'a LoadRegistry {
    type Item = &'a Load;
    type IntoIter = std::collections::btree_map::Values<'a, String, Load>;

    fn into_iter(self) -> Self::IntoIter {
        self.loads.values()
    }
}
