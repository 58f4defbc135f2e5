//! Thread-safe owner of a [`SystemState`].
//!
//! Mutations take the write lock for their whole validate-then-apply
//! sequence, so no reader ever sees a half-applied cascade. Reads take the
//! read lock and may run concurrently with each other.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::panel::state::SystemState;

/// Cloneable handle to one shared panel.
#[derive(Debug, Clone)]
pub struct SharedPanel {
    inner: Arc<RwLock<SystemState>>,
}

impl SharedPanel {
    pub fn new(state: SystemState) -> Self {
        Self {
            inner: Arc::new(RwLock::new(state)),
        }
    }

    /// Runs `f` with exclusive access to the state.
    pub fn mutate<R>(&self, f: impl FnOnce(&mut SystemState) -> R) -> R {
        f(&mut self.inner.write())
    }

    /// Runs `f` against a consistent view of the state.
    pub fn read<R>(&self, f: impl FnOnce(&SystemState) -> R) -> R {
        f(&self.inner.read())
    }

    /// Clones the current state.
    pub fn snapshot(&self) -> SystemState {
        self.read(SystemState::clone)
    }
}
