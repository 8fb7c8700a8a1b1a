//! InputSlot - pointer state shared with the ingestion thread

use std::sync::{Mutex, PoisonError};

use contracts::InputSnapshot;

/// Latest pointer state reported by the presenter
#[derive(Debug, Default)]
pub struct InputSlot {
    current: Mutex<InputSnapshot>,
}

impl InputSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Written by the render thread every tick
    pub fn store(&self, input: InputSnapshot) {
        *self.current.lock().unwrap_or_else(PoisonError::into_inner) = input;
    }

    /// Copy of the latest pointer state
    pub fn load(&self) -> InputSnapshot {
        *self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
