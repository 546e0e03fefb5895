use std::sync::Mutex;

use crate::domain::ports::store::{StoreError, ThresholdStore};
use crate::domain::value_objects::ThresholdSet;

/// In-memory threshold store for tests and one-shot runs.
pub struct InMemoryThresholdStore {
    saved: Mutex<Option<ThresholdSet>>,
}

impl InMemoryThresholdStore {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            saved: Mutex::new(None),
        }
    }
}

impl Default for InMemoryThresholdStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ThresholdStore for InMemoryThresholdStore {
    fn load(&self) -> Result<Option<ThresholdSet>, StoreError> {
        Ok(self
            .saved
            .lock()
            .map_err(|_| StoreError::ReadFailed("lock poisoned".into()))?
            .clone())
    }

    fn save(&self, thresholds: &ThresholdSet) -> Result<(), StoreError> {
        *self
            .saved
            .lock()
            .map_err(|_| StoreError::WriteFailed("lock poisoned".into()))? = Some(thresholds.clone());
        Ok(())
    }
}
