use thiserror::Error;

use crate::domain::value_objects::ThresholdSet;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("storage read failed: {0}")]
    ReadFailed(String),
    #[error("storage write failed: {0}")]
    WriteFailed(String),
}

/// Write-back hook for threshold changes
pub trait ThresholdStore: Send + Sync {
    /// Load the persisted thresholds, or `None` when nothing was saved yet.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the read operation fails.
    fn load(&self) -> Result<Option<ThresholdSet>, StoreError>;

    /// Persist the full threshold set.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the write operation fails.
    fn save(&self, thresholds: &ThresholdSet) -> Result<(), StoreError>;
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn store_error_display() {
        let err = StoreError::ReadFailed("disk I/O".to_string());
        assert_eq!(err.to_string(), "storage read failed: disk I/O");

        let err = StoreError::WriteFailed("read-only".to_string());
        assert_eq!(err.to_string(), "storage write failed: read-only");
    }
}
