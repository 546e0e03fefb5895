use std::path::{Path, PathBuf};

use crate::application::config::AppConfig;
use crate::domain::ports::store::{StoreError, ThresholdStore};
use crate::domain::value_objects::ThresholdSet;

/// Persists thresholds in the `[thresholds]` section of the config file.
/// Other sections are read back and rewritten unchanged.
pub struct TomlThresholdStore {
    path: PathBuf,
}

impl TomlThresholdStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ThresholdStore for TomlThresholdStore {
    fn load(&self) -> Result<Option<ThresholdSet>, StoreError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let config = AppConfig::load_from(&self.path)
            .map_err(|e| StoreError::ReadFailed(format!("{e:#}")))?;
        Ok(Some(config.thresholds))
    }

    fn save(&self, thresholds: &ThresholdSet) -> Result<(), StoreError> {
        let mut config = if self.path.exists() {
            AppConfig::load_from(&self.path)
                .map_err(|e| StoreError::ReadFailed(format!("{e:#}")))?
        } else {
            AppConfig::default()
        };
        config.thresholds = thresholds.clone();
        config
            .save_to(&self.path)
            .map_err(|e| StoreError::WriteFailed(format!("{e:#}")))?;
        tracing::debug!("Seuils enregistrés dans {}", self.path.display());
        Ok(())
    }
}
