use thiserror::Error;

use crate::domain::entities::{HostInfo, MetricsSnapshot};

#[derive(Error, Debug)]
pub enum CollectionError {
    #[error("failed to collect system metrics: {0}")]
    MetricsUnavailable(String),
    #[error("permission denied: {0}")]
    PermissionDenied(String),
    #[error("collector lock poisoned")]
    Poisoned,
}

/// Source of metric snapshots. Implementations may block; callers on an
/// async runtime should wrap `collect` in `spawn_blocking`.
pub trait MetricsProvider: Send + Sync {
    /// Sample every metric family the platform exposes.
    ///
    /// # Errors
    ///
    /// Returns `CollectionError` if metrics are unavailable or
    /// permission is denied.
    fn collect(&self) -> Result<MetricsSnapshot, CollectionError>;

    /// Static facts about the host. Providers without them report defaults.
    fn host_info(&self) -> HostInfo {
        HostInfo::default()
    }
}
