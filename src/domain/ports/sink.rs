use thiserror::Error;

use crate::domain::entities::Report;

#[derive(Error, Debug)]
pub enum SinkError {
    #[error("failed to deliver report: {0}")]
    DeliveryFailed(String),
    #[error("sink unavailable: {0}")]
    Unavailable(String),
}

/// Destination for reports produced by monitoring passes.
pub trait ReportSink: Send + Sync {
    /// Deliver one report.
    ///
    /// # Errors
    ///
    /// Returns `SinkError` if the report cannot be written or the
    /// destination is unavailable.
    fn deliver(&self, report: &Report) -> Result<(), SinkError>;

    /// Record a pass that failed before producing a report.
    ///
    /// # Errors
    ///
    /// Returns `SinkError` if the record cannot be written.
    fn record_error(&self, _message: &str) -> Result<(), SinkError> {
        Ok(())
    }
}
