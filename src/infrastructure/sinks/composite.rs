use std::sync::Arc;

use crate::domain::entities::Report;
use crate::domain::ports::sink::{ReportSink, SinkError};

/// Forwards reports to multiple sinks.
///
/// Calls each sink in order. Returns the first error encountered (if any),
/// but always calls all sinks.
pub struct CompositeSink {
    sinks: Vec<Arc<dyn ReportSink>>,
}

impl CompositeSink {
    #[must_use]
    pub fn new(sinks: Vec<Arc<dyn ReportSink>>) -> Self {
        Self { sinks }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl Default for CompositeSink {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl ReportSink for CompositeSink {
    fn deliver(&self, report: &Report) -> Result<(), SinkError> {
        let mut first_error = None;
        for sink in &self.sinks {
            if let Err(e) = sink.deliver(report) {
                tracing::warn!("Échec de livraison : {e}");
                if first_error.is_none() {
                    first_error = Some(e);
                }
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    fn record_error(&self, message: &str) -> Result<(), SinkError> {
        let mut first_error = None;
        for sink in &self.sinks {
            if let Err(e) = sink.record_error(message) {
                tracing::warn!("Échec d'enregistrement d'erreur : {e}");
                if first_error.is_none() {
                    first_error = Some(e);
                }
            }
        }
        first_error.map_or(Ok(()), Err)
    }
}
