use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::process::ProcessRef;
use crate::domain::value_objects::{AnomalyKind, Category, Severity};

/// A threshold violation found in one snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Anomaly {
    pub kind: AnomalyKind,
    pub category: Category,
    pub severity: Severity,
    pub value: f64,
    pub threshold: f64,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub process: Option<ProcessRef>,
}

impl Anomaly {
    /// Builds an anomaly whose category follows from its kind
    #[must_use]
    pub fn new(
        kind: AnomalyKind,
        severity: Severity,
        value: f64,
        threshold: f64,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            category: kind.category(),
            severity,
            value,
            threshold,
            message: message.into(),
            process: None,
        }
    }

    #[must_use]
    pub fn with_process(mut self, process: ProcessRef) -> Self {
        self.process = Some(process);
        self
    }
}

/// Stable sort by severity rank, critical first. Emission order is kept
/// within a rank.
pub fn sort_by_severity(anomalies: &mut [Anomaly]) {
    anomalies.sort_by_key(|a| a.severity.rank());
}

/// Counts of anomalies per severity and per category
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnomalySummary {
    pub total: usize,
    pub critical: usize,
    pub warning: usize,
    pub info: usize,
    pub categories: BTreeMap<Category, usize>,
}

impl AnomalySummary {
    #[must_use]
    pub fn from_anomalies(anomalies: &[Anomaly]) -> Self {
        let mut summary = Self {
            total: anomalies.len(),
            ..Self::default()
        };
        for anomaly in anomalies {
            match anomaly.severity {
                Severity::Critical => summary.critical += 1,
                Severity::Warning => summary.warning += 1,
                Severity::Info => summary.info += 1,
            }
            *summary.categories.entry(anomaly.category).or_insert(0) += 1;
        }
        summary
    }
}
