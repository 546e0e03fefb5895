use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::anomaly::{Anomaly, AnomalySummary};
use super::recommendation::Recommendation;
use super::root_cause::RootCause;
use super::snapshot::MetricsSnapshot;
use crate::domain::history::RollingStats;
use crate::domain::value_objects::DetectionMode;

/// Root cause and remediation for one anomaly
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalyAnalysis {
    pub anomaly: Anomaly,
    pub root_cause: RootCause,
    pub recommendations: Vec<Recommendation>,
}

/// Output of one monitoring pass. `analyses[i].anomaly == anomalies[i]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub timestamp: DateTime<Utc>,
    pub detection_mode: DetectionMode,
    pub metrics: MetricsSnapshot,
    pub health_score: u8,
    pub anomalies: Vec<Anomaly>,
    pub analyses: Vec<AnomalyAnalysis>,
    pub summary: AnomalySummary,
    pub rolling_stats: RollingStats,
}

impl Report {
    #[must_use]
    pub fn is_healthy(&self) -> bool {
        self.anomalies.is_empty()
    }

    /// Analyses ordered critical first, emission order kept within a rank
    #[must_use]
    pub fn analyses_by_severity(&self) -> Vec<&AnomalyAnalysis> {
        let mut sorted: Vec<&AnomalyAnalysis> = self.analyses.iter().collect();
        sorted.sort_by_key(|a| a.anomaly.severity.rank());
        sorted
    }
}
