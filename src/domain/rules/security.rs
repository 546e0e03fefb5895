use std::collections::HashSet;

use crate::domain::entities::{Anomaly, MetricsSnapshot};
use crate::domain::value_objects::{AnomalyKind, Severity, ThresholdSet};

use super::Rule;

/// Substrings that flag a process name, matched case-insensitively
pub const SUSPICIOUS_NAMES: [&str; 4] = ["crypto", "miner", "bitcoin", "monero"];

/// True when `name` contains one of [`SUSPICIOUS_NAMES`]
#[must_use]
pub fn is_suspicious_name(name: &str) -> bool {
    let lowered = name.to_lowercase();
    SUSPICIOUS_NAMES.iter().any(|needle| lowered.contains(needle))
}

/// Scans the CPU list, the memory list, then the full-table `flagged`
/// list, each PID reported once.
pub struct SuspiciousProcessRule;

impl Rule for SuspiciousProcessRule {
    fn name(&self) -> &'static str {
        "suspicious_process"
    }

    fn evaluate(&self, snapshot: &MetricsSnapshot, _thresholds: &ThresholdSet) -> Vec<Anomaly> {
        let mut seen = HashSet::new();
        let flagged = snapshot
            .processes
            .as_ref()
            .map_or(&[][..], |p| p.flagged.as_slice());
        snapshot
            .top_cpu_processes()
            .iter()
            .chain(snapshot.top_memory_processes())
            .chain(flagged)
            .filter(|p| seen.insert(p.pid))
            .filter(|p| is_suspicious_name(&p.name))
            .map(|p| {
                Anomaly::new(
                    AnomalyKind::SuspiciousProcess,
                    Severity::Warning,
                    1.0,
                    0.0,
                    format!("Processus suspect détecté : {} (PID {})", p.name, p.pid),
                )
                .with_process(p.reference())
            })
            .collect()
    }
}
