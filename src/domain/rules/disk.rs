use crate::domain::entities::{Anomaly, MetricsSnapshot};
use crate::domain::value_objects::{AnomalyKind, Severity, ThresholdSet};

use super::{count, tier_of, Rule};

/// Free space floor in GB, independent of the percent tiers
pub const FREE_SPACE_FLOOR_GB: f64 = 5.0;

pub struct DiskTierRule;

impl Rule for DiskTierRule {
    fn name(&self) -> &'static str {
        "disk_tier"
    }

    fn evaluate(&self, snapshot: &MetricsSnapshot, thresholds: &ThresholdSet) -> Vec<Anomaly> {
        let Some(disk) = &snapshot.disk else {
            return vec![];
        };
        match tier_of(disk.percent, &thresholds.disk) {
            Some((Severity::Critical, bound)) => vec![Anomaly::new(
                AnomalyKind::DiskCritical,
                Severity::Critical,
                disk.percent,
                bound,
                format!(
                    "Disque critique à {:.1}% (seuil {bound:.1}%, reste {:.1} GB) - Risque de blocage",
                    disk.percent, disk.free_gb
                ),
            )],
            Some((severity, bound)) => vec![Anomaly::new(
                AnomalyKind::DiskFull,
                severity,
                disk.percent,
                bound,
                format!(
                    "Disque presque plein : {:.1}% (seuil {bound:.1}%, reste {:.1} GB)",
                    disk.percent, disk.free_gb
                ),
            )],
            None => vec![],
        }
    }
}

pub struct DiskSpaceLowRule;

impl Rule for DiskSpaceLowRule {
    fn name(&self) -> &'static str {
        "disk_space_low"
    }

    fn evaluate(&self, snapshot: &MetricsSnapshot, _thresholds: &ThresholdSet) -> Vec<Anomaly> {
        let Some(disk) = &snapshot.disk else {
            return vec![];
        };
        if disk.free_gb < FREE_SPACE_FLOOR_GB {
            vec![Anomaly::new(
                AnomalyKind::DiskSpaceLow,
                Severity::Warning,
                disk.free_gb,
                FREE_SPACE_FLOOR_GB,
                format!(
                    "Espace disque faible : {:.1} GB restants (plancher {FREE_SPACE_FLOOR_GB:.1} GB)",
                    disk.free_gb
                ),
            )]
        } else {
            vec![]
        }
    }
}

/// Read and write throughput, each compared to the same MB/s bound
pub struct DiskIoRule;

impl Rule for DiskIoRule {
    fn name(&self) -> &'static str {
        "disk_io"
    }

    fn evaluate(&self, snapshot: &MetricsSnapshot, thresholds: &ThresholdSet) -> Vec<Anomaly> {
        let Some(io) = snapshot.disk.as_ref().and_then(|d| d.io) else {
            return vec![];
        };
        let bound = thresholds.disk_io.warning;
        let mut anomalies = Vec::new();
        if io.read_mb_s > bound {
            anomalies.push(Anomaly::new(
                AnomalyKind::DiskReadHigh,
                Severity::Warning,
                io.read_mb_s,
                bound,
                format!(
                    "Lecture disque intensive : {:.1} MB/s (seuil {bound:.1} MB/s)",
                    io.read_mb_s
                ),
            ));
        }
        if io.write_mb_s > bound {
            anomalies.push(Anomaly::new(
                AnomalyKind::DiskWriteHigh,
                Severity::Warning,
                io.write_mb_s,
                bound,
                format!(
                    "Écriture disque intensive : {:.1} MB/s (seuil {bound:.1} MB/s)",
                    io.write_mb_s
                ),
            ));
        }
        anomalies
    }
}

pub struct FileHandlesRule;

impl Rule for FileHandlesRule {
    fn name(&self) -> &'static str {
        "file_handles"
    }

    fn evaluate(&self, snapshot: &MetricsSnapshot, thresholds: &ThresholdSet) -> Vec<Anomaly> {
        let Some(handles) = snapshot.system.as_ref().and_then(|s| s.open_file_handles) else {
            return vec![];
        };
        let bound = thresholds.file_handles.warning;
        if count(handles) > bound {
            vec![Anomaly::new(
                AnomalyKind::FileHandlesHigh,
                Severity::Warning,
                count(handles),
                bound,
                format!("Nombre élevé de descripteurs de fichiers ouverts : {handles} (seuil {bound:.0})"),
            )]
        } else {
            vec![]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{DiskIo, SystemMetrics};
    use crate::domain::rules::fixtures;

    fn with_io(read_mb_s: f64, write_mb_s: f64) -> MetricsSnapshot {
        let mut snapshot = fixtures::disk(40.0, 200.0);
        if let Some(disk) = snapshot.disk.as_mut() {
            disk.io = Some(DiskIo {
                read_mb_s,
                write_mb_s,
            });
        }
        snapshot
    }

    #[test]
    fn rule_names() {
        assert_eq!(DiskTierRule.name(), "disk_tier");
        assert_eq!(DiskSpaceLowRule.name(), "disk_space_low");
        assert_eq!(DiskIoRule.name(), "disk_io");
        assert_eq!(FileHandlesRule.name(), "file_handles");
    }

    #[test]
    fn disk_full_between_tiers() {
        let anomalies = DiskTierRule.evaluate(&fixtures::disk(91.0, 45.0), &ThresholdSet::default());
        assert_eq!(anomalies.len(), 1);
        assert_eq!(anomalies[0].kind, AnomalyKind::DiskFull);
        assert!(anomalies[0].message.contains("45.0 GB"));
    }

    #[test]
    fn disk_critical_at_threshold() {
        let anomalies = DiskTierRule.evaluate(&fixtures::disk(95.0, 25.0), &ThresholdSet::default());
        assert_eq!(anomalies.len(), 1);
        assert_eq!(anomalies[0].kind, AnomalyKind::DiskCritical);
    }

    #[test]
    fn free_space_floor() {
        let thresholds = ThresholdSet::default();
        assert!(DiskSpaceLowRule
            .evaluate(&fixtures::disk(50.0, 5.0), &thresholds)
            .is_empty());
        let anomalies = DiskSpaceLowRule.evaluate(&fixtures::disk(50.0, 3.0), &thresholds);
        assert_eq!(anomalies.len(), 1);
        assert!((anomalies[0].value - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn io_read_and_write_are_separate() {
        let thresholds = ThresholdSet::default();
        assert!(DiskIoRule.evaluate(&with_io(80.0, 10.0), &thresholds).is_empty());
        let anomalies = DiskIoRule.evaluate(&with_io(120.0, 95.0), &thresholds);
        let kinds: Vec<AnomalyKind> = anomalies.iter().map(|a| a.kind).collect();
        assert_eq!(kinds, vec![AnomalyKind::DiskReadHigh, AnomalyKind::DiskWriteHigh]);
    }

    #[test]
    fn io_without_record_is_skipped() {
        assert!(DiskIoRule
            .evaluate(&fixtures::disk(40.0, 100.0), &ThresholdSet::default())
            .is_empty());
    }

    #[test]
    fn file_handles_over_bound() {
        let thresholds = ThresholdSet::default();
        let snapshot = fixtures::system(SystemMetrics {
            open_file_handles: Some(12_000),
            ..SystemMetrics::default()
        });
        let anomalies = FileHandlesRule.evaluate(&snapshot, &thresholds);
        assert_eq!(anomalies.len(), 1);
        assert_eq!(anomalies[0].category, crate::domain::value_objects::Category::Storage);

        let snapshot = fixtures::system(SystemMetrics {
            open_file_handles: None,
            ..SystemMetrics::default()
        });
        assert!(FileHandlesRule.evaluate(&snapshot, &thresholds).is_empty());
    }
}
