#![allow(clippy::expect_used)]

use itmon::domain::entities::{CpuMetrics, DiskMetrics, MetricsSnapshot};
use itmon::domain::rules::Classifier;
use itmon::domain::value_objects::{AnomalyKind, DetectionMode, Level, Resource, Severity, ThresholdSet};
use proptest::prelude::*;

fn cpu_snapshot(percent: f64) -> MetricsSnapshot {
    MetricsSnapshot {
        cpu: Some(CpuMetrics {
            percent,
            logical_count: 4,
            ..CpuMetrics::default()
        }),
        ..MetricsSnapshot::default()
    }
}

fn kinds(classifier: &Classifier, snapshot: &MetricsSnapshot, thresholds: &ThresholdSet) -> Vec<AnomalyKind> {
    classifier
        .classify(snapshot, thresholds)
        .iter()
        .map(|a| a.kind)
        .collect()
}

fn loaded_host() -> MetricsSnapshot {
    MetricsSnapshot::from_json_lenient(include_str!("../fixtures/loaded_host.json"))
        .expect("valid fixture")
}

#[test]
fn cpu_at_97_is_one_critical_anomaly() {
    let anomalies = Classifier::basic().classify(&cpu_snapshot(97.0), &ThresholdSet::default());
    assert_eq!(anomalies.len(), 1);
    assert_eq!(anomalies[0].kind, AnomalyKind::CpuCritical);
    assert_eq!(anomalies[0].severity, Severity::Critical);
    assert!((anomalies[0].threshold - 95.0).abs() < f64::EPSILON);
}

#[test]
fn extended_adds_spike_to_critical_tier() {
    let found = kinds(&Classifier::extended(), &cpu_snapshot(97.0), &ThresholdSet::default());
    assert_eq!(found, vec![AnomalyKind::CpuCritical, AnomalyKind::CpuSpike]);
}

#[test]
fn nearly_full_disk_reports_tier_and_low_space() {
    let snapshot = MetricsSnapshot {
        disk: Some(DiskMetrics {
            percent: 91.0,
            free_gb: 3.0,
            ..DiskMetrics::default()
        }),
        ..MetricsSnapshot::default()
    };
    let found = kinds(&Classifier::extended(), &snapshot, &ThresholdSet::default());
    assert_eq!(found, vec![AnomalyKind::DiskFull, AnomalyKind::DiskSpaceLow]);

    let basic = kinds(&Classifier::basic(), &snapshot, &ThresholdSet::default());
    assert_eq!(basic, vec![AnomalyKind::DiskFull]);
}

#[test]
fn empty_snapshot_yields_nothing() {
    let snapshot = MetricsSnapshot::default();
    for mode in [DetectionMode::Basic, DetectionMode::Extended] {
        assert!(Classifier::for_mode(mode)
            .classify(&snapshot, &ThresholdSet::default())
            .is_empty());
    }
}

#[test]
fn array_shaped_cpu_yields_no_cpu_anomaly() {
    let snapshot = MetricsSnapshot::from_json_lenient(r#"{"cpu": [99.0]}"#).expect("valid json");
    assert!(snapshot.cpu.is_none());
    for mode in [DetectionMode::Basic, DetectionMode::Extended] {
        assert!(Classifier::for_mode(mode)
            .classify(&snapshot, &ThresholdSet::default())
            .is_empty());
    }
}

#[test]
fn loaded_host_basic_kinds_in_rule_order() {
    let found = kinds(&Classifier::basic(), &loaded_host(), &ThresholdSet::default());
    assert_eq!(
        found,
        vec![
            AnomalyKind::CpuCritical,
            AnomalyKind::MemoryHigh,
            AnomalyKind::SwapHigh,
            AnomalyKind::DiskFull,
            AnomalyKind::NetworkErrors,
            AnomalyKind::ZombieProcesses,
        ]
    );
}

#[test]
fn loaded_host_extended_finds_heuristics() {
    let found = kinds(&Classifier::extended(), &loaded_host(), &ThresholdSet::default());
    for expected in [
        AnomalyKind::CpuSpike,
        AnomalyKind::MemoryLeakSuspected,
        AnomalyKind::DiskSpaceLow,
        AnomalyKind::ProcessCpuHigh,
        AnomalyKind::ProcessMemoryHigh,
        AnomalyKind::SuspiciousProcess,
    ] {
        assert!(found.contains(&expected), "missing {expected}");
    }
    assert!(!found.contains(&AnomalyKind::LoadAverageHigh));
    assert!(!found.contains(&AnomalyKind::SystemInterruptsHigh));
}

#[test]
fn basic_output_is_subset_of_extended() {
    let snapshot = loaded_host();
    let thresholds = ThresholdSet::default();
    let extended = kinds(&Classifier::extended(), &snapshot, &thresholds);
    for kind in kinds(&Classifier::basic(), &snapshot, &thresholds) {
        assert!(extended.contains(&kind), "{kind} missing from extended");
    }
}

#[test]
fn custom_thresholds_move_the_tiers() {
    let mut thresholds = ThresholdSet::default();
    thresholds
        .set(Resource::Cpu, Level::Warning, 50.0)
        .expect("valid");
    thresholds
        .set(Resource::Cpu, Level::Critical, 60.0)
        .expect("valid");
    let found = kinds(&Classifier::basic(), &cpu_snapshot(55.0), &thresholds);
    assert_eq!(found, vec![AnomalyKind::CpuHigh]);
    let found = kinds(&Classifier::basic(), &cpu_snapshot(65.0), &thresholds);
    assert_eq!(found, vec![AnomalyKind::CpuCritical]);
}

proptest! {
    #[test]
    fn cpu_tier_matches_bounds(percent in 0.0f64..=100.0) {
        let found = kinds(&Classifier::basic(), &cpu_snapshot(percent), &ThresholdSet::default());
        let expected = if percent >= 95.0 {
            vec![AnomalyKind::CpuCritical]
        } else if percent >= 80.0 {
            vec![AnomalyKind::CpuHigh]
        } else {
            vec![]
        };
        prop_assert_eq!(found, expected);
    }

    #[test]
    fn out_of_range_percent_is_reported_unclamped(percent in 100.0f64..1_000.0) {
        let anomalies = Classifier::basic().classify(&cpu_snapshot(percent), &ThresholdSet::default());
        prop_assert_eq!(anomalies.len(), 1);
        prop_assert_eq!(anomalies[0].kind, AnomalyKind::CpuCritical);
        prop_assert!((anomalies[0].value - percent).abs() < f64::EPSILON);
    }

    #[test]
    fn classification_is_deterministic(percent in 0.0f64..=100.0, mem in 0.0f64..=100.0) {
        let mut snapshot = cpu_snapshot(percent);
        snapshot.memory = MetricsSnapshot::from_json_lenient(
            &format!(r#"{{"memory": {{"percent": {mem}, "available_gb": 0.5}}}}"#),
        )
        .expect("valid json")
        .memory;
        let classifier = Classifier::extended();
        let thresholds = ThresholdSet::default();
        prop_assert_eq!(
            classifier.classify(&snapshot, &thresholds),
            classifier.classify(&snapshot, &thresholds)
        );
    }
}
