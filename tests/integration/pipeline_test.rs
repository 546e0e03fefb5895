#![allow(clippy::expect_used)]

use std::sync::Arc;

use itmon::application::services::monitor::MonitorService;
use itmon::domain::analysis::{analyze, RecommendationEngine};
use itmon::domain::rules::Classifier;
use itmon::domain::entities::MetricsSnapshot;
use itmon::domain::ports::collector::{CollectionError, MetricsProvider};
use itmon::domain::value_objects::{
    AnomalyKind, DetectionMode, Level, Platform, Resource, Severity, ThresholdSet,
};
use itmon::infrastructure::export::{ExportFormat, ReportExporter};
use itmon::infrastructure::persistence::in_memory_store::InMemoryThresholdStore;

const LOADED: &str = include_str!("../fixtures/loaded_host.json");
const IDLE: &str = include_str!("../fixtures/idle_host.json");
const MALFORMED: &str = include_str!("../fixtures/malformed_host.json");

/// Replays a fixture document on every collection
struct FixtureProvider(&'static str);

impl MetricsProvider for FixtureProvider {
    fn collect(&self) -> Result<MetricsSnapshot, CollectionError> {
        MetricsSnapshot::from_json_lenient(self.0)
            .map_err(|e| CollectionError::MetricsUnavailable(e.to_string()))
    }
}

fn service_for(fixture: &'static str) -> MonitorService {
    MonitorService::new(Arc::new(FixtureProvider(fixture)), ThresholdSet::default(), 10)
}

#[test]
fn loaded_host_report_is_consistent() {
    let service = service_for(LOADED);
    let report = service.run_once(DetectionMode::Basic).expect("pass");

    assert_eq!(report.detection_mode, DetectionMode::Basic);
    assert_eq!(report.health_score, 60);
    assert_eq!(report.timestamp.to_rfc3339(), "2024-05-02T08:30:00+00:00");

    assert_eq!(report.summary.total, 6);
    assert_eq!(report.summary.critical, 1);
    assert_eq!(report.summary.warning, 5);
    assert_eq!(report.summary.info, 0);

    assert_eq!(report.analyses.len(), report.anomalies.len());
    for (analysis, anomaly) in report.analyses.iter().zip(&report.anomalies) {
        assert_eq!(&analysis.anomaly, anomaly);
        assert!(!analysis.recommendations.is_empty(), "{} has no steps", anomaly.kind);
    }
    assert!(!report.is_healthy());
}

#[test]
fn extended_pass_names_the_offending_processes() {
    let service = service_for(LOADED);
    let report = service.run_once(DetectionMode::Extended).expect("pass");

    let process_of = |kind: AnomalyKind| {
        report
            .anomalies
            .iter()
            .find(|a| a.kind == kind)
            .and_then(|a| a.process.as_ref())
            .map(|p| (p.pid, p.name.clone()))
    };
    assert_eq!(process_of(AnomalyKind::ProcessCpuHigh), Some((4242, "stress".into())));
    assert_eq!(process_of(AnomalyKind::ProcessMemoryHigh), Some((999, "java".into())));
    assert_eq!(
        process_of(AnomalyKind::SuspiciousProcess),
        Some((777, "xmrig-miner".into()))
    );
    assert!(report.summary.total > 6);
}

#[test]
fn analysis_output_is_byte_identical_across_runs() {
    let snapshot = MetricsSnapshot::from_json_lenient(LOADED).expect("valid fixture");
    let thresholds = ThresholdSet::default();
    let engine = RecommendationEngine::for_platform(Platform::Unix);
    let run = || {
        let anomalies = Classifier::extended().classify(&snapshot, &thresholds);
        serde_json::to_string(&analyze(&anomalies, &snapshot, &engine)).expect("serialize")
    };
    let first = run();
    assert!(first.contains("root_cause"));
    assert_eq!(first, run());
}

#[test]
fn idle_host_is_healthy() {
    let service = service_for(IDLE);
    let report = service.run_once(DetectionMode::Extended).expect("pass");
    assert!(report.anomalies.is_empty());
    assert!(report.analyses.is_empty());
    assert_eq!(report.health_score, 100);
    assert!(report.is_healthy());
}

#[test]
fn malformed_families_are_dropped_not_fatal() {
    let snapshot = MetricsSnapshot::from_json_lenient(MALFORMED).expect("valid json");
    assert!(snapshot.cpu.is_none());
    assert!(snapshot.disk.is_none());
    let memory = snapshot.memory.as_ref().expect("memory kept");
    assert!(memory.swap.is_none());

    let service = service_for(MALFORMED);
    let report = service.run_once(DetectionMode::Basic).expect("pass");
    let kinds: Vec<_> = report.anomalies.iter().map(|a| a.kind).collect();
    assert_eq!(kinds, vec![AnomalyKind::MemoryHigh, AnomalyKind::NetworkErrors]);
    assert_eq!(report.health_score, 91);
}

#[test]
fn history_accumulates_across_passes() {
    let service = service_for(LOADED);
    for _ in 0..3 {
        service.run_once(DetectionMode::Basic).expect("pass");
    }
    let stats = service.rolling_stats();
    let cpu = stats.cpu.expect("cpu stats");
    assert_eq!(cpu.samples, 3);
    assert!((cpu.average - 97.0).abs() < 1e-9);
    assert_eq!(service.history().cpu(), vec![97.0; 3]);
}

#[test]
fn scan_sorts_critical_first_without_recording() {
    let service = service_for(LOADED);
    let snapshot = service.collect().expect("collect");
    let anomalies = service.scan(&snapshot, DetectionMode::Extended);
    assert_eq!(anomalies[0].severity, Severity::Critical);
    assert!(service.history().cpu().is_empty());
}

#[test]
fn threshold_change_applies_to_next_pass() {
    let store = Arc::new(InMemoryThresholdStore::default());
    let service = service_for(LOADED).with_store(store);

    service
        .set_threshold(Resource::Memory, Level::Warning, 93.0)
        .expect("set");
    let report = service.run_once(DetectionMode::Basic).expect("pass");
    assert!(report.anomalies.iter().all(|a| a.kind != AnomalyKind::MemoryHigh));
}

#[test]
fn report_exports_in_every_format() {
    let dir = tempfile::tempdir().expect("tempdir");
    let service = service_for(LOADED);
    let report = service.run_once(DetectionMode::Extended).expect("pass");
    let exporter = ReportExporter::new(dir.path());

    let json = exporter
        .export(&report, ExportFormat::Json, Some("report.json"))
        .expect("json");
    let parsed: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&json).expect("read")).expect("parse");
    assert_eq!(parsed["health_score"], 60);
    assert_eq!(
        parsed["anomalies"].as_array().map(Vec::len),
        Some(report.anomalies.len())
    );

    let csv = exporter
        .export(&report, ExportFormat::Csv, None)
        .expect("csv");
    let text = std::fs::read_to_string(&csv).expect("read");
    assert!(text.contains("cpu_critical"));
    assert!(csv
        .file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with("report_") && n.ends_with(".csv")));

    let html = exporter
        .export(&report, ExportFormat::Html, Some("report.html"))
        .expect("html");
    let page = std::fs::read_to_string(&html).expect("read");
    assert!(page.contains("xmrig-miner"));
    assert!(page.contains("MOYEN"));
}
