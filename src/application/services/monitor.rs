use std::sync::{Arc, Mutex, PoisonError, RwLock};

use chrono::Utc;
use thiserror::Error;

use crate::domain::analysis::{analyze, health_score_for, RecommendationEngine};
use crate::domain::entities::anomaly::sort_by_severity;
use crate::domain::entities::{Anomaly, AnomalySummary, HostInfo, MetricsSnapshot, Report};
use crate::domain::history::{MetricsHistory, RollingStats};
use crate::domain::ports::collector::{CollectionError, MetricsProvider};
use crate::domain::ports::store::{StoreError, ThresholdStore};
use crate::domain::rules::Classifier;
use crate::domain::value_objects::{DetectionMode, Level, Resource, ThresholdError, ThresholdSet};

#[derive(Error, Debug)]
pub enum MonitorError {
    #[error(transparent)]
    Collection(#[from] CollectionError),
    #[error(transparent)]
    Threshold(#[from] ThresholdError),
    #[error("threshold write-back failed: {0}")]
    Store(#[from] StoreError),
}

/// Orchestrates one pass: collect → classify → analyze → score → record.
///
/// Thresholds sit behind a `RwLock` and are cloned at the start of each
/// pass, so an update applies from the next pass on. History is written
/// only by passes; readers get copies.
pub struct MonitorService {
    provider: Arc<dyn MetricsProvider>,
    store: Option<Arc<dyn ThresholdStore>>,
    thresholds: RwLock<ThresholdSet>,
    history: Mutex<MetricsHistory>,
    basic: Classifier,
    extended: Classifier,
    engine: RecommendationEngine,
}

impl MonitorService {
    #[must_use]
    pub fn new(
        provider: Arc<dyn MetricsProvider>,
        thresholds: ThresholdSet,
        history_size: usize,
    ) -> Self {
        Self {
            provider,
            store: None,
            thresholds: RwLock::new(thresholds),
            history: Mutex::new(MetricsHistory::new(history_size)),
            basic: Classifier::basic(),
            extended: Classifier::extended(),
            engine: RecommendationEngine::default(),
        }
    }

    /// Persists every threshold change through `store`.
    #[must_use]
    pub fn with_store(mut self, store: Arc<dyn ThresholdStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Fresh snapshot from the provider, without recording it.
    ///
    /// # Errors
    ///
    /// Returns an error if the metrics provider fails.
    pub fn collect(&self) -> Result<MetricsSnapshot, MonitorError> {
        let mut snapshot = self.provider.collect()?;

        // Exclude own process to prevent self-detection
        let own_pid = std::process::id();
        if let Some(processes) = snapshot.processes.as_mut() {
            processes.top_by_cpu.retain(|p| p.pid != own_pid);
            processes.top_by_memory.retain(|p| p.pid != own_pid);
            processes.flagged.retain(|p| p.pid != own_pid);
        }
        Ok(snapshot)
    }

    /// Run a single monitoring pass against a fresh snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the metrics provider fails.
    pub fn run_once(&self, mode: DetectionMode) -> Result<Report, MonitorError> {
        let snapshot = self.collect()?;
        Ok(self.process_snapshot(snapshot, mode))
    }

    /// Runs the analysis pipeline on an already acquired snapshot and
    /// records it in the rolling history.
    #[must_use]
    pub fn process_snapshot(&self, snapshot: MetricsSnapshot, mode: DetectionMode) -> Report {
        let thresholds = self.thresholds();
        let anomalies = self.classifier(mode).classify(&snapshot, &thresholds);

        if anomalies.is_empty() {
            tracing::debug!("Système OK, aucune anomalie");
        } else {
            tracing::info!("{} anomalie(s) détectée(s)", anomalies.len());
        }

        let analyses = analyze(&anomalies, &snapshot, &self.engine);
        let health_score = health_score_for(&snapshot);

        let rolling_stats = {
            let mut history = self.history.lock().unwrap_or_else(PoisonError::into_inner);
            history.record(&snapshot);
            history.stats()
        };

        Report {
            timestamp: snapshot.timestamp.unwrap_or_else(Utc::now),
            detection_mode: mode,
            summary: AnomalySummary::from_anomalies(&anomalies),
            metrics: snapshot,
            health_score,
            anomalies,
            analyses,
            rolling_stats,
        }
    }

    /// Classification only, sorted critical first. History is untouched.
    #[must_use]
    pub fn scan(&self, snapshot: &MetricsSnapshot, mode: DetectionMode) -> Vec<Anomaly> {
        let mut anomalies = self.classifier(mode).classify(snapshot, &self.thresholds());
        sort_by_severity(&mut anomalies);
        anomalies
    }

    #[must_use]
    pub const fn classifier(&self, mode: DetectionMode) -> &Classifier {
        match mode {
            DetectionMode::Basic => &self.basic,
            DetectionMode::Extended => &self.extended,
        }
    }

    /// Copy of the current threshold table
    #[must_use]
    pub fn thresholds(&self) -> ThresholdSet {
        self.thresholds
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Validates and applies one bound, then writes the whole table back.
    ///
    /// # Errors
    ///
    /// Returns `MonitorError::Threshold` if the value is rejected (the table
    /// is unchanged), or `MonitorError::Store` if persisting fails (the new
    /// value stays in effect for this process).
    pub fn set_threshold(
        &self,
        resource: Resource,
        level: Level,
        value: f64,
    ) -> Result<(), MonitorError> {
        let updated = {
            let mut guard = self.thresholds.write().unwrap_or_else(PoisonError::into_inner);
            guard.set(resource, level, value)?;
            guard.clone()
        };
        tracing::info!("Seuil {resource}.{level} mis à jour : {value}");
        self.persist(&updated)
    }

    /// Replaces the whole table, e.g. on reset to defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the table is invalid or cannot be persisted.
    pub fn replace_thresholds(&self, thresholds: ThresholdSet) -> Result<(), MonitorError> {
        thresholds.validate()?;
        {
            let mut guard = self.thresholds.write().unwrap_or_else(PoisonError::into_inner);
            guard.clone_from(&thresholds);
        }
        self.persist(&thresholds)
    }

    fn persist(&self, thresholds: &ThresholdSet) -> Result<(), MonitorError> {
        if let Some(store) = &self.store {
            store.save(thresholds)?;
        }
        Ok(())
    }

    #[must_use]
    pub fn rolling_stats(&self) -> RollingStats {
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .stats()
    }

    /// Copy of the rolling history
    #[must_use]
    pub fn history(&self) -> MetricsHistory {
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    #[must_use]
    pub fn host_info(&self) -> HostInfo {
        self.provider.host_info()
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use crate::domain::entities::{CpuMetrics, DiskMetrics, MemoryMetrics, ProcessEntry, ProcessMetrics};
    use crate::domain::value_objects::{AnomalyKind, Priority};
    use crate::infrastructure::persistence::in_memory_store::InMemoryThresholdStore;

    struct MockProvider {
        snapshot: MetricsSnapshot,
    }

    impl MetricsProvider for MockProvider {
        fn collect(&self) -> Result<MetricsSnapshot, CollectionError> {
            Ok(self.snapshot.clone())
        }
    }

    struct FailingProvider;

    impl MetricsProvider for FailingProvider {
        fn collect(&self) -> Result<MetricsSnapshot, CollectionError> {
            Err(CollectionError::MetricsUnavailable("no /proc".into()))
        }
    }

    struct FailingStore;

    impl ThresholdStore for FailingStore {
        fn load(&self) -> Result<Option<ThresholdSet>, StoreError> {
            Ok(None)
        }

        fn save(&self, _thresholds: &ThresholdSet) -> Result<(), StoreError> {
            Err(StoreError::WriteFailed("read-only".into()))
        }
    }

    fn loaded_snapshot(cpu: f64) -> MetricsSnapshot {
        MetricsSnapshot {
            cpu: Some(CpuMetrics {
                percent: cpu,
                logical_count: 4,
                ..CpuMetrics::default()
            }),
            memory: Some(MemoryMetrics {
                percent: 40.0,
                total_gb: 16.0,
                available_gb: 9.6,
                used_gb: 6.4,
                swap: None,
            }),
            disk: Some(DiskMetrics {
                percent: 50.0,
                total_gb: 500.0,
                free_gb: 250.0,
                ..DiskMetrics::default()
            }),
            ..MetricsSnapshot::default()
        }
    }

    fn service_for(snapshot: MetricsSnapshot) -> MonitorService {
        MonitorService::new(
            Arc::new(MockProvider { snapshot }),
            ThresholdSet::default(),
            10,
        )
    }

    #[test]
    fn run_once_builds_paired_report() {
        let service = service_for(loaded_snapshot(97.0));
        let report = service.run_once(DetectionMode::Basic).expect("run_once");
        assert_eq!(report.anomalies.len(), 1);
        assert_eq!(report.anomalies[0].kind, AnomalyKind::CpuCritical);
        assert_eq!(report.analyses.len(), report.anomalies.len());
        assert_eq!(report.analyses[0].anomaly, report.anomalies[0]);
        assert_eq!(report.analyses[0].recommendations[0].priority, Priority::Urgent);
        assert_eq!(report.summary.critical, 1);
        assert_eq!(report.detection_mode, DetectionMode::Basic);
    }

    #[test]
    fn run_once_collection_failure_propagates() {
        let service = MonitorService::new(Arc::new(FailingProvider), ThresholdSet::default(), 10);
        let result = service.run_once(DetectionMode::Basic);
        assert!(matches!(result, Err(MonitorError::Collection(_))));
        assert!(service.rolling_stats().cpu.is_none());
    }

    #[test]
    fn run_once_excludes_own_process() {
        let mut snapshot = loaded_snapshot(20.0);
        snapshot.processes = Some(ProcessMetrics {
            top_by_cpu: vec![ProcessEntry {
                pid: std::process::id(),
                name: "itmon".into(),
                cpu_percent: 99.0,
                memory_percent: 1.0,
                user: None,
            }],
            ..ProcessMetrics::default()
        });
        let service = service_for(snapshot);
        let report = service.run_once(DetectionMode::Extended).expect("run_once");
        assert!(report.metrics.top_cpu_processes().is_empty());
        assert!(report
            .anomalies
            .iter()
            .all(|a| a.kind != AnomalyKind::ProcessCpuHigh));
    }

    #[test]
    fn history_is_bounded_by_capacity() {
        let service = service_for(loaded_snapshot(50.0));
        for _ in 0..25 {
            service.run_once(DetectionMode::Basic).expect("run_once");
        }
        let history = service.history();
        assert_eq!(history.cpu().len(), 10);
        let stats = service.rolling_stats();
        assert_eq!(stats.cpu.map(|s| s.samples), Some(10));
    }

    #[test]
    fn threshold_update_applies_to_next_pass() {
        let service = service_for(loaded_snapshot(75.0));
        let before = service.run_once(DetectionMode::Basic).expect("run_once");
        assert!(before.anomalies.is_empty());

        service
            .set_threshold(Resource::Cpu, Level::Warning, 70.0)
            .expect("set threshold");
        let after = service.run_once(DetectionMode::Basic).expect("run_once");
        assert_eq!(after.anomalies.len(), 1);
        assert_eq!(after.anomalies[0].kind, AnomalyKind::CpuHigh);
    }

    #[test]
    fn invalid_threshold_leaves_table_unchanged() {
        let service = service_for(MetricsSnapshot::default());
        let err = service
            .set_threshold(Resource::Cpu, Level::Warning, -1.0)
            .expect_err("negative rejected");
        assert!(matches!(err, MonitorError::Threshold(_)));
        assert_eq!(service.thresholds(), ThresholdSet::default());
    }

    #[test]
    fn threshold_update_is_written_back() {
        let store = Arc::new(InMemoryThresholdStore::new());
        let service = service_for(MetricsSnapshot::default()).with_store(store.clone());
        service
            .set_threshold(Resource::Disk, Level::Critical, 97.0)
            .expect("set threshold");
        let saved = store.load().expect("load").expect("saved set");
        assert_eq!(saved.get(Resource::Disk, Level::Critical), Some(97.0));
    }

    #[test]
    fn store_failure_is_reported_but_value_kept() {
        let service = service_for(MetricsSnapshot::default()).with_store(Arc::new(FailingStore));
        let err = service
            .set_threshold(Resource::Memory, Level::Warning, 60.0)
            .expect_err("store fails");
        assert!(matches!(err, MonitorError::Store(_)));
        assert_eq!(
            service.thresholds().get(Resource::Memory, Level::Warning),
            Some(60.0)
        );
    }

    #[test]
    fn reset_restores_defaults() {
        let service = service_for(MetricsSnapshot::default());
        service
            .set_threshold(Resource::Cpu, Level::Critical, 99.0)
            .expect("set threshold");
        service
            .replace_thresholds(ThresholdSet::default())
            .expect("reset");
        assert_eq!(service.thresholds(), ThresholdSet::default());
    }

    #[test]
    fn scan_sorts_critical_first() {
        let mut snapshot = loaded_snapshot(85.0);
        snapshot.disk = Some(DiskMetrics {
            percent: 97.0,
            free_gb: 10.0,
            ..DiskMetrics::default()
        });
        let service = service_for(snapshot.clone());
        let anomalies = service.scan(&snapshot, DetectionMode::Basic);
        assert_eq!(anomalies[0].kind, AnomalyKind::DiskCritical);
        assert_eq!(anomalies[1].kind, AnomalyKind::CpuHigh);
        assert!(service.rolling_stats().cpu.is_none());
    }
}
