#![allow(clippy::expect_used)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use itmon::application::services::monitor::MonitorService;
use itmon::application::services::session::{MonitoringSession, SessionError};
use itmon::domain::entities::{CpuMetrics, MetricsSnapshot, Report};
use itmon::domain::ports::collector::{CollectionError, MetricsProvider};
use itmon::domain::ports::sink::{ReportSink, SinkError};
use itmon::domain::value_objects::{DetectionMode, ThresholdSet};

/// Cycles through healthy, failing and panicking passes
struct FlakyProvider {
    calls: AtomicUsize,
}

impl MetricsProvider for FlakyProvider {
    fn collect(&self) -> Result<MetricsSnapshot, CollectionError> {
        match self.calls.fetch_add(1, Ordering::SeqCst) % 3 {
            0 => Ok(MetricsSnapshot {
                cpu: Some(CpuMetrics {
                    percent: 97.0,
                    logical_count: 2,
                    ..CpuMetrics::default()
                }),
                ..MetricsSnapshot::default()
            }),
            1 => Err(CollectionError::MetricsUnavailable("sensor offline".into())),
            _ => panic!("collector crashed"),
        }
    }
}

#[derive(Default)]
struct RecordingSink {
    reports: AtomicUsize,
    errors: Mutex<Vec<String>>,
}

impl ReportSink for RecordingSink {
    fn deliver(&self, _report: &Report) -> Result<(), SinkError> {
        self.reports.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn record_error(&self, message: &str) -> Result<(), SinkError> {
        self.errors
            .lock()
            .expect("lock")
            .push(message.to_string());
        Ok(())
    }
}

fn session_with(sink: Arc<RecordingSink>) -> MonitoringSession {
    let provider = Arc::new(FlakyProvider {
        calls: AtomicUsize::new(0),
    });
    let service = Arc::new(MonitorService::new(provider, ThresholdSet::default(), 16));
    MonitoringSession::new(service, sink)
}

async fn wait_for(condition: impl Fn() -> bool) {
    for _ in 0..200 {
        if condition() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("condition not reached in time");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn loop_survives_errors_and_panics() {
    let sink = Arc::new(RecordingSink::default());
    let session = session_with(Arc::clone(&sink));

    session
        .start(Duration::from_millis(20), DetectionMode::Basic, None)
        .expect("start");
    wait_for(|| sink.reports.load(Ordering::SeqCst) >= 2).await;
    session.stop().await.expect("stop");

    let errors = sink.errors.lock().expect("lock").clone();
    assert!(errors.iter().any(|m| m.contains("sensor offline")));
    assert!(errors.iter().any(|m| m.contains("Panique")));
    assert!(!session.is_running());
}

#[tokio::test]
async fn second_start_is_rejected() {
    let sink = Arc::new(RecordingSink::default());
    let session = session_with(sink);

    session
        .start(Duration::from_secs(60), DetectionMode::Basic, None)
        .expect("start");
    assert_eq!(
        session.start(Duration::from_secs(60), DetectionMode::Extended, None),
        Err(SessionError::AlreadyRunning)
    );
    session.stop().await.expect("stop");
}

#[tokio::test]
async fn zero_interval_never_starts_a_loop() {
    let sink = Arc::new(RecordingSink::default());
    let session = session_with(Arc::clone(&sink));
    assert_eq!(
        session.start(Duration::ZERO, DetectionMode::Basic, None),
        Err(SessionError::ZeroInterval)
    );
    assert!(!session.is_running());
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(sink.reports.load(Ordering::SeqCst), 0);
    assert!(sink.errors.lock().expect("lock").is_empty());
}

#[tokio::test]
async fn stop_without_start_is_rejected() {
    let session = session_with(Arc::new(RecordingSink::default()));
    assert_eq!(session.stop().await, Err(SessionError::NotRunning));
}

#[tokio::test]
async fn session_restarts_with_another_sink() {
    let default_sink = Arc::new(RecordingSink::default());
    let session = session_with(Arc::clone(&default_sink));

    session
        .start(Duration::from_secs(60), DetectionMode::Basic, None)
        .expect("first start");
    wait_for(|| default_sink.reports.load(Ordering::SeqCst) == 1).await;
    session.stop().await.expect("first stop");

    let other = Arc::new(RecordingSink::default());
    session
        .start(
            Duration::from_secs(60),
            DetectionMode::Basic,
            Some(Arc::clone(&other) as Arc<dyn ReportSink>),
        )
        .expect("restart");
    assert!(session.is_running());

    // The second pass of the provider fails, so the new sink sees an error
    wait_for(|| !other.errors.lock().expect("lock").is_empty()).await;
    session.stop().await.expect("second stop");

    assert_eq!(default_sink.reports.load(Ordering::SeqCst), 1);
    assert_eq!(other.reports.load(Ordering::SeqCst), 0);
}
