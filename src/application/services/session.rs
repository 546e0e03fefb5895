use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use thiserror::Error;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use super::monitor::{MonitorError, MonitorService};
use crate::domain::ports::sink::ReportSink;
use crate::domain::value_objects::DetectionMode;

/// How long `stop` waits for the loop before aborting it
pub const STOP_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SessionError {
    #[error("la surveillance est déjà en cours")]
    AlreadyRunning,
    #[error("aucune surveillance en cours")]
    NotRunning,
    #[error("l'intervalle de surveillance doit être supérieur à zéro")]
    ZeroInterval,
}

struct Worker {
    stop_tx: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

/// Periodic monitoring loop running as a background tokio task.
///
/// `Idle -> Running -> Idle`. The worker slot is the state: a second
/// `start` while it is occupied is rejected.
/// A failing or panicking pass is logged and the loop carries on; only
/// `stop` ends it.
pub struct MonitoringSession {
    service: Arc<MonitorService>,
    default_sink: Arc<dyn ReportSink>,
    worker: Mutex<Option<Worker>>,
}

impl MonitoringSession {
    #[must_use]
    pub fn new(service: Arc<MonitorService>, default_sink: Arc<dyn ReportSink>) -> Self {
        Self {
            service,
            default_sink,
            worker: Mutex::new(None),
        }
    }

    /// Starts the loop. Reports go to `sink`, or to the default sink when
    /// `None`. Must be called from within a tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::ZeroInterval` for a zero `interval` and
    /// `SessionError::AlreadyRunning` if a loop is active.
    pub fn start(
        &self,
        interval: Duration,
        mode: DetectionMode,
        sink: Option<Arc<dyn ReportSink>>,
    ) -> Result<(), SessionError> {
        if interval.is_zero() {
            return Err(SessionError::ZeroInterval);
        }

        let mut slot = self.worker.lock().unwrap_or_else(PoisonError::into_inner);
        if slot.is_some() {
            return Err(SessionError::AlreadyRunning);
        }

        let sink = sink.unwrap_or_else(|| Arc::clone(&self.default_sink));
        let (stop_tx, stop_rx) = watch::channel(false);
        let handle = tokio::spawn(run_loop(
            Arc::clone(&self.service),
            sink,
            interval,
            mode,
            stop_rx,
        ));
        *slot = Some(Worker { stop_tx, handle });

        tracing::info!(
            "Surveillance démarrée (intervalle : {}s, mode : {mode})",
            interval.as_secs_f64()
        );
        Ok(())
    }

    /// Signals the loop, wakes its sleep and waits up to [`STOP_TIMEOUT`]
    /// for it to finish. A loop that does not finish in time is aborted.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotRunning` if no loop is active.
    pub async fn stop(&self) -> Result<(), SessionError> {
        let worker = self
            .worker
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        let Some(Worker { stop_tx, mut handle }) = worker else {
            return Err(SessionError::NotRunning);
        };

        // The receiver may already be gone if the task ended on its own
        let _ = stop_tx.send(true);
        match tokio::time::timeout(STOP_TIMEOUT, &mut handle).await {
            Ok(Ok(())) => tracing::info!("Surveillance arrêtée"),
            Ok(Err(e)) => tracing::error!("La boucle de surveillance s'est terminée en erreur : {e}"),
            Err(_) => {
                tracing::warn!(
                    "La boucle ne s'est pas arrêtée en {}s, abandon",
                    STOP_TIMEOUT.as_secs()
                );
                handle.abort();
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.worker
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    #[must_use]
    pub fn service(&self) -> &Arc<MonitorService> {
        &self.service
    }
}

impl Drop for MonitoringSession {
    fn drop(&mut self) {
        let worker = self
            .worker
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(worker) = worker {
            let _ = worker.stop_tx.send(true);
            worker.handle.abort();
        }
    }
}

async fn run_loop(
    service: Arc<MonitorService>,
    sink: Arc<dyn ReportSink>,
    interval: Duration,
    mode: DetectionMode,
    mut stop_rx: watch::Receiver<bool>,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        if *stop_rx.borrow() {
            break;
        }
        tokio::select! {
            _ = ticker.tick() => {}
            changed = stop_rx.changed() => {
                if changed.is_err() || *stop_rx.borrow() {
                    break;
                }
                continue;
            }
        }
        run_tick(&service, &sink, mode).await;
    }
}

/// One pass on the blocking pool. Errors and panics stop at this boundary.
async fn run_tick(service: &Arc<MonitorService>, sink: &Arc<dyn ReportSink>, mode: DetectionMode) {
    let pass_service = Arc::clone(service);
    let pass_sink = Arc::clone(sink);
    let outcome = tokio::task::spawn_blocking(move || -> Result<usize, MonitorError> {
        let report = pass_service.run_once(mode)?;
        if let Err(e) = pass_sink.deliver(&report) {
            tracing::warn!("Échec de livraison du rapport : {e}");
        }
        Ok(report.anomalies.len())
    })
    .await;

    let message = match outcome {
        Ok(Ok(count)) => {
            tracing::debug!("Cycle terminé : {count} anomalie(s)");
            return;
        }
        Ok(Err(e)) => format!("Erreur cycle de surveillance : {e}"),
        Err(e) if e.is_panic() => "Panique pendant le cycle de surveillance".to_string(),
        Err(e) => format!("Cycle de surveillance interrompu : {e}"),
    };
    tracing::error!("{message}");
    if let Err(e) = sink.record_error(&message) {
        tracing::warn!("Échec d'enregistrement de l'erreur : {e}");
    }
}
