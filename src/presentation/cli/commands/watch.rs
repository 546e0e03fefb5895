use std::future::Future;
use std::time::Duration;

use crate::application::services::session::MonitoringSession;
use crate::domain::value_objects::DetectionMode;

/// Resolves on Ctrl+C, or SIGTERM on Unix.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Impossible d'écouter Ctrl+C : {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::warn!("Impossible d'écouter SIGTERM : {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
}

/// Runs the session's loop with its default sink until a shutdown signal.
///
/// Failing passes are logged by the session and do not end the watch.
///
/// # Errors
///
/// Returns an error if a session is already running.
pub async fn run_watch(
    session: &MonitoringSession,
    interval: Duration,
    mode: DetectionMode,
) -> anyhow::Result<()> {
    println!(
        "🔄 Surveillance continue ({mode}, toutes les {}s). Ctrl+C pour arrêter.",
        interval.as_secs()
    );
    run_watch_until(session, interval, mode, shutdown_signal()).await?;
    println!("\nArrêt de la surveillance...");
    Ok(())
}

/// Same as [`run_watch`] with a caller-supplied stop condition.
///
/// # Errors
///
/// Returns an error if a session is already running.
pub async fn run_watch_until(
    session: &MonitoringSession,
    interval: Duration,
    mode: DetectionMode,
    shutdown: impl Future<Output = ()>,
) -> anyhow::Result<()> {
    session.start(interval, mode, None)?;
    shutdown.await;
    tracing::info!("Signal d'arrêt reçu, fermeture propre...");
    session.stop().await?;
    Ok(())
}
