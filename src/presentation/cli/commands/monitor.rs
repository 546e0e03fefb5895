use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use colored::Colorize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

use crate::application::services::monitor::MonitorService;
use crate::application::services::session::MonitoringSession;
use crate::domain::entities::Report;
use crate::domain::ports::sink::{ReportSink, SinkError};
use crate::domain::value_objects::{DetectionMode, Severity};
use crate::presentation::cli::commands::watch::shutdown_signal;
use crate::presentation::cli::formatters::alert_fmt;
use crate::presentation::cli::formatters::status_fmt::{colorize_health, format_rolling_stats};

const HELP: &str = "Commandes : stats, scan, help, quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MonitorCommand {
    Stats,
    Scan,
    Help,
    Quit,
    Unknown(String),
}

/// Parses one input line. Blank lines yield `None`.
#[must_use]
pub fn parse_command(line: &str) -> Option<MonitorCommand> {
    let word = line.trim().to_lowercase();
    if word.is_empty() {
        return None;
    }
    Some(match word.as_str() {
        "stats" | "s" => MonitorCommand::Stats,
        "scan" | "sc" => MonitorCommand::Scan,
        "help" | "h" | "?" => MonitorCommand::Help,
        "quit" | "q" | "exit" => MonitorCommand::Quit,
        _ => MonitorCommand::Unknown(word),
    })
}

/// One line per pass plus the critical anomalies, so the prompt stays usable.
#[derive(Debug, Default)]
pub struct SummarySink;

impl ReportSink for SummarySink {
    fn deliver(&self, report: &Report) -> Result<(), SinkError> {
        println!(
            "⏰ {}  {}  {} anomalie(s)",
            report.timestamp.format("%H:%M:%S"),
            colorize_health(report.health_score),
            report.summary.total
        );
        for anomaly in report
            .anomalies
            .iter()
            .filter(|a| a.severity == Severity::Critical)
        {
            println!("  {}", alert_fmt::format_anomaly_line(anomaly));
        }
        Ok(())
    }

    fn record_error(&self, message: &str) -> Result<(), SinkError> {
        eprintln!("{} {message}", "Erreur :".red().bold());
        Ok(())
    }
}

async fn execute(service: &Arc<MonitorService>, command: &MonitorCommand, mode: DetectionMode) {
    match command {
        MonitorCommand::Stats => {
            println!("\n📈 STATISTIQUES D'HISTORIQUE");
            print!("{}", format_rolling_stats(&service.rolling_stats()));
        }
        MonitorCommand::Scan => {
            let service = Arc::clone(service);
            let outcome = tokio::task::spawn_blocking(move || {
                service
                    .collect()
                    .map(|snapshot| service.scan(&snapshot, mode))
            })
            .await;
            match outcome {
                Ok(Ok(anomalies)) if anomalies.is_empty() => alert_fmt::print_no_anomalies(),
                Ok(Ok(anomalies)) => alert_fmt::print_anomalies(&anomalies),
                Ok(Err(e)) => eprintln!("{} {e}", "Scan impossible :".red()),
                Err(e) => tracing::error!("Le scan a échoué : {e}"),
            }
        }
        MonitorCommand::Help => println!("{HELP}"),
        MonitorCommand::Quit => {}
        MonitorCommand::Unknown(word) => println!("Commande inconnue : '{word}'. {HELP}"),
    }
}

/// Background monitoring driven by commands read from stdin.
///
/// # Errors
///
/// Returns an error if a session is already running.
pub async fn run_monitor(
    session: &MonitoringSession,
    interval: Duration,
    mode: DetectionMode,
    sink: Arc<dyn ReportSink>,
) -> anyhow::Result<()> {
    println!(
        "🔄 Surveillance en arrière-plan ({mode}, toutes les {}s). {HELP}",
        interval.as_secs()
    );
    let stdin = BufReader::new(tokio::io::stdin());
    run_monitor_with(session, interval, mode, sink, stdin, shutdown_signal()).await?;
    println!("👋 Au revoir !");
    Ok(())
}

/// Same as [`run_monitor`] reading commands from `input`. Ends on `quit`,
/// end of input or `shutdown`.
///
/// # Errors
///
/// Returns an error if a session is already running.
pub async fn run_monitor_with<R>(
    session: &MonitoringSession,
    interval: Duration,
    mode: DetectionMode,
    sink: Arc<dyn ReportSink>,
    input: R,
    shutdown: impl Future<Output = ()>,
) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
{
    session.start(interval, mode, Some(sink))?;
    let service = Arc::clone(session.service());
    let mut lines = input.lines();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let line = match line {
                    Ok(Some(line)) => line,
                    Ok(None) => break,
                    Err(e) => {
                        tracing::warn!("Lecture de l'entrée impossible : {e}");
                        break;
                    }
                };
                match parse_command(&line) {
                    Some(MonitorCommand::Quit) => break,
                    Some(command) => execute(&service, &command, mode).await,
                    None => {}
                }
            }
            () = &mut shutdown => break,
        }
    }

    session.stop().await?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::domain::entities::{CpuMetrics, MetricsSnapshot};
    use crate::domain::ports::collector::{CollectionError, MetricsProvider};
    use crate::domain::value_objects::ThresholdSet;
    use crate::infrastructure::sinks::console::ConsoleSink;
    use colored::control;

    struct CountingProvider(Arc<AtomicUsize>);

    impl MetricsProvider for CountingProvider {
        fn collect(&self) -> Result<MetricsSnapshot, CollectionError> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(MetricsSnapshot {
                cpu: Some(CpuMetrics {
                    percent: 97.0,
                    logical_count: 2,
                    ..CpuMetrics::default()
                }),
                ..MetricsSnapshot::default()
            })
        }
    }

    fn session(calls: &Arc<AtomicUsize>) -> MonitoringSession {
        let service = MonitorService::new(
            Arc::new(CountingProvider(Arc::clone(calls))),
            ThresholdSet::default(),
            10,
        );
        MonitoringSession::new(Arc::new(service), Arc::new(ConsoleSink::new()))
    }

    #[test]
    fn parses_commands() {
        assert_eq!(parse_command("  STATS \n"), Some(MonitorCommand::Stats));
        assert_eq!(parse_command("scan"), Some(MonitorCommand::Scan));
        assert_eq!(parse_command("q"), Some(MonitorCommand::Quit));
        assert_eq!(parse_command("?"), Some(MonitorCommand::Help));
        assert_eq!(parse_command("   "), None);
        assert_eq!(
            parse_command("reboot"),
            Some(MonitorCommand::Unknown("reboot".into()))
        );
    }

    #[test]
    fn summary_sink_never_fails() {
        control::set_override(false);
        let report = crate::domain::entities::report::fixtures::report();
        assert!(SummarySink.deliver(&report).is_ok());
        assert!(SummarySink.record_error("boom").is_ok());
    }

    #[tokio::test]
    async fn commands_run_until_quit() {
        control::set_override(false);
        let calls = Arc::new(AtomicUsize::new(0));
        let session = session(&calls);
        let input: &[u8] = b"stats\n\nscan\nbogus\nquit\nscan\n";

        run_monitor_with(
            &session,
            Duration::from_secs(60),
            DetectionMode::Basic,
            Arc::new(SummarySink),
            input,
            std::future::pending::<()>(),
        )
        .await
        .expect("monitor");

        assert!(!session.is_running());
        // the scan after quit is never executed
        let total = calls.load(Ordering::SeqCst);
        assert!((1..=2).contains(&total), "unexpected collect count {total}");
    }

    #[tokio::test]
    async fn end_of_input_stops_session() {
        let calls = Arc::new(AtomicUsize::new(0));
        let session = session(&calls);
        let input: &[u8] = b"";
        run_monitor_with(
            &session,
            Duration::from_secs(60),
            DetectionMode::Extended,
            Arc::new(SummarySink),
            input,
            std::future::pending::<()>(),
        )
        .await
        .expect("monitor");
        assert!(!session.is_running());
    }

    #[tokio::test]
    async fn shutdown_signal_stops_session() {
        let calls = Arc::new(AtomicUsize::new(0));
        let session = session(&calls);
        let (_tx, rx) = tokio::io::duplex(64);
        run_monitor_with(
            &session,
            Duration::from_secs(60),
            DetectionMode::Basic,
            Arc::new(SummarySink),
            BufReader::new(rx),
            tokio::time::sleep(Duration::from_millis(50)),
        )
        .await
        .expect("monitor");
        assert!(!session.is_running());
    }
}
