use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use itmon::application::config::AppConfig;
use itmon::application::services::monitor::MonitorService;
use itmon::application::services::session::MonitoringSession;
use itmon::domain::ports::sink::ReportSink;
use itmon::domain::value_objects::DetectionMode;
use itmon::infrastructure::collectors::sysinfo_collector::SysinfoCollector;
use itmon::infrastructure::export::ReportExporter;
use itmon::infrastructure::persistence::toml_store::TomlThresholdStore;
use itmon::infrastructure::sinks::composite::CompositeSink;
use itmon::infrastructure::sinks::console::ConsoleSink;
use itmon::infrastructure::sinks::log_file::LogFileSink;
use itmon::presentation::cli::app::{Cli, Commands};
use itmon::presentation::cli::commands::config::run_config;
use itmon::presentation::cli::commands::export::run_export;
use itmon::presentation::cli::commands::monitor::{run_monitor, SummarySink};
use itmon::presentation::cli::commands::scan::run_scan;
use itmon::presentation::cli::commands::status::run_status;
use itmon::presentation::cli::commands::top::run_top;
use itmon::presentation::cli::commands::watch::run_watch;

fn print_banner() {
    println!("{}", "━".repeat(40).cyan());
    println!("{}", "  ITMON — System Monitor".bold().cyan());
    println!("{}", "━".repeat(40).cyan());
}

fn setup_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

const fn resolve_mode(extended: bool, config_mode: DetectionMode) -> DetectionMode {
    if extended {
        DetectionMode::Extended
    } else {
        config_mode
    }
}

/// Sink list for looping commands: `primary` plus the optional log file.
fn sinks_with_log(primary: Arc<dyn ReportSink>, config: &AppConfig) -> Arc<dyn ReportSink> {
    let mut sinks = vec![primary];
    if let Some(ref path) = config.logging.log_file {
        sinks.push(Arc::new(LogFileSink::new(path)));
    }
    Arc::new(CompositeSink::new(sinks))
}

fn interval_or(interval: Option<u64>, config: &AppConfig) -> Duration {
    Duration::from_secs(interval.unwrap_or(config.general.interval_secs).max(1))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_tracing(cli.verbose);

    // Load configuration; unreadable files fall back to defaults
    let config = AppConfig::load_or_default(cli.config.as_deref());
    let config_path: PathBuf = match cli.config {
        Some(ref path) => path.clone(),
        None => AppConfig::config_path()?,
    };

    // Concrete adapters are wired here and nowhere else
    let collector = Arc::new(SysinfoCollector::new());
    let store = Arc::new(TomlThresholdStore::new(&config_path));
    let service = Arc::new(
        MonitorService::new(
            collector,
            config.thresholds.clone(),
            config.general.history_size,
        )
        .with_store(store),
    );
    let default_mode = config.general.detection_mode;

    match cli.command.unwrap_or(Commands::Status { json: false }) {
        Commands::Status { json } => {
            let service = Arc::clone(&service);
            tokio::task::spawn_blocking(move || run_status(&service, json)).await??;
        }
        Commands::Scan { extended, json } => {
            let mode = resolve_mode(extended, default_mode);
            let service = Arc::clone(&service);
            tokio::task::spawn_blocking(move || run_scan(&service, mode, json)).await??;
        }
        Commands::Watch { interval, extended } => {
            print_banner();
            let sink = sinks_with_log(Arc::new(ConsoleSink::new()), &config);
            let session = MonitoringSession::new(Arc::clone(&service), sink);
            run_watch(
                &session,
                interval_or(interval, &config),
                resolve_mode(extended, default_mode),
            )
            .await?;
        }
        Commands::Monitor { interval, extended } => {
            print_banner();
            let session = MonitoringSession::new(
                Arc::clone(&service),
                sinks_with_log(Arc::new(ConsoleSink::new()), &config),
            );
            run_monitor(
                &session,
                interval_or(interval, &config),
                resolve_mode(extended, default_mode),
                sinks_with_log(Arc::new(SummarySink), &config),
            )
            .await?;
        }
        Commands::Export {
            format,
            output,
            extended,
        } => {
            let mode = resolve_mode(extended, default_mode);
            let exporter = ReportExporter::new(config.output_dir());
            let service = Arc::clone(&service);
            tokio::task::spawn_blocking(move || {
                run_export(&service, exporter, &format, output.as_deref(), mode)
            })
            .await??;
        }
        Commands::Top { by, limit } => {
            let service = Arc::clone(&service);
            tokio::task::spawn_blocking(move || run_top(&service, by, limit)).await??;
        }
        Commands::Config { action } => {
            run_config(action, &config, &config_path, &service)?;
        }
    }

    Ok(())
}
