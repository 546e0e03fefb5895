use crate::application::services::monitor::MonitorService;
use crate::domain::entities::Report;
use crate::domain::value_objects::DetectionMode;
use crate::infrastructure::sinks::console::render_report;
use crate::presentation::cli::formatters::alert_fmt;
use crate::presentation::cli::formatters::status_fmt::print_section_header;

/// Runs a one-shot pass: collect metrics, classify, explain, display.
///
/// # Errors
///
/// Returns an error if metrics collection fails or JSON serialization fails.
pub fn run_scan(service: &MonitorService, mode: DetectionMode, json: bool) -> anyhow::Result<()> {
    tracing::debug!(rules = ?service.classifier(mode).rule_names(), "scan {mode}");
    let report = service.run_once(mode)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report_human(&report);
    }

    Ok(())
}

fn print_report_human(report: &Report) {
    let title = match report.detection_mode {
        DetectionMode::Basic => "🔍 Scan système",
        DetectionMode::Extended => "🔍 Scan système étendu",
    };
    print_section_header(title);
    if report.is_healthy() {
        alert_fmt::print_no_anomalies();
    } else {
        print!("{}", render_report(report));
    }
}
