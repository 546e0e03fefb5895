use std::path::PathBuf;

use anyhow::Context;
use colored::Colorize;

use crate::application::services::monitor::MonitorService;
use crate::domain::value_objects::DetectionMode;
use crate::infrastructure::export::{ExportFormat, ReportExporter};

/// Runs one pass and writes its report with `exporter`.
///
/// # Errors
///
/// Returns an error for an unknown format, a failed collection or an
/// unwritable target.
pub fn run_export(
    service: &MonitorService,
    exporter: ReportExporter,
    format: &str,
    output: Option<&str>,
    mode: DetectionMode,
) -> anyhow::Result<PathBuf> {
    let format: ExportFormat = format.parse()?;
    let report = service
        .run_once(mode)
        .context("Échec de la collecte des métriques système")?;

    let path = exporter
        .with_host(service.host_info())
        .export(&report, format, output)?;
    println!("{} {}", "✅ Rapport exporté :".green().bold(), path.display());
    Ok(path)
}
