use std::path::Path;

use colored::Colorize;

use crate::application::config::AppConfig;
use crate::application::services::monitor::MonitorService;
use crate::domain::value_objects::{Level, Resource, ThresholdSet};
use crate::presentation::cli::app::ConfigAction;
use crate::presentation::cli::formatters::status_fmt::print_section_header;

/// Dispatches a `config` subcommand. Threshold changes go through the
/// service so they are validated and written back to `config_path`.
///
/// # Errors
///
/// Returns an error for an unknown resource or level, a rejected value,
/// or a failed write-back.
pub fn run_config(
    action: Option<ConfigAction>,
    config: &AppConfig,
    config_path: &Path,
    service: &MonitorService,
) -> anyhow::Result<()> {
    match action.unwrap_or(ConfigAction::Show) {
        ConfigAction::Show => show(config, config_path, &service.thresholds()),
        ConfigAction::Reset => {
            service.replace_thresholds(ThresholdSet::default())?;
            println!("{}", "✅ Seuils réinitialisés aux valeurs par défaut".green());
            Ok(())
        }
        ConfigAction::SetThreshold {
            resource,
            level,
            value,
        } => {
            let resource: Resource = resource.parse()?;
            let level: Level = level.parse()?;
            service.set_threshold(resource, level, value)?;
            println!(
                "{} {resource}.{level} = {value}",
                "✅ Seuil mis à jour :".green()
            );
            Ok(())
        }
    }
}

fn show(config: &AppConfig, config_path: &Path, thresholds: &ThresholdSet) -> anyhow::Result<()> {
    print_section_header("⚙️  Configuration");
    println!("Fichier : {}", config_path.display());
    println!(
        "Intervalle : {}s | Historique : {} passes | Mode : {}",
        config.general.interval_secs, config.general.history_size, config.general.detection_mode
    );
    println!("Exports : {}", config.output_dir().display());
    if let Some(log) = &config.logging.log_file {
        println!("Journal : {log}");
    }

    print_section_header("\nSeuils actuels");
    for (resource, level, value) in thresholds.entries() {
        println!("  {:<18} {:<9} {value}", resource.as_str(), level.to_string());
    }

    tracing::debug!("{}", toml::to_string_pretty(config)?);
    Ok(())
}
