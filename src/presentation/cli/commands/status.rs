use anyhow::Context;
use colored::Colorize;

use crate::application::services::monitor::MonitorService;
use crate::domain::entities::Report;
use crate::domain::value_objects::DetectionMode;
use crate::infrastructure::export::json;
use crate::presentation::cli::formatters::status_fmt::{
    colorize_health, colorize_percent, format_host, format_uptime, print_section_header,
    progress_bar,
};
use crate::presentation::cli::formatters::table_fmt::{format_process_table, SortKey};

/// # Errors
///
/// Returns an error if system metrics collection or JSON serialization fails.
pub fn run_status(service: &MonitorService, json: bool) -> anyhow::Result<()> {
    let report = service
        .run_once(DetectionMode::Basic)
        .context("Échec de la collecte des métriques système")?;
    let host = service.host_info();

    if json {
        println!("{}", json::render(&report, Some(&host))?);
        return Ok(());
    }

    println!("{}", "itmon — État du système".bold().cyan());
    println!("{}", "━".repeat(50));
    print!("{}", format_host(&host));
    println!("\n  {}", colorize_health(report.health_score));

    print_metrics(&report);

    let top = report.metrics.top_memory_processes();
    if !top.is_empty() {
        print_section_header("\n📊 Top 5 processus (RAM)");
        println!("{}", format_process_table(top, SortKey::Memory, 5));
    }

    if let Some(processes) = &report.metrics.processes {
        if processes.zombie > 0 {
            println!(
                "\n{}",
                format!("🧟 {} processus zombie(s) détecté(s)", processes.zombie)
                    .red()
                    .bold()
            );
        }
    }

    if !report.is_healthy() {
        println!(
            "\n{} anomalie(s), lancez `itmon scan` pour le détail",
            report.anomalies.len()
        );
    }

    Ok(())
}

fn print_metrics(report: &Report) {
    let metrics = &report.metrics;

    if let Some(cpu) = &metrics.cpu {
        print_section_header("\n🖥️  CPU");
        println!(
            "  {} {} ({} cœurs)",
            progress_bar(cpu.percent, 30),
            colorize_percent(cpu.percent),
            cpu.logical_count
        );
        if let Some(freq) = cpu.frequency {
            println!("  Fréquence : {:.0} MHz (max {:.0} MHz)", freq.current, freq.max);
        }
    }
    if let Some(load) = metrics.system.as_ref().and_then(|s| s.load_average) {
        println!(
            "  Load average : {:.2} / {:.2} / {:.2}",
            load.one, load.five, load.fifteen
        );
    }

    if let Some(mem) = &metrics.memory {
        print_section_header("\n💾 Mémoire RAM");
        println!(
            "  {} {}",
            progress_bar(mem.percent, 30),
            colorize_percent(mem.percent)
        );
        println!(
            "  Utilisé : {:.1} Go / {:.1} Go (Disponible : {:.1} Go)",
            mem.used_gb, mem.total_gb, mem.available_gb
        );
        if let Some(swap) = mem.swap.filter(|s| s.total_gb > 0.0) {
            print_section_header("\n🔄 Swap");
            println!(
                "  {} {}",
                progress_bar(swap.percent, 30),
                colorize_percent(swap.percent)
            );
            println!("  Utilisé : {:.1} Go / {:.1} Go", swap.used_gb, swap.total_gb);
        }
    }

    if let Some(disk) = &metrics.disk {
        print_section_header("\n💿 Disques");
        for (mount, partition) in &disk.partitions {
            println!(
                "  {mount} {} {} ({:.1} Go libre)",
                progress_bar(partition.percent, 20),
                colorize_percent(partition.percent),
                partition.free_gb
            );
        }
        if disk.partitions.is_empty() {
            println!(
                "  {} {} ({:.1} Go libre)",
                progress_bar(disk.percent, 20),
                colorize_percent(disk.percent),
                disk.free_gb
            );
        }
    }

    if let Some(network) = &metrics.network {
        print_section_header("\n🌐 Réseau");
        println!(
            "  ↑ {:.2} Mo/s  ↓ {:.2} Mo/s  ({} connexions TCP)",
            network.sent_mb_s, network.recv_mb_s, network.connections_count
        );
    }

    if let Some(system) = &metrics.system {
        println!("\n  Uptime : {}", format_uptime(system.uptime_seconds));
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::domain::entities::{MetricsSnapshot, ProcessEntry, ProcessMetrics};
    use crate::domain::ports::collector::{CollectionError, MetricsProvider};
    use crate::domain::value_objects::ThresholdSet;
    use colored::control;

    struct MockProvider;

    impl MetricsProvider for MockProvider {
        fn collect(&self) -> Result<MetricsSnapshot, CollectionError> {
            Ok(MetricsSnapshot::from_json_lenient(
                r#"{"cpu": {"percent": 12.0, "logical_count": 4},
                    "memory": {"percent": 40.0, "total_gb": 16.0, "available_gb": 9.6, "used_gb": 6.4,
                               "swap": {"percent": 5.0, "total_gb": 2.0, "used_gb": 0.1}},
                    "disk": {"percent": 30.0, "free_gb": 100.0,
                             "partitions": {"/": {"filesystem": "ext4", "percent": 30.0, "free_gb": 100.0}}},
                    "system": {"uptime_seconds": 7200, "load_average": {"one": 0.5, "five": 0.4, "fifteen": 0.3}}}"#,
            )
            .map(|mut s| {
                s.processes = Some(ProcessMetrics {
                    zombie: 2,
                    top_by_memory: vec![ProcessEntry {
                        pid: 10,
                        name: "db".into(),
                        cpu_percent: 1.0,
                        memory_percent: 12.0,
                        user: None,
                    }],
                    ..ProcessMetrics::default()
                });
                s
            })
            .unwrap_or_default())
        }
    }

    struct FailingProvider;

    impl MetricsProvider for FailingProvider {
        fn collect(&self) -> Result<MetricsSnapshot, CollectionError> {
            Err(CollectionError::MetricsUnavailable("test error".into()))
        }
    }

    fn service(provider: Arc<dyn MetricsProvider>) -> MonitorService {
        MonitorService::new(provider, ThresholdSet::default(), 10)
    }

    #[test]
    fn status_human_output() {
        control::set_override(false);
        assert!(run_status(&service(Arc::new(MockProvider)), false).is_ok());
    }

    #[test]
    fn status_json_output() {
        control::set_override(false);
        assert!(run_status(&service(Arc::new(MockProvider)), true).is_ok());
    }

    #[test]
    fn status_collection_failure_is_error() {
        control::set_override(false);
        let err = run_status(&service(Arc::new(FailingProvider)), false).expect_err("fails");
        assert!(err.to_string().contains("Échec de la collecte"));
    }
}
