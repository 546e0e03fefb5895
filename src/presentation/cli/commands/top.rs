use anyhow::Context;

use crate::application::services::monitor::MonitorService;
use crate::presentation::cli::formatters::status_fmt::print_section_header;
use crate::presentation::cli::formatters::table_fmt::{format_process_table, SortKey};

/// Prints the heaviest processes by `by`.
///
/// # Errors
///
/// Returns an error if metrics collection fails.
pub fn run_top(service: &MonitorService, by: SortKey, limit: usize) -> anyhow::Result<()> {
    let snapshot = service
        .collect()
        .context("Échec de la collecte des processus")?;

    let (title, processes) = match by {
        SortKey::Cpu => ("🔥 Top processus - CPU", snapshot.top_cpu_processes()),
        SortKey::Memory => ("💾 Top processus - Mémoire", snapshot.top_memory_processes()),
    };

    print_section_header(title);
    if processes.is_empty() {
        println!("Aucun processus actif à afficher");
    } else {
        println!("{}", format_process_table(processes, by, limit));
    }
    if let Some(p) = &snapshot.processes {
        println!("\n{} processus au total, {} zombie(s)", p.total, p.zombie);
    }
    Ok(())
}

#[cfg(test)]
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
            let entry = ProcessEntry {
                pid: 7,
                name: "worker".into(),
                cpu_percent: 30.0,
                memory_percent: 4.0,
                user: None,
            };
            Ok(MetricsSnapshot {
                processes: Some(ProcessMetrics {
                    total: 42,
                    top_by_cpu: vec![entry],
                    ..ProcessMetrics::default()
                }),
                ..MetricsSnapshot::default()
            })
        }
    }

    struct FailingProvider;

    impl MetricsProvider for FailingProvider {
        fn collect(&self) -> Result<MetricsSnapshot, CollectionError> {
            Err(CollectionError::PermissionDenied("/proc".into()))
        }
    }

    #[test]
    fn top_by_cpu_and_memory() {
        control::set_override(false);
        let service = MonitorService::new(Arc::new(MockProvider), ThresholdSet::default(), 10);
        assert!(run_top(&service, SortKey::Cpu, 5).is_ok());
        assert!(run_top(&service, SortKey::Memory, 5).is_ok());
    }

    #[test]
    fn top_collection_failure() {
        let service = MonitorService::new(Arc::new(FailingProvider), ThresholdSet::default(), 10);
        assert!(run_top(&service, SortKey::Cpu, 5).is_err());
    }
}
