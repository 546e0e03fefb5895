use crate::domain::entities::{Anomaly, MetricsSnapshot};
use crate::domain::value_objects::{AnomalyKind, Severity, ThresholdSet};

use super::{count, Rule};

/// Only the head of each top list is inspected for hogs
pub const HOG_SCAN_DEPTH: usize = 5;

pub struct ZombieProcessRule;

impl Rule for ZombieProcessRule {
    fn name(&self) -> &'static str {
        "zombie_processes"
    }

    fn evaluate(&self, snapshot: &MetricsSnapshot, thresholds: &ThresholdSet) -> Vec<Anomaly> {
        let Some(procs) = &snapshot.processes else {
            return vec![];
        };
        let bound = thresholds.zombie_processes.warning;
        if count(procs.zombie) >= bound {
            vec![Anomaly::new(
                AnomalyKind::ZombieProcesses,
                Severity::Warning,
                count(procs.zombie),
                bound,
                format!(
                    "Processus zombies détectés : {} processus (seuil {bound:.0})",
                    procs.zombie
                ),
            )]
        } else {
            vec![]
        }
    }
}

pub struct ProcessCountRule;

impl Rule for ProcessCountRule {
    fn name(&self) -> &'static str {
        "process_count"
    }

    fn evaluate(&self, snapshot: &MetricsSnapshot, thresholds: &ThresholdSet) -> Vec<Anomaly> {
        let Some(procs) = &snapshot.processes else {
            return vec![];
        };
        let bound = thresholds.process_count.warning;
        if count(procs.total) > bound {
            vec![Anomaly::new(
                AnomalyKind::TooManyProcesses,
                Severity::Info,
                count(procs.total),
                bound,
                format!(
                    "Nombre élevé de processus : {} (seuil {bound:.0})",
                    procs.total
                ),
            )]
        } else {
            vec![]
        }
    }
}

/// One anomaly per process in the CPU top list above the per-process bound
pub struct ProcessCpuRule;

impl Rule for ProcessCpuRule {
    fn name(&self) -> &'static str {
        "process_cpu"
    }

    fn evaluate(&self, snapshot: &MetricsSnapshot, thresholds: &ThresholdSet) -> Vec<Anomaly> {
        let bound = thresholds.process_cpu.warning;
        snapshot
            .top_cpu_processes()
            .iter()
            .take(HOG_SCAN_DEPTH)
            .filter(|p| p.cpu_percent > bound)
            .map(|p| {
                Anomaly::new(
                    AnomalyKind::ProcessCpuHigh,
                    Severity::Warning,
                    p.cpu_percent,
                    bound,
                    format!(
                        "Processus gourmand en CPU : {} ({:.1}%, seuil {bound:.1}%)",
                        p.name, p.cpu_percent
                    ),
                )
                .with_process(p.reference())
            })
            .collect()
    }
}

/// One anomaly per process in the memory top list above the per-process bound
pub struct ProcessMemoryRule;

impl Rule for ProcessMemoryRule {
    fn name(&self) -> &'static str {
        "process_memory"
    }

    fn evaluate(&self, snapshot: &MetricsSnapshot, thresholds: &ThresholdSet) -> Vec<Anomaly> {
        let bound = thresholds.process_memory.warning;
        snapshot
            .top_memory_processes()
            .iter()
            .take(HOG_SCAN_DEPTH)
            .filter(|p| p.memory_percent > bound)
            .map(|p| {
                Anomaly::new(
                    AnomalyKind::ProcessMemoryHigh,
                    Severity::Warning,
                    p.memory_percent,
                    bound,
                    format!(
                        "Processus gourmand en mémoire : {} ({:.1}%, seuil {bound:.1}%)",
                        p.name, p.memory_percent
                    ),
                )
                .with_process(p.reference())
            })
            .collect()
    }
}
