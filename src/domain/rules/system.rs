use crate::domain::entities::{Anomaly, MetricsSnapshot};
use crate::domain::value_objects::{AnomalyKind, Severity, ThresholdSet};

use super::{count, Rule};

pub const UPTIME_LIMIT_DAYS: f64 = 365.0;
pub const INTERRUPTS_LIMIT: u64 = 1_000_000;
const SECONDS_PER_DAY: f64 = 86_400.0;

/// One-minute load compared to `load_average` times the logical CPU count.
/// Without a CPU record the count is taken as one.
pub struct LoadAverageRule;

impl Rule for LoadAverageRule {
    fn name(&self) -> &'static str {
        "load_average"
    }

    fn evaluate(&self, snapshot: &MetricsSnapshot, thresholds: &ThresholdSet) -> Vec<Anomaly> {
        let Some(load) = snapshot.system.as_ref().and_then(|s| s.load_average) else {
            return vec![];
        };
        let cpus = snapshot
            .cpu
            .as_ref()
            .map_or(1, |c| c.logical_count.max(c.per_core.len()))
            .max(1);
        let bound = count(cpus as u64) * thresholds.load_average.warning;
        if load.one > bound {
            vec![Anomaly::new(
                AnomalyKind::LoadAverageHigh,
                Severity::Warning,
                load.one,
                bound,
                format!(
                    "Charge système élevée : {:.2} (seuil {bound:.1} pour {cpus} CPU)",
                    load.one
                ),
            )]
        } else {
            vec![]
        }
    }
}

pub struct UptimeRule;

impl Rule for UptimeRule {
    fn name(&self) -> &'static str {
        "system_uptime"
    }

    fn evaluate(&self, snapshot: &MetricsSnapshot, _thresholds: &ThresholdSet) -> Vec<Anomaly> {
        let Some(system) = &snapshot.system else {
            return vec![];
        };
        let days = count(system.uptime_seconds) / SECONDS_PER_DAY;
        if days > UPTIME_LIMIT_DAYS {
            vec![Anomaly::new(
                AnomalyKind::SystemUptimeVeryLong,
                Severity::Info,
                days,
                UPTIME_LIMIT_DAYS,
                format!("Système en fonctionnement depuis {days:.1} jours - Redémarrage recommandé"),
            )]
        } else {
            vec![]
        }
    }
}

pub struct InterruptsRule;

impl Rule for InterruptsRule {
    fn name(&self) -> &'static str {
        "system_interrupts"
    }

    fn evaluate(&self, snapshot: &MetricsSnapshot, _thresholds: &ThresholdSet) -> Vec<Anomaly> {
        let Some(stats) = snapshot.cpu.as_ref().and_then(|c| c.stats) else {
            return vec![];
        };
        if stats.interrupts > INTERRUPTS_LIMIT {
            vec![Anomaly::new(
                AnomalyKind::SystemInterruptsHigh,
                Severity::Info,
                count(stats.interrupts),
                count(INTERRUPTS_LIMIT),
                format!(
                    "Nombre élevé d'interruptions système : {} (seuil {INTERRUPTS_LIMIT})",
                    stats.interrupts
                ),
            )]
        } else {
            vec![]
        }
    }
}
