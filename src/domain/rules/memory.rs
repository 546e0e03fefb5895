use crate::domain::entities::{Anomaly, MetricsSnapshot};
use crate::domain::value_objects::{AnomalyKind, Severity, ThresholdSet};

use super::{tier_of, Rule};

/// Available memory below this many GB, combined with high usage, suggests a leak
pub const LEAK_AVAILABLE_GB: f64 = 1.0;

pub struct MemoryTierRule;

impl Rule for MemoryTierRule {
    fn name(&self) -> &'static str {
        "memory_tier"
    }

    fn evaluate(&self, snapshot: &MetricsSnapshot, thresholds: &ThresholdSet) -> Vec<Anomaly> {
        let Some(mem) = &snapshot.memory else {
            return vec![];
        };
        match tier_of(mem.percent, &thresholds.memory) {
            Some((Severity::Critical, bound)) => vec![Anomaly::new(
                AnomalyKind::MemoryCritical,
                Severity::Critical,
                mem.percent,
                bound,
                format!(
                    "Mémoire critique à {:.1}% (seuil {bound:.1}%) - Risque de crash système",
                    mem.percent
                ),
            )],
            Some((severity, bound)) => vec![Anomaly::new(
                AnomalyKind::MemoryHigh,
                severity,
                mem.percent,
                bound,
                format!(
                    "Utilisation mémoire élevée : {:.1}% (seuil {bound:.1}%)",
                    mem.percent
                ),
            )],
            None => vec![],
        }
    }
}

pub struct MemoryLeakRule;

impl Rule for MemoryLeakRule {
    fn name(&self) -> &'static str {
        "memory_leak"
    }

    fn evaluate(&self, snapshot: &MetricsSnapshot, thresholds: &ThresholdSet) -> Vec<Anomaly> {
        let Some(mem) = &snapshot.memory else {
            return vec![];
        };
        if mem.percent >= thresholds.memory_leak && mem.available_gb < LEAK_AVAILABLE_GB {
            vec![Anomaly::new(
                AnomalyKind::MemoryLeakSuspected,
                Severity::Warning,
                mem.available_gb,
                LEAK_AVAILABLE_GB,
                format!(
                    "Fuite mémoire suspectée : seulement {:.2} GB disponibles (RAM à {:.1}%)",
                    mem.available_gb, mem.percent
                ),
            )]
        } else {
            vec![]
        }
    }
}

/// Swap is tiered independently of RAM
pub struct SwapTierRule;

impl Rule for SwapTierRule {
    fn name(&self) -> &'static str {
        "swap_tier"
    }

    fn evaluate(&self, snapshot: &MetricsSnapshot, thresholds: &ThresholdSet) -> Vec<Anomaly> {
        let Some(swap) = snapshot.memory.as_ref().and_then(|m| m.swap) else {
            return vec![];
        };
        match tier_of(swap.percent, &thresholds.swap) {
            Some((Severity::Critical, bound)) => vec![Anomaly::new(
                AnomalyKind::SwapCritical,
                Severity::Critical,
                swap.percent,
                bound,
                format!(
                    "Utilisation SWAP critique : {:.1}% (seuil {bound:.1}%) - Performances très dégradées",
                    swap.percent
                ),
            )],
            Some((severity, bound)) => vec![Anomaly::new(
                AnomalyKind::SwapHigh,
                severity,
                swap.percent,
                bound,
                format!(
                    "Utilisation SWAP élevée : {:.1}% (seuil {bound:.1}%) - Performances dégradées",
                    swap.percent
                ),
            )],
            None => vec![],
        }
    }
}
