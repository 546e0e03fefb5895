use crate::domain::entities::{Anomaly, MetricsSnapshot};
use crate::domain::value_objects::{AnomalyKind, Severity, ThresholdSet};

use super::{tier_of, Rule};

/// Spread between the busiest and idlest core that counts as an imbalance
pub const IMBALANCE_SPREAD: f64 = 50.0;
/// Current frequency below this share of max is throttling
pub const THROTTLE_RATIO: f64 = 0.5;
/// Current frequency above this share of max is overclocking
pub const OVERCLOCK_RATIO: f64 = 1.1;

pub struct CpuTierRule;

impl Rule for CpuTierRule {
    fn name(&self) -> &'static str {
        "cpu_tier"
    }

    fn evaluate(&self, snapshot: &MetricsSnapshot, thresholds: &ThresholdSet) -> Vec<Anomaly> {
        let Some(cpu) = &snapshot.cpu else {
            return vec![];
        };
        match tier_of(cpu.percent, &thresholds.cpu) {
            Some((Severity::Critical, bound)) => vec![Anomaly::new(
                AnomalyKind::CpuCritical,
                Severity::Critical,
                cpu.percent,
                bound,
                format!(
                    "CPU critique à {:.1}% (seuil {bound:.1}%) - Action immédiate requise",
                    cpu.percent
                ),
            )],
            Some((severity, bound)) => vec![Anomaly::new(
                AnomalyKind::CpuHigh,
                severity,
                cpu.percent,
                bound,
                format!(
                    "Utilisation CPU élevée : {:.1}% (seuil {bound:.1}%)",
                    cpu.percent
                ),
            )],
            None => vec![],
        }
    }
}

pub struct CpuSpikeRule;

impl Rule for CpuSpikeRule {
    fn name(&self) -> &'static str {
        "cpu_spike"
    }

    fn evaluate(&self, snapshot: &MetricsSnapshot, thresholds: &ThresholdSet) -> Vec<Anomaly> {
        let Some(cpu) = &snapshot.cpu else {
            return vec![];
        };
        if cpu.percent >= thresholds.cpu_spike {
            vec![Anomaly::new(
                AnomalyKind::CpuSpike,
                Severity::Warning,
                cpu.percent,
                thresholds.cpu_spike,
                format!(
                    "Pic CPU détecté : {:.1}% (seuil {:.1}%) - Charge soudaine",
                    cpu.percent, thresholds.cpu_spike
                ),
            )]
        } else {
            vec![]
        }
    }
}

pub struct CpuImbalanceRule;

impl Rule for CpuImbalanceRule {
    fn name(&self) -> &'static str {
        "cpu_imbalance"
    }

    fn evaluate(&self, snapshot: &MetricsSnapshot, _thresholds: &ThresholdSet) -> Vec<Anomaly> {
        let Some(cpu) = &snapshot.cpu else {
            return vec![];
        };
        if cpu.per_core.len() < 2 {
            return vec![];
        }
        let max = cpu.per_core.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let min = cpu.per_core.iter().copied().fold(f64::INFINITY, f64::min);
        let spread = max - min;
        if spread > IMBALANCE_SPREAD {
            vec![Anomaly::new(
                AnomalyKind::CpuImbalance,
                Severity::Info,
                spread,
                IMBALANCE_SPREAD,
                format!("Déséquilibre CPU : {max:.1}% max contre {min:.1}% min"),
            )]
        } else {
            vec![]
        }
    }
}

pub struct CpuThrottlingRule;

impl Rule for CpuThrottlingRule {
    fn name(&self) -> &'static str {
        "cpu_throttling"
    }

    fn evaluate(&self, snapshot: &MetricsSnapshot, _thresholds: &ThresholdSet) -> Vec<Anomaly> {
        let Some(freq) = snapshot.cpu.as_ref().and_then(|c| c.frequency) else {
            return vec![];
        };
        let floor = freq.max * THROTTLE_RATIO;
        if freq.current > 0.0 && freq.max > 0.0 && freq.current < floor {
            vec![Anomaly::new(
                AnomalyKind::CpuThrottling,
                Severity::Warning,
                freq.current,
                floor,
                format!(
                    "Bridage CPU détecté : {:.1} MHz (max {:.1} MHz)",
                    freq.current, freq.max
                ),
            )]
        } else {
            vec![]
        }
    }
}

pub struct CpuOverclockRule;

impl Rule for CpuOverclockRule {
    fn name(&self) -> &'static str {
        "cpu_overclock"
    }

    fn evaluate(&self, snapshot: &MetricsSnapshot, _thresholds: &ThresholdSet) -> Vec<Anomaly> {
        let Some(freq) = snapshot.cpu.as_ref().and_then(|c| c.frequency) else {
            return vec![];
        };
        if freq.current > 0.0 && freq.max > 0.0 && freq.current > freq.max * OVERCLOCK_RATIO {
            vec![Anomaly::new(
                AnomalyKind::CpuOverclock,
                Severity::Info,
                freq.current,
                freq.max,
                format!(
                    "Overclocking CPU détecté : {:.1} MHz (max {:.1} MHz)",
                    freq.current, freq.max
                ),
            )]
        } else {
            vec![]
        }
    }
}
