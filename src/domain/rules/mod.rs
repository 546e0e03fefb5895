pub mod cpu;
pub mod disk;
pub mod memory;
pub mod network;
pub mod processes;
pub mod security;
pub mod system;

use crate::domain::entities::{Anomaly, MetricsSnapshot};
use crate::domain::value_objects::{DetectionMode, Severity, ThresholdSet, TierBounds};

/// A deterministic check that turns a snapshot into anomalies.
/// Rules are pure: snapshot + thresholds in, anomalies out. No I/O.
pub trait Rule: Send + Sync {
    /// Returns the unique name of this rule
    fn name(&self) -> &'static str;

    /// Evaluates the rule against a snapshot using the given thresholds
    fn evaluate(&self, snapshot: &MetricsSnapshot, thresholds: &ThresholdSet) -> Vec<Anomaly>;
}

/// Rules of the basic classifier: CPU, memory, disk, network and process
/// counts, tiered thresholds only.
#[must_use]
pub fn basic_rules() -> Vec<Box<dyn Rule>> {
    vec![
        Box::new(cpu::CpuTierRule),
        Box::new(memory::MemoryTierRule),
        Box::new(memory::SwapTierRule),
        Box::new(disk::DiskTierRule),
        Box::new(network::NetworkErrorsRule),
        Box::new(network::PacketLossRule),
        Box::new(processes::ZombieProcessRule),
        Box::new(processes::ProcessCountRule),
    ]
}

/// Rules of the extended classifier, in emission order
#[must_use]
pub fn extended_rules() -> Vec<Box<dyn Rule>> {
    vec![
        Box::new(cpu::CpuTierRule),
        Box::new(cpu::CpuSpikeRule),
        Box::new(cpu::CpuImbalanceRule),
        Box::new(cpu::CpuThrottlingRule),
        Box::new(memory::MemoryTierRule),
        Box::new(memory::MemoryLeakRule),
        Box::new(memory::SwapTierRule),
        Box::new(system::LoadAverageRule),
        Box::new(cpu::CpuOverclockRule),
        Box::new(disk::DiskTierRule),
        Box::new(disk::DiskSpaceLowRule),
        Box::new(disk::DiskIoRule),
        Box::new(disk::FileHandlesRule),
        Box::new(network::NetworkErrorsRule),
        Box::new(network::PacketLossRule),
        Box::new(network::BandwidthRule),
        Box::new(network::ConnectionsRule),
        Box::new(processes::ZombieProcessRule),
        Box::new(processes::ProcessCountRule),
        Box::new(processes::ProcessCpuRule),
        Box::new(processes::ProcessMemoryRule),
        Box::new(security::SuspiciousProcessRule),
        Box::new(system::UptimeRule),
        Box::new(system::InterruptsRule),
    ]
}

/// Runs a fixed list of rules against snapshots.
///
/// Output keeps rule order then per-rule emission order. It is never
/// re-sorted here; consumers that want critical-first use
/// [`crate::domain::entities::anomaly::sort_by_severity`].
pub struct Classifier {
    mode: DetectionMode,
    rules: Vec<Box<dyn Rule>>,
}

impl Classifier {
    #[must_use]
    pub fn new(mode: DetectionMode, rules: Vec<Box<dyn Rule>>) -> Self {
        Self { mode, rules }
    }

    #[must_use]
    pub fn basic() -> Self {
        Self::new(DetectionMode::Basic, basic_rules())
    }

    #[must_use]
    pub fn extended() -> Self {
        Self::new(DetectionMode::Extended, extended_rules())
    }

    #[must_use]
    pub fn for_mode(mode: DetectionMode) -> Self {
        match mode {
            DetectionMode::Basic => Self::basic(),
            DetectionMode::Extended => Self::extended(),
        }
    }

    #[must_use]
    pub const fn mode(&self) -> DetectionMode {
        self.mode
    }

    #[must_use]
    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    #[must_use]
    pub fn classify(&self, snapshot: &MetricsSnapshot, thresholds: &ThresholdSet) -> Vec<Anomaly> {
        self.rules
            .iter()
            .flat_map(|rule| rule.evaluate(snapshot, thresholds))
            .collect()
    }
}

/// Critical bound is checked first; a critical hit suppresses the warning tier.
/// Returns the tier severity and the bound that was crossed.
pub(crate) fn tier_of(value: f64, bounds: &TierBounds) -> Option<(Severity, f64)> {
    if let Some(critical) = bounds.critical {
        if value >= critical {
            return Some((Severity::Critical, critical));
        }
    }
    (value >= bounds.warning).then_some((Severity::Warning, bounds.warning))
}

#[allow(clippy::cast_precision_loss)]
pub(crate) fn count(value: u64) -> f64 {
    value as f64
}
