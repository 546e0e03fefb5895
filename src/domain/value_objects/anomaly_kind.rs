use serde::{Deserialize, Serialize};

use super::Category;

/// Every anomaly the classifiers can emit
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AnomalyKind {
    CpuCritical,
    CpuHigh,
    CpuSpike,
    CpuImbalance,
    CpuThrottling,
    CpuOverclock,
    MemoryCritical,
    MemoryHigh,
    MemoryLeakSuspected,
    SwapCritical,
    SwapHigh,
    LoadAverageHigh,
    TooManyProcesses,
    DiskCritical,
    DiskFull,
    DiskSpaceLow,
    DiskReadHigh,
    DiskWriteHigh,
    FileHandlesHigh,
    NetworkErrors,
    NetworkPacketLoss,
    NetworkBandwidthHigh,
    NetworkConnectionsHigh,
    NetworkTimeWaitHigh,
    ZombieProcesses,
    ProcessCpuHigh,
    ProcessMemoryHigh,
    SuspiciousProcess,
    SystemUptimeVeryLong,
    SystemInterruptsHigh,
}

impl AnomalyKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CpuCritical => "cpu_critical",
            Self::CpuHigh => "cpu_high",
            Self::CpuSpike => "cpu_spike",
            Self::CpuImbalance => "cpu_imbalance",
            Self::CpuThrottling => "cpu_throttling",
            Self::CpuOverclock => "cpu_overclock",
            Self::MemoryCritical => "memory_critical",
            Self::MemoryHigh => "memory_high",
            Self::MemoryLeakSuspected => "memory_leak_suspected",
            Self::SwapCritical => "swap_critical",
            Self::SwapHigh => "swap_high",
            Self::LoadAverageHigh => "load_average_high",
            Self::TooManyProcesses => "too_many_processes",
            Self::DiskCritical => "disk_critical",
            Self::DiskFull => "disk_full",
            Self::DiskSpaceLow => "disk_space_low",
            Self::DiskReadHigh => "disk_read_high",
            Self::DiskWriteHigh => "disk_write_high",
            Self::FileHandlesHigh => "file_handles_high",
            Self::NetworkErrors => "network_errors",
            Self::NetworkPacketLoss => "network_packet_loss",
            Self::NetworkBandwidthHigh => "network_bandwidth_high",
            Self::NetworkConnectionsHigh => "network_connections_high",
            Self::NetworkTimeWaitHigh => "network_time_wait_high",
            Self::ZombieProcesses => "zombie_processes",
            Self::ProcessCpuHigh => "process_cpu_high",
            Self::ProcessMemoryHigh => "process_memory_high",
            Self::SuspiciousProcess => "suspicious_process",
            Self::SystemUptimeVeryLong => "system_uptime_very_long",
            Self::SystemInterruptsHigh => "system_interrupts_high",
        }
    }

    /// Fixed category of each kind
    #[must_use]
    pub const fn category(self) -> Category {
        match self {
            Self::CpuCritical
            | Self::CpuHigh
            | Self::CpuSpike
            | Self::CpuImbalance
            | Self::CpuThrottling
            | Self::CpuOverclock
            | Self::MemoryCritical
            | Self::MemoryHigh
            | Self::MemoryLeakSuspected
            | Self::SwapCritical
            | Self::SwapHigh
            | Self::LoadAverageHigh
            | Self::TooManyProcesses => Category::Performance,
            Self::DiskCritical
            | Self::DiskFull
            | Self::DiskSpaceLow
            | Self::DiskReadHigh
            | Self::DiskWriteHigh
            | Self::FileHandlesHigh => Category::Storage,
            Self::NetworkErrors
            | Self::NetworkPacketLoss
            | Self::NetworkBandwidthHigh
            | Self::NetworkConnectionsHigh
            | Self::NetworkTimeWaitHigh => Category::Network,
            Self::ZombieProcesses => Category::Stability,
            Self::ProcessCpuHigh | Self::ProcessMemoryHigh => Category::Processes,
            Self::SuspiciousProcess => Category::Security,
            Self::SystemUptimeVeryLong | Self::SystemInterruptsHigh => Category::System,
        }
    }

    /// True for the critical tier of a two-tier resource
    #[must_use]
    pub const fn is_critical_tier(self) -> bool {
        matches!(
            self,
            Self::CpuCritical | Self::MemoryCritical | Self::SwapCritical | Self::DiskCritical
        )
    }
}

impl std::fmt::Display for AnomalyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
