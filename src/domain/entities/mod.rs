pub mod anomaly;
pub mod host;
pub mod process;
pub mod recommendation;
pub mod report;
pub mod root_cause;
pub mod snapshot;

pub use anomaly::{Anomaly, AnomalySummary};
pub use host::HostInfo;
pub use process::{ProcessEntry, ProcessRef};
pub use recommendation::Recommendation;
pub use report::{AnomalyAnalysis, Report};
pub use root_cause::RootCause;
pub use snapshot::{
    CpuFrequency, CpuMetrics, CpuStats, DiskIo, DiskMetrics, LoadAverage, MemoryMetrics,
    MetricsSnapshot, NetworkMetrics, PartitionUsage, ProcessMetrics, SwapMetrics, SystemMetrics,
};
