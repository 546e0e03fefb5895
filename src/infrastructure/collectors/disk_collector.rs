use std::collections::BTreeMap;
use std::sync::Mutex;

use sysinfo::Disks;

use crate::domain::entities::{DiskMetrics, PartitionUsage};
use crate::domain::ports::collector::CollectionError;

pub(super) const BYTES_PER_GB: f64 = 1_073_741_824.0;

/// Filesystem types to exclude from disk metrics.
const PSEUDO_FILESYSTEMS: &[&str] = &[
    "tmpfs",
    "devtmpfs",
    "sysfs",
    "proc",
    "cgroup2",
    "overlay",
    "squashfs",
    "efivarfs",
    "bpf",
    "hugetlbfs",
    "mqueue",
    "pstore",
    "securityfs",
    "debugfs",
    "tracefs",
    "fusectl",
    "rpc_pipefs",
];

/// Mount points preferred as the headline disk, in order
const PRIMARY_MOUNTS: &[&str] = &["/", "C:\\"];

/// Collects per-partition usage using the `sysinfo` crate.
///
/// Filters out pseudo-filesystems and zero-size disks. The headline
/// percent is that of the root partition (or the first one listed);
/// total and free space are summed over every partition.
pub struct DiskCollector {
    disks: Mutex<Disks>,
}

impl DiskCollector {
    /// Creates a new collector with a pre-refreshed disk list.
    #[must_use]
    pub fn new() -> Self {
        Self {
            disks: Mutex::new(Disks::new_with_refreshed_list()),
        }
    }

    /// Refreshes usage figures and aggregates them. I/O rates are left
    /// empty; the caller fills them in.
    ///
    /// # Errors
    ///
    /// Returns `CollectionError::Poisoned` if the internal mutex is poisoned.
    #[allow(clippy::cast_precision_loss)]
    pub fn collect(&self) -> Result<DiskMetrics, CollectionError> {
        let mut disks = self.disks.lock().map_err(|_| CollectionError::Poisoned)?;
        disks.refresh();

        let partitions: BTreeMap<String, PartitionUsage> = disks
            .iter()
            .filter(|d| {
                let fs = d.file_system().to_string_lossy();
                !PSEUDO_FILESYSTEMS.iter().any(|&pseudo| fs == pseudo) && d.total_space() > 0
            })
            .map(|disk| {
                let total = disk.total_space();
                let available = disk.available_space();
                let used = total.saturating_sub(available);
                let percent = ((used as f64 / total as f64) * 100.0).clamp(0.0, 100.0);

                (
                    disk.mount_point().to_string_lossy().to_string(),
                    PartitionUsage {
                        filesystem: disk.file_system().to_string_lossy().to_string(),
                        percent,
                        total_gb: total as f64 / BYTES_PER_GB,
                        free_gb: available as f64 / BYTES_PER_GB,
                    },
                )
            })
            .collect();

        Ok(aggregate(partitions))
    }
}

impl Default for DiskCollector {
    fn default() -> Self {
        Self::new()
    }
}

pub(super) fn aggregate(partitions: BTreeMap<String, PartitionUsage>) -> DiskMetrics {
    let primary = PRIMARY_MOUNTS
        .iter()
        .find_map(|m| partitions.get(*m))
        .or_else(|| partitions.values().next());
    DiskMetrics {
        percent: primary.map_or(0.0, |p| p.percent),
        total_gb: partitions.values().map(|p| p.total_gb).sum(),
        free_gb: partitions.values().map(|p| p.free_gb).sum(),
        partitions,
        io: None,
    }
}
