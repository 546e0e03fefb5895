use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

use super::process::ProcessEntry;

/// One sample of host metrics. Every family is optional: a provider that
/// cannot read a family leaves it `None` and the classifiers skip it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient")]
    pub cpu: Option<CpuMetrics>,
    #[serde(default, deserialize_with = "lenient")]
    pub memory: Option<MemoryMetrics>,
    #[serde(default, deserialize_with = "lenient")]
    pub disk: Option<DiskMetrics>,
    #[serde(default, deserialize_with = "lenient")]
    pub network: Option<NetworkMetrics>,
    #[serde(default, deserialize_with = "lenient")]
    pub processes: Option<ProcessMetrics>,
    #[serde(default, deserialize_with = "lenient")]
    pub system: Option<SystemMetrics>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CpuMetrics {
    pub percent: f64,
    pub per_core: Vec<f64>,
    #[serde(deserialize_with = "lenient")]
    pub frequency: Option<CpuFrequency>,
    #[serde(deserialize_with = "lenient")]
    pub stats: Option<CpuStats>,
    pub logical_count: usize,
}

/// MHz
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CpuFrequency {
    pub current: f64,
    pub min: f64,
    pub max: f64,
}

/// Cumulative counters since boot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CpuStats {
    pub ctx_switches: u64,
    pub interrupts: u64,
    pub soft_interrupts: u64,
    pub syscalls: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryMetrics {
    pub percent: f64,
    pub total_gb: f64,
    pub available_gb: f64,
    pub used_gb: f64,
    #[serde(deserialize_with = "lenient")]
    pub swap: Option<SwapMetrics>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwapMetrics {
    pub percent: f64,
    pub total_gb: f64,
    pub used_gb: f64,
}

/// Usage of the root filesystem plus every real partition
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiskMetrics {
    pub percent: f64,
    pub total_gb: f64,
    pub free_gb: f64,
    pub partitions: BTreeMap<String, PartitionUsage>,
    #[serde(deserialize_with = "lenient")]
    pub io: Option<DiskIo>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PartitionUsage {
    pub filesystem: String,
    pub percent: f64,
    pub total_gb: f64,
    pub free_gb: f64,
}

/// Throughput between two samples
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiskIo {
    pub read_mb_s: f64,
    pub write_mb_s: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkMetrics {
    pub err_in: u64,
    pub err_out: u64,
    pub drop_in: u64,
    pub drop_out: u64,
    pub sent_mb_s: f64,
    pub recv_mb_s: f64,
    pub connections_count: u64,
    pub time_wait: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessMetrics {
    pub total: u64,
    pub zombie: u64,
    pub running: u64,
    pub sleeping: u64,
    pub top_by_cpu: Vec<ProcessEntry>,
    pub top_by_memory: Vec<ProcessEntry>,
    /// Processes with a suspicious name, whatever their load
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub flagged: Vec<ProcessEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemMetrics {
    pub uptime_seconds: u64,
    #[serde(deserialize_with = "lenient")]
    pub load_average: Option<LoadAverage>,
    pub open_file_handles: Option<u64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadAverage {
    pub one: f64,
    pub five: f64,
    pub fifteen: f64,
}

/// Deserializes an optional sub-record, turning a malformed value into `None`
/// instead of failing the enclosing record. Only JSON objects are accepted:
/// serde would otherwise read an array as a struct, field by field.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value
        .filter(serde_json::Value::is_object)
        .and_then(|v| serde_json::from_value(v).ok()))
}

impl MetricsSnapshot {
    /// Parses a JSON document. Anything other than an object yields an
    /// empty snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error only when `text` is not valid JSON.
    pub fn from_json_lenient(text: &str) -> Result<Self, serde_json::Error> {
        let value: serde_json::Value = serde_json::from_str(text)?;
        if !value.is_object() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_value(value).unwrap_or_default())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cpu.is_none()
            && self.memory.is_none()
            && self.disk.is_none()
            && self.network.is_none()
            && self.processes.is_none()
            && self.system.is_none()
    }

    #[must_use]
    pub fn cpu_percent(&self) -> Option<f64> {
        self.cpu.as_ref().map(|c| c.percent)
    }

    #[must_use]
    pub fn memory_percent(&self) -> Option<f64> {
        self.memory.as_ref().map(|m| m.percent)
    }

    #[must_use]
    pub fn disk_percent(&self) -> Option<f64> {
        self.disk.as_ref().map(|d| d.percent)
    }

    #[must_use]
    pub fn top_cpu_processes(&self) -> &[ProcessEntry] {
        self.processes
            .as_ref()
            .map_or(&[], |p| p.top_by_cpu.as_slice())
    }

    #[must_use]
    pub fn top_memory_processes(&self) -> &[ProcessEntry] {
        self.processes
            .as_ref()
            .map_or(&[], |p| p.top_by_memory.as_slice())
    }
}
