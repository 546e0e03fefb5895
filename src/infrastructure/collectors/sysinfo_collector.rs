use std::cmp::Ordering;
use std::sync::Mutex;
use std::time::Instant;

use chrono::{DateTime, Utc};
use sysinfo::{Networks, ProcessStatus, System};

use super::disk_collector::{DiskCollector, BYTES_PER_GB};
use super::procfs::{self, KernelCounters};
use crate::domain::entities::{
    CpuFrequency, CpuMetrics, DiskIo, HostInfo, LoadAverage, MemoryMetrics, MetricsSnapshot,
    NetworkMetrics, ProcessEntry, ProcessMetrics, SwapMetrics, SystemMetrics,
};
use crate::domain::ports::collector::{CollectionError, MetricsProvider};
use crate::domain::rules::security::is_suspicious_name;

const BYTES_PER_MB: f64 = 1_048_576.0;

/// Length of the top-by-CPU and top-by-memory lists
pub const TOP_PROCESSES: usize = 10;

/// Returns `(numerator / denominator) * 100.0`, or `0.0` when `denominator` is zero.
#[allow(clippy::cast_precision_loss)]
fn safe_percent(numerator: u64, denominator: u64) -> f64 {
    if denominator > 0 {
        (numerator as f64 / denominator as f64) * 100.0
    } else {
        0.0
    }
}

#[allow(clippy::cast_precision_loss)]
fn gb(bytes: u64) -> f64 {
    bytes as f64 / BYTES_PER_GB
}

/// Cumulative counters kept between samples to derive rates
#[derive(Debug, Clone, Copy)]
struct Counters {
    at: Instant,
    net_sent: u64,
    net_recv: u64,
    disk_read: u64,
    disk_written: u64,
    kernel: Option<KernelCounters>,
}

struct Sampler {
    sys: System,
    networks: Networks,
    last: Option<Counters>,
}

/// Collects system metrics using the `sysinfo` crate, completed by
/// `/proc` counters on Linux.
///
/// Uses `Mutex` for interior mutability since the `MetricsProvider`
/// trait requires `&self` but `sysinfo` needs `&mut self` for refresh.
/// Rates (network, disk I/O, kernel counters) are deltas since the
/// previous `collect`; the first call primes them and reports disk I/O
/// and kernel stats as absent.
pub struct SysinfoCollector {
    sampler: Mutex<Sampler>,
    disk_collector: DiskCollector,
}

impl SysinfoCollector {
    /// Creates a new collector with pre-initialized system data.
    #[must_use]
    pub fn new() -> Self {
        let mut sys = System::new_all();
        sys.refresh_all();
        Self {
            sampler: Mutex::new(Sampler {
                sys,
                networks: Networks::new_with_refreshed_list(),
                last: None,
            }),
            disk_collector: DiskCollector::new(),
        }
    }
}

impl Default for SysinfoCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsProvider for SysinfoCollector {
    fn collect(&self) -> Result<MetricsSnapshot, CollectionError> {
        let mut sampler = self.sampler.lock().map_err(|_| CollectionError::Poisoned)?;
        let Sampler {
            sys,
            networks,
            last,
        } = &mut *sampler;

        if last.is_none() {
            // CPU usage needs two refreshes some time apart
            std::thread::sleep(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL);
        }
        sys.refresh_all();
        networks.refresh();

        let now = Counters {
            at: Instant::now(),
            net_sent: networks.iter().map(|(_, n)| n.total_transmitted()).sum(),
            net_recv: networks.iter().map(|(_, n)| n.total_received()).sum(),
            disk_read: sys
                .processes()
                .values()
                .map(|p| p.disk_usage().total_read_bytes)
                .sum(),
            disk_written: sys
                .processes()
                .values()
                .map(|p| p.disk_usage().total_written_bytes)
                .sum(),
            kernel: procfs::kernel_counters(),
        };
        let previous = last.replace(now);

        let mut cpu = collect_cpu(sys);
        let memory = collect_memory(sys);
        let processes = collect_processes(sys);
        let mut network = collect_network(networks);
        let system = collect_system();

        let mut disk = self.disk_collector.collect()?;

        if let Some(prev) = previous {
            let seconds = now.at.duration_since(prev.at).as_secs_f64();
            let rate = |current: u64, earlier: u64| -> f64 {
                if seconds > 0.0 {
                    #[allow(clippy::cast_precision_loss)]
                    let delta = current.saturating_sub(earlier) as f64;
                    delta / BYTES_PER_MB / seconds
                } else {
                    0.0
                }
            };
            network.sent_mb_s = rate(now.net_sent, prev.net_sent);
            network.recv_mb_s = rate(now.net_recv, prev.net_recv);
            disk.io = Some(DiskIo {
                read_mb_s: rate(now.disk_read, prev.disk_read),
                write_mb_s: rate(now.disk_written, prev.disk_written),
            });
            if let (Some(k_now), Some(k_prev)) = (now.kernel, prev.kernel) {
                cpu.stats = Some(k_now.rate_since(&k_prev, seconds));
            }
        }

        Ok(MetricsSnapshot {
            timestamp: Some(Utc::now()),
            cpu: Some(cpu),
            memory: Some(memory),
            disk: Some(disk),
            network: Some(network),
            processes: Some(processes),
            system: Some(system),
        })
    }

    fn host_info(&self) -> HostInfo {
        let cpu_count = self
            .sampler
            .lock()
            .map_or(0, |s| s.sys.cpus().len());
        HostInfo {
            hostname: System::host_name().unwrap_or_else(|| "inconnu".to_string()),
            os_name: System::name().unwrap_or_default(),
            os_version: System::os_version().unwrap_or_default(),
            kernel_version: System::kernel_version().unwrap_or_default(),
            architecture: std::env::consts::ARCH.to_string(),
            cpu_count,
            boot_time: i64::try_from(System::boot_time())
                .ok()
                .and_then(|secs| DateTime::from_timestamp(secs, 0)),
        }
    }
}

fn collect_cpu(sys: &System) -> CpuMetrics {
    let cpus = sys.cpus();
    let per_core: Vec<f64> = cpus.iter().map(|c| f64::from(c.cpu_usage())).collect();
    #[allow(clippy::cast_precision_loss)]
    let current = cpus.first().map_or(0.0, |c| c.frequency() as f64);
    let frequency = (current > 0.0).then(|| {
        let (min, max) = procfs::cpu_frequency_bounds().unwrap_or((0.0, 0.0));
        CpuFrequency { current, min, max }
    });

    CpuMetrics {
        percent: f64::from(sys.global_cpu_usage()),
        per_core,
        frequency,
        stats: None,
        logical_count: cpus.len(),
    }
}

fn collect_memory(sys: &System) -> MemoryMetrics {
    let total = sys.total_memory();
    let available = sys.available_memory();
    let used = sys.used_memory();
    let swap_total = sys.total_swap();
    let swap_used = sys.used_swap();

    MemoryMetrics {
        percent: safe_percent(total.saturating_sub(available), total),
        total_gb: gb(total),
        available_gb: gb(available),
        used_gb: gb(used),
        swap: (swap_total > 0).then(|| SwapMetrics {
            percent: safe_percent(swap_used, swap_total),
            total_gb: gb(swap_total),
            used_gb: gb(swap_used),
        }),
    }
}

fn collect_processes(sys: &System) -> ProcessMetrics {
    let total_memory = sys.total_memory();
    let mut metrics = ProcessMetrics::default();
    let mut entries = Vec::with_capacity(sys.processes().len());

    for process in sys.processes().values() {
        metrics.total += 1;
        match process.status() {
            ProcessStatus::Run => metrics.running += 1,
            ProcessStatus::Sleep | ProcessStatus::Idle => metrics.sleeping += 1,
            ProcessStatus::Zombie => metrics.zombie += 1,
            _ => {}
        }
        entries.push(ProcessEntry {
            pid: process.pid().as_u32(),
            name: process.name().to_string_lossy().to_string(),
            cpu_percent: f64::from(process.cpu_usage()),
            memory_percent: safe_percent(process.memory(), total_memory),
            user: process.user_id().map(|uid| uid.to_string()),
        });
    }

    metrics.top_by_cpu = top_by(&entries, |p| p.cpu_percent);
    metrics.top_by_memory = top_by(&entries, |p| p.memory_percent);
    metrics.flagged = flag_suspicious(&entries);
    metrics
}

/// Every entry with a suspicious name, so idle miners are not hidden by the top lists
fn flag_suspicious(entries: &[ProcessEntry]) -> Vec<ProcessEntry> {
    entries
        .iter()
        .filter(|p| is_suspicious_name(&p.name))
        .cloned()
        .collect()
}

/// Highest `TOP_PROCESSES` entries by `key`, zero values dropped
fn top_by(entries: &[ProcessEntry], key: impl Fn(&ProcessEntry) -> f64) -> Vec<ProcessEntry> {
    let mut ranked: Vec<&ProcessEntry> = entries.iter().filter(|p| key(p) > 0.0).collect();
    ranked.sort_by(|a, b| key(b).partial_cmp(&key(a)).unwrap_or(Ordering::Equal));
    ranked.into_iter().take(TOP_PROCESSES).cloned().collect()
}

fn collect_network(networks: &Networks) -> NetworkMetrics {
    let drops = procfs::packet_drops().unwrap_or_default();
    let tcp = procfs::tcp_counts().unwrap_or_default();
    NetworkMetrics {
        err_in: networks
            .iter()
            .map(|(_, n)| n.total_errors_on_received())
            .sum(),
        err_out: networks
            .iter()
            .map(|(_, n)| n.total_errors_on_transmitted())
            .sum(),
        drop_in: drops.drop_in,
        drop_out: drops.drop_out,
        sent_mb_s: 0.0,
        recv_mb_s: 0.0,
        connections_count: tcp.total,
        time_wait: tcp.time_wait,
    }
}

fn collect_system() -> SystemMetrics {
    let load = System::load_average();
    SystemMetrics {
        uptime_seconds: System::uptime(),
        load_average: (!cfg!(windows)).then_some(LoadAverage {
            one: load.one,
            five: load.five,
            fifteen: load.fifteen,
        }),
        open_file_handles: procfs::open_file_handles(),
    }
}
