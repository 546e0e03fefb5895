//! Counters `sysinfo` does not expose, read from `/proc` and `/sys`.
//! Every reader returns `None` off Linux or when the file is unreadable.

use crate::domain::entities::CpuStats;

/// TCP state code for TIME_WAIT in `/proc/net/tcp`
const TCP_TIME_WAIT: &str = "06";

/// Cumulative kernel counters from `/proc/stat`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KernelCounters {
    pub ctx_switches: u64,
    pub interrupts: u64,
    pub soft_interrupts: u64,
}

impl KernelCounters {
    /// Per-second rates between two readings taken `seconds` apart
    #[must_use]
    pub fn rate_since(&self, earlier: &Self, seconds: f64) -> CpuStats {
        #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let per_sec = |now: u64, then: u64| -> u64 {
            if seconds <= 0.0 {
                return 0;
            }
            (now.saturating_sub(then) as f64 / seconds).round() as u64
        };
        CpuStats {
            ctx_switches: per_sec(self.ctx_switches, earlier.ctx_switches),
            interrupts: per_sec(self.interrupts, earlier.interrupts),
            soft_interrupts: per_sec(self.soft_interrupts, earlier.soft_interrupts),
            syscalls: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TcpCounts {
    pub total: u64,
    pub time_wait: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PacketDrops {
    pub drop_in: u64,
    pub drop_out: u64,
}

fn first_number(rest: &str) -> Option<u64> {
    rest.split_whitespace().next()?.parse().ok()
}

#[must_use]
pub fn parse_stat(content: &str) -> Option<KernelCounters> {
    let mut counters = KernelCounters::default();
    let mut found = false;
    for line in content.lines() {
        let Some((key, rest)) = line.split_once(' ') else {
            continue;
        };
        let slot = match key {
            "ctxt" => &mut counters.ctx_switches,
            "intr" => &mut counters.interrupts,
            "softirq" => &mut counters.soft_interrupts,
            _ => continue,
        };
        if let Some(n) = first_number(rest) {
            *slot = n;
            found = true;
        }
    }
    found.then_some(counters)
}

/// Allocated handles, first field of `/proc/sys/fs/file-nr`
#[must_use]
pub fn parse_file_nr(content: &str) -> Option<u64> {
    first_number(content)
}

/// Counts sockets in a `/proc/net/tcp` style table, header excluded
#[must_use]
pub fn parse_tcp_table(content: &str) -> TcpCounts {
    content
        .lines()
        .skip(1)
        .filter_map(|line| line.split_whitespace().nth(3))
        .fold(TcpCounts::default(), |mut acc, state| {
            acc.total += 1;
            if state == TCP_TIME_WAIT {
                acc.time_wait += 1;
            }
            acc
        })
}

/// Sums dropped packets over every non-loopback interface in `/proc/net/dev`
#[must_use]
pub fn parse_net_dev(content: &str) -> PacketDrops {
    content
        .lines()
        .skip(2)
        .filter_map(|line| line.split_once(':'))
        .filter(|(iface, _)| iface.trim() != "lo")
        .fold(PacketDrops::default(), |mut acc, (_, fields)| {
            let cols: Vec<u64> = fields
                .split_whitespace()
                .map(|f| f.parse().unwrap_or(0))
                .collect();
            // rx: bytes packets errs drop ...; tx starts at column 8
            acc.drop_in += cols.get(3).copied().unwrap_or(0);
            acc.drop_out += cols.get(11).copied().unwrap_or(0);
            acc
        })
}

#[cfg(target_os = "linux")]
fn read(path: &str) -> Option<String> {
    std::fs::read_to_string(path).ok()
}

#[cfg(not(target_os = "linux"))]
fn read(_path: &str) -> Option<String> {
    None
}

#[must_use]
pub fn kernel_counters() -> Option<KernelCounters> {
    parse_stat(&read("/proc/stat")?)
}

#[must_use]
pub fn open_file_handles() -> Option<u64> {
    parse_file_nr(&read("/proc/sys/fs/file-nr")?)
}

#[must_use]
pub fn tcp_counts() -> Option<TcpCounts> {
    let v4 = read("/proc/net/tcp")?;
    let mut counts = parse_tcp_table(&v4);
    if let Some(v6) = read("/proc/net/tcp6") {
        let extra = parse_tcp_table(&v6);
        counts.total += extra.total;
        counts.time_wait += extra.time_wait;
    }
    Some(counts)
}

#[must_use]
pub fn packet_drops() -> Option<PacketDrops> {
    Some(parse_net_dev(&read("/proc/net/dev")?))
}

/// Bounds of CPU 0 in MHz, `(min, max)`
#[must_use]
pub fn cpu_frequency_bounds() -> Option<(f64, f64)> {
    let khz = |path: &str| -> Option<f64> { read(path)?.trim().parse::<f64>().ok() };
    let min = khz("/sys/devices/system/cpu/cpu0/cpufreq/cpuinfo_min_freq")?;
    let max = khz("/sys/devices/system/cpu/cpu0/cpufreq/cpuinfo_max_freq")?;
    Some((min / 1000.0, max / 1000.0))
}
