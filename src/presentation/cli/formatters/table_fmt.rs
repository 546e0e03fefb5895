use crate::domain::entities::ProcessEntry;
use colored::Colorize;

/// Process usage above this share is highlighted
const HOT_PERCENT: f64 = 50.0;

/// Column the process table is ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum SortKey {
    Cpu,
    Memory,
}

impl SortKey {
    fn value(self, p: &ProcessEntry) -> f64 {
        match self {
            Self::Cpu => p.cpu_percent,
            Self::Memory => p.memory_percent,
        }
    }
}

/// Formats the top N processes, highest `key` first, as an aligned table.
///
/// # Returns
///
/// A multi-line string with header, separator, and process rows.
#[must_use]
pub fn format_process_table(processes: &[ProcessEntry], key: SortKey, top_n: usize) -> String {
    let mut sorted: Vec<&ProcessEntry> = processes.iter().collect();
    sorted.sort_by(|a, b| key.value(b).total_cmp(&key.value(a)));
    sorted.truncate(top_n);

    let header = format!(
        "{:<8} {:<30} {:>8} {:>8} {:<15}",
        "PID", "NOM", "CPU%", "RAM%", "UTILISATEUR"
    );
    let separator = "─".repeat(header.chars().count());

    let mut rows = vec![header, separator];

    for p in sorted {
        let name: String = p.name.chars().filter(|c| *c != '\x1b').take(29).collect();
        let user: String = p.user.as_deref().unwrap_or("-").chars().take(14).collect();
        let row = format!(
            "{:<8} {:<30} {:>8.1} {:>8.1} {:<15}",
            p.pid, name, p.cpu_percent, p.memory_percent, user
        );
        if key.value(p) >= HOT_PERCENT {
            rows.push(row.red().to_string());
        } else {
            rows.push(row);
        }
    }

    rows.join("\n")
}
