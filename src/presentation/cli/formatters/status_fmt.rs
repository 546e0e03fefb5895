use std::fmt::Write as _;

use colored::{ColoredString, Colorize};

use crate::domain::entities::HostInfo;
use crate::domain::history::{ResourceStats, RollingStats};

#[must_use]
pub fn progress_bar(value: f64, width: usize) -> String {
    let ratio = (value / 100.0).clamp(0.0, 1.0);
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    let filled = (ratio * width as f64).round() as usize;
    let empty = width.saturating_sub(filled);

    let bar_filled = "█".repeat(filled);
    let bar_empty = "░".repeat(empty);

    let colored_bar = if value >= 90.0 {
        bar_filled.red().bold()
    } else if value >= 70.0 {
        bar_filled.yellow()
    } else {
        bar_filled.green()
    };

    format!("{colored_bar}{bar_empty}")
}

#[must_use]
pub fn colorize_percent(value: f64) -> ColoredString {
    let text = format!("{value:.1}%");
    if value >= 90.0 {
        text.red().bold()
    } else if value >= 70.0 {
        text.yellow()
    } else {
        text.green()
    }
}

/// `Score de santé : N/100`, green from 80, yellow from 60, red below
#[must_use]
pub fn colorize_health(score: u8) -> ColoredString {
    let text = format!("Score de santé : {score}/100");
    match score {
        80..=u8::MAX => text.green().bold(),
        60..=79 => text.yellow().bold(),
        _ => text.red().bold(),
    }
}

pub fn print_section_header(title: &str) {
    println!("{}", title.bold().cyan());
    let display_width = title.chars().count();
    println!("{}", "─".repeat(display_width).cyan());
}

/// `3j 04h 12m`, days omitted when zero
#[must_use]
pub fn format_uptime(seconds: u64) -> String {
    let days = seconds / 86_400;
    let hours = (seconds % 86_400) / 3_600;
    let minutes = (seconds % 3_600) / 60;
    if days > 0 {
        format!("{days}j {hours:02}h {minutes:02}m")
    } else {
        format!("{hours:02}h {minutes:02}m")
    }
}

#[must_use]
pub fn format_host(host: &HostInfo) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "  Hôte        : {}", host.hostname);
    let _ = writeln!(out, "  Système     : {} {}", host.os_name, host.os_version);
    let _ = writeln!(out, "  Noyau       : {}", host.kernel_version);
    let _ = writeln!(
        out,
        "  Architecture: {} ({} CPU logiques)",
        host.architecture, host.cpu_count
    );
    if let Some(boot) = host.boot_time {
        let _ = writeln!(out, "  Démarré le  : {}", boot.format("%Y-%m-%d %H:%M:%S UTC"));
    }
    out
}

fn stats_block(out: &mut String, label: &str, stats: Option<&ResourceStats>) {
    let Some(s) = stats else {
        return;
    };
    let _ = writeln!(out, "{label} ({} échantillons) :", s.samples);
    let _ = writeln!(out, "  Actuel : {:.1}%", s.current);
    let _ = writeln!(out, "  Moyen  : {:.1}%", s.average);
    let _ = writeln!(out, "  Min    : {:.1}%", s.min);
    let _ = writeln!(out, "  Max    : {:.1}%", s.max);
}

/// Current, average, min and max per resource. Resources without samples
/// are left out.
#[must_use]
pub fn format_rolling_stats(stats: &RollingStats) -> String {
    let mut out = String::new();
    stats_block(&mut out, "CPU", stats.cpu.as_ref());
    stats_block(&mut out, "MÉMOIRE", stats.memory.as_ref());
    stats_block(&mut out, "DISQUE", stats.disk.as_ref());
    if out.is_empty() {
        out.push_str("Aucun échantillon pour le moment\n");
    }
    out
}
