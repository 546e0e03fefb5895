use colored::Colorize;

use crate::domain::entities::Anomaly;
use crate::domain::value_objects::Severity;

/// Strips ANSI/OSC escape sequences from a string to prevent terminal injection.
fn sanitize_terminal(input: &str) -> String {
    input.chars().filter(|c| *c != '\x1b').collect()
}

fn severity_badge(severity: Severity) -> String {
    let label = format!(" {severity} ");
    match severity {
        Severity::Critical => format!("{}", label.on_red().white().bold()),
        Severity::Warning => format!("{}", label.on_yellow().black().bold()),
        Severity::Info => format!("{}", label.on_blue().white()),
    }
}

/// One line per anomaly: badge, kind, message, then value against threshold.
#[must_use]
pub fn format_anomaly_line(anomaly: &Anomaly) -> String {
    format!(
        "{} {} {} {}",
        severity_badge(anomaly.severity),
        format!("[{}]", anomaly.kind).cyan(),
        sanitize_terminal(&anomaly.message),
        format!("({:.1} / seuil {:.1})", anomaly.value, anomaly.threshold).dimmed()
    )
}

pub fn print_anomalies(anomalies: &[Anomaly]) {
    println!("{} anomalie(s) détectée(s) :", anomalies.len());
    for anomaly in anomalies {
        println!("  {}", format_anomaly_line(anomaly));
    }
    println!();
}

pub fn print_no_anomalies() {
    println!();
    println!(
        "{}",
        "✅ Système sain — aucune anomalie détectée".green().bold()
    );
    println!();
}
