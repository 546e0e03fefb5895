use std::fmt::Write as _;

use colored::Colorize;

use crate::domain::entities::{AnomalyAnalysis, Report};
use crate::domain::ports::sink::{ReportSink, SinkError};
use crate::domain::value_objects::{Priority, Severity};

const SEPARATOR_WIDTH: usize = 70;

/// Strips escape characters from text that may come from process names.
fn sanitize(input: &str) -> String {
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

fn priority_badge(priority: Priority) -> String {
    let label = format!("[{priority}]");
    match priority {
        Priority::Urgent => format!("{}", label.red().bold()),
        Priority::High => format!("{}", label.yellow().bold()),
        Priority::Medium => format!("{}", label.yellow()),
        Priority::Low => format!("{}", label.green()),
    }
}

fn health_line(score: u8) -> String {
    let text = format!("Score de santé : {score}/100");
    match score {
        80..=100 => format!("{}", text.green().bold()),
        50..=79 => format!("{}", text.yellow().bold()),
        _ => format!("{}", text.red().bold()),
    }
}

/// Renders a report for the terminal, critical anomalies first.
#[must_use]
pub fn render_report(report: &Report) -> String {
    let separator = "\u{2500}".repeat(SEPARATOR_WIDTH);
    let mut out = String::new();

    let _ = writeln!(out, "\n{}", separator.dimmed());
    let _ = writeln!(
        out,
        "{} {}  {}",
        report.timestamp.format("%Y-%m-%d %H:%M:%S").to_string().dimmed(),
        format!("[{}]", report.detection_mode).cyan(),
        health_line(report.health_score)
    );
    let _ = writeln!(out, "{}", separator.dimmed());

    if report.is_healthy() {
        let _ = writeln!(out, "{}", "Système sain, aucune anomalie détectée".green().bold());
        return out;
    }

    let summary = &report.summary;
    let _ = writeln!(
        out,
        "{} anomalie(s) : {} critique(s), {} avertissement(s), {} info(s)",
        summary.total, summary.critical, summary.warning, summary.info
    );

    for analysis in report.analyses_by_severity() {
        render_analysis(&mut out, analysis);
    }
    let _ = writeln!(out, "{}", separator.dimmed());
    out
}

fn render_analysis(out: &mut String, analysis: &AnomalyAnalysis) {
    let anomaly = &analysis.anomaly;
    let _ = writeln!(
        out,
        "\n{} {} {}",
        severity_badge(anomaly.severity),
        anomaly.severity.emoji(),
        sanitize(&anomaly.message).bold()
    );
    let _ = writeln!(
        out,
        "  {} {}",
        "Cause :".cyan(),
        sanitize(&analysis.root_cause.cause)
    );
    if !analysis.root_cause.details.is_empty() {
        let _ = writeln!(out, "  {}", sanitize(&analysis.root_cause.details).dimmed());
    }
    for rec in &analysis.recommendations {
        let _ = writeln!(
            out,
            "  {} {} {}",
            priority_badge(rec.priority),
            sanitize(&rec.action),
            format!("\u{2192} {}", sanitize(&rec.command)).dimmed()
        );
        if let Some(warning) = &rec.warning {
            let _ = writeln!(out, "      {}", sanitize(warning).red());
        }
    }
}

/// Prints each report to stdout and tick errors to stderr.
#[derive(Debug, Default)]
pub struct ConsoleSink;

impl ConsoleSink {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl ReportSink for ConsoleSink {
    fn deliver(&self, report: &Report) -> Result<(), SinkError> {
        print!("{}", render_report(report));
        Ok(())
    }

    fn record_error(&self, message: &str) -> Result<(), SinkError> {
        eprintln!("{} {}", "Erreur :".red().bold(), sanitize(message));
        Ok(())
    }
}
