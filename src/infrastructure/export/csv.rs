use std::fmt::Write as _;

use crate::domain::entities::{HostInfo, Report};

const ANOMALY_COLUMNS: [&str; 6] = ["Type", "Sévérité", "Catégorie", "Valeur", "Seuil", "Message"];

/// Quotes a field when it holds a separator, a quote or a line break.
fn field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn row<S: AsRef<str>>(out: &mut String, cells: &[S]) {
    let line = cells
        .iter()
        .map(|c| field(c.as_ref()))
        .collect::<Vec<_>>()
        .join(",");
    let _ = writeln!(out, "{line}");
}

fn percent(value: Option<f64>) -> String {
    value.map_or_else(|| "N/A".to_string(), |v| format!("{v:.1}"))
}

/// Sectioned CSV: header, metrics, then one row per anomaly.
#[must_use]
pub fn render(report: &Report, host: Option<&HostInfo>) -> String {
    let mut out = String::new();

    row(&mut out, &["Rapport de Monitoring IT"]);
    row(&mut out, &["Timestamp".to_string(), report.timestamp.to_rfc3339()]);
    row(&mut out, &["Score de Santé".to_string(), report.health_score.to_string()]);
    row(&mut out, &["Mode".to_string(), report.detection_mode.to_string()]);
    if let Some(host) = host {
        row(&mut out, &["Hôte", host.hostname.as_str()]);
        row(
            &mut out,
            &["Système".to_string(), format!("{} {}", host.os_name, host.os_version)],
        );
    }
    out.push('\n');

    row(&mut out, &["MÉTRIQUES"]);
    let metrics = &report.metrics;
    row(&mut out, &["CPU (%)".to_string(), percent(metrics.cpu_percent())]);
    row(&mut out, &["Mémoire (%)".to_string(), percent(metrics.memory_percent())]);
    row(&mut out, &["Disque (%)".to_string(), percent(metrics.disk_percent())]);
    out.push('\n');

    row(&mut out, &["ANOMALIES"]);
    row(&mut out, &ANOMALY_COLUMNS);
    if report.anomalies.is_empty() {
        row(&mut out, &["Aucune anomalie détectée", "", "", "", "", ""]);
    }
    for anomaly in &report.anomalies {
        row(
            &mut out,
            &[
                anomaly.kind.to_string(),
                anomaly.severity.to_string(),
                anomaly.category.to_string(),
                format!("{:.2}", anomaly.value),
                format!("{:.2}", anomaly.threshold),
                anomaly.message.clone(),
            ],
        );
    }
    out
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use crate::domain::entities::report::fixtures;

    #[test]
    fn quoting() {
        assert_eq!(field("plain"), "plain");
        assert_eq!(field("a,b"), "\"a,b\"");
        assert_eq!(field("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(field("two\nlines"), "\"two\nlines\"");
    }

    #[test]
    fn sections_in_order() {
        let text = render(&fixtures::report(), None);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Rapport de Monitoring IT");
        assert!(lines[1].starts_with("Timestamp,2023-11-14T22:13:20"));
        assert_eq!(lines[2], "Score de Santé,78");

        let metrics = lines.iter().position(|l| *l == "MÉTRIQUES").expect("metrics");
        let anomalies = lines.iter().position(|l| *l == "ANOMALIES").expect("anomalies");
        assert!(metrics < anomalies);
        assert_eq!(lines[metrics + 1], "CPU (%),97.0");
        assert_eq!(lines[anomalies + 1], "Type,Sévérité,Catégorie,Valeur,Seuil,Message");
        assert!(lines[anomalies + 2].starts_with("cpu_critical,CRITICAL,performance,97.00,"));
    }

    #[test]
    fn empty_report_has_placeholder_row() {
        let mut report = fixtures::report();
        report.anomalies.clear();
        report.metrics.disk = None;
        let text = render(&report, None);
        assert!(text.contains("Aucune anomalie détectée,,,,,"));
        assert!(text.contains("Disque (%),N/A"));
    }

    #[test]
    fn host_rows_when_known() {
        let host = HostInfo {
            hostname: "web, 01".to_string(),
            ..HostInfo::default()
        };
        let text = render(&fixtures::report(), Some(&host));
        assert!(text.contains("Hôte,\"web, 01\""));
    }
}
