use std::fmt::Write as _;

use crate::domain::entities::{HostInfo, Report};
use crate::domain::value_objects::Severity;

/// Analyses shown in the recommendations section
const MAX_ANALYSES: usize = 5;
const MAX_STEPS_PER_ANALYSIS: usize = 3;

const STYLE: &str = r"
        body { font-family: Arial, sans-serif; margin: 20px; background-color: #f5f5f5; }
        .container { max-width: 1200px; margin: 0 auto; background-color: white; padding: 30px; border-radius: 8px; box-shadow: 0 2px 4px rgba(0,0,0,0.1); }
        h1 { color: #333; border-bottom: 3px solid #007bff; padding-bottom: 10px; }
        .score { font-size: 48px; font-weight: bold; text-align: center; margin: 20px 0; }
        .status { text-align: center; font-size: 24px; color: #666; margin-bottom: 30px; }
        .section { margin: 30px 0; }
        .section h2 { color: #007bff; border-bottom: 2px solid #007bff; padding-bottom: 5px; }
        table { width: 100%; border-collapse: collapse; margin: 15px 0; }
        th, td { padding: 12px; text-align: left; border-bottom: 1px solid #ddd; }
        th { background-color: #007bff; color: white; }
        tr:hover { background-color: #f5f5f5; }
        .critical { color: #dc3545; font-weight: bold; }
        .warning { color: #ffc107; font-weight: bold; }
        .info { color: #17a2b8; }
        .metrics { display: grid; grid-template-columns: repeat(auto-fit, minmax(200px, 1fr)); gap: 20px; margin: 20px 0; }
        .metric-card { background-color: #f8f9fa; padding: 15px; border-radius: 5px; border-left: 4px solid #007bff; }
        .metric-value { font-size: 32px; font-weight: bold; color: #007bff; }
        .metric-label { color: #666; font-size: 14px; }
";

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Banner colour and label for a health score
#[must_use]
pub const fn score_band(score: u8) -> (&'static str, &'static str) {
    match score {
        80..=u8::MAX => ("#28a745", "EXCELLENT"),
        60..=79 => ("#ffc107", "MOYEN"),
        _ => ("#dc3545", "CRITIQUE"),
    }
}

const fn severity_class(severity: Severity) -> &'static str {
    match severity {
        Severity::Critical => "critical",
        Severity::Warning => "warning",
        Severity::Info => "info",
    }
}

fn metric_card(out: &mut String, label: &str, value: Option<f64>) {
    let shown = value.map_or_else(|| "N/A".to_string(), |v| format!("{v:.1}%"));
    let _ = writeln!(
        out,
        r#"                <div class="metric-card"><div class="metric-value">{shown}</div><div class="metric-label">{label}</div></div>"#
    );
}

/// Standalone HTML page with inline styles.
#[must_use]
pub fn render(report: &Report, host: Option<&HostInfo>) -> String {
    let (color, status) = score_band(report.health_score);
    let mut out = String::new();

    let _ = writeln!(out, "<!DOCTYPE html>");
    let _ = writeln!(out, r#"<html lang="fr">"#);
    let _ = writeln!(out, "<head>");
    let _ = writeln!(out, r#"    <meta charset="UTF-8">"#);
    let _ = writeln!(
        out,
        r#"    <meta name="viewport" content="width=device-width, initial-scale=1.0">"#
    );
    let _ = writeln!(out, "    <title>Rapport de Monitoring IT</title>");
    let _ = writeln!(out, "    <style>{STYLE}    </style>");
    let _ = writeln!(out, "</head>");
    let _ = writeln!(out, "<body>");
    let _ = writeln!(out, r#"    <div class="container">"#);
    let _ = writeln!(out, "        <h1>📊 Rapport de Monitoring IT</h1>");
    let _ = writeln!(
        out,
        r#"        <div class="score" style="color: {color};">{}/100</div>"#,
        report.health_score
    );
    let _ = writeln!(out, r#"        <div class="status">Statut : {status}</div>"#);

    let _ = writeln!(out, r#"        <div class="section">"#);
    let _ = writeln!(
        out,
        "            <p><strong>Généré le :</strong> {}</p>",
        report.timestamp.format("%Y-%m-%d %H:%M:%S UTC")
    );
    let _ = writeln!(
        out,
        "            <p><strong>Mode de détection :</strong> {}</p>",
        report.detection_mode
    );
    if let Some(host) = host {
        let _ = writeln!(
            out,
            "            <p><strong>Hôte :</strong> {} ({} {}, {})</p>",
            escape(&host.hostname),
            escape(&host.os_name),
            escape(&host.os_version),
            escape(&host.architecture)
        );
    }
    let _ = writeln!(out, "        </div>");

    let _ = writeln!(out, r#"        <div class="section">"#);
    let _ = writeln!(out, "            <h2>📈 Métriques Système</h2>");
    let _ = writeln!(out, r#"            <div class="metrics">"#);
    metric_card(&mut out, "CPU", report.metrics.cpu_percent());
    metric_card(&mut out, "Mémoire", report.metrics.memory_percent());
    metric_card(&mut out, "Disque", report.metrics.disk_percent());
    let _ = writeln!(out, "            </div>");
    let _ = writeln!(out, "        </div>");

    render_anomalies(&mut out, report);
    render_recommendations(&mut out, report);

    let _ = writeln!(out, "    </div>");
    let _ = writeln!(out, "</body>");
    let _ = writeln!(out, "</html>");
    out
}

fn render_anomalies(out: &mut String, report: &Report) {
    let _ = writeln!(out, r#"        <div class="section">"#);
    let _ = writeln!(out, "            <h2>⚠️ Anomalies Détectées</h2>");
    let _ = writeln!(out, "            <table>");
    let _ = writeln!(
        out,
        "                <thead><tr><th>Type</th><th>Sévérité</th><th>Catégorie</th><th>Valeur</th><th>Message</th></tr></thead>"
    );
    let _ = writeln!(out, "                <tbody>");
    if report.anomalies.is_empty() {
        let _ = writeln!(
            out,
            r#"                    <tr><td colspan="5" style="text-align: center; color: #28a745;">✅ Aucune anomalie détectée - Système en bon état</td></tr>"#
        );
    }
    for anomaly in &report.anomalies {
        let _ = writeln!(
            out,
            r#"                    <tr><td>{}</td><td class="{}">{}</td><td>{}</td><td>{:.2}</td><td>{}</td></tr>"#,
            anomaly.kind,
            severity_class(anomaly.severity),
            anomaly.severity,
            anomaly.category,
            anomaly.value,
            escape(&anomaly.message)
        );
    }
    let _ = writeln!(out, "                </tbody>");
    let _ = writeln!(out, "            </table>");
    let _ = writeln!(out, "        </div>");
}

fn render_recommendations(out: &mut String, report: &Report) {
    let with_steps: Vec<_> = report
        .analyses
        .iter()
        .filter(|a| !a.recommendations.is_empty())
        .take(MAX_ANALYSES)
        .collect();
    if with_steps.is_empty() {
        return;
    }

    let _ = writeln!(out, r#"        <div class="section">"#);
    let _ = writeln!(out, "            <h2>💡 Recommandations</h2>");
    for (i, analysis) in with_steps.iter().enumerate() {
        let _ = writeln!(out, "            <h3>Recommandation #{}</h3>", i + 1);
        let _ = writeln!(
            out,
            "            <p><strong>Cause racine :</strong> {}</p>",
            escape(&analysis.root_cause.cause)
        );
        let _ = writeln!(out, "            <ul>");
        for rec in analysis.recommendations.iter().take(MAX_STEPS_PER_ANALYSIS) {
            let _ = write!(
                out,
                "                <li><strong>[{}]</strong> {}",
                rec.priority.to_string().to_uppercase(),
                escape(&rec.action)
            );
            if !rec.command.is_empty() {
                let _ = write!(out, "<br><code>{}</code>", escape(&rec.command));
            }
            let _ = writeln!(out, "</li>");
        }
        let _ = writeln!(out, "            </ul>");
    }
    let _ = writeln!(out, "        </div>");
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use crate::domain::entities::report::fixtures;

    #[test]
    fn escapes_markup() {
        assert_eq!(
            escape(r#"<script>alert("x") & 'y'</script>"#),
            "&lt;script&gt;alert(&quot;x&quot;) &amp; &#39;y&#39;&lt;/script&gt;"
        );
    }

    #[test]
    fn score_bands() {
        assert_eq!(score_band(100).1, "EXCELLENT");
        assert_eq!(score_band(80).1, "EXCELLENT");
        assert_eq!(score_band(79).1, "MOYEN");
        assert_eq!(score_band(60).1, "MOYEN");
        assert_eq!(score_band(59), ("#dc3545", "CRITIQUE"));
    }

    #[test]
    fn page_lists_anomaly_and_steps() {
        let html = render(&fixtures::report(), None);
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("78/100"));
        assert!(html.contains("Statut : MOYEN"));
        assert!(html.contains(r#"<td class="critical">CRITICAL</td>"#));
        assert!(html.contains("Recommandation #1"));
        assert!(html.contains("[URGENT]"));
        assert!(html.trim_end().ends_with("</html>"));
    }

    #[test]
    fn steps_are_capped() {
        let html = render(&fixtures::report(), None);
        let steps = html.matches("<li>").count();
        assert!(steps <= MAX_STEPS_PER_ANALYSIS);
    }

    #[test]
    fn healthy_page_has_no_recommendations() {
        let mut report = fixtures::report();
        report.anomalies.clear();
        report.analyses.clear();
        let html = render(&report, None);
        assert!(html.contains("Aucune anomalie détectée"));
        assert!(!html.contains("Recommandations"));
    }

    #[test]
    fn host_names_are_escaped() {
        let host = HostInfo {
            hostname: "<b>box</b>".to_string(),
            ..HostInfo::default()
        };
        let html = render(&fixtures::report(), Some(&host));
        assert!(html.contains("&lt;b&gt;box&lt;/b&gt;"));
        assert!(!html.contains("<b>box</b>"));
    }
}
