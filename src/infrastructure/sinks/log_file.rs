use std::io::Write;
use std::path::PathBuf;

use chrono::Utc;

use crate::domain::entities::Report;
use crate::domain::ports::sink::{ReportSink, SinkError};

const DEFAULT_LOG_PATH: &str = "~/.local/share/itmon/itmon.log";

/// Appends one JSON object per line: a condensed report per pass, or an
/// error record when a pass fails.
pub struct LogFileSink {
    path: PathBuf,
}

impl LogFileSink {
    #[must_use]
    pub fn new(path: &str) -> Self {
        let expanded = shellexpand::tilde(path);
        Self {
            path: PathBuf::from(expanded.as_ref()),
        }
    }

    #[must_use]
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    fn append_json_line(&self, value: &serde_json::Value) -> Result<(), SinkError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                SinkError::Unavailable(format!("impossible de créer le répertoire parent : {e}"))
            })?;
        }

        let json = serde_json::to_string(value).map_err(|e| {
            SinkError::DeliveryFailed(format!("erreur de sérialisation JSON : {e}"))
        })?;

        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| {
                SinkError::Unavailable(format!("impossible d'ouvrir le fichier de log : {e}"))
            })?;

        writeln!(file, "{json}").map_err(|e| {
            SinkError::DeliveryFailed(format!("impossible d'écrire dans le fichier de log : {e}"))
        })
    }
}

impl Default for LogFileSink {
    fn default() -> Self {
        Self::new(DEFAULT_LOG_PATH)
    }
}

impl ReportSink for LogFileSink {
    fn deliver(&self, report: &Report) -> Result<(), SinkError> {
        let entry = serde_json::json!({
            "timestamp": report.timestamp.to_rfc3339(),
            "detection_mode": report.detection_mode,
            "health_score": report.health_score,
            "cpu_percent": report.metrics.cpu_percent(),
            "memory_percent": report.metrics.memory_percent(),
            "disk_percent": report.metrics.disk_percent(),
            "summary": report.summary,
            "anomalies": report.anomalies.iter().map(|a| {
                serde_json::json!({
                    "kind": a.kind,
                    "severity": a.severity,
                    "value": a.value,
                    "threshold": a.threshold,
                    "message": a.message,
                })
            }).collect::<Vec<_>>(),
        });

        self.append_json_line(&entry)
    }

    fn record_error(&self, message: &str) -> Result<(), SinkError> {
        let entry = serde_json::json!({
            "timestamp": Utc::now().to_rfc3339(),
            "error": message,
        });

        self.append_json_line(&entry)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]

    use super::*;
    use crate::domain::entities::report::fixtures;

    fn sink_in(dir: &tempfile::TempDir) -> LogFileSink {
        LogFileSink {
            path: dir.path().join("itmon.log"),
        }
    }

    #[test]
    fn new_expands_tilde() {
        let sink = LogFileSink::new("~/test/itmon.log");
        let path_str = sink.path.to_string_lossy();
        assert!(!path_str.starts_with('~'), "tilde should be expanded");
        assert!(path_str.ends_with("test/itmon.log"));
    }

    #[test]
    fn default_uses_standard_path() {
        let sink = LogFileSink::default();
        let path_str = sink.path.to_string_lossy();
        assert!(path_str.ends_with(".local/share/itmon/itmon.log"));
    }

    #[test]
    fn deliver_writes_json_line() {
        let dir = tempfile::tempdir().expect("tempdir");
        let sink = sink_in(&dir);

        sink.deliver(&fixtures::report()).expect("deliver");

        let content = std::fs::read_to_string(sink.path()).expect("read log");
        let parsed: serde_json::Value = serde_json::from_str(content.trim()).expect("parse JSON");

        assert_eq!(parsed["detection_mode"], "basic");
        assert_eq!(parsed["health_score"], 78);
        assert_eq!(parsed["cpu_percent"], 97.0);
        assert_eq!(parsed["summary"]["critical"], 1);
        assert_eq!(parsed["anomalies"][0]["kind"], "cpu_critical");
        assert_eq!(parsed["anomalies"][0]["severity"], "critical");
        let ts = parsed["timestamp"].as_str().expect("timestamp str");
        assert!(
            chrono::DateTime::parse_from_rfc3339(ts).is_ok(),
            "timestamp should be valid RFC 3339"
        );
    }

    #[test]
    fn errors_and_reports_append() {
        let dir = tempfile::tempdir().expect("tempdir");
        let sink = sink_in(&dir);

        sink.deliver(&fixtures::report()).expect("deliver");
        sink.record_error("collecte impossible").expect("record error");

        let content = std::fs::read_to_string(sink.path()).expect("read log");
        let lines: Vec<&str> = content.trim().lines().collect();
        assert_eq!(lines.len(), 2);

        let second: serde_json::Value = serde_json::from_str(lines[1]).expect("parse second");
        assert_eq!(second["error"], "collecte impossible");
    }

    #[test]
    fn deliver_creates_parent_directories() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("deep").join("nested").join("itmon.log");
        let sink = LogFileSink { path: path.clone() };

        assert!(sink.deliver(&fixtures::report()).is_ok());
        assert!(path.exists());
    }

    #[test]
    fn unwritable_path_is_reported() {
        let dir = tempfile::tempdir().expect("tempdir");
        // A directory cannot be opened for appending
        let sink = LogFileSink {
            path: dir.path().to_path_buf(),
        };
        assert!(sink.record_error("x").is_err());
    }
}
