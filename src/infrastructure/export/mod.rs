pub mod csv;
pub mod html;
pub mod json;

use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::NaiveDateTime;
use thiserror::Error;

use crate::domain::entities::{HostInfo, Report};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write export file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to serialize report: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("unsupported export format '{0}' (expected json, csv or html)")]
    UnsupportedFormat(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
    Html,
}

impl ExportFormat {
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Csv => "csv",
            Self::Html => "html",
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            "html" | "htm" => Ok(Self::Html),
            other => Err(ExportError::UnsupportedFormat(other.to_string())),
        }
    }
}

/// `report_YYYYmmdd_HHMMSS.<ext>`
#[must_use]
pub fn default_filename(format: ExportFormat, at: NaiveDateTime) -> String {
    format!("report_{}.{}", at.format("%Y%m%d_%H%M%S"), format.extension())
}

/// Writes reports into a directory, creating it on first use.
pub struct ReportExporter {
    output_dir: PathBuf,
    host: Option<HostInfo>,
}

impl ReportExporter {
    #[must_use]
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            host: None,
        }
    }

    /// Embeds host facts in every exported document.
    #[must_use]
    pub fn with_host(mut self, host: HostInfo) -> Self {
        self.host = Some(host);
        self
    }

    #[must_use]
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Renders `report` and writes it under the output directory.
    ///
    /// A `filename` containing a directory component is used as given;
    /// a bare name is placed in the output directory. Without a name one
    /// is generated from the local time.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::Io`] when the directory or file cannot be
    /// written, [`ExportError::Serialize`] when JSON encoding fails.
    pub fn export(
        &self,
        report: &Report,
        format: ExportFormat,
        filename: Option<&str>,
    ) -> Result<PathBuf, ExportError> {
        let path = match filename {
            Some(name) if Path::new(name).parent().is_some_and(|p| !p.as_os_str().is_empty()) => {
                PathBuf::from(shellexpand::tilde(name).as_ref())
            }
            Some(name) => self.output_dir.join(name),
            None => self
                .output_dir
                .join(default_filename(format, chrono::Local::now().naive_local())),
        };

        let host = self.host.as_ref();
        let content = match format {
            ExportFormat::Json => json::render(report, host)?,
            ExportFormat::Csv => csv::render(report, host),
            ExportFormat::Html => html::render(report, host),
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| ExportError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        std::fs::write(&path, content).map_err(|source| ExportError::Io {
            path: path.clone(),
            source,
        })?;

        tracing::info!(path = %path.display(), %format, "rapport exporté");
        Ok(path)
    }
}
