use serde::Serialize;

use crate::domain::entities::{HostInfo, Report};

#[derive(Serialize)]
struct Document<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    host: Option<&'a HostInfo>,
    #[serde(flatten)]
    report: &'a Report,
}

/// Pretty-printed report, with host facts alongside when known.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn render(report: &Report, host: Option<&HostInfo>) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&Document { host, report })
}
