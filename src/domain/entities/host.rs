use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Static facts about the monitored machine
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostInfo {
    pub hostname: String,
    pub os_name: String,
    pub os_version: String,
    pub kernel_version: String,
    pub architecture: String,
    pub cpu_count: usize,
    pub boot_time: Option<DateTime<Utc>>,
}
