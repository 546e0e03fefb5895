use serde::{Deserialize, Serialize};

/// One row of a top-processes list
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessEntry {
    pub pid: u32,
    pub name: String,
    pub cpu_percent: f64,
    pub memory_percent: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
}

impl ProcessEntry {
    #[must_use]
    pub fn reference(&self) -> ProcessRef {
        ProcessRef {
            pid: self.pid,
            name: self.name.clone(),
        }
    }
}

/// Process an anomaly is about
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProcessRef {
    pub pid: u32,
    pub name: String,
}

impl std::fmt::Display for ProcessRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (PID {})", self.name, self.pid)
    }
}
