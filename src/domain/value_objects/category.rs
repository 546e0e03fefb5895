use serde::{Deserialize, Serialize};

/// Functional area an anomaly belongs to
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Performance,
    Storage,
    Network,
    Stability,
    Security,
    System,
    Processes,
}

impl Category {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Performance => "performance",
            Self::Storage => "storage",
            Self::Network => "network",
            Self::Stability => "stability",
            Self::Security => "security",
            Self::System => "system",
            Self::Processes => "processes",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
