use serde::{Deserialize, Serialize};

/// Which classifier a pass runs
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum DetectionMode {
    /// Five resource families, tiered thresholds only
    #[default]
    Basic,
    /// Thirty anomaly kinds including spikes, leaks and security heuristics
    Extended,
}

impl std::fmt::Display for DetectionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Basic => write!(f, "basic"),
            Self::Extended => write!(f, "extended"),
        }
    }
}

impl std::str::FromStr for DetectionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "basic" => Ok(Self::Basic),
            "extended" | "advanced" => Ok(Self::Extended),
            other => Err(format!(
                "Mode de détection inconnu : '{other}'. Modes valides : basic, extended"
            )),
        }
    }
}
