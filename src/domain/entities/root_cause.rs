use serde::{Deserialize, Serialize};

/// Explanation attached to an anomaly
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RootCause {
    /// Resolver family, e.g. `cpu_high` for both CPU tiers
    pub kind: String,
    pub cause: String,
    pub details: String,
    pub affected_components: Vec<String>,
    pub severity_factors: Vec<String>,
    /// Two or three fixed stages
    pub timeline: Vec<String>,
}
