use serde::{Deserialize, Serialize};

use crate::domain::value_objects::Priority;

/// One remediation step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub priority: Priority,
    pub action: String,
    /// Shell command or manual instruction
    pub command: String,
    pub impact: String,
    pub estimated_time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl Recommendation {
    #[must_use]
    pub fn new(
        priority: Priority,
        action: impl Into<String>,
        command: impl Into<String>,
        impact: impl Into<String>,
        estimated_time: impl Into<String>,
    ) -> Self {
        Self {
            priority,
            action: action.into(),
            command: command.into(),
            impact: impact.into(),
            estimated_time: estimated_time.into(),
            warning: None,
        }
    }

    #[must_use]
    pub fn with_warning(mut self, warning: impl Into<String>) -> Self {
        self.warning = Some(warning.into());
        self
    }
}
