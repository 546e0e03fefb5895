pub mod anomaly_kind;
pub mod category;
pub mod detection_mode;
pub mod platform;
pub mod priority;
pub mod severity;
pub mod thresholds;

pub use anomaly_kind::AnomalyKind;
pub use category::Category;
pub use detection_mode::DetectionMode;
pub use platform::Platform;
pub use priority::Priority;
pub use severity::Severity;
pub use thresholds::{Level, Resource, ThresholdError, ThresholdSet, TierBounds};
