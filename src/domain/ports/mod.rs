pub mod collector;
pub mod sink;
pub mod store;

pub use collector::{CollectionError, MetricsProvider};
pub use sink::{ReportSink, SinkError};
pub use store::{StoreError, ThresholdStore};
