pub mod commands;
pub mod health;
pub mod recommendations;
pub mod root_cause;

pub use commands::{provider_for, CommandProvider, ShellCommand};
pub use health::{health_score, health_score_for};
pub use recommendations::RecommendationEngine;
pub use root_cause::resolve;

use crate::domain::entities::{Anomaly, AnomalyAnalysis, MetricsSnapshot};

/// Explains and advises on every anomaly, keeping input order so that
/// `result[i].anomaly == anomalies[i]`.
#[must_use]
pub fn analyze(
    anomalies: &[Anomaly],
    snapshot: &MetricsSnapshot,
    engine: &RecommendationEngine,
) -> Vec<AnomalyAnalysis> {
    anomalies
        .iter()
        .map(|anomaly| {
            let root_cause = resolve(anomaly, snapshot);
            let recommendations = engine.recommend(anomaly, &root_cause, snapshot);
            AnomalyAnalysis {
                anomaly: anomaly.clone(),
                root_cause,
                recommendations,
            }
        })
        .collect()
}
