use crate::domain::entities::MetricsSnapshot;

const CPU_KNEE: f64 = 60.0;
const CPU_WEIGHT: f64 = 0.6;
const MEMORY_KNEE: f64 = 70.0;
const MEMORY_WEIGHT: f64 = 0.5;
const DISK_KNEE: f64 = 75.0;
const DISK_WEIGHT: f64 = 0.4;
const IDLE_BONUS: f64 = 5.0;

/// Overall health in `[0, 100]`. Each resource loses points linearly past
/// its knee; a mostly idle host earns a small bonus, capped at 100.
#[must_use]
pub fn health_score(cpu: f64, memory: f64, disk: f64) -> u8 {
    let mut score = 100.0
        - (cpu - CPU_KNEE).max(0.0) * CPU_WEIGHT
        - (memory - MEMORY_KNEE).max(0.0) * MEMORY_WEIGHT
        - (disk - DISK_KNEE).max(0.0) * DISK_WEIGHT;
    if cpu < 40.0 && memory < 50.0 {
        score = (score + IDLE_BONUS).min(100.0);
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let rounded = score.clamp(0.0, 100.0).round() as u8;
    rounded
}

/// Missing families count as zero usage.
#[must_use]
pub fn health_score_for(snapshot: &MetricsSnapshot) -> u8 {
    health_score(
        snapshot.cpu_percent().unwrap_or(0.0),
        snapshot.memory_percent().unwrap_or(0.0),
        snapshot.disk_percent().unwrap_or(0.0),
    )
}
