use serde::{Deserialize, Serialize};

use super::entities::MetricsSnapshot;

/// Fixed-capacity FIFO. Once full, each push overwrites the oldest slot.
#[derive(Debug, Clone)]
pub struct RingBuffer<T> {
    slots: Vec<T>,
    capacity: usize,
    /// Index of the next write
    head: usize,
}

impl<T: Clone> RingBuffer<T> {
    /// A zero capacity is raised to one.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            slots: Vec::with_capacity(capacity),
            capacity,
            head: 0,
        }
    }

    pub fn push(&mut self, value: T) {
        if self.slots.len() < self.capacity {
            self.slots.push(value);
        } else {
            self.slots[self.head] = value;
        }
        self.head = (self.head + 1) % self.capacity;
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Oldest to newest
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        let split = if self.slots.len() < self.capacity {
            0
        } else {
            self.head
        };
        self.slots[split..].iter().chain(self.slots[..split].iter())
    }

    #[must_use]
    pub fn latest(&self) -> Option<&T> {
        if self.slots.is_empty() {
            return None;
        }
        let idx = (self.head + self.capacity - 1) % self.capacity;
        self.slots.get(idx)
    }

    #[must_use]
    pub fn to_vec(&self) -> Vec<T> {
        self.iter().cloned().collect()
    }
}

/// Summary of one rolling series
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResourceStats {
    pub current: f64,
    pub average: f64,
    pub min: f64,
    pub max: f64,
    pub samples: usize,
}

impl ResourceStats {
    fn from_series(buffer: &RingBuffer<f64>) -> Option<Self> {
        let current = *buffer.latest()?;
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut sum = 0.0;
        for &v in buffer.iter() {
            min = min.min(v);
            max = max.max(v);
            sum += v;
        }
        #[allow(clippy::cast_precision_loss)]
        let average = sum / buffer.len() as f64;
        Some(Self {
            current,
            average,
            min,
            max,
            samples: buffer.len(),
        })
    }
}

/// Per-resource statistics over the rolling window
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RollingStats {
    pub cpu: Option<ResourceStats>,
    pub memory: Option<ResourceStats>,
    pub disk: Option<ResourceStats>,
}

/// Bounded CPU, memory and disk percent series
#[derive(Debug, Clone)]
pub struct MetricsHistory {
    cpu: RingBuffer<f64>,
    memory: RingBuffer<f64>,
    disk: RingBuffer<f64>,
}

impl MetricsHistory {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            cpu: RingBuffer::new(capacity),
            memory: RingBuffer::new(capacity),
            disk: RingBuffer::new(capacity),
        }
    }

    /// Appends the percentages a snapshot carries. Absent families are skipped.
    pub fn record(&mut self, snapshot: &MetricsSnapshot) {
        if let Some(v) = snapshot.cpu_percent() {
            self.cpu.push(v);
        }
        if let Some(v) = snapshot.memory_percent() {
            self.memory.push(v);
        }
        if let Some(v) = snapshot.disk_percent() {
            self.disk.push(v);
        }
    }

    #[must_use]
    pub fn stats(&self) -> RollingStats {
        RollingStats {
            cpu: ResourceStats::from_series(&self.cpu),
            memory: ResourceStats::from_series(&self.memory),
            disk: ResourceStats::from_series(&self.disk),
        }
    }

    #[must_use]
    pub fn cpu(&self) -> Vec<f64> {
        self.cpu.to_vec()
    }

    #[must_use]
    pub fn memory(&self) -> Vec<f64> {
        self.memory.to_vec()
    }

    #[must_use]
    pub fn disk(&self) -> Vec<f64> {
        self.disk.to_vec()
    }

    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.cpu.capacity()
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use crate::domain::entities::{CpuMetrics, DiskMetrics};
    use proptest::prelude::*;

    #[test]
    fn push_below_capacity_keeps_order() {
        let mut ring = RingBuffer::new(3);
        ring.push(1);
        ring.push(2);
        assert_eq!(ring.to_vec(), vec![1, 2]);
        assert_eq!(ring.latest(), Some(&2));
    }

    #[test]
    fn wraparound_evicts_oldest() {
        let mut ring = RingBuffer::new(3);
        for i in 1..=5 {
            ring.push(i);
        }
        assert_eq!(ring.len(), 3);
        assert_eq!(ring.to_vec(), vec![3, 4, 5]);
        assert_eq!(ring.latest(), Some(&5));
    }

    #[test]
    fn zero_capacity_is_raised() {
        let mut ring = RingBuffer::new(0);
        ring.push('a');
        ring.push('b');
        assert_eq!(ring.capacity(), 1);
        assert_eq!(ring.to_vec(), vec!['b']);
    }

    #[test]
    fn empty_ring_has_no_latest() {
        let ring: RingBuffer<u8> = RingBuffer::new(4);
        assert!(ring.is_empty());
        assert!(ring.latest().is_none());
    }

    #[test]
    fn stats_over_window() {
        let mut history = MetricsHistory::new(3);
        for cpu in [10.0, 20.0, 30.0, 60.0] {
            history.record(&MetricsSnapshot {
                cpu: Some(CpuMetrics {
                    percent: cpu,
                    ..CpuMetrics::default()
                }),
                ..MetricsSnapshot::default()
            });
        }
        let stats = history.stats();
        let cpu = stats.cpu.expect("cpu stats");
        assert!((cpu.current - 60.0).abs() < f64::EPSILON);
        assert!((cpu.min - 20.0).abs() < f64::EPSILON);
        assert!((cpu.max - 60.0).abs() < f64::EPSILON);
        assert!((cpu.average - 110.0 / 3.0).abs() < 1e-9);
        assert_eq!(cpu.samples, 3);
        assert!(stats.memory.is_none());
    }

    #[test]
    fn record_skips_missing_families() {
        let mut history = MetricsHistory::new(5);
        history.record(&MetricsSnapshot {
            disk: Some(DiskMetrics {
                percent: 42.0,
                ..DiskMetrics::default()
            }),
            ..MetricsSnapshot::default()
        });
        assert!(history.cpu().is_empty());
        assert_eq!(history.disk(), vec![42.0]);
    }

    proptest! {
        #[test]
        fn never_exceeds_capacity_and_keeps_newest(cap in 1usize..20, values in proptest::collection::vec(0u32..1000, 0..60)) {
            let mut ring = RingBuffer::new(cap);
            for v in &values {
                ring.push(*v);
            }
            prop_assert!(ring.len() <= cap);
            let skip = values.len().saturating_sub(cap);
            prop_assert_eq!(ring.to_vec(), values[skip..].to_vec());
        }
    }
}
