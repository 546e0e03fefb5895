use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Resource a threshold applies to
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Resource {
    Cpu,
    Memory,
    Swap,
    Disk,
    DiskIo,
    NetworkErrors,
    ZombieProcesses,
    ProcessCount,
    ProcessCpu,
    ProcessMemory,
    LoadAverage,
    FileHandles,
}

impl Resource {
    pub const ALL: [Self; 12] = [
        Self::Cpu,
        Self::Memory,
        Self::Swap,
        Self::Disk,
        Self::DiskIo,
        Self::NetworkErrors,
        Self::ZombieProcesses,
        Self::ProcessCount,
        Self::ProcessCpu,
        Self::ProcessMemory,
        Self::LoadAverage,
        Self::FileHandles,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cpu => "cpu",
            Self::Memory => "memory",
            Self::Swap => "swap",
            Self::Disk => "disk",
            Self::DiskIo => "disk_io",
            Self::NetworkErrors => "network_errors",
            Self::ZombieProcesses => "zombie_processes",
            Self::ProcessCount => "process_count",
            Self::ProcessCpu => "process_cpu",
            Self::ProcessMemory => "process_memory",
            Self::LoadAverage => "load_average",
            Self::FileHandles => "file_handles",
        }
    }
}

impl std::fmt::Display for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Resource {
    type Err = ThresholdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.to_lowercase();
        Self::ALL
            .into_iter()
            .find(|r| r.as_str() == lowered)
            .ok_or(ThresholdError::UnknownResource(lowered))
    }
}

/// Tier of a threshold
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Warning,
    Critical,
    /// CPU only, extended classifier
    Spike,
    /// Memory only, extended classifier
    Leak,
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Warning => write!(f, "warning"),
            Self::Critical => write!(f, "critical"),
            Self::Spike => write!(f, "spike"),
            Self::Leak => write!(f, "leak"),
        }
    }
}

impl std::str::FromStr for Level {
    type Err = ThresholdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "warning" | "warn" | "high" => Ok(Self::Warning),
            "critical" | "crit" => Ok(Self::Critical),
            "spike" => Ok(Self::Spike),
            "leak" => Ok(Self::Leak),
            other => Err(ThresholdError::UnknownLevel(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ThresholdError {
    #[error("Valeur de seuil négative pour {resource}.{level} : {value}")]
    Negative {
        resource: Resource,
        level: Level,
        value: f64,
    },
    #[error("Valeur de seuil non finie pour {resource}.{level}")]
    NotFinite { resource: Resource, level: Level },
    #[error("La ressource {resource} ne possède pas de niveau {level}")]
    UnsupportedLevel { resource: Resource, level: Level },
    #[error("Ressource inconnue : '{0}'")]
    UnknownResource(String),
    #[error("Niveau inconnu : '{0}'. Niveaux valides : warning, critical, spike, leak")]
    UnknownLevel(String),
}

/// Warning bound plus an optional critical bound
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TierBounds {
    pub warning: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub critical: Option<f64>,
}

impl TierBounds {
    #[must_use]
    pub const fn tiered(warning: f64, critical: f64) -> Self {
        Self {
            warning,
            critical: Some(critical),
        }
    }

    #[must_use]
    pub const fn single(warning: f64) -> Self {
        Self {
            warning,
            critical: None,
        }
    }
}

/// Threshold table read by the classifiers.
///
/// Scalars are declared before the per-resource tables so the TOML
/// serializer never emits a bare key after a table header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThresholdSet {
    pub cpu_spike: f64,
    pub memory_leak: f64,
    pub cpu: TierBounds,
    pub memory: TierBounds,
    pub swap: TierBounds,
    pub disk: TierBounds,
    /// MB/s, applied to read and write rates independently
    pub disk_io: TierBounds,
    pub network_errors: TierBounds,
    pub zombie_processes: TierBounds,
    pub process_count: TierBounds,
    pub process_cpu: TierBounds,
    pub process_memory: TierBounds,
    /// Multiplied by the logical CPU count
    pub load_average: TierBounds,
    pub file_handles: TierBounds,
}

impl Default for ThresholdSet {
    fn default() -> Self {
        Self {
            cpu_spike: 90.0,
            memory_leak: 70.0,
            cpu: TierBounds::tiered(80.0, 95.0),
            memory: TierBounds::tiered(85.0, 95.0),
            swap: TierBounds::tiered(50.0, 80.0),
            disk: TierBounds::tiered(90.0, 95.0),
            disk_io: TierBounds::single(80.0),
            network_errors: TierBounds::single(100.0),
            zombie_processes: TierBounds::single(5.0),
            process_count: TierBounds::single(500.0),
            process_cpu: TierBounds::single(50.0),
            process_memory: TierBounds::single(30.0),
            load_average: TierBounds::single(2.0),
            file_handles: TierBounds::single(10_000.0),
        }
    }
}

impl ThresholdSet {
    const fn bounds(&self, resource: Resource) -> &TierBounds {
        match resource {
            Resource::Cpu => &self.cpu,
            Resource::Memory => &self.memory,
            Resource::Swap => &self.swap,
            Resource::Disk => &self.disk,
            Resource::DiskIo => &self.disk_io,
            Resource::NetworkErrors => &self.network_errors,
            Resource::ZombieProcesses => &self.zombie_processes,
            Resource::ProcessCount => &self.process_count,
            Resource::ProcessCpu => &self.process_cpu,
            Resource::ProcessMemory => &self.process_memory,
            Resource::LoadAverage => &self.load_average,
            Resource::FileHandles => &self.file_handles,
        }
    }

    fn bounds_mut(&mut self, resource: Resource) -> &mut TierBounds {
        match resource {
            Resource::Cpu => &mut self.cpu,
            Resource::Memory => &mut self.memory,
            Resource::Swap => &mut self.swap,
            Resource::Disk => &mut self.disk,
            Resource::DiskIo => &mut self.disk_io,
            Resource::NetworkErrors => &mut self.network_errors,
            Resource::ZombieProcesses => &mut self.zombie_processes,
            Resource::ProcessCount => &mut self.process_count,
            Resource::ProcessCpu => &mut self.process_cpu,
            Resource::ProcessMemory => &mut self.process_memory,
            Resource::LoadAverage => &mut self.load_average,
            Resource::FileHandles => &mut self.file_handles,
        }
    }

    /// Returns the bound for `resource` at `level`, or `None` when the
    /// resource does not carry that level.
    #[must_use]
    pub const fn get(&self, resource: Resource, level: Level) -> Option<f64> {
        match (resource, level) {
            (Resource::Cpu, Level::Spike) => Some(self.cpu_spike),
            (Resource::Memory, Level::Leak) => Some(self.memory_leak),
            (_, Level::Spike | Level::Leak) => None,
            (_, Level::Warning) => Some(self.bounds(resource).warning),
            (_, Level::Critical) => self.bounds(resource).critical,
        }
    }

    /// Updates a single bound.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is negative or not finite, or if the
    /// resource does not carry `level`. The table is left unchanged.
    pub fn set(&mut self, resource: Resource, level: Level, value: f64) -> Result<(), ThresholdError> {
        if !value.is_finite() {
            return Err(ThresholdError::NotFinite { resource, level });
        }
        if value < 0.0 {
            return Err(ThresholdError::Negative {
                resource,
                level,
                value,
            });
        }
        if self.get(resource, level).is_none() {
            return Err(ThresholdError::UnsupportedLevel { resource, level });
        }
        match level {
            Level::Spike => self.cpu_spike = value,
            Level::Leak => self.memory_leak = value,
            Level::Warning => self.bounds_mut(resource).warning = value,
            Level::Critical => self.bounds_mut(resource).critical = Some(value),
        }
        Ok(())
    }

    /// Every bound the table carries, in resource order.
    #[must_use]
    pub fn entries(&self) -> Vec<(Resource, Level, f64)> {
        let mut out = Vec::new();
        for resource in Resource::ALL {
            for level in [Level::Warning, Level::Critical, Level::Spike, Level::Leak] {
                if let Some(value) = self.get(resource, level) {
                    out.push((resource, level, value));
                }
            }
        }
        out
    }

    /// Checks every bound with the same rules as [`ThresholdSet::set`].
    ///
    /// # Errors
    ///
    /// Returns the first invalid bound found.
    pub fn validate(&self) -> Result<(), ThresholdError> {
        for (resource, level, value) in self.entries() {
            if !value.is_finite() {
                return Err(ThresholdError::NotFinite { resource, level });
            }
            if value < 0.0 {
                return Err(ThresholdError::Negative {
                    resource,
                    level,
                    value,
                });
            }
        }
        Ok(())
    }
}
