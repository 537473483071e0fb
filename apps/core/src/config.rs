//! Hub configuration.
//!
//! Defaults reproduce the product's uploader widget. Every field can be
//! overridden from `AGRIPILOT_*` environment variables (a `.env` file is
//! loaded by the binary before `HubConfig::from_env` runs).

use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;
use validator::Validate;

pub const DEFAULT_ALLOWED_TYPES: &[&str] = &[
    "application/pdf",
    "text/csv",
    "application/vnd.ms-excel",
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    "image/jpeg",
    "image/png",
];

/// Settings the embedding page passes to an upload orchestrator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct UploaderConfig {
    /// Per-file size ceiling in megabytes (MiB).
    #[validate(range(min = 1, max = 1024))]
    pub max_size_mb: u64,
    /// Accepted MIME types. Empty disables the type check.
    pub allowed_types: Vec<String>,
    /// Whether more than one file is processed per batch.
    pub multiple: bool,
    /// Interval between simulated progress increments.
    #[serde(with = "millis")]
    pub progress_tick: Duration,
    /// How long the completed state stays visible before resetting to idle.
    #[serde(with = "millis")]
    pub reset_delay: Duration,
}

impl UploaderConfig {
    /// Size ceiling in bytes, saturating for unvalidated oversized limits.
    pub fn max_size_bytes(&self) -> u64 {
        self.max_size_mb.saturating_mul(1024 * 1024)
    }
}

impl Default for UploaderConfig {
    fn default() -> Self {
        Self {
            max_size_mb: 10,
            allowed_types: DEFAULT_ALLOWED_TYPES.iter().map(|s| s.to_string()).collect(),
            multiple: false,
            progress_tick: Duration::from_millis(300),
            reset_delay: Duration::from_millis(1000),
        }
    }
}

/// How the analysis simulator picks an archetype.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisMode {
    /// Archetype follows the module detected at upload time.
    Deterministic,
    /// Archetype drawn at random once per upload identifier.
    Random,
}

impl FromStr for AnalysisMode {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "deterministic" => Ok(AnalysisMode::Deterministic),
            "random" => Ok(AnalysisMode::Random),
            other => Err(AppError::Config(format!("Unknown analysis mode: {}", other))),
        }
    }
}

/// Latencies and failure injection of the simulators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct SimulationConfig {
    #[serde(with = "millis")]
    pub upload_latency: Duration,
    #[serde(with = "millis")]
    pub analysis_latency: Duration,
    /// Time the decision-support assistant takes to answer.
    #[serde(with = "millis")]
    pub assistant_latency: Duration,
    pub analysis_mode: AnalysisMode,
    /// Probability that a simulated call fails.
    #[validate(range(min = 0.0, max = 1.0))]
    pub failure_rate: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            upload_latency: Duration::from_millis(1500),
            analysis_latency: Duration::from_millis(2000),
            assistant_latency: Duration::from_millis(2000),
            analysis_mode: AnalysisMode::Deterministic,
            failure_rate: 0.0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct HubConfig {
    #[validate(nested)]
    pub uploader: UploaderConfig,
    #[validate(nested)]
    pub simulation: SimulationConfig,
}

impl HubConfig {
    /// Defaults overridden by any `AGRIPILOT_*` variable present.
    pub fn from_env() -> Result<Self, AppError> {
        let mut config = Self::default();
        let uploader = &mut config.uploader;
        let simulation = &mut config.simulation;

        if let Some(v) = env_parse::<u64>("AGRIPILOT_MAX_SIZE_MB")? {
            uploader.max_size_mb = v;
        }
        if let Ok(raw) = std::env::var("AGRIPILOT_ALLOWED_TYPES") {
            uploader.allowed_types = raw
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect();
        }
        if let Some(v) = env_parse::<bool>("AGRIPILOT_MULTIPLE")? {
            uploader.multiple = v;
        }
        if let Some(ms) = env_parse::<u64>("AGRIPILOT_PROGRESS_TICK_MS")? {
            uploader.progress_tick = Duration::from_millis(ms);
        }
        if let Some(ms) = env_parse::<u64>("AGRIPILOT_RESET_DELAY_MS")? {
            uploader.reset_delay = Duration::from_millis(ms);
        }
        if let Some(ms) = env_parse::<u64>("AGRIPILOT_UPLOAD_LATENCY_MS")? {
            simulation.upload_latency = Duration::from_millis(ms);
        }
        if let Some(ms) = env_parse::<u64>("AGRIPILOT_ANALYSIS_LATENCY_MS")? {
            simulation.analysis_latency = Duration::from_millis(ms);
        }
        if let Some(ms) = env_parse::<u64>("AGRIPILOT_ASSISTANT_LATENCY_MS")? {
            simulation.assistant_latency = Duration::from_millis(ms);
        }
        if let Ok(raw) = std::env::var("AGRIPILOT_ANALYSIS_MODE") {
            simulation.analysis_mode = raw.parse()?;
        }
        if let Some(v) = env_parse::<f64>("AGRIPILOT_FAILURE_RATE")? {
            simulation.failure_rate = v;
        }

        config.validate()?;
        Ok(config)
    }
}

fn env_parse<T>(key: &str) -> Result<Option<T>, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| AppError::Config(format!("{}={:?}: {}", key, raw, e))),
        Err(_) => Ok(None),
    }
}

mod millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_millis)
    }
}
