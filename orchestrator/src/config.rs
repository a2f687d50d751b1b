//! Aggregated process-wide settings (spec §6), resolved once at startup.
//!
//! Mirrors the teacher's `core/src/config.rs`: one sub-struct per config
//! table, composed through the `config` crate's layered `File` +
//! `Environment` sources.

use std::path::PathBuf;
use std::str::FromStr;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use sondeck_compliance::PlatformId;

pub static DEFAULT_CONFIG: &str = include_str!("../Sondeck.toml");

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Settings {
    #[serde(default)]
    pub probe: ProbeSettings,
    #[serde(default)]
    pub calibration: CalibrationSettings,
    #[serde(default)]
    pub inference: InferenceSettings,
    #[serde(default)]
    pub drift: DriftSettings,
    #[serde(default)]
    pub compliance: ComplianceSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            probe: ProbeSettings::default(),
            calibration: CalibrationSettings::default(),
            inference: InferenceSettings::default(),
            drift: DriftSettings::default(),
            compliance: ComplianceSettings::default(),
        }
    }
}

impl Settings {
    /// Loads settings from an optional config file layered under a built-in
    /// default, then `SONDECK_`-prefixed environment variables.
    ///
    /// # Errors
    /// Returns an error if `config_path` is set but unreadable, or if any
    /// source fails to deserialize into `Settings`.
    pub fn init(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder().add_source(File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml));

        if let Some(path) = config_path {
            builder = builder.add_source(File::from(path));
        }

        let built = builder.add_source(Environment::with_prefix("SONDECK").separator("__")).build()?;

        built.try_deserialize()
    }
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
pub struct ProbeSettings {
    #[serde(default = "default_max_file_size_bytes")]
    pub max_file_size_bytes: u64,
    #[serde(default = "default_probe_timeout_ms")]
    pub probe_timeout_ms: u64,
    #[serde(default = "default_max_probe_concurrency")]
    pub max_probe_concurrency: usize,
}

const fn default_max_file_size_bytes() -> u64 {
    500 * 1024 * 1024
}
const fn default_probe_timeout_ms() -> u64 {
    30_000
}
const fn default_max_probe_concurrency() -> usize {
    17
}

impl Default for ProbeSettings {
    fn default() -> Self {
        Self {
            max_file_size_bytes: default_max_file_size_bytes(),
            probe_timeout_ms: default_probe_timeout_ms(),
            max_probe_concurrency: default_max_probe_concurrency(),
        }
    }
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
pub struct CalibrationSettings {
    #[serde(default = "default_min_floor")]
    pub min_floor: f64,
    #[serde(default = "default_max_ceiling")]
    pub max_ceiling: f64,
    #[serde(default = "default_max_overconfidence")]
    pub max_overconfidence: f64,
}

const fn default_min_floor() -> f64 {
    0.35
}
const fn default_max_ceiling() -> f64 {
    0.95
}
const fn default_max_overconfidence() -> f64 {
    0.10
}

impl Default for CalibrationSettings {
    fn default() -> Self {
        Self { min_floor: default_min_floor(), max_ceiling: default_max_ceiling(), max_overconfidence: default_max_overconfidence() }
    }
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
pub struct InferenceSettings {
    #[serde(default = "default_one")]
    pub log_after: u32,
    #[serde(default = "default_one")]
    pub fallback_after: u32,
    #[serde(default = "default_alert_after")]
    pub alert_after: u32,
    #[serde(default = "default_circuit_break_after")]
    pub circuit_break_after: u32,
    #[serde(default = "default_circuit_break_duration_ms")]
    pub circuit_break_duration_ms: u64,
}

const fn default_one() -> u32 {
    1
}
const fn default_alert_after() -> u32 {
    3
}
const fn default_circuit_break_after() -> u32 {
    5
}
const fn default_circuit_break_duration_ms() -> u64 {
    60_000
}

impl Default for InferenceSettings {
    fn default() -> Self {
        Self {
            log_after: default_one(),
            fallback_after: default_one(),
            alert_after: default_alert_after(),
            circuit_break_after: default_circuit_break_after(),
            circuit_break_duration_ms: default_circuit_break_duration_ms(),
        }
    }
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
pub struct DriftSettings {
    #[serde(default = "default_drift_minor")]
    pub minor: f64,
    #[serde(default = "default_drift_significant")]
    pub significant: f64,
    #[serde(default = "default_drift_ood")]
    pub ood: f64,
}

const fn default_drift_minor() -> f64 {
    1.5
}
const fn default_drift_significant() -> f64 {
    2.5
}
const fn default_drift_ood() -> f64 {
    4.0
}

impl Default for DriftSettings {
    fn default() -> Self {
        Self { minor: default_drift_minor(), significant: default_drift_significant(), ood: default_drift_ood() }
    }
}

/// Holds the raw platform identifiers as configured; `COMPLIANCE.PLATFORMS`
/// selects a subset of the frozen table (§6), it never defines new entries.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct ComplianceSettings {
    #[serde(default = "default_platforms")]
    pub platforms: Vec<String>,
}

fn default_platforms() -> Vec<String> {
    vec!["spotify".to_string(), "apple-music".to_string(), "youtube-music".to_string()]
}

impl Default for ComplianceSettings {
    fn default() -> Self {
        Self { platforms: default_platforms() }
    }
}

impl ComplianceSettings {
    /// Parses the configured platform names, silently dropping any that
    /// don't match the frozen table rather than failing the whole load.
    #[must_use]
    pub fn platform_ids(&self) -> Vec<PlatformId> {
        self.platforms.iter().filter_map(|name| PlatformId::from_str(name).ok()).collect()
    }
}
