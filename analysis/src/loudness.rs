//! Integrated loudness against a caller-supplied target (spec §4.2).

use std::path::Path;

use serde::{Deserialize, Serialize};
use sondeck_probe::{ProbeAdapter, ProbeReading, ProbeRequest};
use strum::{Display, EnumString};

use crate::errors::{AnalysisError, AnalysisResult};
use crate::util::ShortResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum LoudnessStatus {
    TooLoud,
    OnTarget,
    TooQuiet,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoudnessTarget {
    pub target_lufs: f64,
    pub tolerance_lu: f64,
}

impl Default for LoudnessTarget {
    fn default() -> Self {
        Self { target_lufs: -14.0, tolerance_lu: 1.0 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoudnessResult {
    pub integrated_lufs: Option<f64>,
    pub momentary_max_lufs: Option<f64>,
    pub short_term_max_lufs: Option<f64>,
    pub loudness_range_lu: Option<f64>,
    pub status: LoudnessStatus,
    pub required_gain_db: Option<f64>,
}

/// Pure ladder lookup, independently unit-testable without a probe round-trip.
#[must_use]
pub(crate) fn classify_status(integrated_lufs: Option<f64>, target: LoudnessTarget) -> LoudnessStatus {
    let Some(lufs) = integrated_lufs else {
        return LoudnessStatus::Unknown;
    };
    let delta = lufs - target.target_lufs;
    if delta > target.tolerance_lu {
        LoudnessStatus::TooLoud
    } else if delta < -target.tolerance_lu {
        LoudnessStatus::TooQuiet
    } else {
        LoudnessStatus::OnTarget
    }
}

pub async fn analyze(
    probe: &dyn ProbeAdapter,
    path: &Path,
    target: LoudnessTarget,
) -> AnalysisResult<LoudnessResult> {
    let reading = probe.probe(path, ProbeRequest::LoudnessR128).await?;
    let ProbeReading::LoudnessR128(r) = reading else {
        return Err(AnalysisError::WrongReadingKind);
    };

    let status = classify_status(r.integrated_lufs, target);
    let required_gain_db = r.integrated_lufs.map(|l| target.target_lufs - l);

    Ok(LoudnessResult {
        integrated_lufs: r.integrated_lufs,
        momentary_max_lufs: r.momentary_max_lufs,
        short_term_max_lufs: r.short_term_max_lufs,
        loudness_range_lu: r.loudness_range_lu,
        status,
        required_gain_db,
    })
}

#[must_use]
pub fn quick_check(result: &LoudnessResult) -> ShortResult {
    match result.status {
        LoudnessStatus::OnTarget => ShortResult::ok("ON_TARGET"),
        LoudnessStatus::Unknown => ShortResult::unknown("loudness could not be measured"),
        other => ShortResult::failing(other.to_string(), "integrated loudness is off target"),
    }
}
