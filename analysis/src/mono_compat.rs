//! Low-end mono compatibility (spec §4.2): sub-120 Hz band correlation.

use std::path::Path;

use serde::{Deserialize, Serialize};
use sondeck_probe::{ProbeAdapter, ProbeReading, ProbeRequest};
use strum::{Display, EnumString};

use crate::errors::{AnalysisError, AnalysisResult};
use crate::util::ShortResult;

const LOW_END_HZ: f64 = 120.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum MonoCompatStatus {
    Excellent,
    Good,
    Poor,
    Critical,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonoCompatResult {
    pub low_end_correlation: Option<f64>,
    pub status: MonoCompatStatus,
    pub recommend_bass_to_mono: bool,
}

#[must_use]
pub(crate) fn classify_status(low_end_correlation: Option<f64>) -> MonoCompatStatus {
    let Some(corr) = low_end_correlation else {
        return MonoCompatStatus::Unknown;
    };
    if corr >= 0.9 {
        MonoCompatStatus::Excellent
    } else if corr >= 0.6 {
        MonoCompatStatus::Good
    } else if corr >= 0.2 {
        MonoCompatStatus::Poor
    } else {
        MonoCompatStatus::Critical
    }
}

pub async fn analyze(probe: &dyn ProbeAdapter, path: &Path) -> AnalysisResult<MonoCompatResult> {
    let reading = probe
        .probe(path, ProbeRequest::BandStats { low_hz: 0.0, high_hz: LOW_END_HZ })
        .await?;
    let ProbeReading::BandStats(r) = reading else {
        return Err(AnalysisError::WrongReadingKind);
    };

    let status = classify_status(r.left_right_correlation);
    Ok(MonoCompatResult {
        low_end_correlation: r.left_right_correlation,
        status,
        recommend_bass_to_mono: matches!(status, MonoCompatStatus::Poor | MonoCompatStatus::Critical),
    })
}

#[must_use]
pub fn quick_check(result: &MonoCompatResult) -> ShortResult {
    match result.status {
        MonoCompatStatus::Unknown => ShortResult::unknown("low-end correlation could not be measured"),
        MonoCompatStatus::Critical => {
            ShortResult::failing(result.status.to_string(), "low end will cancel badly when summed to mono")
        }
        other => ShortResult::ok(other.to_string()),
    }
}
