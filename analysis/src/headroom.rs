//! Headroom estimation from peak, with per-use-case max-gain suggestions
//! (spec §4.2).

use std::path::Path;

use serde::{Deserialize, Serialize};
use sondeck_probe::{ProbeAdapter, ProbeReading, ProbeRequest};
use strum::{Display, EnumString};

use crate::errors::{AnalysisError, AnalysisResult};
use crate::util::{resolve_peak, ShortResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum HeadroomStatus {
    Clipped,
    Critical,
    Limited,
    Adequate,
    Generous,
    Excessive,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MaxGainTargets {
    pub streaming_dbtp: f64,
    pub broadcast_dbtp: f64,
    pub mastering_dbtp: f64,
}

impl Default for MaxGainTargets {
    fn default() -> Self {
        Self { streaming_dbtp: -1.0, broadcast_dbtp: -2.0, mastering_dbtp: -1.0 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeadroomResult {
    pub headroom_db: Option<f64>,
    pub status: HeadroomStatus,
    pub max_gain_streaming_db: Option<f64>,
    pub max_gain_broadcast_db: Option<f64>,
    pub max_gain_mastering_db: Option<f64>,
}

#[must_use]
pub(crate) fn classify_status(headroom_db: Option<f64>) -> HeadroomStatus {
    let Some(h) = headroom_db else {
        return HeadroomStatus::Unknown;
    };
    if h <= 0.0 {
        HeadroomStatus::Clipped
    } else if h <= 0.5 {
        HeadroomStatus::Critical
    } else if h <= 3.0 {
        HeadroomStatus::Limited
    } else if h <= 6.0 {
        HeadroomStatus::Adequate
    } else if h <= 12.0 {
        HeadroomStatus::Generous
    } else {
        HeadroomStatus::Excessive
    }
}

pub async fn analyze(
    probe: &dyn ProbeAdapter,
    path: &Path,
    targets: MaxGainTargets,
) -> AnalysisResult<HeadroomResult> {
    let reading = probe.probe(path, ProbeRequest::OverallStats).await?;
    let ProbeReading::OverallStats(r) = reading else {
        return Err(AnalysisError::WrongReadingKind);
    };

    let peak = resolve_peak(r.sample_peak_dbfs, r.true_peak_dbtp);
    let headroom_db = peak.map(|p| -p);
    let status = classify_status(headroom_db);

    Ok(HeadroomResult {
        headroom_db,
        status,
        max_gain_streaming_db: peak.map(|p| targets.streaming_dbtp - p),
        max_gain_broadcast_db: peak.map(|p| targets.broadcast_dbtp - p),
        max_gain_mastering_db: peak.map(|p| targets.mastering_dbtp - p),
    })
}

#[must_use]
pub fn quick_check(result: &HeadroomResult) -> ShortResult {
    match result.status {
        HeadroomStatus::Unknown => ShortResult::unknown("peak could not be measured"),
        HeadroomStatus::Clipped | HeadroomStatus::Critical => {
            ShortResult::failing(result.status.to_string(), "insufficient headroom for further processing")
        }
        other => ShortResult::ok(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case(Some(-0.5), HeadroomStatus::Clipped)]
    #[case(Some(0.0), HeadroomStatus::Clipped)]
    #[case(Some(0.3), HeadroomStatus::Critical)]
    #[case(Some(2.0), HeadroomStatus::Limited)]
    #[case(Some(5.0), HeadroomStatus::Adequate)]
    #[case(Some(10.0), HeadroomStatus::Generous)]
    #[case(Some(15.0), HeadroomStatus::Excessive)]
    #[case(None, HeadroomStatus::Unknown)]
    fn classifies_across_thresholds(#[case] headroom: Option<f64>, #[case] expected: HeadroomStatus) {
        assert_eq!(classify_status(headroom), expected);
    }
}
