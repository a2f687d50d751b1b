//! Stereo-width analyzer (supplement, §4.2): measures the image as it
//! currently stands, independent of the fold-down simulator's *predicted
//! post-fold* behavior.

use std::path::Path;

use serde::{Deserialize, Serialize};
use sondeck_probe::{ProbeAdapter, ProbeReading, ProbeRequest};
use strum::{Display, EnumString};

use crate::errors::{AnalysisError, AnalysisResult};
use crate::util::ShortResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum WidthStatus {
    Narrow,
    Normal,
    Wide,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StereoWidthResult {
    pub width: Option<f64>,
    pub balance: Option<f64>,
    pub status: WidthStatus,
}

/// Width derived from correlation: `width = 1 - correlation`, in `[0,2]`,
/// clamped and renormalized to `[0,1]` for display.
#[must_use]
pub(crate) fn width_from_correlation(correlation: Option<f64>) -> Option<f64> {
    correlation.map(|c| ((1.0 - c.clamp(-1.0, 1.0)) / 2.0).clamp(0.0, 1.0))
}

#[must_use]
pub(crate) fn classify_status(width: Option<f64>) -> WidthStatus {
    let Some(w) = width else {
        return WidthStatus::Unknown;
    };
    if w < 0.2 {
        WidthStatus::Narrow
    } else if w <= 0.7 {
        WidthStatus::Normal
    } else {
        WidthStatus::Wide
    }
}

pub async fn analyze(probe: &dyn ProbeAdapter, path: &Path) -> AnalysisResult<StereoWidthResult> {
    let reading = probe.probe(path, ProbeRequest::PhaseCorrelation).await?;
    let ProbeReading::PhaseCorrelation(r) = reading else {
        return Err(AnalysisError::WrongReadingKind);
    };

    let width = width_from_correlation(r.correlation);
    Ok(StereoWidthResult { width, balance: r.mid_side_energy_ratio, status: classify_status(width) })
}

#[must_use]
pub fn quick_check(result: &StereoWidthResult) -> ShortResult {
    match result.status {
        WidthStatus::Unknown => ShortResult::unknown("stereo width could not be measured"),
        other => ShortResult::ok(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn full_correlation_is_narrow() {
        let width = width_from_correlation(Some(1.0));
        assert_eq!(classify_status(width), WidthStatus::Narrow);
    }

    #[test]
    fn anti_correlation_is_wide() {
        let width = width_from_correlation(Some(-1.0));
        assert_eq!(classify_status(width), WidthStatus::Wide);
    }
}
