//! Mono fold-down simulator (spec §4.2): predicts what happens when the
//! stereo image is summed to mono, independent of the stereo-width
//! analyzer which only measures the image as-is.

use std::path::Path;

use serde::{Deserialize, Serialize};
use sondeck_probe::{ProbeAdapter, ProbeReading, ProbeRequest};
use strum::{Display, EnumString};

use crate::errors::{AnalysisError, AnalysisResult};
use crate::util::ShortResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum FoldDownStatus {
    Safe,
    MinorLoss,
    SignificantLoss,
    SevereCancellation,
    Unknown,
}

/// `(low_hz, high_hz)` bands the simulator checks band-limited correlation
/// against; mirrors the bands a mastering engineer would solo while
/// checking mono compatibility by ear.
const BANDS: [(f64, f64); 3] = [(20.0, 120.0), (120.0, 2_000.0), (2_000.0, 20_000.0)];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BandGainChange {
    pub low_hz: f64,
    pub high_hz: f64,
    pub predicted_gain_change_db: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoldDownResult {
    pub overall_correlation: Option<f64>,
    pub status: FoldDownStatus,
    pub band_gain_changes: Vec<BandGainChange>,
}

/// A correlation of `c` loses `-10*log10((1+c)/2)` dB when folded to mono
/// and renormalized (perfect correlation = no loss; anti-correlation = -inf,
/// clamped to a large negative value for display).
#[must_use]
pub(crate) fn predicted_gain_change_db(correlation: Option<f64>) -> Option<f64> {
    correlation.map(|c| {
        let power_ratio = ((1.0 + c.clamp(-1.0, 1.0)) / 2.0).max(1e-6);
        -10.0 * power_ratio.log10()
    })
}

#[must_use]
pub(crate) fn classify_status(overall_correlation: Option<f64>) -> FoldDownStatus {
    let Some(c) = overall_correlation else {
        return FoldDownStatus::Unknown;
    };
    if c >= 0.7 {
        FoldDownStatus::Safe
    } else if c >= 0.3 {
        FoldDownStatus::MinorLoss
    } else if c >= -0.3 {
        FoldDownStatus::SignificantLoss
    } else {
        FoldDownStatus::SevereCancellation
    }
}

pub async fn analyze(probe: &dyn ProbeAdapter, path: &Path) -> AnalysisResult<FoldDownResult> {
    let overall = probe.probe(path, ProbeRequest::PhaseCorrelation).await?;
    let ProbeReading::PhaseCorrelation(overall) = overall else {
        return Err(AnalysisError::WrongReadingKind);
    };

    let mut band_gain_changes = Vec::with_capacity(BANDS.len());
    for (low_hz, high_hz) in BANDS {
        let reading = probe.probe(path, ProbeRequest::BandStats { low_hz, high_hz }).await?;
        let ProbeReading::BandStats(r) = reading else {
            return Err(AnalysisError::WrongReadingKind);
        };
        band_gain_changes.push(BandGainChange {
            low_hz,
            high_hz,
            predicted_gain_change_db: predicted_gain_change_db(r.left_right_correlation),
        });
    }

    Ok(FoldDownResult {
        overall_correlation: overall.correlation,
        status: classify_status(overall.correlation),
        band_gain_changes,
    })
}

#[must_use]
pub fn quick_check(result: &FoldDownResult) -> ShortResult {
    match result.status {
        FoldDownStatus::Unknown => ShortResult::unknown("fold-down correlation could not be measured"),
        FoldDownStatus::SevereCancellation => {
            ShortResult::failing(result.status.to_string(), "mono fold-down will cause severe cancellation")
        }
        other => ShortResult::ok(other.to_string()),
    }
}
