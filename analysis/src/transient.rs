//! Transient sharpness (spec §4.2): how "spiky" the attack transients are
//! relative to the sustained body of the signal.

use std::path::Path;

use serde::{Deserialize, Serialize};
use sondeck_probe::{ProbeAdapter, ProbeReading, ProbeRequest};
use strum::{Display, EnumString};

use crate::errors::{AnalysisError, AnalysisResult};
use crate::util::ShortResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum TransientStatus {
    VeryBlunted,
    Blunted,
    Normal,
    Spiky,
    VerySpiky,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransientResult {
    pub sharpness: Option<f64>,
    pub status: TransientStatus,
}

/// Normalized sharpness: the spread of per-window crest factor relative to
/// its mean. A blunted (heavily limited) signal has near-uniform windows;
/// a spiky signal has a few windows far above the mean.
#[must_use]
pub(crate) fn sharpness_from_windows(crest_per_window: &[Option<f64>]) -> Option<f64> {
    let values: Vec<f64> = crest_per_window.iter().filter_map(|v| *v).collect();
    if values.is_empty() {
        return None;
    }
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    if mean.abs() < f64::EPSILON {
        return Some(0.0);
    }
    let max = values.iter().copied().fold(f64::MIN, f64::max);
    Some(((max - mean) / mean.abs()).clamp(0.0, 2.0) / 2.0)
}

#[must_use]
pub(crate) fn classify_status(sharpness: Option<f64>) -> TransientStatus {
    let Some(s) = sharpness else {
        return TransientStatus::Unknown;
    };
    if s < 0.1 {
        TransientStatus::VeryBlunted
    } else if s < 0.25 {
        TransientStatus::Blunted
    } else if s <= 0.6 {
        TransientStatus::Normal
    } else if s <= 0.85 {
        TransientStatus::Spiky
    } else {
        TransientStatus::VerySpiky
    }
}

pub async fn analyze(probe: &dyn ProbeAdapter, path: &Path, window_ms: u32) -> AnalysisResult<TransientResult> {
    let reading = probe.probe(path, ProbeRequest::WindowedStats { window_ms }).await?;
    let ProbeReading::WindowedStats(r) = reading else {
        return Err(AnalysisError::WrongReadingKind);
    };

    let sharpness = sharpness_from_windows(&r.crest_factor_db_per_window);
    let status = classify_status(sharpness);
    Ok(TransientResult { sharpness, status })
}

#[must_use]
pub fn quick_check(result: &TransientResult) -> ShortResult {
    match result.status {
        TransientStatus::Unknown => ShortResult::unknown("transient sharpness could not be measured"),
        other => ShortResult::ok(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn uniform_windows_are_very_blunted() {
        let windows = vec![Some(10.0), Some(10.0), Some(10.0)];
        let sharpness = sharpness_from_windows(&windows);
        assert_eq!(classify_status(sharpness), TransientStatus::VeryBlunted);
    }

    #[test]
    fn empty_windows_are_unknown() {
        assert_eq!(sharpness_from_windows(&[]), None);
        assert_eq!(classify_status(None), TransientStatus::Unknown);
    }

    #[rstest]
    #[case(Some(0.05), TransientStatus::VeryBlunted)]
    #[case(Some(0.2), TransientStatus::Blunted)]
    #[case(Some(0.4), TransientStatus::Normal)]
    #[case(Some(0.7), TransientStatus::Spiky)]
    #[case(Some(0.95), TransientStatus::VerySpiky)]
    fn classifies_across_thresholds(#[case] sharpness: Option<f64>, #[case] expected: TransientStatus) {
        assert_eq!(classify_status(sharpness), expected);
    }
}
