//! Crest factor / limiter stress (spec §4.2).

use std::path::Path;

use serde::{Deserialize, Serialize};
use sondeck_probe::{ProbeAdapter, ProbeReading, ProbeRequest};
use strum::{Display, EnumString};

use crate::errors::{AnalysisError, AnalysisResult};
use crate::util::ShortResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum CrestStatus {
    SeverelyLimited,
    HeavilyCompressed,
    Normal,
    VeryDynamic,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LimiterStressResult {
    pub crest_factor_db: Option<f64>,
    pub status: CrestStatus,
    pub stress_index: f64,
}

#[must_use]
pub(crate) fn classify_status(crest_factor_db: Option<f64>) -> CrestStatus {
    let Some(c) = crest_factor_db else {
        return CrestStatus::Unknown;
    };
    if c < 6.0 {
        CrestStatus::SeverelyLimited
    } else if c < 9.0 {
        CrestStatus::HeavilyCompressed
    } else if c <= 18.0 {
        CrestStatus::Normal
    } else {
        CrestStatus::VeryDynamic
    }
}

/// `stress = crest_penalty + sustained_lf_penalty + duration_penalty`, each
/// in `[0,1]`, summed and clamped (spec §4.2).
#[must_use]
pub(crate) fn stress_index(crest_factor_db: Option<f64>, sustained_lf_fraction: f64, duration_sec: Option<f64>) -> f64 {
    let crest_penalty = crest_factor_db.map_or(0.0, |c| ((9.0 - c) / 9.0).clamp(0.0, 1.0));
    let lf_penalty = sustained_lf_fraction.clamp(0.0, 1.0) * 0.5;
    let duration_penalty = duration_sec.map_or(0.0, |d| (d / 600.0).clamp(0.0, 0.3));
    (crest_penalty + lf_penalty + duration_penalty).clamp(0.0, 1.0)
}

pub async fn analyze(probe: &dyn ProbeAdapter, path: &Path) -> AnalysisResult<LimiterStressResult> {
    let overall = probe.probe(path, ProbeRequest::OverallStats).await?;
    let ProbeReading::OverallStats(overall) = overall else {
        return Err(AnalysisError::WrongReadingKind);
    };
    let format = probe.probe(path, ProbeRequest::FormatInfo).await?;
    let ProbeReading::FormatInfo(format) = format else {
        return Err(AnalysisError::WrongReadingKind);
    };
    let sub_band = probe
        .probe(path, ProbeRequest::BandStats { low_hz: 20.0, high_hz: 120.0 })
        .await?;
    let ProbeReading::BandStats(sub_band) = sub_band else {
        return Err(AnalysisError::WrongReadingKind);
    };

    let status = classify_status(overall.crest_factor_db);
    let stress = stress_index(overall.crest_factor_db, sub_band.energy_ratio.unwrap_or(0.0), format.duration_sec);

    Ok(LimiterStressResult { crest_factor_db: overall.crest_factor_db, status, stress_index: stress })
}

#[must_use]
pub fn quick_check(result: &LimiterStressResult) -> ShortResult {
    match result.status {
        CrestStatus::Unknown => ShortResult::unknown("crest factor could not be measured"),
        CrestStatus::SeverelyLimited => {
            ShortResult::failing(result.status.to_string(), "material is severely over-limited")
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
    #[case(Some(3.0), CrestStatus::SeverelyLimited)]
    #[case(Some(7.0), CrestStatus::HeavilyCompressed)]
    #[case(Some(12.0), CrestStatus::Normal)]
    #[case(Some(20.0), CrestStatus::VeryDynamic)]
    #[case(None, CrestStatus::Unknown)]
    fn classifies_across_thresholds(#[case] crest: Option<f64>, #[case] expected: CrestStatus) {
        assert_eq!(classify_status(crest), expected);
    }

    #[test]
    fn stress_index_is_clamped_to_unit_interval() {
        let stress = stress_index(Some(-10.0), 1.0, Some(100_000.0));
        assert!(stress <= 1.0);
    }
}
