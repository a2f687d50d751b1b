//! DC offset detector, plus the DC-offset-to-headroom-loss supplement
//! (spec §4.2).

use std::path::Path;

use serde::{Deserialize, Serialize};
use sondeck_probe::{ProbeAdapter, ProbeReading, ProbeRequest};
use strum::{Display, EnumString};

use crate::errors::{AnalysisError, AnalysisResult};
use crate::util::ShortResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum DcOffsetStatus {
    Minor,
    Moderate,
    Severe,
    None,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DcOffsetResult {
    pub dc_offset: Option<f64>,
    pub status: DcOffsetStatus,
    /// Headroom lost to DC offset, in dB: `20 * log10(1 + |offset|)`.
    pub headroom_loss_db: Option<f64>,
}

#[must_use]
pub(crate) fn classify_status(dc_offset: Option<f64>) -> DcOffsetStatus {
    let Some(offset) = dc_offset else {
        return DcOffsetStatus::Unknown;
    };
    let magnitude = offset.abs();
    if magnitude < 0.01 {
        DcOffsetStatus::None
    } else if magnitude < 0.03 {
        DcOffsetStatus::Minor
    } else if magnitude < 0.1 {
        DcOffsetStatus::Moderate
    } else {
        DcOffsetStatus::Severe
    }
}

#[must_use]
pub(crate) fn headroom_loss_db(dc_offset: Option<f64>) -> Option<f64> {
    dc_offset.map(|offset| 20.0 * (1.0 + offset.abs()).log10())
}

pub async fn analyze(probe: &dyn ProbeAdapter, path: &Path) -> AnalysisResult<DcOffsetResult> {
    let reading = probe.probe(path, ProbeRequest::OverallStats).await?;
    let ProbeReading::OverallStats(r) = reading else {
        return Err(AnalysisError::WrongReadingKind);
    };

    Ok(DcOffsetResult {
        dc_offset: r.dc_offset,
        status: classify_status(r.dc_offset),
        headroom_loss_db: headroom_loss_db(r.dc_offset),
    })
}

#[must_use]
pub fn quick_check(result: &DcOffsetResult) -> ShortResult {
    match result.status {
        DcOffsetStatus::Unknown => ShortResult::unknown("DC offset could not be measured"),
        DcOffsetStatus::Severe => ShortResult::failing(result.status.to_string(), "severe DC offset detected"),
        other => ShortResult::ok(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case(Some(0.001), DcOffsetStatus::None)]
    #[case(Some(0.02), DcOffsetStatus::Minor)]
    #[case(Some(0.05), DcOffsetStatus::Moderate)]
    #[case(Some(0.2), DcOffsetStatus::Severe)]
    #[case(Some(-0.2), DcOffsetStatus::Severe)]
    #[case(None, DcOffsetStatus::Unknown)]
    fn classifies_by_magnitude(#[case] offset: Option<f64>, #[case] expected: DcOffsetStatus) {
        assert_eq!(classify_status(offset), expected);
    }

    #[test]
    fn headroom_loss_increases_with_offset() {
        let small = headroom_loss_db(Some(0.01)).unwrap();
        let large = headroom_loss_db(Some(0.2)).unwrap();
        assert!(large > small);
    }
}
