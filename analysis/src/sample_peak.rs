//! Sample-peak analyzer (supplement, §4.2): the peak record read directly
//! from `overall-stats`, feeding headroom without the true-peak fallback
//! preference headroom.rs applies.

use std::path::Path;

use serde::{Deserialize, Serialize};
use sondeck_probe::{ProbeAdapter, ProbeReading, ProbeRequest};

use crate::errors::{AnalysisError, AnalysisResult};
use crate::util::ShortResult;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SamplePeakResult {
    pub sample_peak_dbfs: Option<f64>,
    pub true_peak_dbtp: Option<f64>,
    pub is_clipping: bool,
}

pub async fn analyze(probe: &dyn ProbeAdapter, path: &Path) -> AnalysisResult<SamplePeakResult> {
    let reading = probe.probe(path, ProbeRequest::OverallStats).await?;
    let ProbeReading::OverallStats(r) = reading else {
        return Err(AnalysisError::WrongReadingKind);
    };

    let is_clipping = r.sample_peak_dbfs.is_some_and(|p| p >= 0.0) || r.true_peak_dbtp.is_some_and(|p| p > 0.0);
    Ok(SamplePeakResult { sample_peak_dbfs: r.sample_peak_dbfs, true_peak_dbtp: r.true_peak_dbtp, is_clipping })
}

#[must_use]
pub fn quick_check(result: &SamplePeakResult) -> ShortResult {
    if result.sample_peak_dbfs.is_none() && result.true_peak_dbtp.is_none() {
        ShortResult::unknown("peak could not be measured")
    } else if result.is_clipping {
        ShortResult::failing("CLIPPING", "sample or true peak reaches or exceeds 0 dBFS/dBTP")
    } else {
        ShortResult::ok("NO_CLIPPING")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn true_peak_above_zero_is_clipping() {
        let result = SamplePeakResult { sample_peak_dbfs: Some(-1.0), true_peak_dbtp: Some(0.2), is_clipping: true };
        assert_eq!(quick_check(&result).passed, false);
    }
}
