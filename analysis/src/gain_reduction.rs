//! Gain-reduction mapper (spec §4.2): fraction of the asset sitting in a
//! heavy/extreme compression regime, from windowed crest measurements.

use std::path::Path;

use serde::{Deserialize, Serialize};
use sondeck_probe::{ProbeAdapter, ProbeReading, ProbeRequest};

use crate::errors::{AnalysisError, AnalysisResult};
use crate::util::ShortResult;

const HEAVY_CREST_DB: f64 = 9.0;
const EXTREME_CREST_DB: f64 = 6.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GainReductionResult {
    pub heavy_fraction: Option<f64>,
    pub extreme_fraction: Option<f64>,
}

#[must_use]
pub(crate) fn fractions(crest_per_window: &[Option<f64>]) -> (Option<f64>, Option<f64>) {
    let values: Vec<f64> = crest_per_window.iter().filter_map(|v| *v).collect();
    if values.is_empty() {
        return (None, None);
    }
    let total = values.len() as f64;
    let heavy = values.iter().filter(|&&c| c < HEAVY_CREST_DB).count() as f64 / total;
    let extreme = values.iter().filter(|&&c| c < EXTREME_CREST_DB).count() as f64 / total;
    (Some(heavy), Some(extreme))
}

pub async fn analyze(probe: &dyn ProbeAdapter, path: &Path, window_ms: u32) -> AnalysisResult<GainReductionResult> {
    let reading = probe.probe(path, ProbeRequest::WindowedStats { window_ms }).await?;
    let ProbeReading::WindowedStats(r) = reading else {
        return Err(AnalysisError::WrongReadingKind);
    };

    let (heavy_fraction, extreme_fraction) = fractions(&r.crest_factor_db_per_window);
    Ok(GainReductionResult { heavy_fraction, extreme_fraction })
}

#[must_use]
pub fn quick_check(result: &GainReductionResult) -> ShortResult {
    match result.extreme_fraction {
        None => ShortResult::unknown("gain-reduction fraction could not be measured"),
        Some(f) if f > 0.5 => ShortResult::failing("EXTREME_COMPRESSION", "over half the asset is extremely compressed"),
        Some(_) => ShortResult::ok("WITHIN_RANGE"),
    }
}
