//! Spectral-flux analyzer (supplement, §4.2): frame-to-frame spectral
//! delta, shared by the codec-stress predictor and exposed standalone for
//! problem identification.

use std::path::Path;

use serde::{Deserialize, Serialize};
use sondeck_probe::{ProbeAdapter, ProbeReading, ProbeRequest};

use crate::errors::{AnalysisError, AnalysisResult};
use crate::util::ShortResult;

const HIGH_FLUX_THRESHOLD: f64 = 0.8;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpectralFluxResult {
    pub spectral_flux: Option<f64>,
    pub is_high_flux: bool,
}

pub async fn analyze(probe: &dyn ProbeAdapter, path: &Path) -> AnalysisResult<SpectralFluxResult> {
    let reading = probe.probe(path, ProbeRequest::SpectralStats).await?;
    let ProbeReading::SpectralStats(r) = reading else {
        return Err(AnalysisError::WrongReadingKind);
    };

    let is_high_flux = r.spectral_flux.is_some_and(|f| f > HIGH_FLUX_THRESHOLD);
    Ok(SpectralFluxResult { spectral_flux: r.spectral_flux, is_high_flux })
}

#[must_use]
pub fn quick_check(result: &SpectralFluxResult) -> ShortResult {
    match result.spectral_flux {
        None => ShortResult::unknown("spectral flux could not be measured"),
        Some(_) if result.is_high_flux => ShortResult::failing("HIGH_SPECTRAL_FLUX", "frame-to-frame spectral content changes sharply"),
        Some(_) => ShortResult::ok("STABLE_SPECTRUM"),
    }
}
