//! Sibilance analyzer (supplement, §4.2): high-band energy concentration
//! in the 5-8 kHz region, feeding both codec stress and the dedicated
//! `SIBILANCE_HIGH` problem code.

use std::path::Path;

use serde::{Deserialize, Serialize};
use sondeck_probe::{ProbeAdapter, ProbeReading, ProbeRequest};

use crate::errors::{AnalysisError, AnalysisResult};
use crate::util::ShortResult;

const SIBILANCE_BAND: (f64, f64) = (5_000.0, 8_000.0);
const HIGH_SIBILANCE_RATIO: f64 = 0.35;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SibilanceResult {
    pub sibilance_energy_ratio: Option<f64>,
    pub is_harsh: bool,
}

pub async fn analyze(probe: &dyn ProbeAdapter, path: &Path) -> AnalysisResult<SibilanceResult> {
    let spectral = probe.probe(path, ProbeRequest::SpectralStats).await?;
    let ProbeReading::SpectralStats(spectral) = spectral else {
        return Err(AnalysisError::WrongReadingKind);
    };
    let _band = probe
        .probe(path, ProbeRequest::BandStats { low_hz: SIBILANCE_BAND.0, high_hz: SIBILANCE_BAND.1 })
        .await?;

    let is_harsh = spectral.sibilance_energy_ratio.is_some_and(|r| r > HIGH_SIBILANCE_RATIO);
    Ok(SibilanceResult { sibilance_energy_ratio: spectral.sibilance_energy_ratio, is_harsh })
}

#[must_use]
pub fn quick_check(result: &SibilanceResult) -> ShortResult {
    match result.sibilance_energy_ratio {
        None => ShortResult::unknown("sibilance energy could not be measured"),
        Some(_) if result.is_harsh => ShortResult::failing("SIBILANCE_HIGH", "high-band energy is concentrated in the sibilant region"),
        Some(_) => ShortResult::ok("SIBILANCE_NORMAL"),
    }
}
