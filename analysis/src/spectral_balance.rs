//! Spectral balance against a fixed reference curve (spec §4.2).

use std::path::Path;

use serde::{Deserialize, Serialize};
use sondeck_probe::{ProbeAdapter, ProbeReading, ProbeRequest};
use strum::{Display, EnumString};

use crate::errors::{AnalysisError, AnalysisResult};
use crate::util::ShortResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum SpectralRegion {
    Low,
    LowMid,
    Mid,
    HighMid,
    High,
}

/// Frozen reference curve: `(low_hz, high_hz, expected_energy_ratio)`. A
/// flat-ish reference; real mastering reference curves are a tuning input,
/// not part of this table's contract.
const REFERENCE_CURVE: [(f64, f64, f64, SpectralRegion); 5] = [
    (20.0, 120.0, 0.22, SpectralRegion::Low),
    (120.0, 500.0, 0.22, SpectralRegion::LowMid),
    (500.0, 2_000.0, 0.22, SpectralRegion::Mid),
    (2_000.0, 8_000.0, 0.20, SpectralRegion::HighMid),
    (8_000.0, 20_000.0, 0.14, SpectralRegion::High),
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BandDeviation {
    pub region: SpectralRegion,
    pub measured_ratio: Option<f64>,
    pub expected_ratio: f64,
    pub deviation: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpectralBalanceResult {
    pub bands: Vec<BandDeviation>,
    pub imbalance_region: Option<SpectralRegion>,
}

/// The region with the largest absolute deviation from the reference
/// curve, or `None` when every band is missing.
#[must_use]
pub(crate) fn worst_region(bands: &[BandDeviation]) -> Option<SpectralRegion> {
    bands
        .iter()
        .filter_map(|b| b.deviation.map(|d| (b.region, d.abs())))
        .max_by(|(_, a), (_, b)| a.total_cmp(b))
        .map(|(region, _)| region)
}

pub async fn analyze(probe: &dyn ProbeAdapter, path: &Path) -> AnalysisResult<SpectralBalanceResult> {
    let mut bands = Vec::with_capacity(REFERENCE_CURVE.len());
    for (low_hz, high_hz, expected_ratio, region) in REFERENCE_CURVE {
        let reading = probe.probe(path, ProbeRequest::BandStats { low_hz, high_hz }).await?;
        let ProbeReading::BandStats(r) = reading else {
            return Err(AnalysisError::WrongReadingKind);
        };
        bands.push(BandDeviation {
            region,
            measured_ratio: r.energy_ratio,
            expected_ratio,
            deviation: r.energy_ratio.map(|m| m - expected_ratio),
        });
    }

    let imbalance_region = worst_region(&bands);
    Ok(SpectralBalanceResult { bands, imbalance_region })
}

#[must_use]
pub fn quick_check(result: &SpectralBalanceResult) -> ShortResult {
    match result.imbalance_region {
        None => ShortResult::unknown("spectral balance could not be measured"),
        Some(region) => {
            let worst = result.bands.iter().find(|b| b.region == region);
            match worst.and_then(|b| b.deviation) {
                Some(d) if d.abs() > 0.1 => {
                    ShortResult::failing(format!("{region}_IMBALANCE"), "energy deviates sharply from reference")
                }
                _ => ShortResult::ok("BALANCED"),
            }
        }
    }
}
