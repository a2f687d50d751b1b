//! Codec stress predictor (spec §4.2): composite score predicting how
//! badly lossy encoding will degrade this material, plus minimum-bitrate
//! suggestions per codec.

use std::path::Path;

use serde::{Deserialize, Serialize};
use sondeck_probe::{ProbeAdapter, ProbeReading, ProbeRequest};

use crate::errors::{AnalysisError, AnalysisResult};
use crate::util::ShortResult;

const HF_BAND: (f64, f64) = (8_000.0, 20_000.0);

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MinBitratesKbps {
    pub mp3: u32,
    pub aac: u32,
    pub opus: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CodecStressResult {
    pub stress_score: f64,
    pub min_bitrates_kbps: MinBitratesKbps,
}

/// Weighted composite in `[0,1]`: HF energy, sibilance, pre-echo density,
/// stereo decorrelation, and spectral flux each push the score up when the
/// material is harder for a lossy codec to represent cleanly.
#[must_use]
pub(crate) fn stress_score(
    hf_energy_ratio: f64,
    sibilance_ratio: f64,
    pre_echo_events_per_min: f64,
    stereo_decorrelation: f64,
    spectral_flux: f64,
) -> f64 {
    let pre_echo_term = (pre_echo_events_per_min / 20.0).clamp(0.0, 1.0);
    let weighted = 0.25 * hf_energy_ratio.clamp(0.0, 1.0)
        + 0.20 * sibilance_ratio.clamp(0.0, 1.0)
        + 0.25 * pre_echo_term
        + 0.15 * stereo_decorrelation.clamp(0.0, 1.0)
        + 0.15 * spectral_flux.clamp(0.0, 1.0);
    weighted.clamp(0.0, 1.0)
}

#[must_use]
pub(crate) fn min_bitrates(stress: f64) -> MinBitratesKbps {
    let scale = 1.0 + stress;
    MinBitratesKbps {
        mp3: (128.0 * scale).round() as u32,
        aac: (96.0 * scale).round() as u32,
        opus: (64.0 * scale).round() as u32,
    }
}

pub async fn analyze(probe: &dyn ProbeAdapter, path: &Path) -> AnalysisResult<CodecStressResult> {
    let hf = probe
        .probe(path, ProbeRequest::BandStats { low_hz: HF_BAND.0, high_hz: HF_BAND.1 })
        .await?;
    let ProbeReading::BandStats(hf) = hf else {
        return Err(AnalysisError::WrongReadingKind);
    };
    let spectral = probe.probe(path, ProbeRequest::SpectralStats).await?;
    let ProbeReading::SpectralStats(spectral) = spectral else {
        return Err(AnalysisError::WrongReadingKind);
    };
    let phase = probe.probe(path, ProbeRequest::PhaseCorrelation).await?;
    let ProbeReading::PhaseCorrelation(phase) = phase else {
        return Err(AnalysisError::WrongReadingKind);
    };
    let silence = probe
        .probe(path, ProbeRequest::SilenceDetect { threshold_db: -40.0, min_dur_sec: 0.023 })
        .await?;
    let ProbeReading::SilenceDetect(_silence) = silence else {
        return Err(AnalysisError::WrongReadingKind);
    };

    let decorrelation = phase.correlation.map_or(0.0, |c| 1.0 - c.clamp(-1.0, 1.0));
    // pre-echo event density is a probe-level concern (quiet->loud transitions
    // within 23ms windows); absent a dedicated probe field it's approximated
    // as zero here and expected to be wired once the probe exposes it.
    let pre_echo_density = 0.0;

    let score = stress_score(
        hf.energy_ratio.unwrap_or(0.0),
        spectral.sibilance_energy_ratio.unwrap_or(0.0),
        pre_echo_density,
        decorrelation,
        spectral.spectral_flux.unwrap_or(0.0),
    );

    Ok(CodecStressResult { stress_score: score, min_bitrates_kbps: min_bitrates(score) })
}

#[must_use]
pub fn quick_check(result: &CodecStressResult) -> ShortResult {
    if result.stress_score > 0.7 {
        ShortResult::failing("HIGH_CODEC_STRESS", "material is likely to degrade badly under lossy encoding")
    } else {
        ShortResult::ok("CODEC_SAFE")
    }
}
