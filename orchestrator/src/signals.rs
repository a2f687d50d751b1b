//! Derives the classifier's Signal Vector and the decision engine's risk
//! scores from a Measurement Bundle (spec §4.14): the pressure tester is
//! the only caller that needs to bridge C13's per-analyzer output shapes
//! into C3/C4's pure, analyzer-agnostic input shapes.

use sondeck_analysis::AnalyzerName;
use sondeck_classifier::{RiskKind, SignalVector};
use sondeck_decision::RiskScores;

use crate::bundle::{AnalyzerOutcome, MeasurementBundle};

/// No analyzer in the suite measures tempo or spectral centroid directly;
/// those two signals are always absent from a bundle-derived vector. A
/// missing signal contributes neutral weight to classification rather than
/// being treated as an error.
#[must_use]
pub fn signal_vector(bundle: &MeasurementBundle) -> SignalVector {
    let crest_factor_db = match bundle.get(AnalyzerName::LimiterStress) {
        Some(AnalyzerOutcome::LimiterStress(r)) => r.crest_factor_db,
        _ => None,
    };
    let transient_sharpness = match bundle.get(AnalyzerName::TransientSharpness) {
        Some(AnalyzerOutcome::TransientSharpness(r)) => Some(r.sharpness),
        _ => None,
    };
    let loudness_range_lu = match bundle.get(AnalyzerName::Loudness) {
        Some(AnalyzerOutcome::Loudness(r)) => r.loudness_range_lu,
        _ => None,
    };
    let stereo_width = match bundle.get(AnalyzerName::StereoWidth) {
        Some(AnalyzerOutcome::StereoWidth(r)) => r.width,
        _ => None,
    };
    let low_end_mono_correlation = match bundle.get(AnalyzerName::LowEndMonoCompat) {
        Some(AnalyzerOutcome::LowEndMonoCompat(r)) => r.low_end_correlation,
        _ => None,
    };
    let sibilance_ratio = match bundle.get(AnalyzerName::Sibilance) {
        Some(AnalyzerOutcome::Sibilance(r)) => r.sibilance_energy_ratio,
        _ => None,
    };
    let sub_bass_energy_ratio = match bundle.get(AnalyzerName::SpectralBalance) {
        Some(AnalyzerOutcome::SpectralBalance(r)) => r.bands.first().and_then(|b| b.measured_ratio),
        _ => None,
    };
    let macro_dynamics_range_lu = match bundle.get(AnalyzerName::MacroDynamics) {
        Some(AnalyzerOutcome::MacroDynamics(r)) => r.range_lu,
        _ => None,
    };

    SignalVector {
        bpm: None,
        crest_factor_db,
        transient_sharpness,
        loudness_range_lu,
        spectral_centroid_hz: None,
        stereo_width,
        low_end_mono_correlation,
        sibilance_ratio,
        sub_bass_energy_ratio,
        macro_dynamics_range_lu,
    }
}

fn band_deviation(bundle: &MeasurementBundle, region: sondeck_analysis::spectral_balance::SpectralRegion) -> Option<f64> {
    match bundle.get(AnalyzerName::SpectralBalance) {
        Some(AnalyzerOutcome::SpectralBalance(r)) => r.bands.iter().find(|b| b.region == region).and_then(|b| b.deviation),
        _ => None,
    }
}

/// Derives a `[0,1]` risk score per [`RiskKind`] from whichever analyzer
/// most directly speaks to that risk. Each mapping is documented inline;
/// a risk with no contributing analyzer in the bundle is simply absent,
/// which `weighted_confidence` treats as excluded from the weighted sum
/// rather than as zero risk.
#[must_use]
pub fn risk_scores(bundle: &MeasurementBundle) -> RiskScores {
    use sondeck_analysis::spectral_balance::SpectralRegion;

    let mut risks = RiskScores::new();

    // Masking: overall spectral deviation from the reference curve, averaged
    // across bands.
    if let Some(AnalyzerOutcome::SpectralBalance(r)) = bundle.get(AnalyzerName::SpectralBalance) {
        let deviations: Vec<f64> = r.bands.iter().filter_map(|b| b.deviation).map(f64::abs).collect();
        if !deviations.is_empty() {
            let mean = deviations.iter().sum::<f64>() / deviations.len() as f64;
            risks.insert(RiskKind::Masking, (mean / 0.2).clamp(0.0, 1.0));
        }
    }

    // Clipping: an already-clipping sample peak is maximal risk; otherwise
    // fall back to the limiter's own stress index.
    match (bundle.get(AnalyzerName::SamplePeak), bundle.get(AnalyzerName::LimiterStress)) {
        (Some(AnalyzerOutcome::SamplePeak(peak)), _) if peak.is_clipping => {
            risks.insert(RiskKind::Clipping, 1.0);
        }
        (_, Some(AnalyzerOutcome::LimiterStress(r))) => {
            risks.insert(RiskKind::Clipping, r.stress_index.clamp(0.0, 1.0));
        }
        _ => {}
    }

    // Translation: the car-translation analyzer already produces a risk in
    // [0,1] for exactly this.
    if let Some(AnalyzerOutcome::CarTranslation(r)) = bundle.get(AnalyzerName::CarTranslation) {
        risks.insert(RiskKind::Translation, r.pumping_risk.clamp(0.0, 1.0));
    }

    // PhaseCollapse: a fold-down correlation near -1 collapses destructively
    // to mono; risk climbs as correlation falls.
    if let Some(AnalyzerOutcome::MonoFoldDown(r)) = bundle.get(AnalyzerName::MonoFoldDown) {
        if let Some(corr) = r.overall_correlation {
            risks.insert(RiskKind::PhaseCollapse, ((1.0 - corr) / 2.0).clamp(0.0, 1.0));
        }
    }

    // OverCompression: fraction of analysis windows pushed into extreme
    // limiting.
    if let Some(AnalyzerOutcome::GainReduction(r)) = bundle.get(AnalyzerName::GainReduction) {
        if let Some(extreme) = r.extreme_fraction {
            risks.insert(RiskKind::OverCompression, extreme.clamp(0.0, 1.0));
        }
    }

    // VocalIntelligibility: a deficit (not excess) in the mid band, where
    // dialog and lead vocal energy concentrates, masks intelligibility.
    if let Some(mid_deviation) = band_deviation(bundle, SpectralRegion::Mid) {
        risks.insert(RiskKind::VocalIntelligibility, (-mid_deviation / 0.15).clamp(0.0, 1.0));
    }

    // LowEndMasking: excess energy (not deficit) below the reference curve
    // in the sub band masks everything above it.
    if let Some(low_deviation) = band_deviation(bundle, SpectralRegion::Low) {
        risks.insert(RiskKind::LowEndMasking, (low_deviation / 0.15).clamp(0.0, 1.0));
    }

    // ArtifactRisk: the codec-stress analyzer's composite is already a
    // risk-shaped score in [0,1].
    if let Some(AnalyzerOutcome::CodecStress(r)) = bundle.get(AnalyzerName::CodecStress) {
        risks.insert(RiskKind::ArtifactRisk, r.stress_score.clamp(0.0, 1.0));
    }

    // DynamicsLoss: a track with little macro-level loudness variation has
    // had its dynamics compressed away.
    if let Some(AnalyzerOutcome::MacroDynamics(r)) = bundle.get(AnalyzerName::MacroDynamics) {
        if let Some(range_lu) = r.range_lu {
            risks.insert(RiskKind::DynamicsLoss, (1.0 - range_lu / 10.0).clamp(0.0, 1.0));
        }
    }

    risks
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sondeck_analysis::car_translator::{CarTranslationResult, TranslationStatus};
    use sondeck_analysis::crest::{CrestStatus, LimiterStressResult};
    use sondeck_analysis::sample_peak::SamplePeakResult;
    use std::collections::HashMap;

    fn bundle_with(results: Vec<(AnalyzerName, AnalyzerOutcome)>) -> MeasurementBundle {
        MeasurementBundle { results: results.into_iter().collect::<HashMap<_, _>>(), failed: HashMap::new(), normalization: None }
    }

    #[test]
    fn signal_vector_pulls_crest_factor_from_limiter_stress() {
        let bundle = bundle_with(vec![(
            AnalyzerName::LimiterStress,
            AnalyzerOutcome::LimiterStress(LimiterStressResult { crest_factor_db: Some(11.0), status: CrestStatus::Normal, stress_index: 0.1 }),
        )]);
        let vector = signal_vector(&bundle);
        assert_eq!(vector.crest_factor_db, Some(11.0));
        assert_eq!(vector.bpm, None);
        assert_eq!(vector.spectral_centroid_hz, None);
    }

    #[test]
    fn clipping_sample_peak_overrides_limiter_stress_index() {
        let bundle = bundle_with(vec![
            (AnalyzerName::SamplePeak, AnalyzerOutcome::SamplePeak(SamplePeakResult { sample_peak_dbfs: Some(0.2), true_peak_dbtp: Some(0.5), is_clipping: true })),
            (AnalyzerName::LimiterStress, AnalyzerOutcome::LimiterStress(LimiterStressResult { crest_factor_db: Some(4.0), status: CrestStatus::SeverelyLimited, stress_index: 0.4 })),
        ]);
        let risks = risk_scores(&bundle);
        assert_eq!(risks.get(&RiskKind::Clipping), Some(&1.0));
    }

    #[test]
    fn translation_risk_passes_through_pumping_risk_unchanged() {
        let bundle = bundle_with(vec![(
            AnalyzerName::CarTranslation,
            AnalyzerOutcome::CarTranslation(CarTranslationResult {
                boom_ratio: Some(0.1),
                mud_ratio: Some(0.1),
                box_ratio: Some(0.1),
                status: TranslationStatus::Good,
                pumping_risk: 0.42,
                limiter_stress_sub_index: 0.1,
            }),
        )]);
        let risks = risk_scores(&bundle);
        assert_eq!(risks.get(&RiskKind::Translation), Some(&0.42));
    }

    #[test]
    fn missing_analyzer_leaves_its_risk_absent_not_zero() {
        let bundle = bundle_with(vec![]);
        let risks = risk_scores(&bundle);
        assert!(risks.get(&RiskKind::Translation).is_none());
    }
}
