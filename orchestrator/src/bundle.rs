//! The Measurement Bundle (spec §4.13): the union of every analyzer's
//! output for one asset, keyed by [`AnalyzerName`].

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use sondeck_analysis::car_translator::CarTranslationResult;
use sondeck_analysis::codec_stress::CodecStressResult;
use sondeck_analysis::crest::LimiterStressResult;
use sondeck_analysis::dc_offset::DcOffsetResult;
use sondeck_analysis::fold_down::FoldDownResult;
use sondeck_analysis::gain_reduction::GainReductionResult;
use sondeck_analysis::headroom::{HeadroomResult, MaxGainTargets};
use sondeck_analysis::loudness::{LoudnessResult, LoudnessTarget};
use sondeck_analysis::macro_dynamics::MacroDynamicsResult;
use sondeck_analysis::mono_compat::MonoCompatResult;
use sondeck_analysis::sample_peak::SamplePeakResult;
use sondeck_analysis::sibilance::SibilanceResult;
use sondeck_analysis::silence::SilenceResult;
use sondeck_analysis::spectral_balance::SpectralBalanceResult;
use sondeck_analysis::spectral_flux::SpectralFluxResult;
use sondeck_analysis::stereo_width::StereoWidthResult;
use sondeck_analysis::temporal_density::TemporalDensityResult;
use sondeck_analysis::topology::TopologyResult;
use sondeck_analysis::transient::TransientResult;
use sondeck_analysis::{AnalyzerName, ShortResult};

/// Per-analyzer knobs that aren't derivable from the probe reading itself.
/// Defaults mirror each analyzer's own defaults so a caller can omit this
/// entirely for a standard pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnalyzerOptions {
    pub loudness_target: LoudnessTarget,
    pub max_gain_targets: MaxGainTargets,
    pub window_ms: u32,
    pub macro_window_ms: Option<u32>,
}

impl Default for AnalyzerOptions {
    fn default() -> Self {
        Self { loudness_target: LoudnessTarget::default(), max_gain_targets: MaxGainTargets::default(), window_ms: 400, macro_window_ms: None }
    }
}

/// One analyzer's full result, type-erased behind [`AnalyzerName`] so the
/// fan-out in `orchestrate.rs` can join heterogeneous analyzer futures into
/// a single task set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AnalyzerOutcome {
    Loudness(LoudnessResult),
    Headroom(HeadroomResult),
    LimiterStress(LimiterStressResult),
    TransientSharpness(TransientResult),
    DcOffset(DcOffsetResult),
    ChannelTopology(TopologyResult),
    LowEndMonoCompat(MonoCompatResult),
    SpectralBalance(SpectralBalanceResult),
    GainReduction(GainReductionResult),
    CodecStress(CodecStressResult),
    MonoFoldDown(FoldDownResult),
    CarTranslation(CarTranslationResult),
    TemporalDensity(TemporalDensityResult),
    MacroDynamics(MacroDynamicsResult),
    SamplePeak(SamplePeakResult),
    StereoWidth(StereoWidthResult),
    Silence(SilenceResult),
    SpectralFlux(SpectralFluxResult),
    Sibilance(SibilanceResult),
}

impl AnalyzerOutcome {
    /// Delegates to the wrapped result's own `quick_check`, so the
    /// orchestrator's problem-identification pass (§4.13) never needs to
    /// match on the concrete result type.
    #[must_use]
    pub fn quick_check(&self) -> ShortResult {
        match self {
            Self::Loudness(r) => sondeck_analysis::loudness::quick_check(r),
            Self::Headroom(r) => sondeck_analysis::headroom::quick_check(r),
            Self::LimiterStress(r) => sondeck_analysis::crest::quick_check(r),
            Self::TransientSharpness(r) => sondeck_analysis::transient::quick_check(r),
            Self::DcOffset(r) => sondeck_analysis::dc_offset::quick_check(r),
            Self::ChannelTopology(r) => sondeck_analysis::topology::quick_check(r),
            Self::LowEndMonoCompat(r) => sondeck_analysis::mono_compat::quick_check(r),
            Self::SpectralBalance(r) => sondeck_analysis::spectral_balance::quick_check(r),
            Self::GainReduction(r) => sondeck_analysis::gain_reduction::quick_check(r),
            Self::CodecStress(r) => sondeck_analysis::codec_stress::quick_check(r),
            Self::MonoFoldDown(r) => sondeck_analysis::fold_down::quick_check(r),
            Self::CarTranslation(r) => sondeck_analysis::car_translator::quick_check(r),
            Self::TemporalDensity(r) => sondeck_analysis::temporal_density::quick_check(r),
            Self::MacroDynamics(r) => sondeck_analysis::macro_dynamics::quick_check(r),
            Self::SamplePeak(r) => sondeck_analysis::sample_peak::quick_check(r),
            Self::StereoWidth(r) => sondeck_analysis::stereo_width::quick_check(r),
            Self::Silence(r) => sondeck_analysis::silence::quick_check(r),
            Self::SpectralFlux(r) => sondeck_analysis::spectral_flux::quick_check(r),
            Self::Sibilance(r) => sondeck_analysis::sibilance::quick_check(r),
        }
    }
}

/// Diagnostics about a normalization pre-pass (spec §4.13): if requested,
/// the orchestrator analyzes a sample-rate-normalized temporary instead of
/// the original file, and the bundle records what changed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizationInfo {
    pub was_normalized: bool,
    pub changes: Vec<String>,
    pub original_sample_rate_hz: Option<u32>,
}

/// The union of every analyzer's output for one `analyzeAudio` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasurementBundle {
    pub results: HashMap<AnalyzerName, AnalyzerOutcome>,
    pub failed: HashMap<AnalyzerName, String>,
    pub normalization: Option<NormalizationInfo>,
}

impl MeasurementBundle {
    #[must_use]
    pub fn get(&self, name: AnalyzerName) -> Option<&AnalyzerOutcome> {
        self.results.get(&name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn analyzer_options_default_matches_each_analyzers_own_default() {
        let options = AnalyzerOptions::default();
        assert_eq!(options.loudness_target, LoudnessTarget::default());
        assert_eq!(options.max_gain_targets, MaxGainTargets::default());
    }

    #[test]
    fn bundle_get_returns_none_for_a_failed_analyzer() {
        let bundle = MeasurementBundle {
            results: HashMap::new(),
            failed: HashMap::from([(AnalyzerName::Loudness, "probe timed out".to_string())]),
            normalization: None,
        };
        assert!(bundle.get(AnalyzerName::Loudness).is_none());
    }
}
