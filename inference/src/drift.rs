//! Signal-drift detection (spec §4.6, C6): flags when the signals fed to an
//! ML model look nothing like what it was trained on, independent of
//! whatever confidence the model itself reports.

use std::collections::HashMap;

use sondeck_classifier::{SignalKind, SignalVector};
use strum::{Display, EnumString};

const MINOR_Z: f64 = 1.5;
const SIGNIFICANT_Z: f64 = 2.5;
const OOD_Z: f64 = 4.0;
const OOD_BOUND_VIOLATIONS: usize = 3;

const EXTREME_BPM_MIN: f64 = 40.0;
const EXTREME_BPM_MAX: f64 = 220.0;
const MIN_PLAUSIBLE_DURATION_SEC: f64 = 1.0;
const MAX_PLAUSIBLE_DURATION_SEC: f64 = 3600.0;
const MONO_SUM_CANCELLATION_CORRELATION: f64 = -0.8;
const DC_OFFSET_THRESHOLD: f64 = 0.1;
const SILENT_FRACTION_THRESHOLD: f64 = 0.95;
const STANDARD_SAMPLE_RATES_HZ: [u32; 6] = [44_100, 48_000, 88_200, 96_000, 176_400, 192_000];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum DriftSeverity {
    None,
    Minor,
    Significant,
    OutOfDistribution,
}

/// Severity of a hard out-of-distribution indicator, independent of the
/// per-signal z-score step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Display, EnumString)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum OodIndicatorSeverity {
    Medium,
    High,
    Critical,
}

/// The closed set of hard indicators a file can trip, evaluated against raw
/// probe-level signals rather than the classifier's abstracted vector —
/// several of these (clipping, DC offset, sample rate, silence) have no
/// counterpart among [`SignalKind`]'s ten fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum OodIndicatorKind {
    Silence,
    PureNoise,
    ExtremeDuration,
    MonoSumCancellation,
    Clipping,
    DcOffset,
    ExtremeBpm,
    NonStandardSampleRate,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OodIndicator {
    pub kind: OodIndicatorKind,
    pub severity: OodIndicatorSeverity,
}

/// The raw, probe-level measurements the hard OOD table runs against, as
/// opposed to [`SignalVector`]'s closed superset of decision-relevant
/// signals. Any field may be `None` when the corresponding probe request
/// was not run or could not measure it; an unmeasured indicator never
/// trips.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RawProbeSignals {
    pub silent_fraction: Option<f64>,
    pub is_pure_noise: bool,
    pub duration_sec: Option<f64>,
    pub mono_sum_correlation: Option<f64>,
    pub true_peak_dbtp: Option<f64>,
    pub dc_offset: Option<f64>,
    pub bpm: Option<f64>,
    pub sample_rate_hz: Option<u32>,
}

/// Evaluates the closed hard-indicator table (spec §4.6 step 1) against raw
/// probe signals. Order matches the spec's listing; callers should not rely
/// on it for anything other than determinism.
#[must_use]
pub fn hard_ood_indicators(raw: &RawProbeSignals) -> Vec<OodIndicator> {
    let mut indicators = Vec::new();

    if raw.silent_fraction.is_some_and(|f| f > SILENT_FRACTION_THRESHOLD) {
        indicators.push(OodIndicator { kind: OodIndicatorKind::Silence, severity: OodIndicatorSeverity::Critical });
    }
    if raw.is_pure_noise {
        indicators.push(OodIndicator { kind: OodIndicatorKind::PureNoise, severity: OodIndicatorSeverity::Critical });
    }
    if raw.duration_sec.is_some_and(|d| d < MIN_PLAUSIBLE_DURATION_SEC || d > MAX_PLAUSIBLE_DURATION_SEC) {
        indicators.push(OodIndicator { kind: OodIndicatorKind::ExtremeDuration, severity: OodIndicatorSeverity::High });
    }
    if raw.mono_sum_correlation.is_some_and(|c| c < MONO_SUM_CANCELLATION_CORRELATION) {
        indicators
            .push(OodIndicator { kind: OodIndicatorKind::MonoSumCancellation, severity: OodIndicatorSeverity::High });
    }
    if raw.true_peak_dbtp.is_some_and(|p| p > 0.0) {
        indicators.push(OodIndicator { kind: OodIndicatorKind::Clipping, severity: OodIndicatorSeverity::High });
    }
    if raw.dc_offset.is_some_and(|d| d.abs() > DC_OFFSET_THRESHOLD) {
        indicators.push(OodIndicator { kind: OodIndicatorKind::DcOffset, severity: OodIndicatorSeverity::Medium });
    }
    if raw.bpm.is_some_and(|b| b < EXTREME_BPM_MIN || b > EXTREME_BPM_MAX) {
        indicators.push(OodIndicator { kind: OodIndicatorKind::ExtremeBpm, severity: OodIndicatorSeverity::Medium });
    }
    if raw.sample_rate_hz.is_some_and(|sr| !STANDARD_SAMPLE_RATES_HZ.contains(&sr)) {
        indicators.push(OodIndicator {
            kind: OodIndicatorKind::NonStandardSampleRate,
            severity: OodIndicatorSeverity::Medium,
        });
    }

    indicators
}

/// A critical indicator, or two or more high indicators, short-circuits
/// straight to out-of-distribution regardless of the z-score step.
#[must_use]
fn hard_indicators_force_ood(indicators: &[OodIndicator]) -> bool {
    let critical = indicators.iter().any(|i| i.severity == OodIndicatorSeverity::Critical);
    let high_count = indicators.iter().filter(|i| i.severity == OodIndicatorSeverity::High).count();
    critical || high_count >= 2
}

/// Expected mean/standard-deviation per signal, and the hard bounds outside
/// which a value is an out-of-distribution indicator regardless of z-score.
#[derive(Debug, Clone, Copy)]
pub struct SignalDistribution {
    pub signal: SignalKind,
    pub mean: f64,
    pub std_dev: f64,
    pub hard_min: f64,
    pub hard_max: f64,
    pub weight: f64,
}

#[derive(Debug, Clone)]
pub struct TrainingDistribution {
    entries: &'static [SignalDistribution],
}

impl TrainingDistribution {
    #[must_use]
    pub const fn new(entries: &'static [SignalDistribution]) -> Self {
        Self { entries }
    }

    fn get(&self, signal: SignalKind) -> Option<SignalDistribution> {
        self.entries.iter().copied().find(|d| d.signal == signal)
    }
}

const fn dist(signal: SignalKind, mean: f64, std_dev: f64, hard_min: f64, hard_max: f64, weight: f64) -> SignalDistribution {
    SignalDistribution { signal, mean, std_dev, hard_min, hard_max, weight }
}

/// Reference training distribution used when a model was trained on the
/// full cross-style signal set (spec §9 superset resolution).
pub const DEFAULT_TRAINING_DISTRIBUTION: TrainingDistribution = TrainingDistribution::new(&[
    dist(SignalKind::Bpm, 110.0, 30.0, 40.0, 220.0, 1.0),
    dist(SignalKind::CrestFactorDb, 10.0, 4.0, 0.0, 30.0, 1.0),
    dist(SignalKind::TransientSharpness, 0.55, 0.2, 0.0, 1.0, 0.8),
    dist(SignalKind::LoudnessRangeLu, 8.0, 4.0, 0.0, 30.0, 0.8),
    dist(SignalKind::SpectralCentroidHz, 2500.0, 1200.0, 100.0, 12000.0, 0.6),
    dist(SignalKind::StereoWidth, 0.5, 0.2, 0.0, 1.0, 0.6),
    dist(SignalKind::LowEndMonoCorrelation, 0.7, 0.25, -1.0, 1.0, 0.7),
    dist(SignalKind::SibilanceRatio, 0.15, 0.1, 0.0, 1.0, 0.5),
    dist(SignalKind::SubBassEnergyRatio, 0.3, 0.15, 0.0, 1.0, 0.7),
    dist(SignalKind::MacroDynamicsRangeLu, 6.0, 3.0, 0.0, 30.0, 0.6),
]);

#[derive(Debug, Clone)]
pub struct DriftReport {
    pub severity: DriftSeverity,
    pub hard_indicators: Vec<OodIndicator>,
    pub aggregate_z: f64,
    pub per_signal_z: HashMap<SignalKind, f64>,
    pub hard_bound_violations: usize,
    pub confidence_reduction: f64,
    pub should_trust_ml: bool,
}

fn confidence_reduction_for(severity: DriftSeverity) -> f64 {
    match severity {
        DriftSeverity::None => 0.0,
        DriftSeverity::Minor => 0.05,
        DriftSeverity::Significant => 0.15,
        DriftSeverity::OutOfDistribution => 0.30,
    }
}

/// Compares `signals`/`raw` against `training` and reports how far out of
/// distribution they sit. Step 1 (spec §4.6) evaluates the closed hard
/// indicator table against `raw` and short-circuits; only if it doesn't
/// fire does step 2 fall through to the per-signal z-score comparison.
#[must_use]
pub fn detect_drift(signals: SignalVector, raw: &RawProbeSignals, training: &TrainingDistribution) -> DriftReport {
    let hard_indicators = hard_ood_indicators(raw);
    if hard_indicators_force_ood(&hard_indicators) {
        return DriftReport {
            severity: DriftSeverity::OutOfDistribution,
            hard_indicators,
            aggregate_z: f64::INFINITY,
            per_signal_z: HashMap::new(),
            hard_bound_violations: 0,
            confidence_reduction: confidence_reduction_for(DriftSeverity::OutOfDistribution),
            should_trust_ml: false,
        };
    }

    let mut per_signal_z = HashMap::new();
    let mut weighted_sq_sum = 0.0;
    let mut weight_sum = 0.0;
    let mut hard_bound_violations = 0;

    for entry in training.entries {
        let Some(value) = signals.get(entry.signal) else { continue };
        let z = if entry.std_dev > 0.0 { (value - entry.mean) / entry.std_dev } else { 0.0 };
        per_signal_z.insert(entry.signal, z);
        weighted_sq_sum += entry.weight * z * z;
        weight_sum += entry.weight;
        if value < entry.hard_min || value > entry.hard_max {
            hard_bound_violations += 1;
        }
    }

    let aggregate_z = if weight_sum > 0.0 { (weighted_sq_sum / weight_sum).sqrt() } else { 0.0 };

    let severity = if hard_bound_violations >= OOD_BOUND_VIOLATIONS || aggregate_z >= OOD_Z {
        DriftSeverity::OutOfDistribution
    } else if aggregate_z >= SIGNIFICANT_Z {
        DriftSeverity::Significant
    } else if aggregate_z >= MINOR_Z {
        DriftSeverity::Minor
    } else {
        DriftSeverity::None
    };

    let confidence_reduction = confidence_reduction_for(severity);

    DriftReport {
        severity,
        hard_indicators,
        aggregate_z,
        per_signal_z,
        hard_bound_violations,
        confidence_reduction,
        should_trust_ml: severity != DriftSeverity::OutOfDistribution,
    }
}
