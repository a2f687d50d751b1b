//! Problem identification (spec §4.13): a closed rule table mapping each
//! analyzer's failing status to a user-facing `Problem`.

use serde::{Deserialize, Serialize};
use sondeck_analysis::AnalyzerName;
use sondeck_core::{ProblemCategory, Severity};
use strum::{Display, EnumString};

use crate::bundle::MeasurementBundle;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ProblemCode {
    TooLoud,
    TooQuiet,
    HeadroomClipped,
    HeadroomCritical,
    SeverelyLimited,
    DcOffsetSevere,
    MonoCompatCritical,
    ExtremeCompression,
    HighCodecStress,
    FoldDownSevereCancellation,
    CarTranslationMuddy,
    Clipping,
    EntirelySilent,
    ExcessSilence,
    HighSpectralFlux,
    SibilanceHigh,
    SpectralImbalance,
    MeasurementUnavailable,
    AnalyzerUnavailable,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Problem {
    pub code: ProblemCode,
    pub severity: Severity,
    pub category: ProblemCategory,
    pub description: String,
    pub recommendation: &'static str,
}

type Rule = (AnalyzerName, &'static str, ProblemCode, Severity, ProblemCategory, &'static str);

/// Frozen table: `(analyzer, exact quick-check status, code, severity,
/// category, recommendation)`. Adding an analyzer's failing status here is
/// a version bump, not a runtime-loaded config.
const RULES: &[Rule] = &[
    (AnalyzerName::Loudness, "TOO_LOUD", ProblemCode::TooLoud, Severity::Warning, ProblemCategory::Loudness, "reduce gain to bring integrated loudness within target tolerance"),
    (AnalyzerName::Loudness, "TOO_QUIET", ProblemCode::TooQuiet, Severity::Warning, ProblemCategory::Loudness, "increase gain to bring integrated loudness within target tolerance"),
    (AnalyzerName::Headroom, "CLIPPED", ProblemCode::HeadroomClipped, Severity::Critical, ProblemCategory::Loudness, "reduce level before any further processing; the signal is already clipping"),
    (AnalyzerName::Headroom, "CRITICAL", ProblemCode::HeadroomCritical, Severity::Error, ProblemCategory::Loudness, "apply a peak-limiting pass before further processing"),
    (AnalyzerName::LimiterStress, "SEVERELY_LIMITED", ProblemCode::SeverelyLimited, Severity::Error, ProblemCategory::Dynamics, "reduce limiter drive; the material is over-limited"),
    (AnalyzerName::DcOffset, "SEVERE", ProblemCode::DcOffsetSevere, Severity::Error, ProblemCategory::Integrity, "apply a DC-offset-removal pass before further processing"),
    (AnalyzerName::LowEndMonoCompat, "CRITICAL", ProblemCode::MonoCompatCritical, Severity::Warning, ProblemCategory::Stereo, "narrow low-end stereo width to avoid mono cancellation"),
    (AnalyzerName::GainReduction, "EXTREME_COMPRESSION", ProblemCode::ExtremeCompression, Severity::Warning, ProblemCategory::Dynamics, "reduce compression ratio or threshold depth"),
    (AnalyzerName::CodecStress, "HIGH_CODEC_STRESS", ProblemCode::HighCodecStress, Severity::Warning, ProblemCategory::Codec, "avoid further lossy re-encoding of this material"),
    (AnalyzerName::MonoFoldDown, "SEVERE_CANCELLATION", ProblemCode::FoldDownSevereCancellation, Severity::Warning, ProblemCategory::Stereo, "review phase relationship between channels before mono delivery"),
    (AnalyzerName::CarTranslation, "MUDDY", ProblemCode::CarTranslationMuddy, Severity::Warning, ProblemCategory::Translation, "reduce low-mid buildup for better car-system translation"),
    (AnalyzerName::SamplePeak, "CLIPPING", ProblemCode::Clipping, Severity::Critical, ProblemCategory::Loudness, "reduce level; sample or true peak reaches or exceeds full scale"),
    (AnalyzerName::Silence, "ENTIRELY_SILENT", ProblemCode::EntirelySilent, Severity::Critical, ProblemCategory::Integrity, "verify the source file; no audible signal was detected"),
    (AnalyzerName::Silence, "EXCESS_SILENCE", ProblemCode::ExcessSilence, Severity::Warning, ProblemCategory::Temporal, "trim leading or trailing silence"),
    (AnalyzerName::SpectralFlux, "HIGH_SPECTRAL_FLUX", ProblemCode::HighSpectralFlux, Severity::Info, ProblemCategory::Spectral, "review frame-to-frame spectral stability if a smoother delivery is required"),
    (AnalyzerName::Sibilance, "SIBILANCE_HIGH", ProblemCode::SibilanceHigh, Severity::Warning, ProblemCategory::Spectral, "apply de-essing to the sibilant band"),
];

fn lookup(analyzer: AnalyzerName, status: &str) -> Option<&'static Rule> {
    RULES.iter().find(|(a, s, ..)| *a == analyzer && *s == status)
}

/// Covers analyzers whose failing status is itself data-driven (spectral
/// balance's `{region}_IMBALANCE`) rather than a fixed literal.
fn fallback_problem(analyzer: AnalyzerName, status: &str, note: Option<&str>) -> Problem {
    if analyzer == AnalyzerName::SpectralBalance && status.ends_with("_IMBALANCE") {
        return Problem {
            code: ProblemCode::SpectralImbalance,
            severity: Severity::Warning,
            category: ProblemCategory::Spectral,
            description: note.unwrap_or("energy deviates sharply from the reference curve").to_string(),
            recommendation: "apply corrective EQ to the flagged band",
        };
    }

    Problem {
        code: ProblemCode::MeasurementUnavailable,
        severity: Severity::Info,
        category: ProblemCategory::Integrity,
        description: note.map_or_else(|| format!("{analyzer} could not produce a conclusive result"), str::to_string),
        recommendation: "re-run analysis; the probe may not have produced every needed reading",
    }
}

/// Runs every analyzer's `quick_check` and emits a `Problem` for each
/// failing or unmeasurable result, plus one for each analyzer that never
/// completed (spec §4.13).
#[must_use]
pub fn identify_problems(bundle: &MeasurementBundle) -> Vec<Problem> {
    let mut problems = Vec::new();

    for (&analyzer, outcome) in &bundle.results {
        let short = outcome.quick_check();
        if short.passed {
            continue;
        }
        let problem = match lookup(analyzer, &short.status) {
            Some((_, _, code, severity, category, recommendation)) => Problem {
                code: *code,
                severity: *severity,
                category: *category,
                description: short.note.clone().unwrap_or_else(|| short.status.clone()),
                recommendation,
            },
            None => fallback_problem(analyzer, &short.status, short.note.as_deref()),
        };
        problems.push(problem);
    }

    for (&analyzer, reason) in &bundle.failed {
        problems.push(Problem {
            code: ProblemCode::AnalyzerUnavailable,
            severity: Severity::Warning,
            category: ProblemCategory::Integrity,
            description: format!("{analyzer} did not complete: {reason}"),
            recommendation: "re-run analysis once the probe is available",
        });
    }

    problems
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sondeck_analysis::headroom::{HeadroomResult, HeadroomStatus};
    use std::collections::HashMap;

    #[test]
    fn clipped_headroom_produces_a_critical_problem() {
        let mut bundle = MeasurementBundle { results: HashMap::new(), failed: HashMap::new(), normalization: None };
        bundle.results.insert(
            AnalyzerName::Headroom,
            crate::bundle::AnalyzerOutcome::Headroom(HeadroomResult {
                headroom_db: Some(-0.5),
                status: HeadroomStatus::Clipped,
                max_gain_streaming_db: None,
                max_gain_broadcast_db: None,
                max_gain_mastering_db: None,
            }),
        );

        let problems = identify_problems(&bundle);
        assert_eq!(problems.len(), 1);
        assert_eq!(problems[0].code, ProblemCode::HeadroomClipped);
        assert_eq!(problems[0].severity, Severity::Critical);
    }

    #[test]
    fn a_failed_analyzer_produces_an_unavailable_problem() {
        let bundle = MeasurementBundle {
            results: HashMap::new(),
            failed: HashMap::from([(AnalyzerName::Loudness, "timed out".to_string())]),
            normalization: None,
        };
        let problems = identify_problems(&bundle);
        assert_eq!(problems.len(), 1);
        assert_eq!(problems[0].code, ProblemCode::AnalyzerUnavailable);
    }

    #[test]
    fn passing_analyzers_produce_no_problems() {
        let mut bundle = MeasurementBundle { results: HashMap::new(), failed: HashMap::new(), normalization: None };
        bundle.results.insert(
            AnalyzerName::Headroom,
            crate::bundle::AnalyzerOutcome::Headroom(HeadroomResult {
                headroom_db: Some(-6.0),
                status: HeadroomStatus::Adequate,
                max_gain_streaming_db: Some(5.0),
                max_gain_broadcast_db: Some(4.0),
                max_gain_mastering_db: Some(5.0),
            }),
        );
        assert!(identify_problems(&bundle).is_empty());
    }
}
