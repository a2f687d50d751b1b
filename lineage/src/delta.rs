//! Per-edge metric delta and transformation inference (spec §4.11, C11).

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display, EnumString)]
#[strum(serialize_all = "camelCase")]
pub enum LineageMetric {
    IntegratedLoudness,
    TruePeak,
    DynamicRange,
    StereoWidth,
    SpectralBalance,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum DeltaSeverity {
    Negligible,
    Minor,
    Moderate,
    Major,
    Extreme,
}

/// Per-metric severity-bucket thresholds: `(minor, moderate, major, extreme)`.
const THRESHOLDS: &[(LineageMetric, f64, f64, f64, f64)] = &[
    (LineageMetric::IntegratedLoudness, 1.0, 3.0, 6.0, 12.0),
    (LineageMetric::TruePeak, 0.5, 1.0, 2.0, 3.0),
    (LineageMetric::DynamicRange, 1.0, 2.0, 4.0, 8.0),
    (LineageMetric::StereoWidth, 0.05, 0.15, 0.30, 0.50),
    (LineageMetric::SpectralBalance, 1.0, 3.0, 6.0, 10.0),
];

fn bucket(metric: LineageMetric, abs_delta: f64) -> DeltaSeverity {
    let Some(&(_, minor, moderate, major, extreme)) = THRESHOLDS.iter().find(|(m, ..)| *m == metric) else {
        return DeltaSeverity::Negligible;
    };
    if abs_delta >= extreme {
        DeltaSeverity::Extreme
    } else if abs_delta >= major {
        DeltaSeverity::Major
    } else if abs_delta >= moderate {
        DeltaSeverity::Moderate
    } else if abs_delta >= minor {
        DeltaSeverity::Minor
    } else {
        DeltaSeverity::Negligible
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricDelta {
    pub metric: LineageMetric,
    pub from: f64,
    pub to: f64,
    pub change: f64,
    pub severity: DeltaSeverity,
}

/// Per-edge metrics: a value for every [`LineageMetric`] an implementer has
/// a measurement for; missing metrics are simply absent from the result.
pub type MetricSnapshot = std::collections::HashMap<LineageMetric, f64>;

/// Computes the per-metric delta between a parent and child asset's
/// measurements. Metrics present in only one snapshot are skipped.
#[must_use]
pub fn calculate_delta(parent: &MetricSnapshot, child: &MetricSnapshot) -> Vec<MetricDelta> {
    let mut deltas = Vec::new();
    for (&metric, &from) in parent {
        let Some(&to) = child.get(&metric) else { continue };
        let change = to - from;
        deltas.push(MetricDelta { metric, from, to, change, severity: bucket(metric, change.abs()) });
    }
    deltas.sort_by_key(|d| d.metric);
    deltas
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum TransformationPattern {
    LevelChange,
    Dynamics,
    Eq,
    Reverb,
    Stereo,
    Format,
    Restoration,
    Mixed,
    Unknown,
}

/// Which metrics a pattern expects to move (`observed`) vs. stay put
/// (`preserved`); a delta scores a pattern by how well it matches both sets.
struct PatternSignature {
    pattern: TransformationPattern,
    observed: &'static [LineageMetric],
    preserved: &'static [LineageMetric],
}

const PATTERNS: &[PatternSignature] = &[
    PatternSignature {
        pattern: TransformationPattern::LevelChange,
        observed: &[LineageMetric::IntegratedLoudness, LineageMetric::TruePeak],
        preserved: &[LineageMetric::DynamicRange, LineageMetric::StereoWidth, LineageMetric::SpectralBalance],
    },
    PatternSignature {
        pattern: TransformationPattern::Dynamics,
        observed: &[LineageMetric::DynamicRange, LineageMetric::TruePeak],
        preserved: &[LineageMetric::StereoWidth, LineageMetric::SpectralBalance],
    },
    PatternSignature {
        pattern: TransformationPattern::Eq,
        observed: &[LineageMetric::SpectralBalance],
        preserved: &[LineageMetric::DynamicRange, LineageMetric::StereoWidth],
    },
    PatternSignature {
        pattern: TransformationPattern::Stereo,
        observed: &[LineageMetric::StereoWidth],
        preserved: &[LineageMetric::IntegratedLoudness, LineageMetric::DynamicRange],
    },
    PatternSignature {
        pattern: TransformationPattern::Format,
        observed: &[],
        preserved: &[LineageMetric::IntegratedLoudness, LineageMetric::TruePeak, LineageMetric::DynamicRange, LineageMetric::StereoWidth, LineageMetric::SpectralBalance],
    },
    PatternSignature {
        pattern: TransformationPattern::Restoration,
        observed: &[LineageMetric::SpectralBalance, LineageMetric::DynamicRange],
        preserved: &[LineageMetric::IntegratedLoudness],
    },
];

fn moved(deltas: &[MetricDelta], metric: LineageMetric) -> bool {
    deltas.iter().any(|d| d.metric == metric && d.severity != DeltaSeverity::Negligible)
}

fn signature_score(signature: &PatternSignature, deltas: &[MetricDelta]) -> f64 {
    let observed_hits = signature.observed.iter().filter(|&&m| moved(deltas, m)).count();
    let preserved_hits = signature.preserved.iter().filter(|&&m| !moved(deltas, m)).count();
    let total = (signature.observed.len() + signature.preserved.len()).max(1) as f64;
    (observed_hits + preserved_hits) as f64 / total
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformationInference {
    pub pattern: TransformationPattern,
    pub confidence: f64,
}

/// Scores `deltas` against the frozen pattern table and returns the best
/// match. Falls back to `MIXED` when several patterns score similarly well,
/// or `UNKNOWN` when nothing scores meaningfully above chance.
#[must_use]
pub fn infer_transformation(deltas: &[MetricDelta]) -> TransformationInference {
    if deltas.iter().all(|d| d.severity == DeltaSeverity::Negligible) {
        return TransformationInference { pattern: TransformationPattern::Unknown, confidence: 0.0 };
    }

    let mut scored: Vec<(TransformationPattern, f64)> = PATTERNS.iter().map(|sig| (sig.pattern, signature_score(sig, deltas))).collect();
    scored.sort_by(|a, b| b.1.total_cmp(&a.1));

    let (best_pattern, best_score) = scored[0];
    let second_score = scored.get(1).map_or(0.0, |&(_, s)| s);

    if best_score < 0.5 {
        TransformationInference { pattern: TransformationPattern::Unknown, confidence: best_score }
    } else if (best_score - second_score).abs() < 0.1 {
        TransformationInference { pattern: TransformationPattern::Mixed, confidence: best_score }
    } else {
        TransformationInference { pattern: best_pattern, confidence: best_score }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn snapshot(pairs: &[(LineageMetric, f64)]) -> MetricSnapshot {
        pairs.iter().copied().collect()
    }

    #[test]
    fn loudness_increase_buckets_as_extreme_at_12db() {
        let parent = snapshot(&[(LineageMetric::IntegratedLoudness, -20.0)]);
        let child = snapshot(&[(LineageMetric::IntegratedLoudness, -8.0)]);
        let deltas = calculate_delta(&parent, &child);
        assert_eq!(deltas[0].severity, DeltaSeverity::Extreme);
    }

    #[test]
    fn pure_level_change_is_identified() {
        let parent = snapshot(&[
            (LineageMetric::IntegratedLoudness, -16.0),
            (LineageMetric::TruePeak, -1.0),
            (LineageMetric::DynamicRange, 10.0),
            (LineageMetric::StereoWidth, 0.5),
            (LineageMetric::SpectralBalance, 0.0),
        ]);
        let child = snapshot(&[
            (LineageMetric::IntegratedLoudness, -10.0),
            (LineageMetric::TruePeak, -0.5),
            (LineageMetric::DynamicRange, 10.0),
            (LineageMetric::StereoWidth, 0.5),
            (LineageMetric::SpectralBalance, 0.0),
        ]);
        let deltas = calculate_delta(&parent, &child);
        let inference = infer_transformation(&deltas);
        assert_eq!(inference.pattern, TransformationPattern::LevelChange);
    }

    #[test]
    fn no_movement_is_unknown() {
        let parent = snapshot(&[(LineageMetric::IntegratedLoudness, -16.0)]);
        let child = snapshot(&[(LineageMetric::IntegratedLoudness, -16.0)]);
        let deltas = calculate_delta(&parent, &child);
        assert_eq!(infer_transformation(&deltas).pattern, TransformationPattern::Unknown);
    }
}
