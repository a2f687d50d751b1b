//! Weighted-likelihood style classification (spec §4.3).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::profile::{StyleProfile, StyleTag, STYLE_PROFILES};
use crate::signals::SignalVector;

const CONFLICT_THRESHOLD: f64 = 0.25;
const HYBRID_DELTA: f64 = 0.1;
const UNCERTAIN_CONFIDENCE: f64 = 0.5;
const UNCERTAIN_DELTA: f64 = 0.15;
/// Two profiles' characteristic BPM expectations are treated as
/// "non-adjacent" (spec's low-BPM-vs-high-transient-density example) once
/// their range midpoints are this far apart.
const NON_ADJACENT_BPM_SPREAD: f64 = 40.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub primary: StyleTag,
    pub likelihoods: HashMap<StyleTag, f64>,
    pub confidence: f64,
    pub is_uncertain: bool,
    pub conflicting_signals: bool,
}

/// Trapezoidal kernel: `1.0` fully inside `[min, max]`, decaying linearly
/// to `0.0` at one range-width past either edge.
#[must_use]
pub(crate) fn kernel_fit(value: f64, min: f64, max: f64) -> f64 {
    if value >= min && value <= max {
        return 1.0;
    }
    let width = (max - min).max(f64::EPSILON);
    let distance = if value < min { min - value } else { value - max };
    (1.0 - distance / width).clamp(0.0, 1.0)
}

fn unnormalized_likelihood(profile: &StyleProfile, signals: SignalVector) -> f64 {
    profile
        .signal_ranges
        .iter()
        .map(|r| match signals.get(r.signal) {
            Some(v) => kernel_fit(v, r.min, r.max) * r.weight,
            None => 1.0,
        })
        .sum()
}

fn bpm_midpoint(profile: &StyleProfile) -> Option<f64> {
    profile.signal_ranges.iter().find(|r| r.signal == crate::signals::SignalKind::Bpm).map(|r| (r.min + r.max) / 2.0)
}

#[must_use]
pub fn classify(signals: SignalVector) -> Classification {
    let raw: Vec<(StyleTag, f64)> =
        STYLE_PROFILES.iter().map(|p| (p.tag, unnormalized_likelihood(p, signals))).collect();
    let total: f64 = raw.iter().map(|(_, v)| v).sum();

    let likelihoods: HashMap<StyleTag, f64> = if total <= f64::EPSILON {
        let uniform = 1.0 / raw.len() as f64;
        raw.iter().map(|(tag, _)| (*tag, uniform)).collect()
    } else {
        raw.iter().map(|(tag, v)| (*tag, v / total)).collect()
    };

    let mut ranked: Vec<(StyleTag, f64)> = likelihoods.iter().map(|(t, l)| (*t, *l)).collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));

    let (top_tag, top_l) = ranked[0];
    let second_l = ranked.get(1).map_or(0.0, |(_, l)| *l);
    let delta = top_l - second_l;

    let force_hybrid = delta < HYBRID_DELTA && top_l > CONFLICT_THRESHOLD && second_l > CONFLICT_THRESHOLD;
    let primary = if force_hybrid { StyleTag::Hybrid } else { top_tag };
    let confidence = likelihoods.get(&primary).copied().unwrap_or(top_l);

    let above_threshold: Vec<StyleTag> = ranked.iter().filter(|(_, l)| *l > CONFLICT_THRESHOLD).map(|(t, _)| *t).collect();
    let conflicting_signals = above_threshold.len() >= 2 && {
        let midpoints: Vec<f64> = above_threshold
            .iter()
            .filter_map(|t| STYLE_PROFILES.iter().find(|p| p.tag == *t))
            .filter_map(bpm_midpoint)
            .collect();
        midpoints.len() >= 2
            && midpoints
                .iter()
                .enumerate()
                .flat_map(|(i, a)| midpoints[i + 1..].iter().map(move |b| (a - b).abs()))
                .any(|spread| spread >= NON_ADJACENT_BPM_SPREAD)
    };

    let is_uncertain = confidence < UNCERTAIN_CONFIDENCE || delta < UNCERTAIN_DELTA;

    Classification { primary, likelihoods, confidence, is_uncertain, conflicting_signals }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn all_null_signals_yield_uniform_uncertain_classification() {
        let classification = classify(SignalVector::default());
        assert!(classification.is_uncertain);
        let expected = 1.0 / STYLE_PROFILES.len() as f64;
        for l in classification.likelihoods.values() {
            assert!((l - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn likelihoods_sum_to_one() {
        let signals = SignalVector { bpm: Some(140.0), crest_factor_db: Some(8.0), ..Default::default() };
        let classification = classify(signals);
        let sum: f64 = classification.likelihoods.values().sum();
        assert!((sum - 1.0).abs() < 1e-9);
    }

    #[test]
    fn kernel_fit_is_one_inside_range_and_decays_outside() {
        assert_eq!(kernel_fit(100.0, 90.0, 110.0), 1.0);
        assert!(kernel_fit(130.0, 90.0, 110.0) < 1.0);
        assert!(kernel_fit(130.0, 90.0, 110.0) >= 0.0);
    }

    #[test]
    fn strongly_trap_signals_select_trap() {
        let signals = SignalVector {
            bpm: Some(145.0),
            transient_sharpness: Some(0.8),
            sub_bass_energy_ratio: Some(0.35),
            crest_factor_db: Some(9.0),
            ..Default::default()
        };
        let classification = classify(signals);
        assert_eq!(classification.primary, StyleTag::Trap);
    }
}
