//! Frozen per-style expected ranges and risk-weight vectors (spec §3/§4.3).

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::signals::SignalKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter)]
#[strum(serialize_all = "kebab-case")]
pub enum StyleTag {
    Trap,
    Drill,
    Melodic,
    BoomBap,
    Hybrid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter)]
#[strum(serialize_all = "camelCase")]
pub enum RiskKind {
    Masking,
    Clipping,
    Translation,
    PhaseCollapse,
    OverCompression,
    VocalIntelligibility,
    LowEndMasking,
    ArtifactRisk,
    DynamicsLoss,
}

/// A signal's expected range within a style, plus how strongly it should
/// pull the likelihood when the measured value sits outside that range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignalRange {
    pub signal: SignalKind,
    pub min: f64,
    pub max: f64,
    pub weight: f64,
}

/// A per-risk-kind weight used by the Decision Engine's weighted-confidence
/// formula (spec §4.4): `confidence_weighted = 1 - Σ w_k·r_k / Σ w_k`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskWeightVector(pub [(RiskKind, f64); 9]);

impl RiskWeightVector {
    #[must_use]
    pub fn weight_of(&self, kind: RiskKind) -> f64 {
        self.0.iter().find(|(k, _)| *k == kind).map_or(1.0, |(_, w)| *w)
    }

    /// Multiplies the named risk kind's weight by `factor` in place.
    pub fn adjust(&mut self, kind: RiskKind, factor: f64) {
        if let Some(entry) = self.0.iter_mut().find(|(k, _)| *k == kind) {
            entry.1 *= factor;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StyleProfile {
    pub tag: StyleTag,
    pub signal_ranges: &'static [SignalRange],
    pub risk_weights: RiskWeightVector,
}

impl StyleProfile {
    #[must_use]
    pub fn range_of(&self, signal: SignalKind) -> Option<SignalRange> {
        self.signal_ranges.iter().copied().find(|r| r.signal == signal)
    }
}

const fn range(signal: SignalKind, min: f64, max: f64, weight: f64) -> SignalRange {
    SignalRange { signal, min, max, weight }
}

const TRAP_RANGES: &[SignalRange] = &[
    range(SignalKind::Bpm, 130.0, 160.0, 1.0),
    range(SignalKind::TransientSharpness, 0.55, 1.0, 1.2),
    range(SignalKind::SubBassEnergyRatio, 0.25, 0.45, 1.0),
    range(SignalKind::CrestFactorDb, 6.0, 13.0, 0.8),
];

const DRILL_RANGES: &[SignalRange] = &[
    range(SignalKind::Bpm, 135.0, 145.0, 1.2),
    range(SignalKind::SubBassEnergyRatio, 0.30, 0.55, 1.1),
    range(SignalKind::LowEndMonoCorrelation, 0.6, 1.0, 0.9),
];

const MELODIC_RANGES: &[SignalRange] = &[
    range(SignalKind::Bpm, 70.0, 110.0, 1.0),
    range(SignalKind::LoudnessRangeLu, 6.0, 14.0, 1.1),
    range(SignalKind::MacroDynamicsRangeLu, 3.0, 10.0, 1.0),
    range(SignalKind::StereoWidth, 0.3, 0.75, 0.7),
];

const BOOM_BAP_RANGES: &[SignalRange] = &[
    range(SignalKind::Bpm, 85.0, 100.0, 1.1),
    range(SignalKind::CrestFactorDb, 9.0, 18.0, 1.0),
    range(SignalKind::TransientSharpness, 0.4, 0.75, 0.9),
];

const HYBRID_RANGES: &[SignalRange] = &[
    range(SignalKind::Bpm, 90.0, 140.0, 0.6),
    range(SignalKind::LoudnessRangeLu, 4.0, 12.0, 0.6),
    range(SignalKind::StereoWidth, 0.2, 0.8, 0.6),
];

const fn uniform_risk_weights() -> RiskWeightVector {
    RiskWeightVector([
        (RiskKind::Masking, 1.0),
        (RiskKind::Clipping, 1.0),
        (RiskKind::Translation, 1.0),
        (RiskKind::PhaseCollapse, 1.0),
        (RiskKind::OverCompression, 1.0),
        (RiskKind::VocalIntelligibility, 1.0),
        (RiskKind::LowEndMasking, 1.0),
        (RiskKind::ArtifactRisk, 1.0),
        (RiskKind::DynamicsLoss, 1.0),
    ])
}

/// Frozen per-style table. New styles, or changes to an existing style's
/// ranges/weights, require a version bump — this is not a runtime-loaded
/// table.
pub const STYLE_PROFILES: &[StyleProfile] = &[
    StyleProfile {
        tag: StyleTag::Trap,
        signal_ranges: TRAP_RANGES,
        risk_weights: RiskWeightVector([
            (RiskKind::Masking, 1.1),
            (RiskKind::Clipping, 1.3),
            (RiskKind::Translation, 1.2),
            (RiskKind::PhaseCollapse, 0.9),
            (RiskKind::OverCompression, 1.4),
            (RiskKind::VocalIntelligibility, 1.0),
            (RiskKind::LowEndMasking, 1.3),
            (RiskKind::ArtifactRisk, 1.0),
            (RiskKind::DynamicsLoss, 1.2),
        ]),
    },
    StyleProfile {
        tag: StyleTag::Drill,
        signal_ranges: DRILL_RANGES,
        risk_weights: RiskWeightVector([
            (RiskKind::Masking, 1.2),
            (RiskKind::Clipping, 1.2),
            (RiskKind::Translation, 1.4),
            (RiskKind::PhaseCollapse, 1.0),
            (RiskKind::OverCompression, 1.3),
            (RiskKind::VocalIntelligibility, 0.9),
            (RiskKind::LowEndMasking, 1.5),
            (RiskKind::ArtifactRisk, 1.0),
            (RiskKind::DynamicsLoss, 1.1),
        ]),
    },
    StyleProfile { tag: StyleTag::Melodic, signal_ranges: MELODIC_RANGES, risk_weights: uniform_risk_weights() },
    StyleProfile {
        tag: StyleTag::BoomBap,
        signal_ranges: BOOM_BAP_RANGES,
        risk_weights: RiskWeightVector([
            (RiskKind::Masking, 1.0),
            (RiskKind::Clipping, 0.9),
            (RiskKind::Translation, 1.0),
            (RiskKind::PhaseCollapse, 1.0),
            (RiskKind::OverCompression, 0.8),
            (RiskKind::VocalIntelligibility, 1.2),
            (RiskKind::LowEndMasking, 1.0),
            (RiskKind::ArtifactRisk, 1.1),
            (RiskKind::DynamicsLoss, 0.9),
        ]),
    },
    StyleProfile { tag: StyleTag::Hybrid, signal_ranges: HYBRID_RANGES, risk_weights: uniform_risk_weights() },
];

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn every_style_tag_has_exactly_one_profile() {
        use strum::IntoEnumIterator;
        for tag in StyleTag::iter() {
            let count = STYLE_PROFILES.iter().filter(|p| p.tag == tag).count();
            assert_eq!(count, 1, "expected exactly one profile for {tag}");
        }
    }

    #[test]
    fn risk_weight_lookup_falls_back_to_neutral() {
        let weights = uniform_risk_weights();
        assert_eq!(weights.weight_of(RiskKind::Masking), 1.0);
    }
}
