//! Weighted-confidence scoring over risk scores (spec §4.4).

use std::collections::HashMap;

use sondeck_classifier::{RiskKind, RiskWeightVector};

/// A risk score per kind, each in `[0,1]`, as produced upstream by
/// whatever analyzer-derived heuristic estimates that risk.
pub type RiskScores = HashMap<RiskKind, f64>;

/// `confidence_weighted = 1 - Σ_k w_k·r_k / Σ_k w_k`, clamped to `[0,1]`
/// (spec §4.4).
#[must_use]
pub fn weighted_confidence(risks: &RiskScores, weights: RiskWeightVector) -> f64 {
    let (weighted_sum, total_weight) = risks.iter().fold((0.0, 0.0), |(ws, tw), (kind, score)| {
        let w = weights.weight_of(*kind);
        (ws + w * score.clamp(0.0, 1.0), tw + w)
    });
    if total_weight <= f64::EPSILON {
        return 1.0;
    }
    (1.0 - weighted_sum / total_weight).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sondeck_classifier::STYLE_PROFILES;

    #[test]
    fn no_risks_is_full_confidence() {
        let weights = STYLE_PROFILES[0].risk_weights;
        assert_eq!(weighted_confidence(&RiskScores::new(), weights), 1.0);
    }

    #[test]
    fn maximal_risk_on_every_kind_is_zero_confidence() {
        let weights = STYLE_PROFILES[0].risk_weights;
        let mut risks = RiskScores::new();
        for kind in [
            RiskKind::Masking,
            RiskKind::Clipping,
            RiskKind::Translation,
            RiskKind::PhaseCollapse,
            RiskKind::OverCompression,
            RiskKind::VocalIntelligibility,
            RiskKind::LowEndMasking,
            RiskKind::ArtifactRisk,
            RiskKind::DynamicsLoss,
        ] {
            risks.insert(kind, 1.0);
        }
        assert!((weighted_confidence(&risks, weights) - 0.0).abs() < 1e-9);
    }
}
