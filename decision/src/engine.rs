//! Rule evaluation (spec §4.4): sort by priority descending, walk in
//! order, apply each firing rule's effects. The engine is pure — all state
//! lives in its inputs.

use sondeck_classifier::{Classification, SignalVector};

use crate::bundle::DecisionBundle;
use crate::risk::RiskScores;
use crate::rule::{Condition, Effect, Rule};
use crate::rules_table::RULES;

fn evaluate_condition(condition: &Condition, signals: SignalVector, risks: &RiskScores, classification: &Classification) -> bool {
    match condition {
        Condition::RiskAbove(kind, threshold) => risks.get(kind).is_some_and(|r| r > threshold),
        Condition::SignalAbove(kind, threshold) => signals.get(*kind).is_some_and(|v| v > *threshold),
        Condition::SignalBelow(kind, threshold) => signals.get(*kind).is_some_and(|v| v < *threshold),
        Condition::SignalMissing(kind) => signals.get(*kind).is_none(),
        Condition::StyleIs(tag) => classification.primary == *tag,
        Condition::ConfidenceBelow(threshold) => classification.confidence < *threshold,
        Condition::IsUncertain => classification.is_uncertain,
        Condition::ConflictingSignals => classification.conflicting_signals,
        Condition::And(conditions) => conditions.iter().all(|c| evaluate_condition(c, signals, risks, classification)),
        Condition::Or(conditions) => conditions.iter().any(|c| evaluate_condition(c, signals, risks, classification)),
        Condition::Not(inner) => !evaluate_condition(inner, signals, risks, classification),
        Condition::Always => true,
    }
}

fn apply_effect(effect: &Effect, bundle: &mut DecisionBundle, rule: &Rule) {
    match effect {
        Effect::SetConstraint(name, value) => bundle.set_constraint(name, value.clone(), rule.id, rule.priority),
        Effect::AdjustRiskWeight(kind, factor) => bundle.risk_weights.adjust(*kind, *factor),
        Effect::RaiseFlag(name) => bundle.set_constraint(name, crate::bundle::ConstraintValue::Bool(true), rule.id, rule.priority),
    }
}

fn rule_applies(rule: &Rule, classification: &Classification) -> bool {
    rule.applies_to_styles.is_none_or(|styles| styles.contains(&classification.primary))
}

/// Produces the final Decision Bundle by walking the frozen rule table in
/// priority order (spec §4.4).
#[must_use]
pub fn decide(signals: SignalVector, risks: &RiskScores, classification: Classification) -> DecisionBundle {
    let risk_weights = sondeck_classifier::STYLE_PROFILES
        .iter()
        .find(|p| p.tag == classification.primary)
        .map_or_else(|| sondeck_classifier::STYLE_PROFILES[0].risk_weights, |p| p.risk_weights);

    let mut bundle = DecisionBundle::new(classification, signals, risk_weights);

    let mut ordered: Vec<&Rule> = RULES.iter().collect();
    ordered.sort_by(|a, b| b.priority.cmp(&a.priority));

    for rule in ordered {
        if !rule_applies(rule, &bundle.context.classification) {
            continue;
        }
        if evaluate_condition(&rule.condition, bundle.context.raw_signals, risks, &bundle.context.classification) {
            for effect in rule.effects {
                apply_effect(effect, &mut bundle, rule);
            }
        }
    }

    bundle
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sondeck_classifier::{RiskKind, StyleTag};
    use std::collections::HashMap;

    fn classification(primary: StyleTag, is_uncertain: bool, conflicting: bool) -> Classification {
        Classification {
            primary,
            likelihoods: HashMap::new(),
            confidence: 0.9,
            is_uncertain,
            conflicting_signals: conflicting,
        }
    }

    #[test]
    fn baseline_rule_always_fires() {
        let bundle = decide(SignalVector::default(), &RiskScores::new(), classification(StyleTag::Hybrid, false, false));
        assert_eq!(bundle.constraints["processing_mode"].source_rule, "baseline-processing-mode");
    }

    #[test]
    fn uncertain_classification_overrides_baseline_processing_mode() {
        let bundle = decide(SignalVector::default(), &RiskScores::new(), classification(StyleTag::Hybrid, true, false));
        assert_eq!(bundle.constraints["processing_mode"].source_rule, "uncertain-conservative");
    }

    #[test]
    fn high_clipping_risk_sets_limiter_ceiling() {
        let mut risks = RiskScores::new();
        risks.insert(RiskKind::Clipping, 0.9);
        let bundle = decide(SignalVector::default(), &risks, classification(StyleTag::Trap, false, false));
        assert!(bundle.constraints.contains_key("limiter_ceiling_dbtp"));
        assert!(bundle.applied_rules.iter().any(|a| a.rule_id == "clip-protect" && !a.suppressed));
    }

    #[test]
    fn low_end_guard_only_applies_to_trap_and_drill() {
        let mut risks = RiskScores::new();
        risks.insert(RiskKind::LowEndMasking, 0.9);
        let bundle = decide(SignalVector::default(), &risks, classification(StyleTag::Melodic, false, false));
        assert!(!bundle.constraints.contains_key("bass_mono_below_hz"));
    }

    #[test]
    fn conflicting_signals_raises_review_flag() {
        let bundle = decide(SignalVector::default(), &RiskScores::new(), classification(StyleTag::Hybrid, false, true));
        assert_eq!(bundle.constraints["review_style_classification"].value, crate::bundle::ConstraintValue::Bool(true));
    }
}
