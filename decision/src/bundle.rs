//! The Decision Bundle value type (spec §3/§4.4).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use sondeck_classifier::{Classification, RiskWeightVector, SignalVector};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ConstraintValue {
    Bool(bool),
    Number(f64),
    Text(&'static str),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Constraint {
    pub value: ConstraintValue,
    pub source_rule: &'static str,
    pub priority: i32,
}

/// An entry in the `appliedRules` trace. A suppressed write is recorded as
/// `"<rule-id>:suppressed"` per §4.4 so the full evaluation is auditable
/// even when a later, lower-priority rule tried and lost.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedRule {
    pub rule_id: &'static str,
    pub suppressed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionContext {
    pub classification: Classification,
    pub raw_signals: SignalVector,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionBundle {
    pub applied_rules: Vec<AppliedRule>,
    pub constraints: HashMap<&'static str, Constraint>,
    pub risk_weights: RiskWeightVector,
    pub context: DecisionContext,
}

impl DecisionBundle {
    #[must_use]
    pub fn new(classification: Classification, raw_signals: SignalVector, risk_weights: RiskWeightVector) -> Self {
        Self {
            applied_rules: Vec::new(),
            constraints: HashMap::new(),
            risk_weights,
            context: DecisionContext { classification, raw_signals },
        }
    }

    /// Writes a constraint if `priority` is greater than or equal to the
    /// incumbent's; otherwise records the write as suppressed and leaves
    /// the incumbent untouched (spec §4.4).
    pub fn set_constraint(&mut self, name: &'static str, value: ConstraintValue, rule_id: &'static str, priority: i32) {
        let should_write = self.constraints.get(name).is_none_or(|incumbent| priority >= incumbent.priority);
        if should_write {
            self.constraints.insert(name, Constraint { value, source_rule: rule_id, priority });
            self.applied_rules.push(AppliedRule { rule_id, suppressed: false });
        } else {
            self.applied_rules.push(AppliedRule { rule_id, suppressed: true });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sondeck_classifier::STYLE_PROFILES;
    use std::collections::HashMap as StdHashMap;

    fn empty_bundle() -> DecisionBundle {
        let classification = Classification {
            primary: STYLE_PROFILES[0].tag,
            likelihoods: StdHashMap::new(),
            confidence: 1.0,
            is_uncertain: false,
            conflicting_signals: false,
        };
        DecisionBundle::new(classification, SignalVector::default(), STYLE_PROFILES[0].risk_weights)
    }

    #[test]
    fn higher_priority_write_replaces_incumbent() {
        let mut bundle = empty_bundle();
        bundle.set_constraint("gain", ConstraintValue::Number(1.0), "rule-a", 10);
        bundle.set_constraint("gain", ConstraintValue::Number(2.0), "rule-b", 20);
        assert_eq!(bundle.constraints["gain"].value, ConstraintValue::Number(2.0));
        assert_eq!(bundle.constraints["gain"].source_rule, "rule-b");
    }

    #[test]
    fn lower_priority_write_is_suppressed_and_logged() {
        let mut bundle = empty_bundle();
        bundle.set_constraint("gain", ConstraintValue::Number(2.0), "rule-b", 20);
        bundle.set_constraint("gain", ConstraintValue::Number(1.0), "rule-a", 10);
        assert_eq!(bundle.constraints["gain"].source_rule, "rule-b");
        assert!(bundle.applied_rules.iter().any(|a| a.rule_id == "rule-a" && a.suppressed));
    }

    #[test]
    fn equal_priority_write_replaces_incumbent() {
        let mut bundle = empty_bundle();
        bundle.set_constraint("gain", ConstraintValue::Number(1.0), "rule-a", 10);
        bundle.set_constraint("gain", ConstraintValue::Number(2.0), "rule-b", 10);
        assert_eq!(bundle.constraints["gain"].source_rule, "rule-b");
    }
}
