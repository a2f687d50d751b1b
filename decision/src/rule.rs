//! Rules represented as data (spec §4.4, Design Note in §9): `Condition`
//! and `Effect` are closed sum types rather than `Box<dyn Fn>`, so the full
//! rule table stays serializable and printable for tests.

use sondeck_classifier::{RiskKind, SignalKind, StyleTag};

use crate::bundle::ConstraintValue;

#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    RiskAbove(RiskKind, f64),
    SignalAbove(SignalKind, f64),
    SignalBelow(SignalKind, f64),
    SignalMissing(SignalKind),
    StyleIs(StyleTag),
    ConfidenceBelow(f64),
    IsUncertain,
    ConflictingSignals,
    And(&'static [Condition]),
    Or(&'static [Condition]),
    Not(&'static Condition),
    Always,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    SetConstraint(&'static str, ConstraintValue),
    /// Multiplies the named risk kind's weight by the given factor for the
    /// remainder of this evaluation.
    AdjustRiskWeight(RiskKind, f64),
    RaiseFlag(&'static str),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    pub id: &'static str,
    pub priority: i32,
    pub applies_to_styles: Option<&'static [StyleTag]>,
    pub condition: Condition,
    pub effects: &'static [Effect],
}
