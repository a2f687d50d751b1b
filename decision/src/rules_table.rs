//! The frozen ordered rule list (spec §4.4). New rules, or changes to
//! priority/condition/effect of an existing rule, are a versioned change —
//! this is not a runtime-loaded table.

use sondeck_classifier::{RiskKind, SignalKind, StyleTag};

use crate::bundle::ConstraintValue;
use crate::rule::{Condition, Effect, Rule};

const STEREO_RISK_STYLES: &[StyleTag] = &[StyleTag::Melodic, StyleTag::Hybrid];
const LOW_END_STYLES: &[StyleTag] = &[StyleTag::Trap, StyleTag::Drill];

const PHASE_COLLAPSE_EFFECTS: &[Effect] = &[Effect::SetConstraint("stereo_widener", ConstraintValue::Bool(true))];
const CLIP_PROTECT_EFFECTS: &[Effect] = &[Effect::SetConstraint("limiter_ceiling_dbtp", ConstraintValue::Number(-1.0))];
const LOW_END_GUARD_EFFECTS: &[Effect] = &[Effect::SetConstraint("bass_mono_below_hz", ConstraintValue::Number(120.0))];
const UNCERTAIN_EFFECTS: &[Effect] = &[Effect::SetConstraint("processing_mode", ConstraintValue::Text("conservative"))];
const CONFLICTING_SIGNALS_EFFECTS: &[Effect] = &[Effect::RaiseFlag("review_style_classification")];
const MELODIC_DYNAMICS_EFFECTS: &[Effect] = &[Effect::SetConstraint("dynamics_processing", ConstraintValue::Text("light"))];
const OVER_COMPRESSION_EFFECTS: &[Effect] = &[Effect::AdjustRiskWeight(RiskKind::DynamicsLoss, 1.5)];
const VOCAL_CLARITY_EFFECTS: &[Effect] = &[Effect::SetConstraint("vocal_clarity_eq", ConstraintValue::Text("boost_presence"))];
const BASELINE_EFFECTS: &[Effect] = &[Effect::SetConstraint("processing_mode", ConstraintValue::Text("standard"))];

const VOCAL_CLARITY_AND: &[Condition] =
    &[Condition::RiskAbove(RiskKind::VocalIntelligibility, 0.5), Condition::StyleIs(StyleTag::Melodic)];

pub const RULES: &[Rule] = &[
    Rule {
        id: "phase-collapse-guard",
        priority: 110,
        applies_to_styles: Some(STEREO_RISK_STYLES),
        condition: Condition::SignalBelow(SignalKind::StereoWidth, 0.1),
        effects: PHASE_COLLAPSE_EFFECTS,
    },
    Rule {
        id: "clip-protect",
        priority: 100,
        applies_to_styles: None,
        condition: Condition::RiskAbove(RiskKind::Clipping, 0.7),
        effects: CLIP_PROTECT_EFFECTS,
    },
    Rule {
        id: "trap-low-end-guard",
        priority: 90,
        applies_to_styles: Some(LOW_END_STYLES),
        condition: Condition::RiskAbove(RiskKind::LowEndMasking, 0.6),
        effects: LOW_END_GUARD_EFFECTS,
    },
    Rule {
        id: "uncertain-conservative",
        priority: 80,
        applies_to_styles: None,
        condition: Condition::IsUncertain,
        effects: UNCERTAIN_EFFECTS,
    },
    Rule {
        id: "conflicting-signals-flag",
        priority: 70,
        applies_to_styles: None,
        condition: Condition::ConflictingSignals,
        effects: CONFLICTING_SIGNALS_EFFECTS,
    },
    Rule {
        id: "melodic-dynamics-preserve",
        priority: 60,
        applies_to_styles: Some(&[StyleTag::Melodic]),
        condition: Condition::SignalAbove(SignalKind::LoudnessRangeLu, 10.0),
        effects: MELODIC_DYNAMICS_EFFECTS,
    },
    Rule {
        id: "over-compression-guard",
        priority: 50,
        applies_to_styles: None,
        condition: Condition::RiskAbove(RiskKind::OverCompression, 0.5),
        effects: OVER_COMPRESSION_EFFECTS,
    },
    Rule {
        id: "vocal-clarity-boost",
        priority: 40,
        applies_to_styles: None,
        condition: Condition::And(VOCAL_CLARITY_AND),
        effects: VOCAL_CLARITY_EFFECTS,
    },
    Rule {
        id: "baseline-processing-mode",
        priority: 0,
        applies_to_styles: None,
        condition: Condition::Always,
        effects: BASELINE_EFFECTS,
    },
];
