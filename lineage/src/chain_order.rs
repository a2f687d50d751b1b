//! Chain-Order Validator (spec §4.10, C10): detects forbidden stage
//! sequences, out-of-order stages, and disallowed repeats.

use crate::errors::{ValidationViolation, ViolationSeverity};
use crate::stage::Stage;

/// Ordered-pair forbidden sequences, independent of the general
/// out-of-order check — some adjacent-stage pairs are unsafe even when
/// neither stage is individually out of place.
const FORBIDDEN_PAIRS: &[(Stage, Stage, ViolationSeverity)] = &[
    (Stage::Dither, Stage::Dynamics, ViolationSeverity::Critical),
    (Stage::Dither, Stage::Eq, ViolationSeverity::Critical),
    (Stage::Dither, Stage::Limiting, ViolationSeverity::Critical),
    (Stage::Limiting, Stage::Dynamics, ViolationSeverity::Error),
    (Stage::Limiting, Stage::Eq, ViolationSeverity::Error),
    (Stage::Stereo, Stage::Limiting, ViolationSeverity::Warning),
    (Stage::FormatConversion, Stage::Dither, ViolationSeverity::Critical),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, strum::Display)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ValidationStatus {
    Valid,
    Warning,
    Invalid,
}

fn status_for(severity: ViolationSeverity) -> ValidationStatus {
    match severity {
        ViolationSeverity::Info => ValidationStatus::Valid,
        ViolationSeverity::Warning => ValidationStatus::Warning,
        ViolationSeverity::Error | ViolationSeverity::Critical => ValidationStatus::Invalid,
    }
}

/// Scans `chain` for forbidden adjacent pairs, out-of-order stages, and
/// disallowed repeats.
#[must_use]
pub fn validate_chain(chain: &[Stage]) -> (ValidationStatus, Vec<ValidationViolation>) {
    let mut violations = Vec::new();

    for window in chain.windows(2) {
        let (from, to) = (window[0], window[1]);
        if let Some(&(_, _, severity)) = FORBIDDEN_PAIRS.iter().find(|(f, t, _)| *f == from && *t == to) {
            violations.push(ValidationViolation {
                severity,
                context: format!("{from} -> {to}"),
                description: format!("{from} followed by {to} is a forbidden sequence"),
            });
        }
    }

    let mut running_max = 0usize;
    for window in chain.windows(2) {
        let (prev, next) = (window[0], window[1]);
        running_max = running_max.max(prev.order_index());
        if next.order_index() < running_max {
            violations.push(ValidationViolation {
                severity: ViolationSeverity::Error,
                context: format!("{prev} -> {next}"),
                description: format!("{next} appears out of order after {prev}"),
            });
        }
    }

    for &stage in &crate::stage::NON_REPEATABLE {
        let count = chain.iter().filter(|&&s| s == stage).count();
        if count > 1 {
            violations.push(ValidationViolation {
                severity: ViolationSeverity::Error,
                context: stage.to_string(),
                description: format!("{stage} appears {count} times; it may not repeat"),
            });
        }
    }

    let status = violations.iter().map(|v| status_for(v.severity)).max().unwrap_or(ValidationStatus::Valid);

    (status, violations)
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProposedPresetValidation {
    pub can_proceed: bool,
    pub introduced_violations: Vec<ValidationViolation>,
}

/// Validates appending `proposed` to `existing`, returning only the
/// violations the proposal itself introduces.
#[must_use]
pub fn validate_proposed_preset(existing: &[Stage], proposed: Stage) -> ProposedPresetValidation {
    let (_, before) = validate_chain(existing);

    let mut with_proposed = existing.to_vec();
    with_proposed.push(proposed);
    let (status, after) = validate_chain(&with_proposed);

    let introduced: Vec<ValidationViolation> = after.into_iter().filter(|v| !before.iter().any(|b| b.description == v.description)).collect();

    ProposedPresetValidation { can_proceed: status != ValidationStatus::Invalid, introduced_violations: introduced }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_chain_is_valid() {
        let (status, violations) = validate_chain(&[]);
        assert_eq!(status, ValidationStatus::Valid);
        assert!(violations.is_empty());
    }

    #[test]
    fn dither_then_dynamics_is_critical() {
        let (status, violations) = validate_chain(&[Stage::Dither, Stage::Dynamics]);
        assert_eq!(status, ValidationStatus::Invalid);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].severity, ViolationSeverity::Critical);
    }

    #[test]
    fn out_of_order_stage_is_flagged() {
        let (status, violations) = validate_chain(&[Stage::Limiting, Stage::Eq]);
        assert_eq!(status, ValidationStatus::Invalid);
        assert!(!violations.is_empty());
    }

    #[test]
    fn repeated_limiting_is_flagged() {
        let (_, violations) = validate_chain(&[Stage::Analysis, Stage::Limiting, Stage::Limiting]);
        assert!(violations.iter().any(|v| v.description.contains("may not repeat")));
    }

    #[test]
    fn proposed_preset_validation_isolates_new_violations() {
        let existing = vec![Stage::Analysis, Stage::Eq];
        let result = validate_proposed_preset(&existing, Stage::Limiting);
        assert!(result.can_proceed);
        assert!(result.introduced_violations.is_empty());

        let result = validate_proposed_preset(&existing, Stage::Dither);
        assert!(result.can_proceed);
    }
}
