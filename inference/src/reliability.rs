//! Reliability scoring (spec §4.8, C8): a pure function combining calibrated
//! confidence, drift status, and circuit-breaker state into a single score
//! callers can threshold against, without re-deriving any of those inputs.

use crate::drift::DriftSeverity;
use crate::supervisor::CircuitState;

fn miscalibration_penalty(expected_calibration_error: f64) -> f64 {
    if expected_calibration_error > 0.20 {
        0.70
    } else if expected_calibration_error > 0.10 {
        0.85
    } else if expected_calibration_error > 0.05 {
        0.95
    } else {
        1.0
    }
}

fn circuit_penalty(state: CircuitState) -> f64 {
    match state {
        CircuitState::Healthy => 1.0,
        CircuitState::Recovering => 0.75,
        CircuitState::Degraded => 0.5,
        CircuitState::CircuitBroken => 0.0,
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reliability {
    pub score: f64,
    pub miscalibration_penalty: f64,
    pub drift_reduction: f64,
    pub circuit_penalty: f64,
}

/// Combines a calibrated confidence with drift and circuit-breaker state
/// into a single `[MIN_FLOOR, MAX_CEILING]`-clamped reliability score.
#[must_use]
pub fn reliability(calibrated_confidence: f64, expected_calibration_error: f64, drift_severity: DriftSeverity, circuit_state: CircuitState) -> Reliability {
    let miscal = miscalibration_penalty(expected_calibration_error);
    let circuit = circuit_penalty(circuit_state);
    let drift_reduction = match drift_severity {
        DriftSeverity::None => 0.0,
        DriftSeverity::Minor => 0.05,
        DriftSeverity::Significant => 0.15,
        DriftSeverity::OutOfDistribution => 0.30,
    };

    let score = (calibrated_confidence * miscal * circuit - drift_reduction).clamp(crate::calibration::MIN_FLOOR, crate::calibration::MAX_CEILING);

    Reliability { score, miscalibration_penalty: miscal, drift_reduction, circuit_penalty: circuit }
}
