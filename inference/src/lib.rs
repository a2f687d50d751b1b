//! Confidence calibration, signal-drift detection, and a supervised wrapper
//! around caller-supplied ML inference (spec §4.5-§4.8).

pub mod calibration;
pub mod drift;
pub mod errors;
pub mod model_id;
pub mod reliability;
pub mod supervisor;

pub use calibration::{CalibratedConfidence, CalibrationRegistry, MAX_CEILING, MIN_FLOOR};
pub use drift::{
    detect_drift, DriftReport, DriftSeverity, OodIndicator, OodIndicatorKind, OodIndicatorSeverity, RawProbeSignals,
    SignalDistribution, TrainingDistribution, DEFAULT_TRAINING_DISTRIBUTION,
};
pub use errors::{FailureKind, InferenceError, InferenceResult};
pub use model_id::ModelId;
pub use reliability::{reliability, Reliability};
pub use supervisor::{CircuitState, Escalation, FallbackStrategy, InferenceSupervisor, Supervised};
