//! Closed set of ways a caller-supplied inference call can fail (spec §4.7).

use thiserror::Error;

use crate::model_id::ModelId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumString)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum FailureKind {
    Timeout,
    Exception,
    NanOutput,
    NullOutput,
    UndefinedOutput,
    InvalidShape,
    OutOfRange,
    ConfidenceCollapse,
    ModelUnavailable,
    InvalidInput,
    Unknown,
}

#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("model {model} timed out after {elapsed_ms}ms")]
    Timeout { model: ModelId, elapsed_ms: u64 },

    #[error("model {model} raised an exception: {reason}")]
    Exception { model: ModelId, reason: String },

    #[error("model {model} produced a NaN output")]
    NanOutput { model: ModelId },

    #[error("model {model} produced a null output")]
    NullOutput { model: ModelId },

    #[error("model {model} produced an undefined (non-finite, non-NaN) output")]
    UndefinedOutput { model: ModelId },

    #[error("model {model} produced an output of shape {shape:?}, expected {expected:?}")]
    InvalidShape { model: ModelId, shape: Vec<usize>, expected: Vec<usize> },

    #[error("model {model} produced output {value} outside the valid range [{min}, {max}]")]
    OutOfRange { model: ModelId, value: f64, min: f64, max: f64 },

    #[error("model {model} confidence collapsed to {value}")]
    ConfidenceCollapse { model: ModelId, value: f64 },

    #[error("model {model} is unavailable")]
    ModelUnavailable { model: ModelId },

    #[error("invalid input for model {model}: {reason}")]
    InvalidInput { model: ModelId, reason: String },

    #[error("unknown failure for model {model}: {reason}")]
    Unknown { model: ModelId, reason: String },
}

impl InferenceError {
    #[must_use]
    pub fn model(&self) -> &ModelId {
        match self {
            Self::Timeout { model, .. }
            | Self::Exception { model, .. }
            | Self::NanOutput { model }
            | Self::NullOutput { model }
            | Self::UndefinedOutput { model }
            | Self::InvalidShape { model, .. }
            | Self::OutOfRange { model, .. }
            | Self::ConfidenceCollapse { model, .. }
            | Self::ModelUnavailable { model }
            | Self::InvalidInput { model, .. }
            | Self::Unknown { model, .. } => model,
        }
    }

    #[must_use]
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Timeout { .. } => FailureKind::Timeout,
            Self::Exception { .. } => FailureKind::Exception,
            Self::NanOutput { .. } => FailureKind::NanOutput,
            Self::NullOutput { .. } => FailureKind::NullOutput,
            Self::UndefinedOutput { .. } => FailureKind::UndefinedOutput,
            Self::InvalidShape { .. } => FailureKind::InvalidShape,
            Self::OutOfRange { .. } => FailureKind::OutOfRange,
            Self::ConfidenceCollapse { .. } => FailureKind::ConfidenceCollapse,
            Self::ModelUnavailable { .. } => FailureKind::ModelUnavailable,
            Self::InvalidInput { .. } => FailureKind::InvalidInput,
            Self::Unknown { .. } => FailureKind::Unknown,
        }
    }
}

pub type InferenceResult<T> = Result<T, InferenceError>;

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn kind_matches_variant() {
        let err = InferenceError::NanOutput { model: ModelId::new("m") };
        assert_eq!(err.kind(), FailureKind::NanOutput);
    }

    #[test]
    fn failure_kind_round_trips_through_strum() {
        use std::str::FromStr;
        assert_eq!(FailureKind::from_str("CIRCUIT_BREAK").is_err(), true);
        assert_eq!(FailureKind::from_str("TIMEOUT").unwrap(), FailureKind::Timeout);
    }
}
