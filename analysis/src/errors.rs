use sondeck_probe::ProbeError;
use thiserror::Error;

/// Errors an analyzer can surface.
///
/// Per §7, a probe failure is caught at the analyzer boundary: it becomes a
/// typed `ProbeUnavailable` here, not a propagated panic or a silently
/// defaulted numeric field. Analyzers never produce sentinel values.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    #[error("probe unavailable: {0}")]
    ProbeUnavailable(#[from] ProbeError),

    #[error("required probe reading was of the wrong kind for this analyzer")]
    WrongReadingKind,
}

pub type AnalysisResult<T> = Result<T, AnalysisError>;
